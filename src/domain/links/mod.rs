pub mod link_document;
