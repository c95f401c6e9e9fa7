pub mod link_document_store;
