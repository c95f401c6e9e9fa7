pub mod link_store;
