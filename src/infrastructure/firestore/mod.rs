pub mod credentials;
pub mod link_store;
pub mod token;
pub mod value;

pub use link_store::FirestoreLinkStore;
