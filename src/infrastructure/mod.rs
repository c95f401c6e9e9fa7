pub mod firestore;
pub mod memory;
