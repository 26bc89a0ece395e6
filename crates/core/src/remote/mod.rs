pub mod firestore;
pub mod memory;
pub mod traits;
