pub mod coordinator;
pub mod remote;
pub mod selector;
pub mod state;
