pub mod account;
pub mod budget;
pub mod dream;
pub mod report;
pub mod seed;
pub mod state;
pub mod transaction;
pub mod user;
