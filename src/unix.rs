pub mod error;
pub mod session;
pub mod socket;
mod types;
