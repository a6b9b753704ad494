//! Network layer - student API calls
//!
//! The Network actor receives API commands and sends back typed outcomes.

pub mod actor;
pub mod client;
pub mod error;

pub use actor::NetworkActor;
pub use client::StudentClient;
pub use error::ApiError;
