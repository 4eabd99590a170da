//! Request handler module
//!
//! Responsible for request routing dispatch and the service endpoints:
//! the status payload and diagram generation.

pub mod router;
pub mod status;
pub mod venn;

// Re-export main entry point
pub use router::{handle_request, route};
pub use venn::GenerateError;
