//! Fusion API Library
//!
//! HTTP handlers, the access gate, identity verification and application setup.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use middleware::{classify, GateDecision};
