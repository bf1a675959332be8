//! Caller identity: token verification and the per-request caller.

pub mod identity;
pub mod jwks;
pub mod models;

pub use identity::{session_token, IdentityProvider, SharedSecretIdentityProvider};
pub use jwks::JwksIdentityProvider;
pub use models::{Caller, JwtClaims};
