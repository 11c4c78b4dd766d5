// libs/infra/oracle/src/lib.rs
//! Fire-and-forget HTTP client to the remote oracle service: `/analyze`,
//! `/report`, `/sync`, `/stats`. Every call has its own tight timeout and no
//! retries — callers fall back to a local decision on any [`OracleError`].

pub mod client;
pub mod errors;

pub use client::{OracleClient, ProxiedResponse};
pub use errors::OracleError;
