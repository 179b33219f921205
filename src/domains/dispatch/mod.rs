//! Dispatch domain.
//!
//! Everything between an inbound `tools/call` message and the remote API:
//! request construction, credential injection, and the engine that performs
//! the HTTP call and normalizes the outcome.

mod engine;
mod error;
mod request;
mod security;

pub use engine::DispatchEngine;
pub use error::DispatchError;
pub use request::{ArgumentBag, OutboundRequest};
