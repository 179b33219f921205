//! Business logic organized by bounded contexts.
//!
//! - **catalog**: the generated registry of remote API operations
//! - **dispatch**: turning tool calls into HTTP requests and results

pub mod catalog;
pub mod dispatch;
