//! OpenAIRE Graph API client library
//!
//! An async client for searching the OpenAIRE Graph (research products,
//! organizations, data sources and projects) with fluent query builders and
//! cursor-based pagination.

pub mod api;
pub mod auth;
pub mod error;
pub mod transport;

mod client;
mod retry;

#[cfg(test)]
mod test_support;

pub use client::*;
pub use retry::RetryConfig;
