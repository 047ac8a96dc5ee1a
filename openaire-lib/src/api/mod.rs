//! Graph API surface.

pub mod query;
