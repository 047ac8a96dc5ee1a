//! Error types

mod auth;
mod transport;

pub use auth::*;
pub use transport::*;

use crate::api::query::EntityType;

/// Errors returned by the OpenAIRE client.
///
/// Construction errors (`InvalidFilter`, `InvalidSortField`, `InvalidPageSize`)
/// are raised when a builder method is called and never reach the network.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter used a key the entity does not declare, an operator the field
    /// does not accept, or an empty value.
    #[error("Invalid filter '{field}' for {entity}: {reason}")]
    InvalidFilter {
        entity: EntityType,
        field: String,
        reason: String,
    },

    /// The field cannot be used to sort this entity.
    #[error("Field '{field}' is not sortable for {entity}")]
    InvalidSortField { entity: EntityType, field: String },

    /// The page size is outside `1..=max`.
    #[error("Page size {size} is out of range (1..={max})")]
    InvalidPageSize { size: usize, max: usize },

    /// A page fetch failed terminally.
    #[error("Query on {entity} failed ({query})")]
    Transport {
        entity: EntityType,
        /// Wire form of the query that failed.
        query: String,
        #[source]
        source: TransportError,
    },

    /// An unstructured endpoint request failed.
    #[error("Raw query on '{endpoint}' failed")]
    RawQuery {
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// The page sequence has already finished, failed, or been closed.
    #[error("Page iteration is closed")]
    IterationClosed,

    /// The HTTP client could not be constructed.
    #[error("Client configuration error: {0}")]
    Client(String),
}

impl Error {
    pub(crate) fn invalid_filter(
        entity: EntityType,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFilter {
            entity,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the transport classification if this is a transport failure.
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Transport { source, .. } | Self::RawQuery { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
