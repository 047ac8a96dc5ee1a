//! Immutable query snapshot.

use std::fmt;

use url::form_urlencoded;

use crate::error::Error;

use super::entity::EntityType;
use super::filter::FilterSet;
use super::order::SortSpec;

/// Page size used when none is set.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size the service accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Cursor value that starts a cursor chain.
pub const INITIAL_CURSOR: &str = "*";

/// Opaque server-issued position marker for the next page of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorToken(String);

impl CursorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CursorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully specified request: entity, filters, sort, page size and cursor.
///
/// Specs are never mutated once handed out. Builders clone before changing
/// anything, and the next page's spec is always derived from the previous
/// one plus the new cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    entity: EntityType,
    filters: FilterSet,
    sort: SortSpec,
    page_size: usize,
    cursor: Option<CursorToken>,
}

impl QuerySpec {
    /// Creates an unfiltered spec with the default page size.
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            filters: FilterSet::new(entity),
            sort: SortSpec::new(entity),
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cursor(&self) -> Option<&CursorToken> {
        self.cursor.as_ref()
    }

    /// Returns a copy of this spec positioned at `cursor`.
    pub fn with_cursor(&self, cursor: CursorToken) -> Self {
        Self {
            cursor: Some(cursor),
            ..self.clone()
        }
    }

    /// Renders the wire query parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("pageSize".to_string(), self.page_size.to_string())];
        params.extend(self.filters.to_params());
        if let Some(sort_by) = self.sort.to_wire() {
            params.push(("sortBy".to_string(), sort_by));
        }
        let cursor = self.cursor.as_ref().map_or(INITIAL_CURSOR, CursorToken::as_str);
        params.push(("cursor".to_string(), cursor.to_string()));
        params
    }

    /// Renders the spec as `path?query`, for logs and error reports.
    pub fn to_query_string(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_params())
            .finish();
        format!("{}?{}", self.entity.path(), query)
    }

    pub(crate) fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    pub(crate) fn sort_mut(&mut self) -> &mut SortSpec {
        &mut self.sort
    }

    pub(crate) fn set_page_size(&mut self, size: usize) -> Result<(), Error> {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(Error::InvalidPageSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        self.page_size = size;
        Ok(())
    }
}
