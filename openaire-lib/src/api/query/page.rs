//! Page type for paginated query results.

use super::spec::CursorToken;

/// A single record as returned by the service.
pub type Record = serde_json::Value;

/// One decoded page of results.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.projects().funding_short_name("EC")?.iterate_pages();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     println!("{} of {} projects", page.len(), page.total_found());
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    items: Vec<Record>,
    /// Total matches reported by the service for the whole query.
    total_found: u64,
    /// Cursor for the next page, if any.
    next_cursor: Option<CursorToken>,
}

impl PageResult {
    /// Creates a final page (no next cursor) with the given records.
    pub fn new(items: Vec<Record>) -> Self {
        let total_found = items.len() as u64;
        Self {
            items,
            total_found,
            next_cursor: None,
        }
    }

    /// Sets the cursor for the next page.
    pub fn with_next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(CursorToken::new(cursor));
        self
    }

    /// Sets the total match count.
    pub fn with_total_found(mut self, total: u64) -> Self {
        self.total_found = total;
        self
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Consumes the page and returns the records.
    pub fn into_items(self) -> Vec<Record> {
        self.items
    }

    pub fn total_found(&self) -> u64 {
        self.total_found
    }

    pub fn next_cursor(&self) -> Option<&CursorToken> {
        self.next_cursor.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the service issued a cursor for another page.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
