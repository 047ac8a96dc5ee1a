//! Sort specification.

use std::fmt;

use crate::error::Error;

use super::entity::EntityType;
use super::entity::SortDef;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { Direction::Asc } else { Direction::Desc }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Ordered sort criteria for one entity type.
///
/// An empty spec leaves ordering to the service (relevance).
///
/// # Example
///
/// ```
/// use openaire_lib::api::query::{EntityType, SortSpec};
///
/// let mut sort = SortSpec::new(EntityType::ResearchProducts);
/// sort.add("publicationDate", false).unwrap();
/// sort.add("popularity", false).unwrap();
/// assert_eq!(sort.to_wire().as_deref(), Some("publicationDate DESC,popularity DESC"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    entity: EntityType,
    fields: Vec<(&'static SortDef, Direction)>,
}

impl SortSpec {
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            fields: Vec::new(),
        }
    }

    /// Appends a sort criterion.
    ///
    /// Sorting again on a field already present changes its direction in
    /// place rather than adding a second criterion.
    pub fn add(&mut self, field: &str, ascending: bool) -> Result<(), Error> {
        let def = self
            .entity
            .descriptor()
            .sort_field(field)
            .ok_or_else(|| Error::InvalidSortField {
                entity: self.entity,
                field: field.to_string(),
            })?;
        let direction = Direction::from_ascending(ascending);

        match self.fields.iter_mut().find(|(d, _)| d.key == def.key) {
            Some(existing) => existing.1 = direction,
            None => self.fields.push((def, direction)),
        }
        Ok(())
    }

    /// Removes every criterion.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Returns the field keys with their directions, in priority order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Direction)> + '_ {
        self.fields.iter().map(|(def, dir)| (def.key, *dir))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the `sortBy` parameter value, or `None` for service default.
    pub fn to_wire(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let parts: Vec<_> = self
            .fields
            .iter()
            .map(|(def, dir)| format!("{} {}", def.wire, dir))
            .collect();
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_service_default() {
        assert_eq!(SortSpec::new(EntityType::Projects).to_wire(), None);
    }

    #[test]
    fn test_criteria_keep_order() {
        let mut sort = SortSpec::new(EntityType::Projects);
        sort.add("startDate", true).unwrap();
        sort.add("endDate", false).unwrap();
        assert_eq!(sort.to_wire().as_deref(), Some("startDate ASC,endDate DESC"));
    }

    #[test]
    fn test_same_field_changes_direction() {
        let mut sort = SortSpec::new(EntityType::Organizations);
        sort.add("relevance", true).unwrap();
        sort.add("relevance", false).unwrap();
        assert_eq!(sort.to_wire().as_deref(), Some("relevance DESC"));
    }

    #[test]
    fn test_unsortable_field() {
        let mut sort = SortSpec::new(EntityType::DataSources);
        let err = sort.add("publicationDate", true).unwrap_err();
        assert!(matches!(err, Error::InvalidSortField { entity: EntityType::DataSources, .. }));
    }
}
