//! Entity types and their static field vocabularies.

use std::fmt;
use std::str::FromStr;

use super::vocabulary;

/// The entity collections exposed by the Graph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Publications, datasets, software and other research products.
    ResearchProducts,
    Organizations,
    DataSources,
    Projects,
}

impl EntityType {
    /// All entity types, in endpoint order.
    pub const ALL: [EntityType; 4] = [
        EntityType::ResearchProducts,
        EntityType::Organizations,
        EntityType::DataSources,
        EntityType::Projects,
    ];

    /// Returns the endpoint path segment, e.g. `researchProducts`.
    pub fn path(self) -> &'static str {
        self.descriptor().path
    }

    /// Returns the static field vocabulary of this entity.
    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityType::ResearchProducts => &vocabulary::research_products::DESCRIPTOR,
            EntityType::Organizations => &vocabulary::organizations::DESCRIPTOR,
            EntityType::DataSources => &vocabulary::data_sources::DESCRIPTOR,
            EntityType::Projects => &vocabulary::projects::DESCRIPTOR,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityType {
    type Err = String;

    /// Parses an endpoint name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.path().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity type '{s}'"))
    }
}

/// How a filter field accepts values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single free-text value; a later value replaces an earlier one.
    Text,
    /// Repeatable; every value is kept and the values are OR-ed.
    Multi,
    /// Boolean, sent as `true` / `false`.
    Flag,
    /// Date bound (`YYYY` or `YYYY-MM-DD`), used with `From` / `To` only.
    Date,
}

/// A filterable field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Key callers use to address the field.
    pub key: &'static str,
    /// Wire parameter name. For [`FieldKind::Date`] this is the suffix that
    /// follows `from` / `to`.
    pub wire: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub(crate) const fn text(key: &'static str) -> Self {
        Self { key, wire: key, kind: FieldKind::Text }
    }

    pub(crate) const fn multi(key: &'static str) -> Self {
        Self { key, wire: key, kind: FieldKind::Multi }
    }

    pub(crate) const fn flag(key: &'static str) -> Self {
        Self { key, wire: key, kind: FieldKind::Flag }
    }

    pub(crate) const fn date(key: &'static str, wire: &'static str) -> Self {
        Self { key, wire, kind: FieldKind::Date }
    }

    /// Returns `true` if the field may appear more than once in a filter set.
    pub fn is_repeatable(&self) -> bool {
        self.kind == FieldKind::Multi
    }
}

/// A sortable field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDef {
    pub key: &'static str,
    pub wire: &'static str,
}

impl SortDef {
    pub(crate) const fn new(key: &'static str) -> Self {
        Self { key, wire: key }
    }
}

/// Static lookup table describing one entity collection.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub entity: EntityType,
    /// Endpoint path relative to the API base URL.
    pub path: &'static str,
    pub fields: &'static [FieldDef],
    pub sort_fields: &'static [SortDef],
}

impl EntityDescriptor {
    /// Looks up a filter field by key.
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        let fields: &'static [FieldDef] = self.fields;
        fields.iter().find(|f| f.key == key)
    }

    /// Looks up a sortable field by key.
    pub fn sort_field(&self, key: &str) -> Option<&'static SortDef> {
        let sort_fields: &'static [SortDef] = self.sort_fields;
        sort_fields.iter().find(|f| f.key == key)
    }
}
