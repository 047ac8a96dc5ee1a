//! Filter constraints and the per-entity filter set.

use chrono::NaiveDate;

use crate::error::Error;

use super::entity::EntityType;
use super::entity::FieldDef;
use super::entity::FieldKind;

/// Comparison applied by a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Field matches the value: `field=value`.
    Eq,
    /// Lower date bound: `fromField=value`.
    From,
    /// Upper date bound: `toField=value`.
    To,
}

/// A single `(field, operator, value)` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    field: &'static FieldDef,
    operator: Operator,
    value: String,
}

impl Condition {
    /// Returns the field key.
    pub fn field(&self) -> &'static str {
        self.field.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the wire parameter name for this condition.
    pub fn wire_name(&self) -> String {
        match self.operator {
            Operator::Eq => self.field.wire.to_string(),
            Operator::From => format!("from{}", self.field.wire),
            Operator::To => format!("to{}", self.field.wire),
        }
    }

    fn same_slot(&self, other: &Condition) -> bool {
        self.field.key == other.field.key && self.operator == other.operator
    }
}

/// An ordered set of filter conditions for one entity type.
///
/// Singular fields hold at most one condition per operator: adding another
/// replaces the earlier one in place. Repeatable fields keep every distinct
/// value, and the values are OR-ed on the wire.
///
/// # Example
///
/// ```
/// use openaire_lib::api::query::{EntityType, FilterSet, Operator};
///
/// let mut filters = FilterSet::new(EntityType::ResearchProducts);
/// filters.add("countryCode", Operator::Eq, "NL").unwrap();
/// filters.add("countryCode", Operator::Eq, "BE").unwrap();
/// assert_eq!(filters.len(), 1);
/// assert_eq!(filters.get("countryCode"), Some("BE"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    entity: EntityType,
    conditions: Vec<Condition>,
}

impl FilterSet {
    /// Creates an empty filter set for the entity.
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            conditions: Vec::new(),
        }
    }

    /// Returns the entity whose vocabulary this set is validated against.
    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// Adds a condition after validating the key, operator and value.
    pub fn add(
        &mut self,
        field: &str,
        operator: Operator,
        value: impl Into<String>,
    ) -> Result<(), Error> {
        let condition = self.validate(field, operator, value.into())?;
        self.insert(condition);
        Ok(())
    }

    /// Merges another filter set into this one using the same replacement
    /// rule as [`add`](Self::add).
    pub fn merge(&mut self, other: FilterSet) -> Result<(), Error> {
        if other.entity != self.entity {
            return Err(Error::invalid_filter(
                self.entity,
                other.entity.path(),
                "cannot merge filters of another entity type",
            ));
        }
        for condition in other.conditions {
            self.insert(condition);
        }
        Ok(())
    }

    /// Returns the value of the first `Eq` condition on `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.field.key == field && c.operator == Operator::Eq)
            .map(|c| c.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders the conditions as wire parameters.
    ///
    /// Repeatable values share one parameter, comma-joined, at the position
    /// of the field's first condition.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        for condition in &self.conditions {
            let name = condition.wire_name();
            match params.iter_mut().find(|(n, _)| *n == name) {
                Some((_, value)) => {
                    value.push(',');
                    value.push_str(&condition.value);
                }
                None => params.push((name, condition.value.clone())),
            }
        }
        params
    }

    fn validate(&self, key: &str, operator: Operator, value: String) -> Result<Condition, Error> {
        let invalid = |reason: &str| Error::invalid_filter(self.entity, key, reason);

        let field = self
            .entity
            .descriptor()
            .field(key)
            .ok_or_else(|| invalid("unknown filter field"))?;

        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(invalid("value must not be empty"));
        }

        match (field.kind, operator) {
            (FieldKind::Date, Operator::From | Operator::To) => {
                if !is_valid_date(&value) {
                    return Err(invalid("expected YYYY or YYYY-MM-DD"));
                }
            }
            (FieldKind::Date, Operator::Eq) => {
                return Err(invalid("date fields take From/To bounds"));
            }
            (_, Operator::From | Operator::To) => {
                return Err(invalid("range operators apply to date fields only"));
            }
            (FieldKind::Flag, Operator::Eq) => {
                if value != "true" && value != "false" {
                    return Err(invalid("expected true or false"));
                }
            }
            (FieldKind::Text | FieldKind::Multi, Operator::Eq) => {}
        }

        Ok(Condition {
            field,
            operator,
            value,
        })
    }

    fn insert(&mut self, condition: Condition) {
        if condition.field.is_repeatable() {
            if !self.conditions.contains(&condition) {
                self.conditions.push(condition);
            }
            return;
        }
        match self.conditions.iter_mut().find(|c| c.same_slot(&condition)) {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }
}

fn is_valid_date(value: &str) -> bool {
    if value.len() == 4 {
        return value.bytes().all(|b| b.is_ascii_digit());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
