//! Organizations vocabulary.

use crate::api::query::builder::Organizations;
use crate::api::query::builder::QueryBuilder;
use crate::api::query::entity::EntityDescriptor;
use crate::api::query::entity::EntityType;
use crate::api::query::entity::FieldDef;
use crate::api::query::entity::SortDef;
use crate::error::Error;

pub(crate) static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Organizations,
    path: "organizations",
    fields: &[
        FieldDef::text("search"),
        FieldDef::text("legalName"),
        FieldDef::text("legalShortName"),
        FieldDef::text("id"),
        FieldDef::text("pid"),
        FieldDef::text("countryCode"),
        FieldDef::text("relCommunityId"),
        FieldDef::text("relCollectedFromDatasourceId"),
    ],
    sort_fields: &[SortDef::new("relevance")],
};

impl QueryBuilder<Organizations> {
    pub fn legal_name(&self, name: impl Into<String>) -> Result<Self, Error> {
        self.filter("legalName", name)
    }

    pub fn legal_short_name(&self, short_name: impl Into<String>) -> Result<Self, Error> {
        self.filter("legalShortName", short_name)
    }

    /// Filters by persistent identifier, e.g. a ROR id.
    pub fn pid(&self, persistent_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("pid", persistent_id)
    }

    pub fn country_code(&self, country_code: impl Into<String>) -> Result<Self, Error> {
        self.filter("countryCode", country_code)
    }

    pub fn related_community_id(&self, community_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relCommunityId", community_id)
    }

    pub fn related_collected_from_datasource_id(
        &self,
        datasource_id: impl Into<String>,
    ) -> Result<Self, Error> {
        self.filter("relCollectedFromDatasourceId", datasource_id)
    }

    /// Sorts by relevance, the only ordering organizations support.
    pub fn sort_by_relevance(&self, ascending: bool) -> Result<Self, Error> {
        self.clear_sort().sort("relevance", ascending)
    }
}
