//! Data sources vocabulary.

use crate::api::query::builder::DataSources;
use crate::api::query::builder::QueryBuilder;
use crate::api::query::entity::EntityDescriptor;
use crate::api::query::entity::EntityType;
use crate::api::query::entity::FieldDef;
use crate::api::query::entity::SortDef;
use crate::error::Error;

pub(crate) static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: EntityType::DataSources,
    path: "dataSources",
    fields: &[
        FieldDef::text("search"),
        FieldDef::text("officialName"),
        FieldDef::text("englishName"),
        FieldDef::text("legalShortName"),
        FieldDef::text("id"),
        FieldDef::text("pid"),
        FieldDef::multi("subjects"),
        FieldDef::text("dataSourceTypeName"),
        FieldDef::multi("contentTypes"),
        FieldDef::text("relOrganizationId"),
        FieldDef::text("relCommunityId"),
        FieldDef::text("relCollectedFromDatasourceId"),
    ],
    sort_fields: &[SortDef::new("relevance")],
};

impl QueryBuilder<DataSources> {
    pub fn official_name(&self, name: impl Into<String>) -> Result<Self, Error> {
        self.filter("officialName", name)
    }

    pub fn english_name(&self, name: impl Into<String>) -> Result<Self, Error> {
        self.filter("englishName", name)
    }

    /// Filters by the legal short name of the owning organization.
    pub fn legal_short_name(&self, short_name: impl Into<String>) -> Result<Self, Error> {
        self.filter("legalShortName", short_name)
    }

    pub fn pid(&self, persistent_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("pid", persistent_id)
    }

    pub fn subjects<I, V>(&self, subjects: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_any("subjects", subjects)
    }

    pub fn data_source_type_name(&self, type_name: impl Into<String>) -> Result<Self, Error> {
        self.filter("dataSourceTypeName", type_name)
    }

    /// Filters by OpenDOAR content types; several values are OR-ed.
    pub fn content_types<I, V>(&self, content_types: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_any("contentTypes", content_types)
    }

    pub fn related_organization_id(&self, org_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relOrganizationId", org_id)
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

    /// Sorts by relevance, the only ordering data sources support.
    pub fn sort_by_relevance(&self, ascending: bool) -> Result<Self, Error> {
        self.clear_sort().sort("relevance", ascending)
    }
}
