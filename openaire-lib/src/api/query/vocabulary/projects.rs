//! Projects vocabulary.

use crate::api::query::builder::Projects;
use crate::api::query::builder::QueryBuilder;
use crate::api::query::entity::EntityDescriptor;
use crate::api::query::entity::EntityType;
use crate::api::query::entity::FieldDef;
use crate::api::query::entity::SortDef;
use crate::error::Error;

pub(crate) static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: EntityType::Projects,
    path: "projects",
    fields: &[
        FieldDef::text("search"),
        FieldDef::text("title"),
        FieldDef::multi("keywords"),
        FieldDef::text("id"),
        FieldDef::text("code"),
        FieldDef::text("acronym"),
        FieldDef::text("callIdentifier"),
        FieldDef::text("fundingShortName"),
        FieldDef::text("fundingStreamId"),
        FieldDef::date("startDate", "StartDate"),
        FieldDef::date("endDate", "EndDate"),
        FieldDef::text("relOrganizationName"),
        FieldDef::text("relOrganizationId"),
        FieldDef::text("relCommunityId"),
        FieldDef::multi("relOrganizationCountryCode"),
        FieldDef::text("relCollectedFromDatasourceId"),
    ],
    sort_fields: &[
        SortDef::new("relevance"),
        SortDef::new("startDate"),
        SortDef::new("endDate"),
    ],
};

impl QueryBuilder<Projects> {
    pub fn title(&self, title: impl Into<String>) -> Result<Self, Error> {
        self.filter("title", title)
    }

    pub fn keywords<I, V>(&self, keywords: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_any("keywords", keywords)
    }

    /// Filters by grant agreement code.
    pub fn code(&self, grant_code: impl Into<String>) -> Result<Self, Error> {
        self.filter("code", grant_code)
    }

    pub fn acronym(&self, acronym: impl Into<String>) -> Result<Self, Error> {
        self.filter("acronym", acronym)
    }

    pub fn call_identifier(&self, call_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("callIdentifier", call_id)
    }

    /// Filters by funder short name, e.g. `EC` or `NSF`.
    pub fn funding_short_name(&self, funder_short_name: impl Into<String>) -> Result<Self, Error> {
        self.filter("fundingShortName", funder_short_name)
    }

    pub fn funding_stream_id(&self, stream_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("fundingStreamId", stream_id)
    }

    /// Filters by start date bounds (`YYYY` or `YYYY-MM-DD`).
    pub fn start_date_range(&self, from: Option<&str>, to: Option<&str>) -> Result<Self, Error> {
        self.filter_range("startDate", from, to)
    }

    /// Filters by end date bounds (`YYYY` or `YYYY-MM-DD`).
    pub fn end_date_range(&self, from: Option<&str>, to: Option<&str>) -> Result<Self, Error> {
        self.filter_range("endDate", from, to)
    }

    /// Filters by the name or short name of a participating organization.
    pub fn related_organization_name(&self, org_name: impl Into<String>) -> Result<Self, Error> {
        self.filter("relOrganizationName", org_name)
    }

    pub fn related_organization_id(&self, org_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relOrganizationId", org_id)
    }

    pub fn related_community_id(&self, community_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relCommunityId", community_id)
    }

    pub fn related_organization_country_code<I, V>(&self, country_codes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_any("relOrganizationCountryCode", country_codes)
    }

    pub fn related_collected_from_datasource_id(
        &self,
        datasource_id: impl Into<String>,
    ) -> Result<Self, Error> {
        self.filter("relCollectedFromDatasourceId", datasource_id)
    }

    pub fn sort_by_relevance(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("relevance", ascending)
    }

    pub fn sort_by_start_date(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("startDate", ascending)
    }

    pub fn sort_by_end_date(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("endDate", ascending)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_support::client;
    use crate::test_support::ScriptedTransport;

    #[test]
    fn test_project_params() {
        let transport = Arc::new(ScriptedTransport::new([]));
        let query = client(&transport)
            .projects()
            .funding_short_name("EC")
            .unwrap()
            .start_date_range(Some("2020"), None)
            .unwrap()
            .related_organization_country_code(["NL", "BE"])
            .unwrap()
            .sort_by_start_date(false)
            .unwrap();

        let params = query.spec().to_params();
        let get = |name: &str| {
            params
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("fundingShortName"), Some("EC"));
        assert_eq!(get("fromStartDate"), Some("2020"));
        assert_eq!(get("toStartDate"), None);
        assert_eq!(get("relOrganizationCountryCode"), Some("NL,BE"));
        assert_eq!(get("sortBy"), Some("startDate DESC"));
    }

    #[test]
    fn test_invalid_date_bound() {
        let transport = Arc::new(ScriptedTransport::new([]));
        let projects = client(&transport).projects();
        assert!(projects.end_date_range(None, Some("2024-13-01")).is_err());
    }
}
