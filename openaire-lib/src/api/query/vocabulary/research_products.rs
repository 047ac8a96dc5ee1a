//! Research products vocabulary.

use crate::api::query::builder::QueryBuilder;
use crate::api::query::builder::ResearchProducts;
use crate::api::query::entity::EntityDescriptor;
use crate::api::query::entity::EntityType;
use crate::api::query::entity::FieldDef;
use crate::api::query::entity::SortDef;
use crate::api::query::filter::FilterSet;
use crate::api::query::filter::Operator;
use crate::error::Error;

pub(crate) static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: EntityType::ResearchProducts,
    path: "researchProducts",
    fields: &[
        FieldDef::text("search"),
        FieldDef::text("mainTitle"),
        FieldDef::text("description"),
        FieldDef::text("id"),
        FieldDef::text("pid"),
        FieldDef::text("originalId"),
        FieldDef::text("type"),
        FieldDef::date("publicationDate", "PublicationDate"),
        FieldDef::multi("subjects"),
        FieldDef::text("countryCode"),
        FieldDef::text("authorFullName"),
        FieldDef::text("authorOrcid"),
        FieldDef::text("publisher"),
        FieldDef::text("bestOpenAccessRightLabel"),
        FieldDef::text("influenceClass"),
        FieldDef::text("impulseClass"),
        FieldDef::text("popularityClass"),
        FieldDef::text("citationCountClass"),
        FieldDef::text("instanceType"),
        FieldDef::text("sdg"),
        FieldDef::text("fos"),
        FieldDef::flag("isPeerReviewed"),
        FieldDef::flag("isInDiamondJournal"),
        FieldDef::flag("isPubliclyFunded"),
        FieldDef::flag("isGreen"),
        FieldDef::text("openAccessColor"),
        FieldDef::text("relOrganizationId"),
        FieldDef::text("relCommunityId"),
        FieldDef::text("relProjectId"),
        FieldDef::text("relProjectCode"),
        FieldDef::flag("hasProjectRel"),
        FieldDef::text("relProjectFundingShortName"),
        FieldDef::text("relProjectFundingStreamId"),
        FieldDef::text("relHostingDataSourceId"),
        FieldDef::text("relCollectedFromDatasourceId"),
    ],
    sort_fields: &[
        SortDef::new("relevance"),
        SortDef::new("publicationDate"),
        SortDef::new("dateOfCollection"),
        SortDef::new("influence"),
        SortDef::new("popularity"),
        SortDef::new("citationCount"),
        SortDef::new("impulse"),
    ],
};

/// Kind of research product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    Publication,
    Dataset,
    Software,
    Other,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Publication => "publication",
            ProductType::Dataset => "dataset",
            ProductType::Software => "software",
            ProductType::Other => "other",
        }
    }
}

/// Best open access rights label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRight {
    OpenSource,
    Open,
    Embargo,
    Restricted,
    Closed,
    Unknown,
}

impl AccessRight {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessRight::OpenSource => "OPEN SOURCE",
            AccessRight::Open => "OPEN",
            AccessRight::Embargo => "EMBARGO",
            AccessRight::Restricted => "RESTRICTED",
            AccessRight::Closed => "CLOSED",
            AccessRight::Unknown => "UNKNOWN",
        }
    }
}

/// Citation-based impact class, `C1` being the top 0.01%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactClass {
    C1,
    C2,
    C3,
    C4,
    C5,
}

impl ImpactClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactClass::C1 => "C1",
            ImpactClass::C2 => "C2",
            ImpactClass::C3 => "C3",
            ImpactClass::C4 => "C4",
            ImpactClass::C5 => "C5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAccessColor {
    Bronze,
    Gold,
    Hybrid,
}

impl OpenAccessColor {
    pub fn as_str(self) -> &'static str {
        match self {
            OpenAccessColor::Bronze => "bronze",
            OpenAccessColor::Gold => "gold",
            OpenAccessColor::Hybrid => "hybrid",
        }
    }
}

impl QueryBuilder<ResearchProducts> {
    // --- General filters ---

    pub fn main_title(&self, title: impl Into<String>) -> Result<Self, Error> {
        self.filter("mainTitle", title)
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self, Error> {
        self.filter("description", description)
    }

    /// Filters by persistent identifier, e.g. a DOI.
    pub fn pid(&self, persistent_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("pid", persistent_id)
    }

    /// Filters by the record identifier at the original source.
    pub fn original_id(&self, original_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("originalId", original_id)
    }

    pub fn product_type(&self, product_type: ProductType) -> Result<Self, Error> {
        self.filter("type", product_type.as_str())
    }

    /// Filters by publication date bounds (`YYYY` or `YYYY-MM-DD`).
    pub fn publication_date_range(&self, from: Option<&str>, to: Option<&str>) -> Result<Self, Error> {
        self.filter_range("publicationDate", from, to)
    }

    pub fn subjects<I, V>(&self, subjects: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.filter_any("subjects", subjects)
    }

    pub fn country_code(&self, country_code: impl Into<String>) -> Result<Self, Error> {
        self.filter("countryCode", country_code)
    }

    pub fn author_full_name(&self, name: impl Into<String>) -> Result<Self, Error> {
        self.filter("authorFullName", name)
    }

    pub fn author_orcid(&self, orcid: impl Into<String>) -> Result<Self, Error> {
        self.filter("authorOrcid", orcid)
    }

    /// Filters by author, given either an ORCID iD (bare or as an
    /// `orcid.org` URL) or a full name.
    pub fn author(&self, author: &str) -> Result<Self, Error> {
        let mut filters = FilterSet::new(EntityType::ResearchProducts);
        match orcid_id(author) {
            Some(orcid) => filters.add("authorOrcid", Operator::Eq, orcid)?,
            None => filters.add("authorFullName", Operator::Eq, author)?,
        }
        self.merge(filters)
    }

    pub fn publisher(&self, publisher: impl Into<String>) -> Result<Self, Error> {
        self.filter("publisher", publisher)
    }

    pub fn best_open_access_right(&self, access_right: AccessRight) -> Result<Self, Error> {
        self.filter("bestOpenAccessRightLabel", access_right.as_str())
    }

    pub fn influence_class(&self, class: ImpactClass) -> Result<Self, Error> {
        self.filter("influenceClass", class.as_str())
    }

    pub fn impulse_class(&self, class: ImpactClass) -> Result<Self, Error> {
        self.filter("impulseClass", class.as_str())
    }

    pub fn popularity_class(&self, class: ImpactClass) -> Result<Self, Error> {
        self.filter("popularityClass", class.as_str())
    }

    pub fn citation_count_class(&self, class: ImpactClass) -> Result<Self, Error> {
        self.filter("citationCountClass", class.as_str())
    }

    // --- Publication filters ---

    pub fn instance_type(&self, instance_type: impl Into<String>) -> Result<Self, Error> {
        self.filter("instanceType", instance_type)
    }

    /// Filters by Sustainable Development Goal (1-17).
    pub fn sdg(&self, goal: u8) -> Result<Self, Error> {
        if !(1..=17).contains(&goal) {
            return Err(Error::invalid_filter(
                EntityType::ResearchProducts,
                "sdg",
                format!("goal {goal} is outside 1..=17"),
            ));
        }
        self.filter("sdg", goal.to_string())
    }

    /// Filters by Field of Science classification.
    pub fn fos(&self, fos_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("fos", fos_id)
    }

    pub fn is_peer_reviewed(&self, peer_reviewed: bool) -> Result<Self, Error> {
        self.filter("isPeerReviewed", peer_reviewed.to_string())
    }

    pub fn is_in_diamond_journal(&self, in_diamond: bool) -> Result<Self, Error> {
        self.filter("isInDiamondJournal", in_diamond.to_string())
    }

    pub fn is_publicly_funded(&self, publicly_funded: bool) -> Result<Self, Error> {
        self.filter("isPubliclyFunded", publicly_funded.to_string())
    }

    pub fn is_green(&self, green: bool) -> Result<Self, Error> {
        self.filter("isGreen", green.to_string())
    }

    pub fn open_access_color(&self, color: OpenAccessColor) -> Result<Self, Error> {
        self.filter("openAccessColor", color.as_str())
    }

    // --- Relationship filters ---

    pub fn related_organization_id(&self, org_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relOrganizationId", org_id)
    }

    pub fn related_community_id(&self, community_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relCommunityId", community_id)
    }

    pub fn related_project_id(&self, project_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relProjectId", project_id)
    }

    pub fn related_project_code(&self, project_code: impl Into<String>) -> Result<Self, Error> {
        self.filter("relProjectCode", project_code)
    }

    pub fn has_project_relation(&self, has_relation: bool) -> Result<Self, Error> {
        self.filter("hasProjectRel", has_relation.to_string())
    }

    pub fn related_project_funding_short_name(
        &self,
        funder_short_name: impl Into<String>,
    ) -> Result<Self, Error> {
        self.filter("relProjectFundingShortName", funder_short_name)
    }

    pub fn related_project_funding_stream_id(&self, stream_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relProjectFundingStreamId", stream_id)
    }

    pub fn related_hosting_data_source_id(&self, datasource_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("relHostingDataSourceId", datasource_id)
    }

    pub fn related_collected_from_datasource_id(
        &self,
        datasource_id: impl Into<String>,
    ) -> Result<Self, Error> {
        self.filter("relCollectedFromDatasourceId", datasource_id)
    }

    // --- Sorting ---

    pub fn sort_by_relevance(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("relevance", ascending)
    }

    pub fn sort_by_publication_date(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("publicationDate", ascending)
    }

    pub fn sort_by_date_of_collection(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("dateOfCollection", ascending)
    }

    pub fn sort_by_influence(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("influence", ascending)
    }

    pub fn sort_by_popularity(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("popularity", ascending)
    }

    pub fn sort_by_citation_count(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("citationCount", ascending)
    }

    pub fn sort_by_impulse(&self, ascending: bool) -> Result<Self, Error> {
        self.sort("impulse", ascending)
    }
}

/// Extracts a bare ORCID iD (`0000-0002-1825-0097`) from `value`, accepting
/// an `orcid.org` URL prefix.
fn orcid_id(value: &str) -> Option<&str> {
    let value = value.trim();
    let id = value
        .rsplit_once("orcid.org/")
        .map_or(value, |(_, id)| id)
        .trim_end_matches('/');

    let groups: Vec<&str> = id.split('-').collect();
    let well_formed = groups.len() == 4
        && groups.iter().enumerate().all(|(i, group)| {
            group.len() == 4
                && group.char_indices().all(|(j, c)| {
                    c.is_ascii_digit() || (i == 3 && j == 3 && c.eq_ignore_ascii_case(&'x'))
                })
        });
    well_formed.then_some(id)
}
