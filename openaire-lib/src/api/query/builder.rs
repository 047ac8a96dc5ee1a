//! Query builder shared by every entity type.

use std::marker::PhantomData;

use log::info;

use crate::error::Error;
use crate::transport::Lease;
use crate::OpenAireClient;

use super::engine::Pager;
use super::entity::EntityType;
use super::filter::FilterSet;
use super::filter::Operator;
use super::page::PageResult;
use super::page::Record;
use super::pages::Pages;
use super::spec::QuerySpec;

/// Marker for an entity collection, selecting its builder methods at
/// compile time.
pub trait EntityKind: Clone + Send + Sync + 'static {
    const ENTITY: EntityType;
}

/// Marker for `researchProducts`.
#[derive(Debug, Clone, Copy)]
pub struct ResearchProducts;

/// Marker for `organizations`.
#[derive(Debug, Clone, Copy)]
pub struct Organizations;

/// Marker for `dataSources`.
#[derive(Debug, Clone, Copy)]
pub struct DataSources;

/// Marker for `projects`.
#[derive(Debug, Clone, Copy)]
pub struct Projects;

impl EntityKind for ResearchProducts {
    const ENTITY: EntityType = EntityType::ResearchProducts;
}

impl EntityKind for Organizations {
    const ENTITY: EntityType = EntityType::Organizations;
}

impl EntityKind for DataSources {
    const ENTITY: EntityType = EntityType::DataSources;
}

impl EntityKind for Projects {
    const ENTITY: EntityType = EntityType::Projects;
}

pub type ResearchProductsQuery = QueryBuilder<ResearchProducts>;
pub type OrganizationsQuery = QueryBuilder<Organizations>;
pub type DataSourcesQuery = QueryBuilder<DataSources>;
pub type ProjectsQuery = QueryBuilder<Projects>;

/// Builder for constructing Graph API queries.
///
/// Every method takes `&self` and returns a new builder, leaving the
/// original untouched, so a common prefix can be branched into several
/// queries. Field-specific methods live on the concrete entity variants and
/// all funnel into [`filter`](Self::filter) and [`sort`](Self::sort).
///
/// Use [`OpenAireClient::research_products`] and friends to create one.
///
/// # Example
///
/// ```ignore
/// let open_software = client.research_products()
///     .search("research software metadata")?
///     .product_type(ProductType::Software)?;
///
/// let newest = open_software.sort_by_publication_date(false)?;
/// let cited = open_software.sort_by_citation_count(false)?;
///
/// let records = newest.materialize_all(Some(50)).await?;
/// ```
#[derive(Clone)]
pub struct QueryBuilder<E: EntityKind> {
    client: OpenAireClient,
    spec: QuerySpec,
    entity: PhantomData<E>,
}

impl<E: EntityKind> QueryBuilder<E> {
    pub(crate) fn new(client: OpenAireClient) -> Self {
        Self {
            client,
            spec: QuerySpec::new(E::ENTITY),
            entity: PhantomData,
        }
    }

    /// Returns the query snapshot this builder currently describes.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn entity(&self) -> EntityType {
        E::ENTITY
    }

    fn derive(&self, change: impl FnOnce(&mut QuerySpec) -> Result<(), Error>) -> Result<Self, Error> {
        let mut spec = self.spec.clone();
        change(&mut spec)?;
        Ok(Self {
            client: self.client.clone(),
            spec,
            entity: PhantomData,
        })
    }

    /// Adds an equality filter on any field of this entity.
    pub fn filter(&self, field: &str, value: impl Into<String>) -> Result<Self, Error> {
        self.filter_op(field, Operator::Eq, value)
    }

    /// Adds a filter with an explicit operator.
    pub fn filter_op(
        &self,
        field: &str,
        operator: Operator,
        value: impl Into<String>,
    ) -> Result<Self, Error> {
        let value = value.into();
        self.derive(|spec| spec.filters_mut().add(field, operator, value))
    }

    /// Adds several values for a field; repeatable fields OR them together.
    pub fn filter_any<I, V>(&self, field: &str, values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.derive(|spec| {
            values
                .into_iter()
                .try_for_each(|value| spec.filters_mut().add(field, Operator::Eq, value))
        })
    }

    /// Adds date bounds on a date field. Either bound may be omitted.
    pub fn filter_range(
        &self,
        field: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, Error> {
        self.derive(|spec| {
            if let Some(from) = from {
                spec.filters_mut().add(field, Operator::From, from)?;
            }
            if let Some(to) = to {
                spec.filters_mut().add(field, Operator::To, to)?;
            }
            Ok(())
        })
    }

    /// Merges a prepared filter set into the query.
    pub fn merge(&self, filters: FilterSet) -> Result<Self, Error> {
        self.derive(|spec| spec.filters_mut().merge(filters))
    }

    /// Full-text search across the record.
    pub fn search(&self, query: impl Into<String>) -> Result<Self, Error> {
        self.filter("search", query)
    }

    /// Filters by OpenAIRE identifier.
    pub fn id(&self, openaire_id: impl Into<String>) -> Result<Self, Error> {
        self.filter("id", openaire_id)
    }

    /// Appends a sort criterion.
    pub fn sort(&self, field: &str, ascending: bool) -> Result<Self, Error> {
        self.derive(|spec| spec.sort_mut().add(field, ascending))
    }

    /// Drops all sort criteria, restoring the service default.
    pub fn clear_sort(&self) -> Self {
        let mut next = self.clone();
        next.spec.sort_mut().clear();
        next
    }

    /// Sets the number of records per page (1-100).
    pub fn page_size(&self, size: usize) -> Result<Self, Error> {
        self.derive(|spec| spec.set_page_size(size))
    }

    /// Fetches the first page only.
    pub async fn execute(&self) -> Result<PageResult, Error> {
        let lease = Lease::acquire(self.client.transport());
        let mut pager = Pager::new(self.spec.clone(), self.client.retry_config().clone());
        let page = pager.advance(lease.transport()).await?;
        Ok(page.unwrap_or_else(|| PageResult::new(Vec::new())))
    }

    /// Fetches every page and returns all records in server order.
    ///
    /// With `max_results`, stops as soon as that many records have been
    /// collected and returns exactly that many (fewer if the query has fewer
    /// matches). Hitting the cap is not an error. On failure, records
    /// collected so far are discarded; use [`iterate_pages`](Self::iterate_pages)
    /// to keep them.
    pub async fn materialize_all(&self, max_results: Option<usize>) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        if max_results == Some(0) {
            return Ok(records);
        }

        let mut pages = self.iterate_pages();
        while let Some(page) = pages.next().await {
            records.extend(page?.into_items());

            if let Some(cap) = max_results {
                if records.len() >= cap {
                    records.truncate(cap);
                    info!("Reached max results limit ({cap}) for {}", E::ENTITY);
                    break;
                }
            }
        }
        pages.close();
        Ok(records)
    }

    /// Fetches every page and returns all records.
    pub async fn all(&self) -> Result<Vec<Record>, Error> {
        self.materialize_all(None).await
    }

    /// Returns a lazy sequence of pages for this query.
    pub fn iterate_pages(&self) -> Pages {
        Pages::new(
            self.spec.clone(),
            self.client.retry_config().clone(),
            self.client.transport(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::query::CursorToken;
    use crate::error::TransportError;
    use crate::test_support::client;
    use crate::test_support::page;
    use crate::test_support::ScriptedTransport;

    fn idle() -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport::new([]))
    }

    #[test]
    fn test_chaining_leaves_original_unchanged() {
        let transport = idle();
        let base = client(&transport).research_products();
        let before = base.spec().clone();

        let searched = base.search("climate").unwrap();
        let sized = searched.page_size(5).unwrap();

        assert_eq!(base.spec(), &before);
        assert_eq!(searched.spec().page_size(), 10);
        assert_eq!(sized.spec().page_size(), 5);
        assert_eq!(sized.spec().filters().get("search"), Some("climate"));
    }

    #[test]
    fn test_branching_from_shared_prefix() {
        let transport = idle();
        let prefix = client(&transport).projects().funding_short_name("EC").unwrap();

        let by_start = prefix.sort_by_start_date(true).unwrap();
        let by_end = prefix.sort_by_end_date(false).unwrap();

        assert_eq!(by_start.spec().sort().to_wire().as_deref(), Some("startDate ASC"));
        assert_eq!(by_end.spec().sort().to_wire().as_deref(), Some("endDate DESC"));
        assert!(prefix.spec().sort().is_empty());
        assert_eq!(by_start.spec().filters(), by_end.spec().filters());
    }

    #[test]
    fn test_construction_errors() {
        let transport = idle();
        let query = client(&transport).organizations();

        assert!(matches!(query.filter("mainTitle", "x"), Err(Error::InvalidFilter { .. })));
        assert!(matches!(query.sort("popularity", true), Err(Error::InvalidSortField { .. })));
        assert!(matches!(query.page_size(0), Err(Error::InvalidPageSize { .. })));
        assert!(matches!(query.page_size(101), Err(Error::InvalidPageSize { .. })));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_filter_any_joins_values() {
        let transport = idle();
        let query = client(&transport)
            .data_sources()
            .filter_any("contentTypes", ["Journal articles", "Books"])
            .unwrap();
        assert!(query
            .spec()
            .to_params()
            .contains(&("contentTypes".to_string(), "Journal articles,Books".to_string())));
    }

    #[tokio::test]
    async fn test_single_page_materializes_with_one_call() {
        let transport = Arc::new(ScriptedTransport::new([Ok(page(0..5, None))]));
        let query = client(&transport)
            .research_products()
            .search("climate change")
            .unwrap()
            .page_size(5)
            .unwrap();

        let records = query.materialize_all(None).await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(transport.calls(), 1);

        let sent = &transport.requests()[0];
        assert_eq!(sent.entity(), EntityType::ResearchProducts);
        assert_eq!(sent.filters().get("search"), Some("climate change"));
        assert_eq!(sent.page_size(), 5);
    }

    #[tokio::test]
    async fn test_materialize_concatenates_in_page_order() {
        let transport = Arc::new(ScriptedTransport::new([
            Ok(page(0..3, Some("c1"))),
            Ok(page(3..6, Some("c2"))),
            Ok(page(6..8, None)),
        ]));

        let records = client(&transport).organizations().all().await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.released(), 1);
    }

    #[tokio::test]
    async fn test_max_results_truncates_and_stops() {
        let transport = Arc::new(ScriptedTransport::new([
            Ok(page(0..10, Some("c1"))),
            Ok(page(10..20, Some("c2"))),
            Ok(page(20..30, None)),
        ]));
        let query = client(&transport).projects().page_size(10).unwrap();

        let records = query.materialize_all(Some(15)).await.unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[14]["id"], 14);
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.released(), 1);
    }

    #[tokio::test]
    async fn test_max_results_zero_issues_no_request() {
        let transport = idle();
        let records = client(&transport).projects().materialize_all(Some(0)).await.unwrap();
        assert!(records.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_materialize_discards_partial_results_on_failure() {
        let transport = Arc::new(ScriptedTransport::new([
            Ok(page(0..10, Some("c1"))),
            Err(TransportError::from_status(400, "bad cursor")),
        ]));

        let err = client(&transport).research_products().all().await.unwrap_err();
        assert!(matches!(err, Error::Transport { entity: EntityType::ResearchProducts, .. }));
        assert_eq!(transport.released(), 1);
    }

    #[tokio::test]
    async fn test_execute_returns_first_page_only() {
        let transport = Arc::new(ScriptedTransport::new([
            Ok(page(0..10, Some("c1"))),
            Ok(page(10..20, None)),
        ]));
        let query = client(&transport).research_products();

        let first = query.execute().await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.next_cursor(), Some(&CursorToken::new("c1")));
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.requests()[0].cursor(), None);
        assert_eq!(transport.opened(), 1);
        assert_eq!(transport.released(), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_transient_failures() {
        let transport = Arc::new(ScriptedTransport::new([
            Err(TransportError::transient("timed out")),
            Err(TransportError::from_status(502, "bad gateway")),
            Ok(page(0..4, None)),
        ]));

        let result = client(&transport).data_sources().execute().await.unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_execute_permanent_failure_single_call() {
        let transport = Arc::new(ScriptedTransport::new([
            Err(TransportError::from_status(403, "forbidden")),
            Ok(page(0..4, None)),
        ]));

        let err = client(&transport).data_sources().execute().await.unwrap_err();
        assert!(err.to_string().contains("dataSources"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_pages_derive_from_builder_spec() {
        let transport = Arc::new(ScriptedTransport::new([
            Ok(page(0..2, Some("c1"))),
            Ok(page(2..4, None)),
        ]));
        let query = client(&transport).projects().acronym("OpenAIRE-Nexus").unwrap();

        let mut pages = query.iterate_pages();
        while let Some(page) = pages.next().await {
            page.unwrap();
        }

        let requests = transport.requests();
        assert_eq!(requests[1].filters(), query.spec().filters());
        assert_eq!(requests[1].cursor(), Some(&CursorToken::new("c1")));
        assert_eq!(query.spec().cursor(), None);
    }
}
