//! Query construction and cursor pagination.
//!
//! A query starts from one of the entity entry points on
//! [`OpenAireClient`](crate::OpenAireClient), is refined through
//! [`QueryBuilder`] methods, and is then run in one of three modes:
//! [`execute`](QueryBuilder::execute) for the first page,
//! [`materialize_all`](QueryBuilder::materialize_all) for every record, or
//! [`iterate_pages`](QueryBuilder::iterate_pages) for a lazy page sequence.

mod builder;
mod engine;
mod entity;
mod filter;
mod order;
mod page;
mod pages;
mod spec;
mod vocabulary;

pub use builder::DataSources;
pub use builder::DataSourcesQuery;
pub use builder::EntityKind;
pub use builder::Organizations;
pub use builder::OrganizationsQuery;
pub use builder::Projects;
pub use builder::ProjectsQuery;
pub use builder::QueryBuilder;
pub use builder::ResearchProducts;
pub use builder::ResearchProductsQuery;
pub use engine::PagerState;
pub use entity::EntityDescriptor;
pub use entity::EntityType;
pub use entity::FieldDef;
pub use entity::FieldKind;
pub use entity::SortDef;
pub use filter::Condition;
pub use filter::FilterSet;
pub use filter::Operator;
pub use order::Direction;
pub use order::SortSpec;
pub use page::PageResult;
pub use page::Record;
pub use pages::Pages;
pub use spec::CursorToken;
pub use spec::QuerySpec;
pub use spec::DEFAULT_PAGE_SIZE;
pub use spec::INITIAL_CURSOR;
pub use spec::MAX_PAGE_SIZE;
pub use vocabulary::AccessRight;
pub use vocabulary::ImpactClass;
pub use vocabulary::OpenAccessColor;
pub use vocabulary::ProductType;
