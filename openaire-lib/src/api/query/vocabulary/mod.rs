//! Per-entity field tables and named filter methods.

pub(crate) mod data_sources;
pub(crate) mod organizations;
pub(crate) mod projects;
pub(crate) mod research_products;

pub use research_products::AccessRight;
pub use research_products::ImpactClass;
pub use research_products::OpenAccessColor;
pub use research_products::ProductType;
