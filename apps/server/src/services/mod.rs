//! Service layer: business logic between the HTTP handlers and storage/search

pub mod catalog_search;
pub mod dataset;
pub mod import;
pub mod provisioner;

pub use catalog_search::{CatalogSearchRequest, CatalogSearchService, SearchVariant};
pub use dataset::{DatasetFormat, GeneratedDataset};
pub use import::{ImportService, ImportSummary};
pub use provisioner::{IndexHandle, IndexProvisioner};
