//! Domain grouping against the Ed-Fi subject-area taxonomy

mod classifier;
mod taxonomy;

pub use classifier::{DomainClassification, DomainClassifier, OTHER_DOMAIN};
pub use taxonomy::{DomainRecord, TaxonomyRegistry, DEFAULT_VERSION};
