//! Transformation module.
//!
//! - Enricher: DOI-derived fields, author lists, citation order
//! - DOI / journal / author / sort helpers used by the enricher
//! - Pipeline: load → enrich → serialize

pub mod authors;
pub mod doi;
pub mod enricher;
pub mod journals;
pub mod pipeline;
pub mod sort;

pub use doi::{Doi, DOI_URL_PREFIX};
pub use enricher::enrich;
pub use journals::{journal_name, journals_description, JOURNALS};
pub use pipeline::*;
pub use sort::SortKey;
