//! RxGap Core Library
//!
//! This crate provides the core functionality for RxGap, including:
//! - Ontology loading and RxNorm annotation extraction (RDF/XML)
//! - RxNav/RxClass REST client and response types
//! - Fault-tolerant candidate harvesting and related-concept expansion
//! - Missing-term reporting (set difference, CSV, preview)
//! - The end-to-end audit pipeline

pub mod config;
pub mod error;
pub mod harvest;
pub mod ontology;
pub mod pipeline;
pub mod report;
pub mod rxnav;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::ontology::{Ontology, OntologySource};
    pub use crate::pipeline::{Progress, RunSummary};
    pub use crate::rxnav::{RxNavClient, TermRecord};
}
