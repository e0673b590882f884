//! Ontology loading and annotation extraction
//!
//! This module provides:
//! - An RDF/XML reader scoped to OWL release files
//! - An in-memory ontology holding named classes and individuals
//! - Extraction of annotation property values into an ordered set

mod rdfxml;

pub use rdfxml::{EntityKind, OwlEntity, parse_document};

use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Where an ontology document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologySource {
    Url(String),
    Path(PathBuf),
}

impl OntologySource {
    /// Classify a command-line argument as a URL or a filesystem path
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            OntologySource::Url(arg.to_string())
        } else {
            OntologySource::Path(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for OntologySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OntologySource::Url(url) => write!(f, "{}", url),
            OntologySource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// An OWL ontology reduced to its named subjects.
///
/// Subjects declared in several blocks are merged by IRI, so an annotation
/// asserted in a later `rdf:Description` lands on the class it belongs to.
#[derive(Debug, Clone)]
pub struct Ontology {
    entities: Vec<OwlEntity>,
}

impl Ontology {
    /// Parse an RDF/XML document
    pub fn parse(xml: &str) -> Result<Self> {
        let parsed = parse_document(xml)?;
        debug!(subjects = parsed.len(), "Parsed ontology document");
        Ok(Self {
            entities: merge_by_iri(parsed),
        })
    }

    /// Load an ontology from a file path or URL
    pub async fn load(source: &OntologySource) -> Result<Self> {
        let content = match source {
            OntologySource::Path(path) => fs::read_to_string(path).map_err(|e| {
                Error::OntologyRead {
                    path: path.display().to_string(),
                    source: e,
                }
            })?,
            OntologySource::Url(url) => {
                info!(url = %url, "Downloading ontology");
                let response = reqwest::get(url).await.map_err(Error::Network)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::OntologyDownload(url.clone(), status.as_u16()));
                }
                response.text().await.map_err(Error::Network)?
            }
        };

        Self::parse(&content)
    }

    /// Named classes, ordered by IRI
    pub fn classes(&self) -> impl Iterator<Item = &OwlEntity> {
        self.entities
            .iter()
            .filter(|e| e.kind == Some(EntityKind::Class))
    }

    /// Named individuals, ordered by IRI
    pub fn individuals(&self) -> impl Iterator<Item = &OwlEntity> {
        self.entities
            .iter()
            .filter(|e| e.kind == Some(EntityKind::Individual))
    }

    /// Every value of an annotation property across classes and individuals.
    ///
    /// Values are deduplicated; subjects the document never typed do not
    /// contribute. The set orders its members, so downstream processing is
    /// deterministic run to run.
    pub fn annotation_values(&self, property_iri: &str) -> BTreeSet<String> {
        self.entities
            .iter()
            .filter(|e| e.kind.is_some())
            .flat_map(|e| e.values(property_iri).iter().cloned())
            .collect()
    }
}

/// Merge repeated subject blocks, keeping the strongest typing seen.
fn merge_by_iri(parsed: Vec<OwlEntity>) -> Vec<OwlEntity> {
    let mut by_iri: BTreeMap<String, OwlEntity> = BTreeMap::new();

    for entity in parsed {
        match by_iri.entry(entity.iri.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(entity);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if existing.kind.is_none() {
                    existing.kind = entity.kind;
                }
                for (property, mut values) in entity.annotations {
                    existing
                        .annotations
                        .entry(property)
                        .or_default()
                        .append(&mut values);
                }
            }
        }
    }

    by_iri.into_values().collect()
}
