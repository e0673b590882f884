//! Configuration management with file persistence
//!
//! Every knob of a run lives here: where the ontology comes from, which
//! annotation property carries RxNorm identifiers, the RxNav endpoint, and
//! the classification sources that seed the candidate harvest. The defaults
//! reproduce the standard Vaccine Ontology audit.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::rxnav::DEFAULT_BASE_URL;

/// Public PURL of the Vaccine Ontology release.
pub const DEFAULT_ONTOLOGY_URL: &str = "http://purl.obolibrary.org/obo/vo.owl";

/// Annotation property that records RxNorm identifiers on VO terms.
pub const RXNORM_ANNOTATION_IRI: &str = "http://purl.obolibrary.org/obo/VO_0003198";

/// RxGap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ontology: OntologyConfig,
    #[serde(default)]
    pub rxnav: RxNavConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<ClassSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Path or URL loaded when the command line names none.
    pub source: String,
    /// IRI of the annotation property holding RxNorm identifiers.
    pub annotation_property: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RxNavConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default CSV path for the missing-term report.
    pub path: PathBuf,
    /// Rows printed as a preview after a run.
    pub preview_rows: usize,
}

/// One classification source to harvest candidate RxNorm concepts from.
///
/// A source either walks a class tree down to its leaves or names its member
/// classes outright, then asks RxNav for the drug members of each class,
/// once per relationship (or once with no relationship filter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSource {
    /// Display name used in progress output, e.g. "ATC".
    pub name: String,
    /// RxNav `relaSource` parameter for member queries.
    pub rela_source: String,
    pub roots: SourceRoots,
    /// Relationship filters; an empty list means query without one.
    #[serde(default)]
    pub relas: Vec<String>,
}

/// How a source's member classes are found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRoots {
    /// Walk the classification tree under this root and keep the leaves.
    Tree { class_id: String, class_type: String },
    /// Query these class identifiers directly.
    Classes(Vec<String>),
}

impl ClassSource {
    /// Relationship parameters for member queries, one query per entry.
    pub fn rela_params(&self) -> Vec<Option<String>> {
        if self.relas.is_empty() {
            vec![None]
        } else {
            self.relas.iter().cloned().map(Some).collect()
        }
    }
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_ONTOLOGY_URL.to_string(),
            annotation_property: RXNORM_ANNOTATION_IRI.to_string(),
        }
    }
}

impl Default for RxNavConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("missing_rxnorm_terms.csv"),
            preview_rows: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ontology: OntologyConfig::default(),
            rxnav: RxNavConfig::default(),
            output: OutputConfig::default(),
            sources: default_sources(),
        }
    }
}

/// The four vaccine-related classification sources queried by default.
fn default_sources() -> Vec<ClassSource> {
    vec![
        ClassSource {
            name: "ATC".to_string(),
            rela_source: "ATCPROD".to_string(),
            roots: SourceRoots::Tree {
                class_id: "J07".to_string(),
                class_type: "ATC1-4".to_string(),
            },
            relas: Vec::new(),
        },
        ClassSource {
            name: "VA".to_string(),
            rela_source: "VA".to_string(),
            roots: SourceRoots::Classes(vec![
                "IM100".to_string(),
                "IM105".to_string(),
                "IM109".to_string(),
            ]),
            relas: vec![
                "has_vaclass".to_string(),
                "has_vaclass_extended".to_string(),
            ],
        },
        ClassSource {
            name: "CVX".to_string(),
            rela_source: "CDC".to_string(),
            roots: SourceRoots::Tree {
                class_id: "0".to_string(),
                class_type: "CVX".to_string(),
            },
            relas: vec!["isa_CVX".to_string()],
        },
        ClassSource {
            name: "DailyMed".to_string(),
            rela_source: "DAILYMED".to_string(),
            roots: SourceRoots::Classes(vec![
                "N0000193912".to_string(),
                "D014612".to_string(),
            ]),
            relas: vec!["has_epc".to_string(), "has_chemical_structure".to_string()],
        },
    ]
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("RXGAP_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
                .join("rxgap")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or fall back to defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents).map_err(|e| {
                Error::Config(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ontology.source.trim().is_empty() {
            return Err(Error::Config("ontology.source must not be empty".to_string()));
        }
        if self.ontology.annotation_property.trim().is_empty() {
            return Err(Error::Config(
                "ontology.annotation_property must not be empty".to_string(),
            ));
        }
        if self.rxnav.timeout_secs == 0 {
            return Err(Error::Config(
                "rxnav.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.sources.is_empty() {
            return Err(Error::Config(
                "at least one classification source is required".to_string(),
            ));
        }
        for source in &self.sources {
            if source.name.trim().is_empty() || source.rela_source.trim().is_empty() {
                return Err(Error::Config(
                    "every source needs a name and a relaSource".to_string(),
                ));
            }
            match &source.roots {
                SourceRoots::Tree { class_id, .. } if class_id.trim().is_empty() => {
                    return Err(Error::Config(format!(
                        "source '{}' has an empty tree root",
                        source.name
                    )));
                }
                SourceRoots::Classes(ids) if ids.is_empty() => {
                    return Err(Error::Config(format!(
                        "source '{}' lists no classes",
                        source.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ontology.source, DEFAULT_ONTOLOGY_URL);
        assert_eq!(config.ontology.annotation_property, RXNORM_ANNOTATION_IRI);
        assert_eq!(config.rxnav.timeout_secs, 30);
        assert_eq!(config.output.preview_rows, 5);
    }

    #[test]
    fn test_default_sources_cover_four_families() {
        let sources = default_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ATC", "VA", "CVX", "DailyMed"]);

        let atc = &sources[0];
        assert_eq!(atc.rela_source, "ATCPROD");
        assert_eq!(
            atc.roots,
            SourceRoots::Tree {
                class_id: "J07".to_string(),
                class_type: "ATC1-4".to_string(),
            }
        );
        assert!(atc.relas.is_empty());

        let va = &sources[1];
        assert_eq!(
            va.roots,
            SourceRoots::Classes(vec![
                "IM100".to_string(),
                "IM105".to_string(),
                "IM109".to_string(),
            ])
        );
        assert_eq!(va.relas, ["has_vaclass", "has_vaclass_extended"]);
    }

    #[test]
    fn test_rela_params_without_relas_yields_single_unfiltered_query() {
        let atc = &default_sources()[0];
        assert_eq!(atc.rela_params(), vec![None]);
    }

    #[test]
    fn test_rela_params_with_relas_yields_one_query_each() {
        let va = &default_sources()[1];
        assert_eq!(
            va.rela_params(),
            vec![
                Some("has_vaclass".to_string()),
                Some("has_vaclass_extended".to_string()),
            ]
        );
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.sources, config.sources);
        assert_eq!(parsed.ontology.source, config.ontology.source);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [rxnav]
            base_url = "http://localhost:4010"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(parsed.rxnav.base_url, "http://localhost:4010");
        assert_eq!(parsed.rxnav.timeout_secs, 5);
        assert_eq!(parsed.ontology.source, DEFAULT_ONTOLOGY_URL);
        assert_eq!(parsed.sources.len(), 4);
    }

    #[test]
    fn test_validate_rejects_empty_sources() {
        let mut config = Config::default();
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.rxnav.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
