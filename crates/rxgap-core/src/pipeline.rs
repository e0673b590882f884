//! End-to-end audit pipeline
//!
//! Runs the whole job in order: load the ontology and extract its annotated
//! RxNorm identifiers, harvest candidate identifiers from every configured
//! classification source, expand them through related concepts, describe
//! both sides, and compute what the ontology is missing. Remote requests are
//! issued strictly one at a time.

use std::collections::BTreeSet;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::harvest;
use crate::ontology::{Ontology, OntologySource};
use crate::report;
use crate::rxnav::{RxNavClient, TermRecord};

/// Milestones reported while a run progresses.
///
/// The pipeline stays silent on stdout; callers turn these into whatever
/// output suits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Loading the ontology and extracting existing identifiers
    ExtractingExisting { source: String },
    /// Extraction finished with this many unique identifiers
    ExistingFound { count: usize },
    /// Candidate harvesting is starting
    CollectingCandidates,
    /// One classification source is being harvested
    CollectingSource { name: String },
    /// All sources harvested into this many seed identifiers
    SeedsFound { count: usize },
    /// Related-concept expansion is starting
    ExpandingRelated,
    /// Expansion progress, reported after every seed
    RelatedProcessed { done: usize, total: usize },
    /// Expansion finished with this many candidate identifiers
    CandidatesExpanded { count: usize },
    /// Candidates are being described and the difference computed
    Differencing,
    /// The run found this many missing terms
    MissingFound { count: usize },
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Unique identifiers annotated in the ontology
    pub existing_count: usize,
    /// Identifiers harvested from the classification sources
    pub seed_count: usize,
    /// Identifiers after related-concept expansion
    pub candidate_count: usize,
    /// Records the ontology lacks, ordered by numeric identifier
    pub missing: Vec<TermRecord>,
}

/// Run the audit end to end.
///
/// Remote hiccups during harvesting shrink the result instead of failing
/// it; only ontology problems and non-numeric identifiers abort the run.
pub async fn run(
    config: &Config,
    client: &RxNavClient,
    source: &OntologySource,
    mut progress: impl FnMut(Progress),
) -> Result<RunSummary> {
    progress(Progress::ExtractingExisting {
        source: source.to_string(),
    });
    let ontology = Ontology::load(source).await?;
    let existing_ids = ontology.annotation_values(&config.ontology.annotation_property);
    progress(Progress::ExistingFound {
        count: existing_ids.len(),
    });
    info!(count = existing_ids.len(), "Extracted annotated identifiers");

    let existing = harvest::enrich_terms(client, &existing_ids).await;

    progress(Progress::CollectingCandidates);
    let mut seeds = BTreeSet::new();
    for class_source in &config.sources {
        progress(Progress::CollectingSource {
            name: class_source.name.clone(),
        });
        seeds.extend(harvest::source_members(client, class_source).await);
    }
    progress(Progress::SeedsFound { count: seeds.len() });
    info!(count = seeds.len(), "Harvested seed identifiers");

    progress(Progress::ExpandingRelated);
    let candidate_ids = harvest::expand_related(client, &seeds, |done, total| {
        progress(Progress::RelatedProcessed { done, total });
    })
    .await;
    progress(Progress::CandidatesExpanded {
        count: candidate_ids.len(),
    });
    info!(count = candidate_ids.len(), "Expanded candidate identifiers");

    progress(Progress::Differencing);
    let candidates = harvest::enrich_terms(client, &candidate_ids).await;
    let missing = report::missing_terms(&existing, &candidates)?;
    progress(Progress::MissingFound {
        count: missing.len(),
    });
    info!(count = missing.len(), "Identified missing terms");

    Ok(RunSummary {
        existing_count: existing_ids.len(),
        seed_count: seeds.len(),
        candidate_count: candidate_ids.len(),
        missing,
    })
}
