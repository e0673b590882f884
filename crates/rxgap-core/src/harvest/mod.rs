//! Candidate harvesting from RxNav
//!
//! Gathers RxNorm identifiers from classification sources and expands them
//! through related concepts. Every fetch here is fault tolerant: a failed or
//! empty answer is logged, contributes nothing, and the harvest keeps going.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::{ClassSource, SourceRoots};
use crate::rxnav::{
    ClassLeaf, ClassTreeNode, FetchOutcome, MemberQuery, RxNavClient, TermRecord,
};

/// Leaf classes of the classification tree rooted at `class_id`.
///
/// A failed fetch yields no leaves. Interior classes are skipped; their
/// membership repeats the leaves below them.
pub async fn class_descendants(
    client: &RxNavClient,
    class_id: &str,
    class_type: &str,
) -> Vec<ClassLeaf> {
    match client.class_tree(class_id, class_type).await {
        Ok(response) => {
            let leaves = collect_leaves(&response.tree);
            debug!(class_id, leaves = leaves.len(), "Collected tree leaves");
            leaves
        }
        Err(e) => {
            warn!(class_id, error = %e, "Class tree fetch failed");
            Vec::new()
        }
    }
}

/// Walk tree nodes depth first and keep the childless ones, in encounter
/// order.
pub fn collect_leaves(nodes: &[ClassTreeNode]) -> Vec<ClassLeaf> {
    let mut leaves = Vec::new();
    for node in nodes {
        if node.children.is_empty() {
            leaves.push(ClassLeaf {
                class_id: node.concept.class_id.clone(),
                class_name: node.concept.class_name.clone(),
            });
        } else {
            leaves.extend(collect_leaves(&node.children));
        }
    }
    leaves
}

/// Drug members of one classification class.
pub async fn class_members(
    client: &RxNavClient,
    query: &MemberQuery,
) -> FetchOutcome<Vec<String>> {
    match client.class_members(query).await {
        Ok(response) => {
            let ids = response.member_rxcuis();
            if ids.is_empty() {
                FetchOutcome::Empty
            } else {
                FetchOutcome::Data(ids)
            }
        }
        Err(e) => {
            warn!(class_id = %query.class_id, error = %e, "Class members fetch failed");
            FetchOutcome::Failed(e)
        }
    }
}

/// Concepts related to one RxCUI across every relation RxNav knows.
pub async fn related_concepts(client: &RxNavClient, rxcui: &str) -> FetchOutcome<Vec<String>> {
    match client.all_related(rxcui).await {
        Ok(response) => {
            let ids = response.related_rxcuis();
            if ids.is_empty() {
                FetchOutcome::Empty
            } else {
                FetchOutcome::Data(ids)
            }
        }
        Err(e) => {
            warn!(rxcui, error = %e, "Related concepts fetch failed");
            FetchOutcome::Failed(e)
        }
    }
}

/// One member query per (class, relationship) pair of a source.
fn member_queries(source: &ClassSource, classes: &[ClassLeaf]) -> Vec<MemberQuery> {
    let mut queries = Vec::new();
    for class in classes {
        for rela in source.rela_params() {
            let mut query = MemberQuery::new(&class.class_id, &source.rela_source);
            if let Some(rela) = rela {
                query = query.with_rela(rela);
            }
            queries.push(query);
        }
    }
    queries
}

/// Every RxCUI a classification source contributes.
///
/// Tree-rooted sources are walked down to their leaf classes first; listed
/// sources query their classes directly.
pub async fn source_members(client: &RxNavClient, source: &ClassSource) -> BTreeSet<String> {
    let classes = match &source.roots {
        SourceRoots::Tree {
            class_id,
            class_type,
        } => class_descendants(client, class_id, class_type).await,
        SourceRoots::Classes(ids) => ids
            .iter()
            .map(|id| ClassLeaf {
                class_id: id.clone(),
                class_name: String::new(),
            })
            .collect(),
    };

    let mut ids = BTreeSet::new();
    for query in member_queries(source, &classes) {
        ids.extend(class_members(client, &query).await.into_ids());
    }

    debug!(source = %source.name, ids = ids.len(), "Source harvested");
    ids
}

/// Union of the seed set and everything related to it.
///
/// A single expansion pass: concepts discovered here are not themselves
/// expanded. `progress` is called after each seed with (processed, total).
pub async fn expand_related(
    client: &RxNavClient,
    seeds: &BTreeSet<String>,
    mut progress: impl FnMut(usize, usize),
) -> BTreeSet<String> {
    let mut expanded = seeds.clone();
    let total = seeds.len();

    for (index, rxcui) in seeds.iter().enumerate() {
        expanded.extend(related_concepts(client, rxcui).await.into_ids());
        progress(index + 1, total);
    }

    expanded
}

/// Describe one RxCUI via the history-status endpoint.
///
/// Never fails: when the endpoint cannot be reached or answers badly, the
/// record keeps only the identifier.
pub async fn enrich_term(client: &RxNavClient, rxcui: &str) -> TermRecord {
    match client.history_status(rxcui).await {
        Ok(response) => TermRecord::from_status(rxcui, &response),
        Err(e) => {
            warn!(rxcui, error = %e, "History status fetch failed");
            TermRecord::bare(rxcui)
        }
    }
}

/// Describe every identifier in the set, in set order.
pub async fn enrich_terms(client: &RxNavClient, ids: &BTreeSet<String>) -> Vec<TermRecord> {
    let mut records = Vec::with_capacity(ids.len());
    for rxcui in ids {
        records.push(enrich_term(client, rxcui).await);
    }
    records
}
