//! RxNav integration
//!
//! This module provides:
//! - HTTP client for the RxNav and RxClass REST endpoints
//! - Response types matching the service's JSON documents
//! - A three-way outcome type separating "answered with data",
//!   "answered empty", and "failed" for fault-tolerant harvesting

mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, RxNavClient, RxNavClientBuilder};
pub use types::{
    AllRelatedGroup, AllRelatedResponse, ClassConcept, ClassLeaf, ClassMembersResponse,
    ClassTreeNode, ClassTreeResponse, ConceptGroup, ConceptProperty, DrugMember, DrugMemberGroup,
    HistoryStatusResponse, MemberQuery, MinConcept, StatusAttributes, StatusHistory,
    StatusMetaData, TermRecord,
};

use crate::error::Error;

/// Result of one remote fetch during the harvest.
///
/// A fetch that reaches the service and comes back empty is not the same as
/// a fetch that never got an answer. The harvest treats both as "nothing to
/// add" but logs them differently, and tests can tell them apart.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The service answered and had data for this query
    Data(T),
    /// The service answered but had nothing for this query
    Empty,
    /// The request failed; the cause is kept for logging and inspection
    Failed(Error),
}

impl<T> FetchOutcome<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, FetchOutcome::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

impl FetchOutcome<Vec<String>> {
    /// Collected identifiers, with both empty and failed fetches
    /// contributing nothing
    pub fn into_ids(self) -> Vec<String> {
        match self {
            FetchOutcome::Data(ids) => ids,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        }
    }
}
