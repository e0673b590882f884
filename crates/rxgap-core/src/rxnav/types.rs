//! RxNav API types
//!
//! These types match the JSON documents served by the RxNav and RxClass
//! REST endpoints. Every field the service is allowed to omit is an
//! `Option` (or a defaulted collection), so a sparse answer deserializes
//! instead of failing.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Parameters for a `rxclass/classMembers` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberQuery {
    /// Classification class identifier, e.g. "J07AC" or "IM100".
    pub class_id: String,
    /// Source vocabulary, e.g. "ATCPROD" or "VA".
    pub rela_source: String,
    /// Optional relationship filter, e.g. "has_vaclass".
    pub rela: Option<String>,
}

impl MemberQuery {
    /// Create a query without a relationship filter
    pub fn new(class_id: impl Into<String>, rela_source: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            rela_source: rela_source.into(),
            rela: None,
        }
    }

    /// Set the relationship filter
    pub fn with_rela(mut self, rela: impl Into<String>) -> Self {
        self.rela = Some(rela.into());
        self
    }

    /// Query-string pairs in the order RxNav documents them
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![
            ("classId", self.class_id.as_str()),
            ("relaSource", self.rela_source.as_str()),
        ];
        if let Some(rela) = &self.rela {
            params.push(("rela", rela.as_str()));
        }
        params
    }
}

/// Response from `rxclass/classTree.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ClassTreeResponse {
    /// Top-level tree nodes; absent when the root is unknown
    #[serde(rename = "rxclassTree", default)]
    pub tree: Vec<ClassTreeNode>,
}

/// One node of a classification tree
#[derive(Debug, Clone, Deserialize)]
pub struct ClassTreeNode {
    #[serde(rename = "rxclassMinConceptItem")]
    pub concept: ClassConcept,
    /// Child nodes; a node without children is a leaf
    #[serde(rename = "rxclassTree", default)]
    pub children: Vec<ClassTreeNode>,
}

/// Minimal description of a classification class
#[derive(Debug, Clone, Deserialize)]
pub struct ClassConcept {
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "className")]
    pub class_name: String,
    #[serde(rename = "classType", default)]
    pub class_type: Option<String>,
}

/// A leaf class selected by the tree walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLeaf {
    pub class_id: String,
    pub class_name: String,
}

/// Response from `rxclass/classMembers.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ClassMembersResponse {
    /// Absent entirely when the class has no members
    #[serde(rename = "drugMemberGroup", default)]
    pub group: Option<DrugMemberGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrugMemberGroup {
    #[serde(rename = "drugMember", default)]
    pub members: Vec<DrugMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrugMember {
    #[serde(rename = "minConcept", default)]
    pub concept: Option<MinConcept>,
}

/// Minimal description of an RxNorm concept
#[derive(Debug, Clone, Deserialize)]
pub struct MinConcept {
    #[serde(default)]
    pub rxcui: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tty: Option<String>,
}

impl ClassMembersResponse {
    /// RxCUIs of all members, skipping entries without one
    pub fn member_rxcuis(&self) -> Vec<String> {
        self.group
            .iter()
            .flat_map(|g| g.members.iter())
            .filter_map(|m| m.concept.as_ref())
            .filter_map(|c| c.rxcui.clone())
            .collect()
    }
}

/// Response from `rxcui/{id}/allrelated.json`
#[derive(Debug, Clone, Deserialize)]
pub struct AllRelatedResponse {
    #[serde(rename = "allRelatedGroup", default)]
    pub group: Option<AllRelatedGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllRelatedGroup {
    #[serde(default)]
    pub rxcui: Option<String>,
    #[serde(rename = "conceptGroup", default)]
    pub concept_groups: Vec<ConceptGroup>,
}

/// Related concepts grouped by term type
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptGroup {
    #[serde(default)]
    pub tty: Option<String>,
    /// Omitted when the group is empty for this concept
    #[serde(rename = "conceptProperties", default)]
    pub concept_properties: Vec<ConceptProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptProperty {
    #[serde(default)]
    pub rxcui: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tty: Option<String>,
}

impl AllRelatedResponse {
    /// RxCUIs across all concept groups, skipping entries without one
    pub fn related_rxcuis(&self) -> Vec<String> {
        self.group
            .iter()
            .flat_map(|g| g.concept_groups.iter())
            .flat_map(|cg| cg.concept_properties.iter())
            .filter_map(|c| c.rxcui.clone())
            .collect()
    }
}

/// Response from `rxcui/{id}/historystatus.json`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryStatusResponse {
    #[serde(rename = "rxcuiStatusHistory", default)]
    pub history: Option<StatusHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusHistory {
    #[serde(rename = "metaData", default)]
    pub meta_data: Option<StatusMetaData>,
    #[serde(default)]
    pub attributes: Option<StatusAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusMetaData {
    /// Concept lifecycle status, e.g. "Active" or "Retired"
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tty: Option<String>,
}

/// One RxNorm term as it appears in the final report
///
/// The identifier is always present; the descriptive fields are filled from
/// the history-status endpoint when it answers and stay `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    pub rxcui: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub tty: Option<String>,
}

impl TermRecord {
    /// A record carrying only the identifier
    pub fn bare(rxcui: impl Into<String>) -> Self {
        Self {
            rxcui: rxcui.into(),
            name: None,
            status: None,
            tty: None,
        }
    }

    /// Build a record from a history-status answer
    pub fn from_status(rxcui: impl Into<String>, response: &HistoryStatusResponse) -> Self {
        let history = response.history.as_ref();
        let attributes = history.and_then(|h| h.attributes.as_ref());
        let meta = history.and_then(|h| h.meta_data.as_ref());

        Self {
            rxcui: rxcui.into(),
            name: attributes.and_then(|a| a.name.clone()),
            status: meta.and_then(|m| m.status.clone()),
            tty: attributes.and_then(|a| a.tty.clone()),
        }
    }

    /// The identifier as a number, for set comparison across sources
    pub fn numeric_rxcui(&self) -> Result<i64> {
        self.rxcui
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidRxcui(self.rxcui.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_query_params_without_rela() {
        let query = MemberQuery::new("J07AC", "ATCPROD");
        assert_eq!(
            query.query_params(),
            vec![("classId", "J07AC"), ("relaSource", "ATCPROD")]
        );
    }

    #[test]
    fn test_member_query_params_with_rela() {
        let query = MemberQuery::new("IM100", "VA").with_rela("has_vaclass");
        assert_eq!(
            query.query_params(),
            vec![
                ("classId", "IM100"),
                ("relaSource", "VA"),
                ("rela", "has_vaclass"),
            ]
        );
    }

    #[test]
    fn test_class_tree_deserialization() {
        let json = r#"{
            "rxclassTree": [{
                "rxclassMinConceptItem": {
                    "classId": "J07AC",
                    "className": "BACTERIAL VACCINES",
                    "classType": "ATC1-4"
                },
                "rxclassTree": [{
                    "rxclassMinConceptItem": {
                        "classId": "J07AC01",
                        "className": "anthrax antigen",
                        "classType": "ATC1-4"
                    }
                }]
            }]
        }"#;

        let response: ClassTreeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tree.len(), 1);
        let root = &response.tree[0];
        assert_eq!(root.concept.class_id, "J07AC");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].concept.class_name, "anthrax antigen");
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn test_class_tree_empty_document() {
        let response: ClassTreeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.tree.is_empty());
    }

    #[test]
    fn test_class_members_deserialization() {
        let json = r#"{
            "drugMemberGroup": {
                "drugMember": [
                    {"minConcept": {"rxcui": "798303", "name": "hepatitis B vaccine", "tty": "IN"}},
                    {"minConcept": {"rxcui": "253170"}},
                    {"nodeAttr": []}
                ]
            }
        }"#;

        let response: ClassMembersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.member_rxcuis(), vec!["798303", "253170"]);
    }

    #[test]
    fn test_class_members_absent_group() {
        let response: ClassMembersResponse = serde_json::from_str("{}").unwrap();
        assert!(response.group.is_none());
        assert!(response.member_rxcuis().is_empty());
    }

    #[test]
    fn test_all_related_deserialization() {
        let json = r#"{
            "allRelatedGroup": {
                "rxcui": "798303",
                "conceptGroup": [
                    {"tty": "BN", "conceptProperties": [
                        {"rxcui": "215603", "name": "Engerix-B", "tty": "BN"},
                        {"rxcui": "215841", "name": "Recombivax HB", "tty": "BN"}
                    ]},
                    {"tty": "DF"}
                ]
            }
        }"#;

        let response: AllRelatedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.related_rxcuis(), vec!["215603", "215841"]);
    }

    #[test]
    fn test_history_status_deserialization() {
        let json = r#"{
            "rxcuiStatusHistory": {
                "metaData": {"status": "Active", "source": "RxNorm"},
                "attributes": {
                    "rxcui": "798303",
                    "name": "hepatitis B surface antigen vaccine",
                    "tty": "IN",
                    "isMultipleIngredient": "NO"
                }
            }
        }"#;

        let response: HistoryStatusResponse = serde_json::from_str(json).unwrap();
        let record = TermRecord::from_status("798303", &response);
        assert_eq!(record.rxcui, "798303");
        assert_eq!(
            record.name.as_deref(),
            Some("hepatitis B surface antigen vaccine")
        );
        assert_eq!(record.status.as_deref(), Some("Active"));
        assert_eq!(record.tty.as_deref(), Some("IN"));
    }

    #[test]
    fn test_term_record_from_sparse_status() {
        let response: HistoryStatusResponse = serde_json::from_str("{}").unwrap();
        let record = TermRecord::from_status("42", &response);
        assert_eq!(record, TermRecord::bare("42"));
    }

    #[test]
    fn test_term_record_from_partial_status() {
        let json = r#"{"rxcuiStatusHistory": {"metaData": {"status": "Retired"}}}"#;
        let response: HistoryStatusResponse = serde_json::from_str(json).unwrap();
        let record = TermRecord::from_status("7", &response);
        assert_eq!(record.status.as_deref(), Some("Retired"));
        assert!(record.name.is_none());
        assert!(record.tty.is_none());
    }

    #[test]
    fn test_numeric_rxcui() {
        assert_eq!(TermRecord::bare("798303").numeric_rxcui().unwrap(), 798303);
        assert_eq!(TermRecord::bare(" 42 ").numeric_rxcui().unwrap(), 42);
        assert!(matches!(
            TermRecord::bare("12a4").numeric_rxcui(),
            Err(Error::InvalidRxcui(_))
        ));
    }
}
