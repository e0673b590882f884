//! Minimal RDF/XML reader for OWL ontology documents.
//!
//! This handles the subset emitted by the OWL API's RDF/XML writer, which is
//! what OBO Foundry releases ship:
//! - `<owl:Class rdf:about="...">` and `<owl:NamedIndividual rdf:about="...">`
//! - `<rdf:Description rdf:about="...">` subjects typed by a nested `rdf:type`
//! - annotation elements carrying literal text or an `rdf:resource` IRI
//! - `<!DOCTYPE` entity declarations used to abbreviate IRIs
//!
//! Anonymous nodes and nested class expressions are tracked only for depth
//! and never surface as annotation values. Namespace declarations accumulate
//! globally instead of scoping to the declaring element, so a prefix rebound
//! on a nested element stays rebound for the rest of the document; OWL API
//! releases declare every prefix on the root, where the two behaviors
//! coincide. Not a general-purpose RDF/XML parser.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDF_ROOT_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#RDF";
const RDF_DESCRIPTION_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Description";
const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const OWL_CLASS_IRI: &str = "http://www.w3.org/2002/07/owl#Class";
const OWL_NAMED_INDIVIDUAL_IRI: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";

/// Kind of a named ontology entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Individual,
}

/// A named subject and the annotation values asserted on it
#[derive(Debug, Clone)]
pub struct OwlEntity {
    pub iri: String,
    /// `None` when the document never typed this subject
    pub kind: Option<EntityKind>,
    /// Property IRI to values, each list in document order
    pub annotations: HashMap<String, Vec<String>>,
}

impl OwlEntity {
    fn new(iri: String, kind: Option<EntityKind>) -> Self {
        Self {
            iri,
            kind,
            annotations: HashMap::new(),
        }
    }

    /// Values recorded for a property, empty if the property never appears
    pub fn values(&self, property_iri: &str) -> &[String] {
        self.annotations
            .get(property_iri)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn apply_property(
        &mut self,
        property_iri: &str,
        resource: Option<String>,
        text: &str,
        nested: bool,
    ) {
        if property_iri == RDF_TYPE_IRI {
            match resource.as_deref() {
                Some(OWL_CLASS_IRI) => self.kind = Some(EntityKind::Class),
                Some(OWL_NAMED_INDIVIDUAL_IRI) => self.kind = Some(EntityKind::Individual),
                // Instance types, e.g. an individual's class
                _ => {}
            }
            return;
        }
        // A property wrapping nested elements is a class expression or an
        // axiom node, not an annotation value
        if nested {
            return;
        }
        let value = match resource {
            Some(iri) => iri,
            None => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return;
                }
                trimmed.to_string()
            }
        };
        self.annotations
            .entry(property_iri.to_string())
            .or_default()
            .push(value);
    }
}

/// Where the reader is while walking the element tree
enum Frame {
    /// The `rdf:RDF` document element
    Root,
    /// A named subject being accumulated
    Entity(OwlEntity),
    /// A property element inside a subject
    Property {
        iri: String,
        resource: Option<String>,
        text: String,
        nested: bool,
    },
    /// Anything we do not extract from, kept only for depth
    Skip,
}

/// Parse an RDF/XML document into its named subjects.
///
/// Untyped subjects are returned with `kind: None`; callers merge repeated
/// blocks for the same IRI and decide what untyped leftovers mean.
pub fn parse_document(xml: &str) -> Result<Vec<OwlEntity>> {
    let mut reader = Reader::from_str(xml);

    let mut namespaces: HashMap<String, String> = HashMap::new();
    let mut doctype_entities: HashMap<String, String> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut entities = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::DocType(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                doctype_entities = parse_doctype_entities(&text);
            }
            Ok(Event::Start(ref e)) => {
                collect_namespaces(e, &doctype_entities, &mut namespaces);
                let frame = next_frame(e, &namespaces, &doctype_entities, stack.last())?;
                if matches!(frame, Frame::Skip) {
                    if let Some(Frame::Property { nested, .. }) = stack.last_mut() {
                        *nested = true;
                    }
                }
                stack.push(frame);
            }
            Ok(Event::Empty(ref e)) => {
                collect_namespaces(e, &doctype_entities, &mut namespaces);
                match next_frame(e, &namespaces, &doctype_entities, stack.last())? {
                    // Self-closing subject, e.g. <owl:Class rdf:about="..."/>
                    Frame::Entity(entity) => entities.push(entity),
                    // Self-closing property, e.g. <rdf:type rdf:resource="..."/>
                    Frame::Property { iri, resource, text, nested } => {
                        if let Some(Frame::Entity(entity)) = stack.last_mut() {
                            entity.apply_property(&iri, resource, &text, nested);
                        }
                    }
                    Frame::Skip => {
                        if let Some(Frame::Property { nested, .. }) = stack.last_mut() {
                            *nested = true;
                        }
                    }
                    Frame::Root => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(Frame::Property { text, .. }) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    text.push_str(&expand_entities(&raw, &doctype_entities));
                }
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(Frame::Entity(entity)) => entities.push(entity),
                Some(Frame::Property { iri, resource, text, nested }) => {
                    if let Some(Frame::Entity(entity)) = stack.last_mut() {
                        entity.apply_property(&iri, resource, &text, nested);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    return Err(Error::OntologyParse(
                        "unexpected end of document".to_string(),
                    ));
                }
                break;
            }
            Err(e) => return Err(Error::OntologyParse(e.to_string())),
            _ => {}
        }
    }

    Ok(entities)
}

/// Decide what the element just opened means, given where we are
fn next_frame(
    e: &BytesStart,
    namespaces: &HashMap<String, String>,
    doctype_entities: &HashMap<String, String>,
    parent: Option<&Frame>,
) -> Result<Frame> {
    let (prefix, local) = split_qname(e.name().as_ref());

    match parent {
        None => {
            let iri = resolve_qname(&prefix, &local, namespaces)?;
            if iri == RDF_ROOT_IRI {
                Ok(Frame::Root)
            } else {
                Err(Error::OntologyParse(format!(
                    "document root is <{}>, expected rdf:RDF",
                    String::from_utf8_lossy(e.name().as_ref())
                )))
            }
        }
        Some(Frame::Root) => {
            // Top-level node element: a subject if it is named, otherwise
            // the ontology header, a property declaration, or an axiom
            let Some(about) = extract_attr(e, "about", namespaces, doctype_entities) else {
                return Ok(Frame::Skip);
            };
            let iri = resolve_qname(&prefix, &local, namespaces)?;
            let kind = match iri.as_str() {
                OWL_CLASS_IRI => Some(EntityKind::Class),
                OWL_NAMED_INDIVIDUAL_IRI => Some(EntityKind::Individual),
                RDF_DESCRIPTION_IRI => None,
                _ => return Ok(Frame::Skip),
            };
            Ok(Frame::Entity(OwlEntity::new(about, kind)))
        }
        Some(Frame::Entity(_)) => {
            let iri = resolve_qname(&prefix, &local, namespaces)?;
            let resource = extract_attr(e, "resource", namespaces, doctype_entities);
            Ok(Frame::Property {
                iri,
                resource,
                text: String::new(),
                nested: false,
            })
        }
        Some(Frame::Property { .. }) | Some(Frame::Skip) => Ok(Frame::Skip),
    }
}

/// Split a qualified XML name (e.g., b"owl:Class") into (prefix, local).
fn split_qname(name: &[u8]) -> (String, String) {
    let name_str = String::from_utf8_lossy(name);
    if let Some(pos) = name_str.find(':') {
        (name_str[..pos].to_string(), name_str[pos + 1..].to_string())
    } else {
        (String::new(), name_str.to_string())
    }
}

/// Resolve a prefixed XML name to a full IRI.
fn resolve_qname(
    prefix: &str,
    local: &str,
    namespaces: &HashMap<String, String>,
) -> Result<String> {
    match namespaces.get(prefix) {
        Some(ns) => Ok(format!("{ns}{local}")),
        None if prefix.is_empty() => Err(Error::OntologyParse(format!(
            "unprefixed element <{local}> with no default namespace"
        ))),
        None => Err(Error::OntologyParse(format!(
            "unknown namespace prefix '{prefix}'"
        ))),
    }
}

/// Collect xmlns declarations from an element's attributes.
fn collect_namespaces(
    e: &BytesStart,
    doctype_entities: &HashMap<String, String>,
    namespaces: &mut HashMap<String, String>,
) {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.0).to_string();
        let prefix = if let Some(prefix) = key.strip_prefix("xmlns:") {
            prefix
        } else if key == "xmlns" {
            ""
        } else {
            continue;
        };
        let raw = String::from_utf8_lossy(&attr.value);
        namespaces.insert(prefix.to_string(), expand_entities(&raw, doctype_entities));
    }
}

/// Extract an RDF attribute value (e.g., `rdf:about`, `rdf:resource`).
///
/// Matches any prefix bound to the RDF namespace, or no prefix. Empty values
/// are treated as absent.
fn extract_attr(
    e: &BytesStart,
    attr_local: &str,
    namespaces: &HashMap<String, String>,
    doctype_entities: &HashMap<String, String>,
) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.0).to_string();
        let (aprefix, alocal) = if let Some(pos) = key.find(':') {
            (&key[..pos], &key[pos + 1..])
        } else {
            ("", key.as_str())
        };

        if alocal != attr_local {
            continue;
        }

        let is_rdf_attr = aprefix.is_empty()
            || namespaces.get(aprefix).is_some_and(|ns| ns == RDF_NS);

        if is_rdf_attr {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = expand_entities(&raw, doctype_entities);
            if value.is_empty() {
                return None;
            }
            return Some(value);
        }
    }
    None
}

/// Parse `<!ENTITY name "value">` declarations from a DOCTYPE subset.
fn parse_doctype_entities(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;

    while let Some(pos) = rest.find("<!ENTITY") {
        rest = &rest[pos + "<!ENTITY".len()..];
        let after_marker = rest.trim_start();
        let Some(name_len) = after_marker.find(|c: char| c.is_whitespace()) else {
            break;
        };
        let name = &after_marker[..name_len];
        let after_name = after_marker[name_len..].trim_start();
        let Some(quote) = after_name.chars().next() else {
            break;
        };
        if quote != '"' && quote != '\'' {
            continue;
        }
        let body = &after_name[1..];
        let Some(end) = body.find(quote) else {
            break;
        };
        // Parameter entities cannot be referenced from attribute values
        if !name.starts_with('%') {
            entities.insert(name.to_string(), body[..end].to_string());
        }
        rest = &body[end + 1..];
    }

    entities
}

/// Expand character references and DOCTYPE-declared entities in raw text.
///
/// Unknown references are kept verbatim rather than failing the parse.
fn expand_entities(raw: &str, doctype_entities: &HashMap<String, String>) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find(';') {
            Some(end) if end > 1 => {
                let name = &rest[1..end];
                if let Some(expanded) = expand_reference(name, doctype_entities) {
                    out.push_str(&expanded);
                } else {
                    out.push_str(&rest[..=end]);
                }
                rest = &rest[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    out
}

fn expand_reference(name: &str, doctype_entities: &HashMap<String, String>) -> Option<String> {
    match name {
        "amp" => Some("&".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "quot" => Some("\"".to_string()),
        "apos" => Some("'".to_string()),
        _ => {
            if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
            } else {
                doctype_entities.get(name).cloned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROP: &str = "http://purl.obolibrary.org/obo/VO_0003198";

    fn find<'a>(entities: &'a [OwlEntity], iri: &str) -> &'a OwlEntity {
        entities
            .iter()
            .find(|e| e.iri == iri)
            .unwrap_or_else(|| panic!("no entity {iri}"))
    }

    #[test]
    fn test_class_with_literal_annotation() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Class rdf:about="http://purl.obolibrary.org/obo/VO_0000738">
            <obo:VO_0003198 rdf:datatype="http://www.w3.org/2001/XMLSchema#string">798303</obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        assert_eq!(entities.len(), 1);
        let class = &entities[0];
        assert_eq!(class.iri, "http://purl.obolibrary.org/obo/VO_0000738");
        assert_eq!(class.kind, Some(EntityKind::Class));
        assert_eq!(class.values(PROP), ["798303"]);
    }

    #[test]
    fn test_named_individual() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:NamedIndividual rdf:about="http://example.org/ind1">
            <rdf:type rdf:resource="http://purl.obolibrary.org/obo/VO_0000001"/>
            <obo:VO_0003198>12345</obo:VO_0003198>
          </owl:NamedIndividual>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let ind = find(&entities, "http://example.org/ind1");
        assert_eq!(ind.kind, Some(EntityKind::Individual));
        assert_eq!(ind.values(PROP), ["12345"]);
    }

    #[test]
    fn test_description_typed_by_rdf_type() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <rdf:Description rdf:about="http://example.org/c1">
            <rdf:type rdf:resource="http://www.w3.org/2002/07/owl#Class"/>
            <obo:VO_0003198>77</obo:VO_0003198>
          </rdf:Description>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c1");
        assert_eq!(class.kind, Some(EntityKind::Class));
        assert_eq!(class.values(PROP), ["77"]);
    }

    #[test]
    fn test_untyped_description_has_no_kind() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <rdf:Description rdf:about="http://example.org/x">
            <obo:VO_0003198>5</obo:VO_0003198>
          </rdf:Description>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let subject = find(&entities, "http://example.org/x");
        assert_eq!(subject.kind, None);
        assert_eq!(subject.values(PROP), ["5"]);
    }

    #[test]
    fn test_nested_expression_is_not_a_value() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Class rdf:about="http://example.org/c2">
            <rdfs:subClassOf>
              <owl:Restriction>
                <owl:onProperty rdf:resource="http://example.org/p"/>
                <owl:someValuesFrom rdf:resource="http://example.org/d"/>
              </owl:Restriction>
            </rdfs:subClassOf>
            <obo:VO_0003198>42</obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c2");
        assert_eq!(class.values(PROP), ["42"]);
        assert!(
            class
                .values("http://www.w3.org/2000/01/rdf-schema#subClassOf")
                .is_empty()
        );
    }

    #[test]
    fn test_resource_valued_annotation_keeps_iri() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Class rdf:about="http://example.org/c3">
            <obo:VO_0003198 rdf:resource="http://example.org/other"/>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c3");
        assert_eq!(class.values(PROP), ["http://example.org/other"]);
    }

    #[test]
    fn test_blank_annotation_is_dropped() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Class rdf:about="http://example.org/c4">
            <obo:VO_0003198>   </obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c4");
        assert!(class.values(PROP).is_empty());
    }

    #[test]
    fn test_multiple_values_kept_in_document_order() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Class rdf:about="http://example.org/c5">
            <obo:VO_0003198>100</obo:VO_0003198>
            <obo:VO_0003198>200</obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c5");
        assert_eq!(class.values(PROP), ["100", "200"]);
    }

    #[test]
    fn test_doctype_entities_expand_in_attributes() {
        let xml = r#"<?xml version="1.0"?>
        <!DOCTYPE rdf:RDF [
            <!ENTITY obo "http://purl.obolibrary.org/obo/" >
        ]>
        <rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="&obo;">
          <owl:Class rdf:about="&obo;VO_0000738">
            <obo:VO_0003198>798303</obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://purl.obolibrary.org/obo/VO_0000738");
        assert_eq!(class.kind, Some(EntityKind::Class));
        assert_eq!(class.values(PROP), ["798303"]);
    }

    #[test]
    fn test_character_references_expand_in_text() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
          <owl:Class rdf:about="http://example.org/c6">
            <rdfs:label>A &amp; B &#x2764;</rdfs:label>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c6");
        assert_eq!(
            class.values("http://www.w3.org/2000/01/rdf-schema#label"),
            ["A & B \u{2764}"]
        );
    }

    #[test]
    fn test_self_closing_class() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#">
          <owl:Class rdf:about="http://example.org/c7"/>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        let class = find(&entities, "http://example.org/c7");
        assert_eq!(class.kind, Some(EntityKind::Class));
        assert!(class.annotations.is_empty());
    }

    #[test]
    fn test_header_and_axiom_blocks_are_skipped() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#"
            xmlns:obo="http://purl.obolibrary.org/obo/">
          <owl:Ontology rdf:about="http://purl.obolibrary.org/obo/vo.owl"/>
          <owl:AnnotationProperty rdf:about="http://purl.obolibrary.org/obo/VO_0003198"/>
          <owl:Axiom>
            <owl:annotatedSource rdf:resource="http://example.org/c8"/>
            <owl:annotatedProperty rdf:resource="http://purl.obolibrary.org/obo/VO_0003198"/>
            <owl:annotatedTarget>99</owl:annotatedTarget>
          </owl:Axiom>
          <owl:Class rdf:about="http://example.org/c8">
            <obo:VO_0003198>99</obo:VO_0003198>
          </owl:Class>
        </rdf:RDF>"#;

        let entities = parse_document(xml).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].iri, "http://example.org/c8");
        assert_eq!(entities[0].values(PROP), ["99"]);
    }

    #[test]
    fn test_unknown_prefix_is_an_error() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#">
          <owl:Class rdf:about="http://example.org/c9">
            <mystery:prop>1</mystery:prop>
          </owl:Class>
        </rdf:RDF>"#;

        let err = parse_document(xml).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_non_rdf_root_is_an_error() {
        let xml = r#"<Ontology xmlns="http://www.w3.org/2002/07/owl#"/>"#;
        assert!(matches!(
            parse_document(xml),
            Err(Error::OntologyParse(_))
        ));
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:owl="http://www.w3.org/2002/07/owl#">
          <owl:Class rdf:about="http://example.org/c10">"#;

        assert!(parse_document(xml).is_err());
    }

    #[test]
    fn test_parse_doctype_entities() {
        let doctype = r#"rdf:RDF [
            <!ENTITY obo "http://purl.obolibrary.org/obo/" >
            <!ENTITY oboInOwl 'http://www.geneontology.org/formats/oboInOwl#' >
            <!ENTITY % ignored "nothing" >
        ]"#;

        let entities = parse_doctype_entities(doctype);
        assert_eq!(
            entities.get("obo").map(String::as_str),
            Some("http://purl.obolibrary.org/obo/")
        );
        assert_eq!(
            entities.get("oboInOwl").map(String::as_str),
            Some("http://www.geneontology.org/formats/oboInOwl#")
        );
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_expand_entities_leaves_unknown_references() {
        let map = HashMap::new();
        assert_eq!(expand_entities("a &nope; b", &map), "a &nope; b");
        assert_eq!(expand_entities("no refs", &map), "no refs");
        assert_eq!(expand_entities("5 &lt; 6", &map), "5 < 6");
    }
}
