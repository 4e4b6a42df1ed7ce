//! Node/link graph assembly.

use crate::labels::{group_label, link_type};
use ccss_core::model::{DependencyDocument, ReferenceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub description: String,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `{"nodes": [...], "links": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    /// Links whose source or target is not the id of any node.
    ///
    /// Assembly does not drop these; callers decide whether to warn.
    pub fn dangling_links(&self) -> Vec<&GraphLink> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.links
            .iter()
            .filter(|l| !ids.contains(l.source.as_str()) || !ids.contains(l.target.as_str()))
            .collect()
    }
}

/// Canonical identifier of a standards record:
/// `grade[category].domain.cluster.standard[.substandard]`.
pub fn node_id(record: &ReferenceRecord) -> String {
    let mut grade = record.grade_level_code.clone();
    if record.is_high_school()
        && let Some(category) = &record.category_code
    {
        grade.push_str(category);
    }

    [
        Some(grade.as_str()),
        Some(record.domain_code.as_str()),
        record.cluster_code.as_deref(),
        Some(record.standard_counter.as_str()),
        record.substandard_counter.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(".")
}

pub fn node(record: &ReferenceRecord) -> GraphNode {
    GraphNode {
        id: node_id(record),
        description: record.description.clone().unwrap_or_default(),
        group: group_label(record),
    }
}

/// Assemble the graph from every standards record (K-8 and high school,
/// in the given order) and the sanitized relationships.
pub fn assemble<'a>(
    standards: impl IntoIterator<Item = &'a ReferenceRecord>,
    dependencies: &DependencyDocument,
) -> GraphDocument {
    let nodes = standards.into_iter().map(node).collect::<Vec<_>>();
    let links = dependencies
        .dependencies
        .iter()
        .map(|edge| GraphLink {
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: link_type(edge.relationship.as_deref()),
        })
        .collect::<Vec<_>>();
    let graph = GraphDocument { nodes, links };
    tracing::debug!(
        "assembled {} nodes and {} links",
        graph.nodes.len(),
        graph.links.len()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccss_core::model::RelationshipEdge;

    fn record(grade: &str, category: Option<&str>, rest: [&str; 3], sub: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            grade_level_code: grade.into(),
            category_code: category.map(str::to_string),
            domain_code: rest[0].into(),
            cluster_code: Some(rest[1].into()),
            standard_counter: rest[2].into(),
            substandard_counter: sub.map(str::to_string),
            description: Some(format!("{grade} standard")),
        }
    }

    #[test]
    fn test_node_ids() {
        assert_eq!(node_id(&record("4", None, ["NF", "B", "3"], None)), "4.NF.B.3");
        assert_eq!(node_id(&record("4", None, ["NF", "B", "3"], Some("a"))), "4.NF.B.3.a");
        assert_eq!(node_id(&record("HS", Some("A"), ["SSE", "A", "1"], None)), "HSA.SSE.A.1");
        assert_eq!(node_id(&record("HS", None, ["SSE", "A", "1"], None)), "HS.SSE.A.1");

        let mut no_cluster = record("HS", Some("A"), ["CED", "", "4"], None);
        no_cluster.cluster_code = None;
        assert_eq!(node_id(&no_cluster), "HSA.CED.4");
    }

    #[test]
    fn test_assemble() {
        let standards = vec![
            record("4", None, ["NF", "B", "3"], None),
            record("HS", Some("F"), ["IF", "A", "1"], None),
        ];
        let deps = DependencyDocument {
            dependencies: vec![RelationshipEdge {
                source: "4.NF.B.3".into(),
                target: "HSF.IF.A.1".into(),
                relationship: Some("conceptual connection".into()),
            }],
        };
        let graph = assemble(&standards, &deps);

        assert_eq!(graph.nodes[0].group, "K-8");
        assert_eq!(graph.nodes[1].group, "Functions");
        assert_eq!(graph.nodes[1].description, "HS standard");
        assert_eq!(graph.links[0].kind, "Conceptual Connection");
        assert!(graph.dangling_links().is_empty());
    }

    #[test]
    fn test_dangling_links_reported_not_dropped() {
        let deps = DependencyDocument {
            dependencies: vec![RelationshipEdge {
                source: "4.NF.B.3".into(),
                target: "9.ZZ.1".into(),
                relationship: None,
            }],
        };
        let standards = vec![record("4", None, ["NF", "B", "3"], None)];
        let graph = assemble(&standards, &deps);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].kind, "Dependency");
        assert_eq!(graph.dangling_links().len(), 1);
    }

    #[test]
    fn test_link_serializes_as_type() {
        let link = GraphLink {
            source: "a".into(),
            target: "b".into(),
            kind: "Dependency".into(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "Dependency");
    }
}
