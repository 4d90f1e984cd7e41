//! The deduplicating node/edge store the topology builder populates.
//!
//! # Overview
//! `Graph` owns an insertion-ordered sequence of nodes and edges. Every
//! mutation goes through the two `add_*` operations, which merge repeated
//! observations of the same logical entity:
//!
//! - nodes are unique per (label, dedup key); a repeated add updates the
//!   node's backing [`SourceRef`] and nothing else
//! - edges are unique per (label, source, target); attributes of a repeated
//!   add are discarded (first write wins)
//!
//! Both operations are idempotent under identical repeated calls. Index maps
//! back the dedup lookups; the ordered `Vec`s are kept so serialization order
//! stays deterministic.

use std::collections::HashMap;
use std::fmt;

use strum_macros::{Display, IntoStaticStr};
use uuid::Uuid;

use adtopo_error::{Error, Result};

use crate::resolver::ServerId;

/// Opaque node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque edge identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(Uuid);

impl EdgeId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum NodeLabel {
    Forest,
    Site,
    SiteLink,
    Subnet,
    Server,
    #[strum(serialize = "Replication Connection")]
    ReplicationConnection,
    Partition,
    Domain,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Relationship type of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum EdgeLabel {
    #[strum(serialize = "Linked To")]
    LinkedTo,
    #[strum(serialize = "Site Link")]
    SiteLink,
    #[strum(serialize = "Bridgehead Server")]
    BridgeheadServer,
    #[strum(serialize = "Inter Site Topology Generator")]
    InterSiteTopologyGenerator,
    #[strum(serialize = "Directory Server")]
    DirectoryServer,
    #[strum(serialize = "Inbound Connection")]
    InboundConnection,
    #[strum(serialize = "Outbound Connection")]
    OutboundConnection,
    Hosts,
    #[strum(serialize = "Root Domain")]
    RootDomain,
    #[strum(serialize = "Part of Forest")]
    PartOfForest,
    #[strum(serialize = "Domain Controller")]
    DomainController,
    #[strum(serialize = "Infrastructure Role Owner")]
    InfrastructureRoleOwner,
    #[strum(serialize = "Pdc Role Owner")]
    PdcRoleOwner,
    #[strum(serialize = "Rid Role Owner")]
    RidRoleOwner,
    #[strum(serialize = "Naming Role Owner")]
    NamingRoleOwner,
    #[strum(serialize = "Schema Role Owner")]
    SchemaRoleOwner,
    #[strum(serialize = "Global Catalog")]
    GlobalCatalog,
}

impl EdgeLabel {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s}"),
            AttrValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

/// Ordered attribute list; keys render verbatim into the output document.
pub type AttrList = Vec<(String, AttrValue)>;

/// Opaque reference to the entity a node was discovered from.
///
/// Server nodes point at their merged canonical server; everything else
/// carries the distinguished name of the raw directory entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Entity(String),
    Server(ServerId),
}

/// A graph node.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    label: NodeLabel,
    key: String,
    attrs: AttrList,
    source: SourceRef,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> NodeLabel {
        self.label
    }

    /// The dedup key this node was registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn attrs(&self) -> &[(String, AttrValue)] {
        &self.attrs
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }
}

/// A directed graph edge. Both endpoints are guaranteed to be graph nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    id: EdgeId,
    label: EdgeLabel,
    source: NodeId,
    target: NodeId,
    attrs: AttrList,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn label(&self) -> EdgeLabel {
        self.label
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn attrs(&self) -> &[(String, AttrValue)] {
        &self.attrs
    }
}

/// Insertion-ordered, deduplicating node/edge store.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<(NodeLabel, String), usize>,
    node_ids: HashMap<NodeId, usize>,
    edge_index: HashMap<(EdgeLabel, NodeId, NodeId), usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or merge into the existing node with the same
    /// (label, key) pair.
    ///
    /// Every call supplies an explicit dedup key; callers whose entity has no
    /// natural name pass the entity's own identity instead, so distinct
    /// anonymous entities never collapse onto one node. On a dedup hit only
    /// the backing [`SourceRef`] is replaced; the attribute list of the first
    /// add is kept untouched.
    pub fn add_node(
        &mut self,
        label: NodeLabel,
        key: impl Into<String>,
        source: SourceRef,
        attrs: AttrList,
    ) -> NodeId {
        let key = key.into();
        if let Some(&pos) = self.node_index.get(&(label, key.clone())) {
            let node = &mut self.nodes[pos];
            node.source = source;
            return node.id;
        }

        let node = Node {
            id: NodeId::fresh(),
            label,
            key: key.clone(),
            attrs,
            source,
        };
        let id = node.id;
        let pos = self.nodes.len();
        self.nodes.push(node);
        self.node_index.insert((label, key), pos);
        self.node_ids.insert(id, pos);
        id
    }

    /// Add an edge, or return the existing edge with the same
    /// (label, source, target) triple.
    ///
    /// Attributes of a duplicate add are discarded. Endpoints must already be
    /// graph nodes; an unknown endpoint is an invariant violation, not a
    /// silently dangling reference.
    pub fn add_edge(
        &mut self,
        label: EdgeLabel,
        source: NodeId,
        target: NodeId,
        attrs: AttrList,
    ) -> Result<EdgeId> {
        for endpoint in [source, target] {
            if !self.node_ids.contains_key(&endpoint) {
                return Err(Error::dangling_endpoint(endpoint.to_string())
                    .with_operation("graph::add_edge")
                    .with_context("label", label.as_str()));
            }
        }

        if let Some(&pos) = self.edge_index.get(&(label, source, target)) {
            return Ok(self.edges[pos].id);
        }

        let edge = Edge {
            id: EdgeId::fresh(),
            label,
            source,
            target,
            attrs,
        };
        let id = edge.id;
        let pos = self.edges.len();
        self.edges.push(edge);
        self.edge_index.insert((label, source, target), pos);
        Ok(id)
    }

    /// Replace a node's attribute list. The node's dedup identity
    /// (label, key) is unchanged; unknown ids are ignored.
    pub(crate) fn refresh_node_attrs(&mut self, id: NodeId, attrs: AttrList) {
        if let Some(&pos) = self.node_ids.get(&id) {
            self.nodes[pos].attrs = attrs;
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_ids.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn name_attr(name: &str) -> AttrList {
        vec![("Name".to_string(), AttrValue::from(name))]
    }

    #[test]
    fn test_add_node_dedups_on_label_and_key() {
        let mut graph = Graph::new();

        let first = graph.add_node(
            NodeLabel::Site,
            "Berlin",
            SourceRef::Entity("CN=Berlin".into()),
            name_attr("Berlin"),
        );
        let second = graph.add_node(
            NodeLabel::Site,
            "Berlin",
            SourceRef::Entity("CN=Berlin,CN=Sites".into()),
            name_attr("Berlin"),
        );

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
        // Backing reference tracks the most recent call.
        assert_eq!(
            graph.node(first).unwrap().source(),
            &SourceRef::Entity("CN=Berlin,CN=Sites".into())
        );
    }

    #[test]
    fn test_add_node_same_key_different_label() {
        let mut graph = Graph::new();

        graph.add_node(
            NodeLabel::Site,
            "Berlin",
            SourceRef::Entity("site".into()),
            name_attr("Berlin"),
        );
        graph.add_node(
            NodeLabel::Subnet,
            "Berlin",
            SourceRef::Entity("subnet".into()),
            name_attr("Berlin"),
        );

        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_node_keeps_first_attributes() {
        let mut graph = Graph::new();

        let id = graph.add_node(
            NodeLabel::Server,
            "dc01",
            SourceRef::Entity("dc01".into()),
            name_attr("dc01"),
        );
        graph.add_node(
            NodeLabel::Server,
            "dc01",
            SourceRef::Entity("dc01".into()),
            vec![
                ("Name".to_string(), AttrValue::from("dc01")),
                ("OSVersion".to_string(), AttrValue::from("10.0")),
            ],
        );

        // Attributes are not merged on a dedup hit.
        assert_eq!(graph.node(id).unwrap().attrs().len(), 1);
    }

    #[test]
    fn test_add_edge_dedups_on_triple() {
        let mut graph = Graph::new();
        let site = graph.add_node(
            NodeLabel::Site,
            "Berlin",
            SourceRef::Entity("site".into()),
            name_attr("Berlin"),
        );
        let forest = graph.add_node(
            NodeLabel::Forest,
            "contoso.com",
            SourceRef::Entity("forest".into()),
            name_attr("contoso.com"),
        );

        let first = graph
            .add_edge(
                EdgeLabel::LinkedTo,
                site,
                forest,
                vec![("Cost".to_string(), AttrValue::Int(100))],
            )
            .unwrap();
        let second = graph
            .add_edge(
                EdgeLabel::LinkedTo,
                site,
                forest,
                vec![("Cost".to_string(), AttrValue::Int(999))],
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.edge_count(), 1);
        // First write wins for edge attributes.
        assert_eq!(
            graph.edges()[0].attrs(),
            &[("Cost".to_string(), AttrValue::Int(100))]
        );
    }

    #[test]
    fn test_add_edge_direction_matters() {
        let mut graph = Graph::new();
        let a = graph.add_node(
            NodeLabel::Site,
            "a",
            SourceRef::Entity("a".into()),
            name_attr("a"),
        );
        let b = graph.add_node(
            NodeLabel::Site,
            "b",
            SourceRef::Entity("b".into()),
            name_attr("b"),
        );

        graph.add_edge(EdgeLabel::LinkedTo, a, b, Vec::new()).unwrap();
        graph.add_edge(EdgeLabel::LinkedTo, b, a, Vec::new()).unwrap();

        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoint() {
        let mut graph = Graph::new();
        let known = graph.add_node(
            NodeLabel::Forest,
            "contoso.com",
            SourceRef::Entity("forest".into()),
            name_attr("contoso.com"),
        );

        let mut other = Graph::new();
        let foreign = other.add_node(
            NodeLabel::Site,
            "Berlin",
            SourceRef::Entity("site".into()),
            name_attr("Berlin"),
        );

        let err = graph
            .add_edge(EdgeLabel::LinkedTo, foreign, known, Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), adtopo_error::ErrorKind::DanglingEndpoint);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut graph = Graph::new();
        for name in ["c", "a", "b"] {
            graph.add_node(
                NodeLabel::Subnet,
                name,
                SourceRef::Entity(name.into()),
                name_attr(name),
            );
        }

        let keys: Vec<&str> = graph.nodes().iter().map(|n| n.key()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_label_spellings() {
        assert_eq!(
            NodeLabel::ReplicationConnection.as_str(),
            "Replication Connection"
        );
        assert_eq!(EdgeLabel::PartOfForest.as_str(), "Part of Forest");
        assert_eq!(EdgeLabel::PdcRoleOwner.as_str(), "Pdc Role Owner");
        assert_eq!(EdgeLabel::Hosts.as_str(), "Hosts");
    }
}
