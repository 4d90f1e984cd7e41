//! The fixed traversal that turns a directory forest into a graph.
//!
//! The traversal order is deterministic: forest, then each site with its
//! links, subnets and servers, then domains with their controllers and role
//! owners, then the forest-level role owners and global catalogs. Earlier
//! steps create the nodes later steps merge into via the graph store and
//! server pool dedup keys; beyond that the order carries no meaning.
//!
//! Any backend read failure aborts the whole build. No partial graph is ever
//! returned.

use std::time::Duration;

use tracing::{debug, info};

use adtopo_error::Result;

use crate::deadline::TraversalDeadline;
use crate::graph::{AttrList, AttrValue, EdgeLabel, Graph, NodeId, NodeLabel, SourceRef};
use crate::model::{DomainView, ForestView, HostView, ServerView, SiteView};
use crate::resolver::{CanonicalServer, ServerId, ServerObservation, ServerPool};

/// Builds one graph from one forest. Holds the graph, the server pool and
/// the traversal deadline for exactly one invocation.
pub struct TopologyBuilder {
    graph: Graph,
    pool: ServerPool,
    deadline: TraversalDeadline,
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            pool: ServerPool::new(),
            deadline: TraversalDeadline::unbounded(),
        }
    }

    /// Abort the traversal with a Timeout error once `budget` is spent.
    pub fn with_deadline(budget: Duration) -> Self {
        Self {
            graph: Graph::new(),
            pool: ServerPool::new(),
            deadline: TraversalDeadline::new(budget),
        }
    }

    /// Run the full traversal and return the populated graph.
    pub fn build(mut self, forest: &dyn ForestView) -> Result<Graph> {
        let forest_name = forest.name()?;
        info!(forest = %forest_name, "building topology graph");

        let forest_node = self.graph.add_node(
            NodeLabel::Forest,
            forest_name.clone(),
            SourceRef::Entity(forest_name.clone()),
            vec![("Name".to_string(), AttrValue::from(forest_name.clone()))],
        );

        for site in forest.sites()? {
            self.deadline.check("site")?;
            self.add_site(site.as_ref(), forest_node)?;
        }

        {
            let root_domain = forest.root_domain()?;
            let domain_node = self.graph.add_node(
                NodeLabel::Domain,
                root_domain.clone(),
                SourceRef::Entity(root_domain.clone()),
                vec![("Name".to_string(), AttrValue::from(root_domain))],
            );
            self.graph
                .add_edge(EdgeLabel::RootDomain, forest_node, domain_node, Vec::new())?;
        }

        for domain in forest.domains()? {
            self.deadline.check("domain")?;
            self.add_domain(domain.as_ref(), forest_node)?;
        }

        self.deadline.check("role owners")?;
        let naming_owner = self.add_server_node(forest.naming_role_owner()?.as_ref())?;
        self.graph
            .add_edge(EdgeLabel::NamingRoleOwner, forest_node, naming_owner, Vec::new())?;

        let schema_owner = self.add_server_node(forest.schema_role_owner()?.as_ref())?;
        self.graph
            .add_edge(EdgeLabel::SchemaRoleOwner, forest_node, schema_owner, Vec::new())?;

        for catalog in forest.global_catalogs()? {
            self.deadline.check("global catalogs")?;
            let server_node = self.add_server_node(catalog.as_ref())?;
            self.graph
                .add_edge(EdgeLabel::GlobalCatalog, forest_node, server_node, Vec::new())?;
        }

        self.refresh_server_nodes();

        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            servers = self.pool.len(),
            elapsed_secs = self.deadline.elapsed().as_secs_f64(),
            "topology graph complete"
        );
        Ok(self.graph)
    }

    fn add_site(&mut self, site: &dyn SiteView, forest_node: NodeId) -> Result<()> {
        let site_name = site.name()?;
        debug!(site = %site_name, "adding site");

        let site_node = self.graph.add_node(
            NodeLabel::Site,
            site_name.clone(),
            SourceRef::Entity(site_name.clone()),
            vec![("Name".to_string(), AttrValue::from(site_name))],
        );
        self.graph
            .add_edge(EdgeLabel::LinkedTo, site_node, forest_node, Vec::new())?;

        for link in site.site_links()? {
            let link_node = self.graph.add_node(
                NodeLabel::SiteLink,
                link.name.clone(),
                SourceRef::Entity(link.name.clone()),
                vec![("Name".to_string(), AttrValue::from(link.name))],
            );
            self.graph.add_edge(
                EdgeLabel::SiteLink,
                site_node,
                link_node,
                vec![("Cost".to_string(), AttrValue::Int(link.cost))],
            )?;
        }

        for subnet in site.subnets()? {
            let subnet_node = self.graph.add_node(
                NodeLabel::Subnet,
                subnet.clone(),
                SourceRef::Entity(subnet.clone()),
                vec![("Name".to_string(), AttrValue::from(subnet))],
            );
            self.graph
                .add_edge(EdgeLabel::LinkedTo, subnet_node, site_node, Vec::new())?;
        }

        for bridgehead in site.bridgeheads()? {
            let server_node = self.add_server_node(bridgehead.as_ref())?;
            self.graph
                .add_edge(EdgeLabel::BridgeheadServer, server_node, site_node, Vec::new())?;
        }

        if let Some(generator) = site.topology_generator()? {
            let server_node = self.add_server_node(generator.as_ref())?;
            self.graph.add_edge(
                EdgeLabel::InterSiteTopologyGenerator,
                site_node,
                server_node,
                Vec::new(),
            )?;
        }

        for server in site.servers()? {
            let server_node = self.add_server_node(server.as_ref())?;
            self.graph
                .add_edge(EdgeLabel::DirectoryServer, server_node, site_node, Vec::new())?;
            self.add_replication(server.as_ref(), server_node)?;
        }

        Ok(())
    }

    fn add_replication(&mut self, server: &dyn ServerView, server_node: NodeId) -> Result<()> {
        for connection in server.inbound_connections()? {
            let connection_node = self.add_connection_node(connection);
            self.graph.add_edge(
                EdgeLabel::InboundConnection,
                connection_node,
                server_node,
                Vec::new(),
            )?;
        }

        for connection in server.outbound_connections()? {
            let connection_node = self.add_connection_node(connection);
            self.graph.add_edge(
                EdgeLabel::OutboundConnection,
                server_node,
                connection_node,
                Vec::new(),
            )?;
        }

        for partition in server.partitions()? {
            let partition_node = self.graph.add_node(
                NodeLabel::Partition,
                partition.clone(),
                SourceRef::Entity(partition.clone()),
                vec![("Name".to_string(), AttrValue::from(partition))],
            );
            self.graph
                .add_edge(EdgeLabel::Hosts, server_node, partition_node, Vec::new())?;
        }

        Ok(())
    }

    fn add_connection_node(&mut self, name: String) -> NodeId {
        self.graph.add_node(
            NodeLabel::ReplicationConnection,
            name.clone(),
            SourceRef::Entity(name.clone()),
            vec![("Name".to_string(), AttrValue::from(name))],
        )
    }

    fn add_domain(&mut self, domain: &dyn DomainView, forest_node: NodeId) -> Result<()> {
        let domain_name = domain.name()?;
        debug!(domain = %domain_name, "adding domain");

        let domain_node = self.graph.add_node(
            NodeLabel::Domain,
            domain_name.clone(),
            SourceRef::Entity(domain_name.clone()),
            vec![("Name".to_string(), AttrValue::from(domain_name))],
        );
        self.graph
            .add_edge(EdgeLabel::PartOfForest, domain_node, forest_node, Vec::new())?;

        for controller in domain.domain_controllers()? {
            let server_node = self.add_server_node(controller.as_ref())?;
            self.graph
                .add_edge(EdgeLabel::DomainController, domain_node, server_node, Vec::new())?;
        }

        for (label, owner) in [
            (
                EdgeLabel::InfrastructureRoleOwner,
                domain.infrastructure_role_owner()?,
            ),
            (EdgeLabel::PdcRoleOwner, domain.pdc_role_owner()?),
            (EdgeLabel::RidRoleOwner, domain.rid_role_owner()?),
        ] {
            let server_node = self.add_server_node(owner.as_ref())?;
            self.graph
                .add_edge(label, domain_node, server_node, Vec::new())?;
        }

        Ok(())
    }

    /// Resolve a host through the pool and add (or reuse) its Server node.
    ///
    /// The node's dedup key is the canonical computed name, so every role a
    /// host fills lands on the same node. The backing reference tracks the
    /// canonical server; attributes are rewritten from the canonical
    /// accessors once the traversal completes, so fields a later sighting
    /// contributed reach the output.
    fn add_server_node(&mut self, host: &dyn HostView) -> Result<NodeId> {
        let observation = ServerObservation::from_host(host)?;
        let server_id = self.pool.resolve(observation);
        let server = self
            .pool
            .get(server_id)
            .ok_or_else(|| adtopo_error::Error::unexpected("server pool lost a resolved id"))?;

        let attrs = server_attrs(server);
        let key = server.name().to_string();

        Ok(self
            .graph
            .add_node(NodeLabel::Server, key, SourceRef::Server(server_id), attrs))
    }

    /// Rewrite every Server node's attributes from its canonical record.
    ///
    /// Runs once, after the traversal: a node is created at its host's first
    /// sighting, and observations arriving after that may fill fields the
    /// first sighting left empty.
    fn refresh_server_nodes(&mut self) {
        let server_nodes: Vec<(NodeId, ServerId)> = self
            .graph
            .nodes()
            .iter()
            .filter_map(|node| match node.source() {
                SourceRef::Server(server_id) => Some((node.id(), *server_id)),
                SourceRef::Entity(_) => None,
            })
            .collect();

        for (node_id, server_id) in server_nodes {
            if let Some(server) = self.pool.get(server_id) {
                let attrs = server_attrs(server);
                self.graph.refresh_node_attrs(node_id, attrs);
            }
        }
    }
}

fn server_attrs(server: &CanonicalServer) -> AttrList {
    vec![
        ("Name".to_string(), AttrValue::from(server.name())),
        ("OSVersion".to_string(), AttrValue::from(server.os_version())),
        ("IPAddress".to_string(), AttrValue::from(server.ip_address())),
    ]
}
