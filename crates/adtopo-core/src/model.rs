//! Read-only view traits over the external directory backend.
//!
//! The builder never talks to a directory service directly; it consumes these
//! capability traits, and a backend adapter (live LDAP, snapshot file, test
//! fixture) implements them. Every accessor returns `Result` because any
//! directory read can fail, and a failed read aborts the whole traversal.

use adtopo_error::Result;

/// A named directory host: anything that can fill a server role.
///
/// Each field may legitimately come back empty; partial sightings are merged
/// by the resolver.
pub trait HostView {
    fn name(&self) -> Result<String>;
    fn os_version(&self) -> Result<String>;
    fn ip_address(&self) -> Result<String>;
}

/// A directory server inside a site, with its replication surface.
pub trait ServerView: HostView {
    /// Names of inbound replication connections.
    fn inbound_connections(&self) -> Result<Vec<String>>;
    /// Names of outbound replication connections.
    fn outbound_connections(&self) -> Result<Vec<String>>;
    /// Names of the naming-context partitions this server hosts.
    fn partitions(&self) -> Result<Vec<String>>;
}

/// An inter-site link with its replication cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinkInfo {
    pub name: String,
    pub cost: i64,
}

/// A replication site.
pub trait SiteView {
    fn name(&self) -> Result<String>;
    fn site_links(&self) -> Result<Vec<SiteLinkInfo>>;
    fn subnets(&self) -> Result<Vec<String>>;
    fn bridgeheads(&self) -> Result<Vec<Box<dyn ServerView>>>;
    fn topology_generator(&self) -> Result<Option<Box<dyn ServerView>>>;
    fn servers(&self) -> Result<Vec<Box<dyn ServerView>>>;
}

/// A domain with its controllers and per-domain role owners.
pub trait DomainView {
    fn name(&self) -> Result<String>;
    fn domain_controllers(&self) -> Result<Vec<Box<dyn HostView>>>;
    fn infrastructure_role_owner(&self) -> Result<Box<dyn HostView>>;
    fn pdc_role_owner(&self) -> Result<Box<dyn HostView>>;
    fn rid_role_owner(&self) -> Result<Box<dyn HostView>>;
}

/// The forest root: the entry point of a traversal.
pub trait ForestView {
    fn name(&self) -> Result<String>;
    fn root_domain(&self) -> Result<String>;
    fn sites(&self) -> Result<Vec<Box<dyn SiteView>>>;
    fn domains(&self) -> Result<Vec<Box<dyn DomainView>>>;
    fn naming_role_owner(&self) -> Result<Box<dyn HostView>>;
    fn schema_role_owner(&self) -> Result<Box<dyn HostView>>;
    fn global_catalogs(&self) -> Result<Vec<Box<dyn HostView>>>;
}
