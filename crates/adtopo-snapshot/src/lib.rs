//! JSON snapshot backend for adtopo.
//!
//! A snapshot is a point-in-time JSON capture of a forest, deserialized with
//! serde and exposed to the builder through the `adtopo-core` view traits.
//! It stands in for the live directory backend: the traversal cannot tell
//! the difference, and tests and offline runs use it as the data source.
//!
//! Missing `os_version`/`ip_address` fields default to empty strings, which
//! the resolver treats as an unpopulated sighting.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use adtopo_core::model::{DomainView, ForestView, HostView, ServerView, SiteLinkInfo, SiteView};
use adtopo_error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostSnapshot {
    pub name: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSnapshot {
    #[serde(flatten)]
    pub host: HostSnapshot,
    #[serde(default)]
    pub inbound_connections: Vec<String>,
    #[serde(default)]
    pub outbound_connections: Vec<String>,
    #[serde(default)]
    pub partitions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteLinkSnapshot {
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSnapshot {
    pub name: String,
    #[serde(default)]
    pub site_links: Vec<SiteLinkSnapshot>,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub bridgeheads: Vec<ServerSnapshot>,
    #[serde(default)]
    pub topology_generator: Option<ServerSnapshot>,
    #[serde(default)]
    pub servers: Vec<ServerSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainSnapshot {
    pub name: String,
    #[serde(default)]
    pub domain_controllers: Vec<HostSnapshot>,
    pub infrastructure_role_owner: HostSnapshot,
    pub pdc_role_owner: HostSnapshot,
    pub rid_role_owner: HostSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestSnapshot {
    pub name: String,
    pub root_domain: String,
    #[serde(default)]
    pub sites: Vec<SiteSnapshot>,
    #[serde(default)]
    pub domains: Vec<DomainSnapshot>,
    pub naming_role_owner: HostSnapshot,
    pub schema_role_owner: HostSnapshot,
    #[serde(default)]
    pub global_catalogs: Vec<HostSnapshot>,
}

impl ForestSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("snapshot::from_path")
                .with_context("path", path.display().to_string())
        })?;
        let snapshot = Self::from_json(&content)
            .map_err(|err| err.with_context("path", path.display().to_string()))?;
        info!(
            path = %path.display(),
            sites = snapshot.sites.len(),
            domains = snapshot.domains.len(),
            "loaded forest snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| {
            Error::new(ErrorKind::DeserializationFailed, "invalid forest snapshot")
                .with_operation("snapshot::from_json")
                .set_source(err)
        })
    }
}

impl HostView for HostSnapshot {
    fn name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn os_version(&self) -> Result<String> {
        Ok(self.os_version.clone())
    }

    fn ip_address(&self) -> Result<String> {
        Ok(self.ip_address.clone())
    }
}

impl HostView for ServerSnapshot {
    fn name(&self) -> Result<String> {
        self.host.name()
    }

    fn os_version(&self) -> Result<String> {
        self.host.os_version()
    }

    fn ip_address(&self) -> Result<String> {
        self.host.ip_address()
    }
}

impl ServerView for ServerSnapshot {
    fn inbound_connections(&self) -> Result<Vec<String>> {
        Ok(self.inbound_connections.clone())
    }

    fn outbound_connections(&self) -> Result<Vec<String>> {
        Ok(self.outbound_connections.clone())
    }

    fn partitions(&self) -> Result<Vec<String>> {
        Ok(self.partitions.clone())
    }
}

impl SiteView for SiteSnapshot {
    fn name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn site_links(&self) -> Result<Vec<SiteLinkInfo>> {
        Ok(self
            .site_links
            .iter()
            .map(|link| SiteLinkInfo {
                name: link.name.clone(),
                cost: link.cost,
            })
            .collect())
    }

    fn subnets(&self) -> Result<Vec<String>> {
        Ok(self.subnets.clone())
    }

    fn bridgeheads(&self) -> Result<Vec<Box<dyn ServerView>>> {
        Ok(boxed_servers(&self.bridgeheads))
    }

    fn topology_generator(&self) -> Result<Option<Box<dyn ServerView>>> {
        Ok(self
            .topology_generator
            .clone()
            .map(|server| Box::new(server) as Box<dyn ServerView>))
    }

    fn servers(&self) -> Result<Vec<Box<dyn ServerView>>> {
        Ok(boxed_servers(&self.servers))
    }
}

impl DomainView for DomainSnapshot {
    fn name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn domain_controllers(&self) -> Result<Vec<Box<dyn HostView>>> {
        Ok(boxed_hosts(&self.domain_controllers))
    }

    fn infrastructure_role_owner(&self) -> Result<Box<dyn HostView>> {
        Ok(Box::new(self.infrastructure_role_owner.clone()))
    }

    fn pdc_role_owner(&self) -> Result<Box<dyn HostView>> {
        Ok(Box::new(self.pdc_role_owner.clone()))
    }

    fn rid_role_owner(&self) -> Result<Box<dyn HostView>> {
        Ok(Box::new(self.rid_role_owner.clone()))
    }
}

impl ForestView for ForestSnapshot {
    fn name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn root_domain(&self) -> Result<String> {
        Ok(self.root_domain.clone())
    }

    fn sites(&self) -> Result<Vec<Box<dyn SiteView>>> {
        Ok(self
            .sites
            .iter()
            .cloned()
            .map(|site| Box::new(site) as Box<dyn SiteView>)
            .collect())
    }

    fn domains(&self) -> Result<Vec<Box<dyn DomainView>>> {
        Ok(self
            .domains
            .iter()
            .cloned()
            .map(|domain| Box::new(domain) as Box<dyn DomainView>)
            .collect())
    }

    fn naming_role_owner(&self) -> Result<Box<dyn HostView>> {
        Ok(Box::new(self.naming_role_owner.clone()))
    }

    fn schema_role_owner(&self) -> Result<Box<dyn HostView>> {
        Ok(Box::new(self.schema_role_owner.clone()))
    }

    fn global_catalogs(&self) -> Result<Vec<Box<dyn HostView>>> {
        Ok(boxed_hosts(&self.global_catalogs))
    }
}

fn boxed_hosts(hosts: &[HostSnapshot]) -> Vec<Box<dyn HostView>> {
    hosts
        .iter()
        .cloned()
        .map(|host| Box::new(host) as Box<dyn HostView>)
        .collect()
}

fn boxed_servers(servers: &[ServerSnapshot]) -> Vec<Box<dyn ServerView>> {
    servers
        .iter()
        .cloned()
        .map(|server| Box::new(server) as Box<dyn ServerView>)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMAL: &str = r#"{
        "name": "contoso.com",
        "root_domain": "contoso.com",
        "naming_role_owner": { "name": "dc01" },
        "schema_role_owner": { "name": "dc01" }
    }"#;

    #[test]
    fn test_minimal_snapshot_parses() {
        let snapshot = ForestSnapshot::from_json(MINIMAL).unwrap();
        assert_eq!(snapshot.name, "contoso.com");
        assert!(snapshot.sites.is_empty());
        assert_eq!(snapshot.naming_role_owner.os_version, "");
    }

    #[test]
    fn test_full_snapshot_parses() {
        let snapshot = ForestSnapshot::from_json(
            r#"{
                "name": "contoso.com",
                "root_domain": "contoso.com",
                "sites": [{
                    "name": "Berlin",
                    "site_links": [{ "name": "Berlin-Paris", "cost": 250 }],
                    "subnets": ["10.1.0.0/16"],
                    "bridgeheads": [{ "name": "dc01" }],
                    "topology_generator": { "name": "dc01" },
                    "servers": [{
                        "name": "dc01",
                        "os_version": "10.0.20348",
                        "ip_address": "10.1.0.4",
                        "inbound_connections": ["repl-in"],
                        "outbound_connections": ["repl-out"],
                        "partitions": ["CN=Configuration"]
                    }]
                }],
                "domains": [{
                    "name": "contoso.com",
                    "domain_controllers": [{ "name": "dc01" }],
                    "infrastructure_role_owner": { "name": "dc01" },
                    "pdc_role_owner": { "name": "dc01" },
                    "rid_role_owner": { "name": "dc01" }
                }],
                "naming_role_owner": { "name": "dc01" },
                "schema_role_owner": { "name": "dc01" },
                "global_catalogs": [{ "name": "dc01" }]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.sites.len(), 1);
        assert_eq!(snapshot.sites[0].site_links[0].cost, 250);
        assert_eq!(snapshot.sites[0].servers[0].host.ip_address, "10.1.0.4");
        assert_eq!(snapshot.domains.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_deserialization_error() {
        let err = ForestSnapshot::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = ForestSnapshot::from_path("/nonexistent/forest.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_from_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.json");
        std::fs::write(&path, MINIMAL).unwrap();

        let snapshot = ForestSnapshot::from_path(&path).unwrap();
        assert_eq!(snapshot.root_domain, "contoso.com");
    }
}
