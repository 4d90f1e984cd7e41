//! Merging of repeated server observations into canonical servers.
//!
//! The same physical host surfaces through several directory roles
//! (bridgehead, domain controller, role owner, global catalog), and each role
//! may expose only a subset of populated fields. The [`ServerPool`] unifies
//! all observations of one host by name; [`CanonicalServer`] accessors pick
//! the first non-empty value per field, independently, so a host's name may
//! come from one role and its address from another.

use std::fmt;

use uuid::Uuid;

use adtopo_error::Result;

use crate::model::HostView;

/// Sentinel returned when no observation ever populated a field.
pub const UNKNOWN: &str = "UNKNOWN";

/// Opaque canonical-server identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerId(Uuid);

impl ServerId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw sighting of a server through some directory role.
///
/// Any field may be empty; the pool merges partial sightings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerObservation {
    pub name: String,
    pub os_version: String,
    pub ip_address: String,
}

impl ServerObservation {
    /// Read an observation off any directory host. A failed read aborts the
    /// whole build, per the fatal-error traversal contract.
    pub fn from_host(host: &dyn HostView) -> Result<Self> {
        Ok(Self {
            name: host.name()?,
            os_version: host.os_version()?,
            ip_address: host.ip_address()?,
        })
    }
}

/// The merged representation of one physical server.
#[derive(Debug, Clone)]
pub struct CanonicalServer {
    id: ServerId,
    observations: Vec<ServerObservation>,
}

impl CanonicalServer {
    fn new(first: ServerObservation) -> Self {
        Self {
            id: ServerId::fresh(),
            observations: vec![first],
        }
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    /// All contributing observations, in arrival order.
    pub fn observations(&self) -> &[ServerObservation] {
        &self.observations
    }

    pub fn name(&self) -> &str {
        self.first_non_empty(|obs| obs.name.as_str())
    }

    pub fn os_version(&self) -> &str {
        self.first_non_empty(|obs| obs.os_version.as_str())
    }

    pub fn ip_address(&self) -> &str {
        self.first_non_empty(|obs| obs.ip_address.as_str())
    }

    fn first_non_empty<'a>(&'a self, field: impl Fn(&'a ServerObservation) -> &'a str) -> &'a str {
        self.observations
            .iter()
            .map(field)
            .find(|value| !value.is_empty())
            .unwrap_or(UNKNOWN)
    }
}

/// Per-build registry of canonical servers, keyed by computed name.
///
/// One pool lives for exactly one traversal; a fresh build gets a fresh pool
/// so builds stay re-entrant.
#[derive(Debug, Default)]
pub struct ServerPool {
    servers: Vec<CanonicalServer>,
}

impl ServerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an observation into the canonical server whose computed name
    /// matches, registering a new canonical server on first sighting.
    ///
    /// The lookup compares against the computed name, so an observation
    /// literally named "UNKNOWN" merges with a canonical server none of whose
    /// observations carried a name.
    pub fn resolve(&mut self, observation: ServerObservation) -> ServerId {
        if let Some(server) = self
            .servers
            .iter_mut()
            .find(|server| server.name() == observation.name)
        {
            server.observations.push(observation);
            return server.id;
        }

        let server = CanonicalServer::new(observation);
        let id = server.id;
        self.servers.push(server);
        id
    }

    pub fn get(&self, id: ServerId) -> Option<&CanonicalServer> {
        self.servers.iter().find(|server| server.id == id)
    }

    pub fn servers(&self) -> &[CanonicalServer] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
