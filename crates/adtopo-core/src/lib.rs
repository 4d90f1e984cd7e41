pub mod builder;
pub mod deadline;
pub mod graph;
pub mod model;
pub mod resolver;

#[cfg(test)]
pub(crate) mod tests;

pub use adtopo_error::{Error, ErrorKind, ErrorStatus, Result};
pub use builder::TopologyBuilder;
pub use deadline::TraversalDeadline;
pub use graph::{
    AttrList, AttrValue, Edge, EdgeId, EdgeLabel, Graph, Node, NodeId, NodeLabel, SourceRef,
};
pub use model::{DomainView, ForestView, HostView, ServerView, SiteLinkInfo, SiteView};
pub use resolver::{CanonicalServer, ServerId, ServerObservation, ServerPool, UNKNOWN};
