//! Petgraph-backed resource dependency graph
//!
//! Nodes are declared resources, edges record why one resource points at
//! another. Node indices grow in declaration order and nothing is ever
//! removed, so index order doubles as declaration order.

use formwork_core::{Attribute, Error, LogicalId, RemovalPolicy, Result};
use formwork_resources::{
    BucketSpec, ClusterSpec, DatabaseSpec, ImageSource, NetworkSpec, RegistrySpec, ResourceKind,
    RoleSpec, ServiceSpec, UserPoolClientSpec, UserPoolSpec,
};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{algo, dot::Dot};
use std::collections::HashMap;
use std::fmt;

/// Why one resource points at another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Structural containment or composition
    DependsOn,
    /// A deferred read of the target's post-provisioning attribute
    ReadsAttribute,
    /// A permission grant against the target
    Grant,
}

impl DependencyKind {
    /// Get the edge label as it appears in graph listings
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::DependsOn => "depends_on",
            DependencyKind::ReadsAttribute => "reads_attribute",
            DependencyKind::Grant => "grant",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed cross-resource reference held by a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Structural dependency on a resource of a known kind
    Requires {
        target: LogicalId,
        expected: ResourceKind,
    },
    /// Deferred read of an attribute the target must expose
    Reads {
        target: LogicalId,
        attribute: Attribute,
    },
}

impl Reference {
    /// Structural reference to a previously declared resource
    #[must_use]
    pub fn requires(target: &LogicalId, expected: ResourceKind) -> Self {
        Reference::Requires {
            target: target.clone(),
            expected,
        }
    }

    /// Attribute read against a previously declared resource
    #[must_use]
    pub fn reads(target: &LogicalId, attribute: Attribute) -> Self {
        Reference::Reads {
            target: target.clone(),
            attribute,
        }
    }

    /// Logical id the reference points at
    #[must_use]
    pub fn target(&self) -> &LogicalId {
        match self {
            Reference::Requires { target, .. } | Reference::Reads { target, .. } => target,
        }
    }

    /// Edge kind this reference contributes to the graph
    #[must_use]
    pub fn dependency(&self) -> DependencyKind {
        match self {
            Reference::Requires { .. } => DependencyKind::DependsOn,
            Reference::Reads { .. } => DependencyKind::ReadsAttribute,
        }
    }
}

/// A declared resource and its configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRecord {
    Network(NetworkSpec),
    Bucket(BucketSpec),
    Database(DatabaseSpec),
    Registry(RegistrySpec),
    Cluster(ClusterSpec),
    Role(RoleSpec),
    Service(ServiceSpec),
    UserPool(UserPoolSpec),
    UserPoolClient(UserPoolClientSpec),
}

impl ResourceRecord {
    /// Kind of the recorded resource
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRecord::Network(_) => ResourceKind::Network,
            ResourceRecord::Bucket(_) => ResourceKind::Bucket,
            ResourceRecord::Database(_) => ResourceKind::Database,
            ResourceRecord::Registry(_) => ResourceKind::Registry,
            ResourceRecord::Cluster(_) => ResourceKind::Cluster,
            ResourceRecord::Role(_) => ResourceKind::Role,
            ResourceRecord::Service(_) => ResourceKind::Service,
            ResourceRecord::UserPool(_) => ResourceKind::UserPool,
            ResourceRecord::UserPoolClient(_) => ResourceKind::UserPoolClient,
        }
    }

    /// Teardown policy of the recorded resource
    ///
    /// Kinds without an explicit policy field share the stack's lifecycle.
    #[must_use]
    pub fn removal_policy(&self) -> RemovalPolicy {
        match self {
            ResourceRecord::Bucket(spec) => spec.removal_policy,
            ResourceRecord::Database(spec) => spec.removal_policy,
            ResourceRecord::Registry(spec) => spec.removal_policy,
            ResourceRecord::UserPool(spec) => spec.removal_policy,
            ResourceRecord::Network(_)
            | ResourceRecord::Cluster(_)
            | ResourceRecord::Role(_)
            | ResourceRecord::Service(_)
            | ResourceRecord::UserPoolClient(_) => RemovalPolicy::default(),
        }
    }

    /// Check the locally verifiable configuration rules of the descriptor
    pub fn validate(&self, id: &LogicalId) -> Result<()> {
        match self {
            ResourceRecord::Network(spec) => spec.validate(id),
            ResourceRecord::Bucket(spec) => spec.validate(id),
            ResourceRecord::Database(spec) => spec.validate(id),
            ResourceRecord::Registry(spec) => spec.validate(id),
            ResourceRecord::Cluster(spec) => spec.validate(id),
            ResourceRecord::Role(spec) => spec.validate(id),
            ResourceRecord::Service(spec) => spec.validate(id),
            ResourceRecord::UserPool(spec) => spec.validate(id),
            ResourceRecord::UserPoolClient(spec) => spec.validate(id),
        }
    }

    /// Serialize the descriptor into template properties
    pub fn properties(&self) -> Result<serde_json::Value> {
        let value = match self {
            ResourceRecord::Network(spec) => serde_json::to_value(spec),
            ResourceRecord::Bucket(spec) => serde_json::to_value(spec),
            ResourceRecord::Database(spec) => serde_json::to_value(spec),
            ResourceRecord::Registry(spec) => serde_json::to_value(spec),
            ResourceRecord::Cluster(spec) => serde_json::to_value(spec),
            ResourceRecord::Role(spec) => serde_json::to_value(spec),
            ResourceRecord::Service(spec) => serde_json::to_value(spec),
            ResourceRecord::UserPool(spec) => serde_json::to_value(spec),
            ResourceRecord::UserPoolClient(spec) => serde_json::to_value(spec),
        }?;
        Ok(value)
    }

    /// Every cross-resource reference the descriptor holds, in field order
    #[must_use]
    pub fn references(&self) -> Vec<Reference> {
        match self {
            ResourceRecord::Network(_)
            | ResourceRecord::Bucket(_)
            | ResourceRecord::Registry(_)
            | ResourceRecord::Role(_)
            | ResourceRecord::UserPool(_) => Vec::new(),
            ResourceRecord::Database(spec) => {
                vec![Reference::requires(spec.network.logical_id(), ResourceKind::Network)]
            }
            ResourceRecord::Cluster(spec) => {
                vec![Reference::requires(spec.network.logical_id(), ResourceKind::Network)]
            }
            ResourceRecord::Service(spec) => {
                let ImageSource::Registry { repository, .. } = &spec.image;
                let mut references = vec![
                    Reference::requires(spec.cluster.logical_id(), ResourceKind::Cluster),
                    Reference::requires(repository.logical_id(), ResourceKind::Registry),
                    Reference::requires(spec.task_role.logical_id(), ResourceKind::Role),
                ];
                for value in spec.environment.values() {
                    if let Some(deferred) = value.as_deferred() {
                        references.push(Reference::reads(&deferred.resource, deferred.attribute));
                    }
                }
                references
            }
            ResourceRecord::UserPoolClient(spec) => {
                vec![Reference::requires(spec.user_pool.logical_id(), ResourceKind::UserPool)]
            }
        }
    }
}

/// A named resource stored in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    /// Stack-unique logical id
    pub id: LogicalId,
    /// The declared configuration
    pub record: ResourceRecord,
}

impl fmt::Display for ResourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.record.kind())
    }
}

/// The resource dependency graph of one stack
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    /// The directed graph; edges point from dependent to dependency
    graph: DiGraph<ResourceNode, DependencyKind>,
    /// Map from logical id to graph node index
    index: HashMap<LogicalId, NodeIndex>,
}

impl ResourceGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared resources
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check whether no resources are declared yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check whether a logical id is declared
    #[must_use]
    pub fn contains(&self, id: &LogicalId) -> bool {
        self.index.contains_key(id)
    }

    /// Kind of a declared resource, if it exists
    #[must_use]
    pub fn kind_of(&self, id: &LogicalId) -> Option<ResourceKind> {
        self.index.get(id).map(|&idx| self.graph[idx].record.kind())
    }

    /// Look up a declared resource
    #[must_use]
    pub fn get(&self, id: &LogicalId) -> Option<&ResourceNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Zero-based declaration position of a resource, if it exists
    #[must_use]
    pub fn declaration_index(&self, id: &LogicalId) -> Option<usize> {
        self.index.get(id).map(|idx| idx.index())
    }

    /// Add a resource node
    pub fn insert(&mut self, id: LogicalId, record: ResourceRecord) -> Result<()> {
        if self.contains(&id) {
            return Err(Error::duplicate_logical_id(id.as_str()));
        }
        let node = ResourceNode {
            id: id.clone(),
            record,
        };
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(())
    }

    /// Add an edge from a dependent resource to its dependency
    ///
    /// Both ends must already be inserted. Repeating an identical edge is a
    /// no-op.
    pub fn connect(&mut self, from: &LogicalId, to: &LogicalId, kind: DependencyKind) -> Result<()> {
        let (Some(&source), Some(&target)) = (self.index.get(from), self.index.get(to)) else {
            return Err(Error::dangling_reference(from.as_str(), "resource", to.as_str()));
        };
        let already_present = self
            .graph
            .edges_connecting(source, target)
            .any(|edge| *edge.weight() == kind);
        if !already_present {
            self.graph.add_edge(source, target, kind);
        }
        Ok(())
    }

    /// Iterate resources in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Iterate edges as (dependent, dependency, kind) triples
    pub fn edges(&self) -> impl Iterator<Item = (&LogicalId, &LogicalId, DependencyKind)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()].id,
                &self.graph[edge.target()].id,
                *edge.weight(),
            )
        })
    }

    /// Check that every reference edge points at an earlier declaration
    ///
    /// Grant edges are exempt: a grant is applied after both ends exist, so
    /// declaration order between them carries no meaning.
    #[must_use]
    pub fn dependencies_declared_first(&self) -> bool {
        self.graph.edge_references().all(|edge| {
            *edge.weight() == DependencyKind::Grant
                || edge.target().index() < edge.source().index()
        })
    }

    /// Check whether the graph contains a dependency cycle
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// Render the graph in DOT format
    #[must_use]
    pub fn to_dot(&self) -> String {
        Dot::new(&self.graph).to_string()
    }
}
