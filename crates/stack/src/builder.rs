//! Stack builder
//!
//! The [`Stack`] is the explicit deployment context: resources are declared
//! against it in dependency order, permission grants and outputs are attached
//! to it, and [`Stack::synthesize`] turns the whole graph into a deployment
//! template. Every declaring call validates eagerly; a stack that holds a
//! dangling reference, a duplicate id, or a naming collision never existed.

use crate::grants::GrantSet;
use crate::graph::{DependencyKind, Reference, ResourceGraph, ResourceNode, ResourceRecord};
use crate::template::{Template, TemplateOutput, TemplateResource};
use formwork_core::{Attribute, Error, LogicalId, Result, Value, TEMPLATE_FORMAT_VERSION};
use formwork_resources::{
    BucketRef, BucketSpec, ClusterRef, ClusterSpec, DatabaseRef, DatabaseSpec, NetworkRef,
    NetworkSpec, Permission, RegistryRef, RegistrySpec, ResourceKind, RoleRef, RoleSpec,
    ServiceRef, ServiceSpec, UserPoolClientRef, UserPoolClientSpec, UserPoolRef, UserPoolSpec,
};
use indexmap::IndexMap;
use std::collections::btree_map::Entry as GrantEntry;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// An in-progress deployment plan
///
/// Declaration order is binding: a descriptor can only reference resources
/// declared before it, which keeps the graph acyclic by construction.
#[derive(Debug, Clone)]
pub struct Stack {
    /// Stack name, carried into the template
    name: String,
    /// Declared resources and their reference edges
    graph: ResourceGraph,
    /// Permission grants keyed by grantee role
    grants: BTreeMap<LogicalId, GrantSet>,
    /// Declared outputs in declaration order
    outputs: IndexMap<String, Value>,
    /// Externally visible names already claimed, per kind
    claimed_names: HashMap<(ResourceKind, String), LogicalId>,
}

impl Stack {
    /// Create an empty stack
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: ResourceGraph::new(),
            grants: BTreeMap::new(),
            outputs: IndexMap::new(),
            claimed_names: HashMap::new(),
        }
    }

    /// Name of the stack
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared resources
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.graph.len()
    }

    /// The underlying resource graph
    #[must_use]
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Iterate declared resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = &ResourceNode> {
        self.graph.nodes()
    }

    /// Declared outputs in declaration order
    #[must_use]
    pub fn outputs(&self) -> &IndexMap<String, Value> {
        &self.outputs
    }

    /// Permissions granted to a role, if any
    #[must_use]
    pub fn grants_of(&self, role: &RoleRef) -> Option<&GrantSet> {
        self.grants.get(role.logical_id())
    }

    /// Declare an isolated virtual network
    pub fn add_network(&mut self, id: &str, spec: NetworkSpec) -> Result<NetworkRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Network(spec))?;
        Ok(NetworkRef::new(id))
    }

    /// Declare an object-storage bucket
    pub fn add_bucket(&mut self, id: &str, spec: BucketSpec) -> Result<BucketRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Bucket(spec))?;
        Ok(BucketRef::new(id))
    }

    /// Declare a managed database instance
    pub fn add_database(&mut self, id: &str, spec: DatabaseSpec) -> Result<DatabaseRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Database(spec))?;
        Ok(DatabaseRef::new(id))
    }

    /// Declare a container-image repository
    pub fn add_registry(&mut self, id: &str, spec: RegistrySpec) -> Result<RegistryRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Registry(spec))?;
        Ok(RegistryRef::new(id))
    }

    /// Declare a container-orchestration cluster
    pub fn add_cluster(&mut self, id: &str, spec: ClusterSpec) -> Result<ClusterRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Cluster(spec))?;
        Ok(ClusterRef::new(id))
    }

    /// Declare a workload execution role
    pub fn add_role(&mut self, id: &str, spec: RoleSpec) -> Result<RoleRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Role(spec))?;
        Ok(RoleRef::new(id))
    }

    /// Declare a load-balanced container service
    pub fn add_service(&mut self, id: &str, spec: ServiceSpec) -> Result<ServiceRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::Service(spec))?;
        Ok(ServiceRef::new(id))
    }

    /// Declare a user directory
    pub fn add_user_pool(&mut self, id: &str, spec: UserPoolSpec) -> Result<UserPoolRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::UserPool(spec))?;
        Ok(UserPoolRef::new(id))
    }

    /// Declare an application client of a user pool
    pub fn add_user_pool_client(
        &mut self,
        id: &str,
        spec: UserPoolClientSpec,
    ) -> Result<UserPoolClientRef> {
        let id = LogicalId::new(id)?;
        self.declare(id.clone(), ResourceRecord::UserPoolClient(spec))?;
        Ok(UserPoolClientRef::new(id))
    }

    /// Grant the role permissions on a declared bucket
    ///
    /// Grants are additive and idempotent.
    pub fn grant_bucket_access(
        &mut self,
        role: &RoleRef,
        bucket: &BucketRef,
        permissions: &[Permission],
    ) -> Result<()> {
        self.grant(role, bucket.logical_id(), ResourceKind::Bucket, permissions)
    }

    /// Grant the role permissions on a declared database
    ///
    /// Grants are additive and idempotent.
    pub fn grant_database_access(
        &mut self,
        role: &RoleRef,
        database: &DatabaseRef,
        permissions: &[Permission],
    ) -> Result<()> {
        self.grant(role, database.logical_id(), ResourceKind::Database, permissions)
    }

    /// Declare a named output
    ///
    /// Deferred values are validated against the graph; the engine resolves
    /// them after provisioning.
    pub fn add_output(&mut self, name: &str, value: Value) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_configuration(
                &self.name,
                "output names must not be empty",
            ));
        }
        if self.outputs.contains_key(name) {
            return Err(Error::duplicate_output(name));
        }
        if let Some(deferred) = value.as_deferred() {
            self.check_deferred(name, deferred.resource.clone(), deferred.attribute)?;
        }
        self.outputs.insert(name.to_string(), value);
        tracing::debug!(output = %name, "declared output");
        Ok(())
    }

    /// Re-run every structural check across the whole stack
    ///
    /// All of these checks already ran while the stack was built; running
    /// them again over the finished graph makes template emission atomic.
    pub fn validate(&self) -> Result<()> {
        // Step 1: per-resource configuration
        for node in self.graph.nodes() {
            node.record.validate(&node.id)?;
        }

        // Step 2: cross-resource references
        for node in self.graph.nodes() {
            for reference in node.record.references() {
                self.check_reference(&node.id, &reference)?;
            }
        }

        // Step 3: declaration order and acyclicity
        if !self.graph.dependencies_declared_first() {
            return Err(Error::invalid_configuration(
                &self.name,
                "resources must be declared before anything references them",
            ));
        }
        if self.graph.is_cyclic() {
            return Err(Error::invalid_configuration(
                &self.name,
                "dependency cycle detected in the resource graph",
            ));
        }

        // Step 4: grants point at declared resources with applicable permissions
        for (role, grants) in &self.grants {
            self.expect_declared(role, role, ResourceKind::Role)?;
            for (resource, permissions) in grants.iter() {
                let Some(kind) = self.graph.kind_of(resource) else {
                    return Err(Error::dangling_reference(
                        role.as_str(),
                        "resource",
                        resource.as_str(),
                    ));
                };
                let held: Vec<Permission> = permissions.iter().copied().collect();
                check_applicable(role, kind, resource, &held)?;
            }
        }

        // Step 5: outputs resolve
        for (name, value) in &self.outputs {
            if let Some(deferred) = value.as_deferred() {
                self.check_deferred(name, deferred.resource.clone(), deferred.attribute)?;
            }
        }

        Ok(())
    }

    /// Validate the stack and emit its deployment template
    pub fn synthesize(&self) -> Result<Template> {
        self.validate()?;

        let mut resources = IndexMap::new();
        for node in self.graph.nodes() {
            let mut properties = node.record.properties()?;
            if node.record.kind() == ResourceKind::Role {
                self.attach_policy(&node.id, &mut properties)?;
            }
            resources.insert(
                node.id.to_string(),
                TemplateResource {
                    kind: node.record.kind(),
                    properties,
                    depends_on: self.depends_on(node),
                    deletion_policy: node.record.removal_policy(),
                },
            );
        }

        let outputs = self
            .outputs
            .iter()
            .map(|(name, value)| (name.clone(), TemplateOutput { value: value.clone() }))
            .collect();

        tracing::info!(
            stack = %self.name,
            resources = self.graph.len(),
            outputs = self.outputs.len(),
            "synthesized deployment template"
        );

        Ok(Template {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            stack: self.name.clone(),
            resources,
            outputs,
        })
    }

    /// Run the common declaration pipeline for one resource
    fn declare(&mut self, id: LogicalId, record: ResourceRecord) -> Result<()> {
        // Step 1: unique logical id
        if self.graph.contains(&id) {
            return Err(Error::duplicate_logical_id(id.as_str()));
        }

        // Step 2: local configuration rules
        record.validate(&id)?;

        // Step 3: every reference resolves against earlier declarations
        let references = record.references();
        for reference in &references {
            self.check_reference(&id, reference)?;
        }

        // Step 4: externally visible names stay unique
        self.claim_name(&id, &record)?;

        // Step 5: store the node and its edges
        let kind = record.kind();
        self.graph.insert(id.clone(), record)?;
        for reference in &references {
            self.graph.connect(&id, reference.target(), reference.dependency())?;
        }

        tracing::debug!(resource = %id, kind = %kind, "declared resource");
        Ok(())
    }

    fn check_reference(&self, id: &LogicalId, reference: &Reference) -> Result<()> {
        match reference {
            Reference::Requires { target, expected } => {
                if self.graph.kind_of(target) != Some(*expected) {
                    return Err(Error::dangling_reference(
                        id.as_str(),
                        expected.as_str(),
                        target.as_str(),
                    ));
                }
            }
            Reference::Reads { target, attribute } => {
                self.check_deferred(id.as_str(), target.clone(), *attribute)?;
            }
        }
        Ok(())
    }

    /// Check that a deferred reference points at a declared resource that
    /// exposes the attribute
    fn check_deferred(&self, referrer: &str, target: LogicalId, attribute: Attribute) -> Result<()> {
        match self.graph.kind_of(&target) {
            None => Err(Error::dangling_reference(
                referrer,
                "resource",
                target.as_str(),
            )),
            Some(kind) if !kind.exposes(attribute) => Err(Error::unknown_attribute(
                target.as_str(),
                kind.as_str(),
                attribute.as_str(),
            )),
            Some(_) => Ok(()),
        }
    }

    fn claim_name(&mut self, id: &LogicalId, record: &ResourceRecord) -> Result<()> {
        let name = match record {
            ResourceRecord::Registry(spec) => spec.repository_name.clone(),
            ResourceRecord::UserPool(spec) => spec.pool_name.clone(),
            _ => return Ok(()),
        };
        let kind = record.kind();
        match self.claimed_names.entry((kind, name)) {
            Entry::Occupied(occupied) => Err(Error::name_collision(
                kind.as_str(),
                &occupied.key().1,
                occupied.get().as_str(),
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(id.clone());
                Ok(())
            }
        }
    }

    fn grant(
        &mut self,
        role: &RoleRef,
        target: &LogicalId,
        expected: ResourceKind,
        permissions: &[Permission],
    ) -> Result<()> {
        let role_id = role.logical_id();
        self.expect_declared(role_id, role_id, ResourceKind::Role)?;
        self.expect_declared(role_id, target, expected)?;
        if permissions.is_empty() {
            return Err(Error::invalid_configuration(
                role_id.as_str(),
                "a grant must name at least one permission",
            ));
        }
        check_applicable(role_id, expected, target, permissions)?;

        let newly_granted = match self.grants.entry(role_id.clone()) {
            GrantEntry::Occupied(mut occupied) => occupied.get_mut().grant(target, permissions),
            GrantEntry::Vacant(vacant) => vacant.insert(GrantSet::new()).grant(target, permissions),
        };
        if newly_granted {
            self.graph.connect(role_id, target, DependencyKind::Grant)?;
        }
        tracing::debug!(role = %role_id, resource = %target, "granted permissions");
        Ok(())
    }

    fn expect_declared(
        &self,
        referrer: &LogicalId,
        target: &LogicalId,
        expected: ResourceKind,
    ) -> Result<()> {
        if self.graph.kind_of(target) == Some(expected) {
            Ok(())
        } else {
            Err(Error::dangling_reference(
                referrer.as_str(),
                expected.as_str(),
                target.as_str(),
            ))
        }
    }

    /// Attach the role's policy statements to its template properties
    fn attach_policy(&self, role: &LogicalId, properties: &mut serde_json::Value) -> Result<()> {
        let Some(grants) = self.grants.get(role) else {
            return Ok(());
        };
        if grants.is_empty() {
            return Ok(());
        }
        if let serde_json::Value::Object(map) = properties {
            map.insert(
                "policy".to_string(),
                serde_json::to_value(grants.to_policy())?,
            );
        }
        Ok(())
    }

    /// Upstream logical ids of one resource, deduplicated, in declaration
    /// order
    fn depends_on(&self, node: &ResourceNode) -> Vec<LogicalId> {
        let mut targets: Vec<LogicalId> = Vec::new();
        for reference in node.record.references() {
            if !targets.contains(reference.target()) {
                targets.push(reference.target().clone());
            }
        }
        if let Some(grants) = self.grants.get(&node.id) {
            for (resource, permissions) in grants.iter() {
                if !permissions.is_empty() && !targets.contains(resource) {
                    targets.push(resource.clone());
                }
            }
        }
        targets.sort_by_key(|target| self.graph.declaration_index(target));
        targets
    }
}

/// Check that every permission in the set applies to the target kind
fn check_applicable(
    role: &LogicalId,
    kind: ResourceKind,
    target: &LogicalId,
    permissions: &[Permission],
) -> Result<()> {
    let allowed = kind.grantable();
    for permission in permissions {
        if !allowed.contains(permission) {
            return Err(Error::invalid_configuration(
                role.as_str(),
                format!("permission '{permission}' does not apply to {kind} '{target}'"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::{Attribute, RemovalPolicy};
    use formwork_resources::{
        Credentials, Engine, ImageSource, InstanceClass, InstanceSize, InstanceType,
        PostgresVersion, PublicAccess, ServicePrincipal, SignInAliases, StandardAttributes,
    };

    fn create_test_network() -> NetworkSpec {
        NetworkSpec { max_zones: 2 }
    }

    fn create_test_bucket() -> BucketSpec {
        BucketSpec {
            versioned: true,
            public_access: PublicAccess::BlockAll,
            auto_delete_objects: true,
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    fn create_test_database(network: &NetworkRef) -> DatabaseSpec {
        DatabaseSpec {
            engine: Engine::Postgres {
                version: PostgresVersion::V15_5,
            },
            instance: InstanceType::of(InstanceClass::BurstableT3, InstanceSize::Micro),
            allocated_storage_gib: 20,
            network: network.clone(),
            credentials: Credentials::GeneratedSecret {
                username: "postgres".to_string(),
            },
            multi_zone: false,
            publicly_accessible: false,
            deletion_protection: false,
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    fn create_test_registry(name: &str) -> RegistrySpec {
        RegistrySpec {
            repository_name: name.to_string(),
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    fn create_test_role() -> RoleSpec {
        RoleSpec {
            assumed_by: ServicePrincipal::new("container-tasks"),
        }
    }

    #[test]
    fn duplicate_logical_ids_are_rejected() {
        let mut stack = Stack::new("demo");
        stack.add_network("net", create_test_network()).unwrap();
        let err = stack.add_network("net", create_test_network()).unwrap_err();
        assert!(err.to_string().contains("already declared"));
    }

    #[test]
    fn database_requires_a_declared_network() {
        let mut stack = Stack::new("demo");
        let foreign = NetworkRef::new(LogicalId::new_unchecked("elsewhere"));
        let err = stack
            .add_database("db", create_test_database(&foreign))
            .unwrap_err();
        assert!(err.to_string().contains("undeclared network 'elsewhere'"));
        assert_eq!(stack.resource_count(), 0);
    }

    #[test]
    fn a_bucket_is_not_a_network() {
        let mut stack = Stack::new("demo");
        stack.add_bucket("files", create_test_bucket()).unwrap();
        let not_a_network = NetworkRef::new(LogicalId::new_unchecked("files"));
        let err = stack
            .add_database("db", create_test_database(&not_a_network))
            .unwrap_err();
        assert!(err.to_string().contains("undeclared network 'files'"));
    }

    #[test]
    fn repository_names_must_be_unique_per_kind() {
        let mut stack = Stack::new("demo");
        stack
            .add_registry("repo-a", create_test_registry("storage-app"))
            .unwrap();
        let err = stack
            .add_registry("repo-b", create_test_registry("storage-app"))
            .unwrap_err();
        assert!(err.to_string().contains("already claimed by resource 'repo-a'"));
    }

    #[test]
    fn grants_are_idempotent_and_additive() {
        let mut stack = Stack::new("demo");
        let bucket = stack.add_bucket("files", create_test_bucket()).unwrap();
        let role = stack.add_role("role", create_test_role()).unwrap();

        stack
            .grant_bucket_access(&role, &bucket, &Permission::READ_WRITE)
            .unwrap();
        stack
            .grant_bucket_access(&role, &bucket, &[Permission::Read])
            .unwrap();

        let grants = stack.grants_of(&role).unwrap();
        let held: Vec<Permission> = grants
            .permissions_on(bucket.logical_id())
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(held, vec![Permission::Read, Permission::Write]);

        let grant_edges = stack
            .graph()
            .edges()
            .filter(|(_, _, kind)| *kind == DependencyKind::Grant)
            .count();
        assert_eq!(grant_edges, 1);
    }

    #[test]
    fn connect_does_not_apply_to_buckets() {
        let mut stack = Stack::new("demo");
        let bucket = stack.add_bucket("files", create_test_bucket()).unwrap();
        let role = stack.add_role("role", create_test_role()).unwrap();
        let err = stack
            .grant_bucket_access(&role, &bucket, &[Permission::Connect])
            .unwrap_err();
        assert!(err.to_string().contains("'connect' does not apply to bucket"));
    }

    #[test]
    fn granting_to_a_foreign_role_is_a_dangling_reference() {
        let mut stack = Stack::new("demo");
        let bucket = stack.add_bucket("files", create_test_bucket()).unwrap();
        let foreign_role = RoleRef::new(LogicalId::new_unchecked("elsewhere"));
        let err = stack
            .grant_bucket_access(&foreign_role, &bucket, &[Permission::Read])
            .unwrap_err();
        assert!(err.to_string().contains("undeclared role"));
    }

    #[test]
    fn outputs_reject_duplicates_and_unknown_attributes() {
        let mut stack = Stack::new("demo");
        let bucket = stack.add_bucket("files", create_test_bucket()).unwrap();

        stack.add_output("BucketName", bucket.name()).unwrap();
        let err = stack.add_output("BucketName", bucket.name()).unwrap_err();
        assert!(err.to_string().contains("already declared"));

        let err = stack
            .add_output(
                "BadOutput",
                Value::deferred(bucket.logical_id().clone(), Attribute::PoolId),
            )
            .unwrap_err();
        assert!(err.to_string().contains("does not expose attribute 'pool_id'"));
    }

    #[test]
    fn output_referencing_an_undeclared_resource_is_rejected() {
        let mut stack = Stack::new("demo");
        let err = stack
            .add_output(
                "Orphan",
                Value::deferred(LogicalId::new_unchecked("ghost"), Attribute::Name),
            )
            .unwrap_err();
        assert!(err.to_string().contains("undeclared resource 'ghost'"));
    }

    #[test]
    fn service_environment_may_defer_to_upstream_attributes() {
        let mut stack = Stack::new("demo");
        let network = stack.add_network("net", create_test_network()).unwrap();
        let bucket = stack.add_bucket("files", create_test_bucket()).unwrap();
        let database = stack
            .add_database("db", create_test_database(&network))
            .unwrap();
        let registry = stack
            .add_registry("repo", create_test_registry("storage-app"))
            .unwrap();
        let cluster = stack
            .add_cluster("cluster", ClusterSpec { network })
            .unwrap();
        let role = stack.add_role("role", create_test_role()).unwrap();

        let mut environment = IndexMap::new();
        environment.insert("DATABASE_URL".to_string(), database.endpoint_address());
        environment.insert("S3_BUCKET".to_string(), bucket.name());
        let service = stack
            .add_service(
                "svc",
                ServiceSpec {
                    cluster,
                    image: ImageSource::Registry {
                        repository: registry,
                        tag: "latest".to_string(),
                    },
                    container_port: 3000,
                    task_role: role,
                    environment,
                    public_load_balancer: true,
                    desired_count: 1,
                },
            )
            .unwrap();

        let reads = stack
            .graph()
            .edges()
            .filter(|(from, _, kind)| {
                *from == service.logical_id() && *kind == DependencyKind::ReadsAttribute
            })
            .count();
        assert_eq!(reads, 2);
        assert!(stack.validate().is_ok());
    }

    #[test]
    fn user_pool_names_collide_independently_of_registries() {
        let mut stack = Stack::new("demo");
        stack
            .add_registry("repo", create_test_registry("storage-app"))
            .unwrap();
        // Same external name, different kind: no collision.
        stack
            .add_user_pool(
                "pool",
                UserPoolSpec {
                    pool_name: "storage-app".to_string(),
                    self_sign_up: true,
                    sign_in_aliases: SignInAliases {
                        email: true,
                        ..SignInAliases::default()
                    },
                    standard_attributes: StandardAttributes::default(),
                    removal_policy: RemovalPolicy::Destroy,
                },
            )
            .unwrap();
        assert_eq!(stack.resource_count(), 2);
    }
}
