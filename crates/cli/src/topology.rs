//! The storage application topology
//!
//! Builds the fixed deployment the `formwork` binary synthesizes: an isolated
//! network carrying a private Postgres instance and a container cluster, a
//! versioned private bucket, an image registry, a task role granted access to
//! the bucket and the database, a public load-balanced service, and a user
//! pool with one public client. Declaration order below is dependency order.

use formwork_core::{
    RemovalPolicy, Result, DEFAULT_CONTAINER_PORT, ENV_DATABASE_URL, ENV_S3_BUCKET,
    OUTPUT_BUCKET_NAME, OUTPUT_DATABASE_ENDPOINT, OUTPUT_LOAD_BALANCER_URL, OUTPUT_USER_POOL_ID,
};
use formwork_resources::{
    AttributeConstraint, BucketSpec, ClusterSpec, Credentials, DatabaseSpec, Engine, ImageSource,
    InstanceClass, InstanceSize, InstanceType, NetworkSpec, Permission, PostgresVersion,
    PublicAccess, RegistrySpec, RoleSpec, ServicePrincipal, ServiceSpec, SignInAliases,
    StandardAttributes, UserPoolClientSpec, UserPoolSpec,
};
use formwork_stack::Stack;
use indexmap::IndexMap;

/// Stack name carried into the emitted template
pub const STACK_NAME: &str = "storage-app";

/// Assemble the storage application stack
pub fn storage_app() -> Result<Stack> {
    let mut stack = Stack::new(STACK_NAME);

    // Network fabric everything else runs in
    let network = stack.add_network("StorageAppVPC", NetworkSpec { max_zones: 2 })?;

    // Durable state: the file bucket and the relational database
    let bucket = stack.add_bucket(
        "StorageFilesBucket",
        BucketSpec {
            versioned: true,
            public_access: PublicAccess::BlockAll,
            auto_delete_objects: true,
            removal_policy: RemovalPolicy::Destroy,
        },
    )?;
    let database = stack.add_database(
        "StorageAppDB",
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
        },
    )?;

    // Compute fabric
    let registry = stack.add_registry(
        "StorageAppRepo",
        RegistrySpec {
            repository_name: "storage-app".to_string(),
            removal_policy: RemovalPolicy::Destroy,
        },
    )?;
    let cluster = stack.add_cluster("StorageAppCluster", ClusterSpec { network })?;

    // Task role with its data-plane grants
    let role = stack.add_role(
        "StorageAppTaskRole",
        RoleSpec {
            assumed_by: ServicePrincipal::new("container-tasks"),
        },
    )?;
    stack.grant_bucket_access(&role, &bucket, &Permission::READ_WRITE)?;
    stack.grant_database_access(&role, &database, &[Permission::Connect])?;

    // The workload, wired to its upstream attributes
    let mut environment = IndexMap::new();
    environment.insert(ENV_DATABASE_URL.to_string(), database.endpoint_address());
    environment.insert(ENV_S3_BUCKET.to_string(), bucket.name());
    let service = stack.add_service(
        "StorageAppService",
        ServiceSpec {
            cluster,
            image: ImageSource::Registry {
                repository: registry,
                tag: "latest".to_string(),
            },
            container_port: DEFAULT_CONTAINER_PORT,
            task_role: role,
            environment,
            public_load_balancer: true,
            desired_count: 1,
        },
    )?;

    // User directory and its public client
    let user_pool = stack.add_user_pool(
        "StorageAppUserPool",
        UserPoolSpec {
            pool_name: "StorageAppUsers".to_string(),
            self_sign_up: true,
            sign_in_aliases: SignInAliases {
                email: true,
                ..SignInAliases::default()
            },
            standard_attributes: StandardAttributes {
                email: Some(AttributeConstraint {
                    required: true,
                    mutable: false,
                }),
            },
            removal_policy: RemovalPolicy::Destroy,
        },
    )?;
    stack.add_user_pool_client(
        "StorageAppUserPoolClient",
        UserPoolClientSpec {
            user_pool: user_pool.clone(),
            generate_secret: false,
        },
    )?;

    // The four values the engine reports after provisioning
    stack.add_output(OUTPUT_BUCKET_NAME, bucket.name())?;
    stack.add_output(OUTPUT_DATABASE_ENDPOINT, database.endpoint_address())?;
    stack.add_output(OUTPUT_LOAD_BALANCER_URL, service.load_balancer_dns_name())?;
    stack.add_output(OUTPUT_USER_POOL_ID, user_pool.pool_id())?;

    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_topology_builds_and_validates() {
        let stack = storage_app().unwrap();
        assert_eq!(stack.name(), STACK_NAME);
        assert_eq!(stack.resource_count(), 9);
        assert_eq!(stack.outputs().len(), 4);
        assert!(stack.validate().is_ok());
    }

    #[test]
    fn declaration_order_matches_dependency_order() {
        let stack = storage_app().unwrap();
        let ids: Vec<&str> = stack.resources().map(|node| node.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "StorageAppVPC",
                "StorageFilesBucket",
                "StorageAppDB",
                "StorageAppRepo",
                "StorageAppCluster",
                "StorageAppTaskRole",
                "StorageAppService",
                "StorageAppUserPool",
                "StorageAppUserPoolClient",
            ]
        );
    }
}
