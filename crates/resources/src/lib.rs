//! Typed resource descriptors for `formwork` deployment plans.
//!
//! Each resource kind gets an explicit configuration struct with named,
//! enumerated fields; there are no loose option bags. Cross-resource wiring
//! happens through typed handles minted by the stack builder, so referencing
//! a bucket where a network is expected does not compile.
//!
//! ## Key Components
//!
//! - **`kind`**: The closed set of resource kinds and the post-provisioning
//!   attributes each one exposes.
//! - **`handle`**: Typed references to declared resources, including the
//!   deferred-attribute accessors.
//! - One module per resource family (`network`, `storage`, `database`,
//!   `registry`, `compute`, `identity`, `auth`) holding its descriptor
//!   structs and their local validation.

pub mod auth;
pub mod compute;
pub mod database;
pub mod handle;
pub mod identity;
pub mod kind;
pub mod network;
pub mod registry;
pub mod storage;

pub use self::{
    auth::{AttributeConstraint, SignInAliases, StandardAttributes, UserPoolClientSpec, UserPoolSpec},
    compute::{ClusterSpec, ImageSource, ServiceSpec},
    database::{Credentials, DatabaseSpec, Engine, InstanceClass, InstanceSize, InstanceType, PostgresVersion},
    handle::{
        BucketRef, ClusterRef, DatabaseRef, NetworkRef, RegistryRef, RoleRef, ServiceRef,
        UserPoolClientRef, UserPoolRef,
    },
    identity::{Permission, RoleSpec, ServicePrincipal},
    kind::ResourceKind,
    network::NetworkSpec,
    registry::RegistrySpec,
    storage::{BucketSpec, PublicAccess},
};
