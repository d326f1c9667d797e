//! Core domain types, errors, and constants for the `formwork` workspace.
//!
//! This crate establishes the foundational vocabulary shared by every other
//! crate: how resources are named, how values defer to the provisioning
//! engine, and how plan construction fails.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing every plan-construction failure mode.
//! - **`types`**: Logical ids, deferred values, runtime attribute names, and
//!   teardown policies, with the invariants enforced at the type level.
//! - **`constants`**: The verbatim contract surface shared with the deployed
//!   workload and with consumers of the provisioning outputs.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::{Attribute, DeferredRef, LogicalId, RemovalPolicy, Value},
};
