//! Fault-Domain Topology Resolver
//!
//! A pure decision/grouping library for distributed storage clusters:
//! given a membership snapshot (rank → node address) and a redundancy
//! policy (level + factor), it selects rank subsets satisfying a fault
//! pattern and predicts the resulting container health outcome.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────────────┐      ┌──────────────────┐
//! │  Membership  │─────▶│ FaultDomainResolver  │─────▶│  FailureSelection │
//! │   Snapshot   │      │  (group / select /   │      │  + HealthOutcome  │
//! │  + Policy    │      │      predict)        │      │                  │
//! └──────────────┘      └──────────────────────┘      └──────────────────┘
//! ```
//!
//! Data flows one way; the resolver holds no state and performs no I/O.
//! Fetching membership, stopping ranks, and verifying observed container
//! status are external collaborators reached only through their output
//! shapes (system-query JSON, pool service-rank lists, property strings).
//!
//! # Modules
//!
//! - [`error`] - Error types
//! - [`membership`] - Cluster members, snapshots, and the node index
//! - [`policy`] - Redundancy level/factor and health outcomes
//! - [`resolver`] - Fault-pattern selection and health prediction
//! - [`selection`] - Failure selections and service-rank sets

pub mod error;
pub mod membership;
pub mod policy;
pub mod resolver;
pub mod selection;

#[cfg(test)]
mod proptests;

// Re-export commonly used types
pub use error::{Error, Result};
pub use membership::{ClusterMember, MembershipSnapshot, NodeGroup, NodeGroups, Rank};
pub use policy::{HealthOutcome, RedundancyLevel, RedundancyPolicy};
pub use resolver::FaultDomainResolver;
pub use selection::{FailureSelection, ServiceRankSet};
