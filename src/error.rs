//! Error types for the fault-domain resolver

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving fault-domain topology.
///
/// Every variant is a deterministic function of the inputs; none is
/// transient, so callers must change the request or re-fetch membership
/// rather than retry.
#[derive(Error, Debug)]
pub enum Error {
    /// Membership snapshot has no members
    #[error("membership snapshot is empty")]
    EmptySnapshot,

    /// No node hosts enough co-located ranks for the request
    #[error("no node has {requested} co-located ranks (largest group: {largest_group})")]
    NoSuchNodeGroup {
        requested: usize,
        largest_group: usize,
    },

    /// Fewer distinct-node candidates exist than requested
    #[error("only {available} distinct-node ranks available, {requested} requested")]
    InsufficientDistinctNodes { requested: usize, available: usize },

    /// Mixed fault pattern cannot be met within the service-rank cap
    #[error(
        "fault pattern of {requested} ranks unsatisfiable: only {selectable} \
         selectable within service-rank cap"
    )]
    UnsatisfiableFaultPattern { requested: usize, selectable: usize },

    /// Malformed or out-of-range redundancy policy configuration
    #[error("invalid redundancy policy: {0}")]
    InvalidPolicy(String),

    /// Management-plane JSON could not be parsed
    #[error("failed to parse membership response: {0}")]
    MembershipParse(#[from] serde_json::Error),

    /// Observed container status string is not HEALTHY or UNCLEAN
    #[error("unknown health status: {0:?}")]
    UnknownHealthStatus(String),
}
