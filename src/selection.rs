//! Failure Selections and Service Ranks
//!
//! Value types carried between the resolver and its external
//! collaborators: the ordered set of ranks chosen to take down, and the
//! pool's service-replica ranks used to bound how much of the management
//! plane a scenario may knock out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::membership::Rank;

// =============================================================================
// Service Rank Set
// =============================================================================

/// Ranks hosting metadata/service replicas for a pool.
///
/// Used only as an inclusion/exclusion filter during rank selection;
/// stopping too many of these stalls quorum-dependent tooling, so
/// scenarios cap how many may appear in a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRankSet {
    ranks: BTreeSet<Rank>,
}

impl ServiceRankSet {
    /// Build from any collection of ranks.
    pub fn new(ranks: impl IntoIterator<Item = Rank>) -> Self {
        Self {
            ranks: ranks.into_iter().collect(),
        }
    }

    /// Parse the management plane's pool create/query JSON response:
    ///
    /// ```json
    /// {"response": {"svc_reps": [0, 1, 2]}}
    /// ```
    pub fn from_pool_response(json: &str) -> Result<Self> {
        let parsed: PoolResponse = serde_json::from_str(json)?;
        Ok(Self::new(parsed.response.svc_reps))
    }

    /// Whether the given rank is a service rank.
    pub fn contains(&self, rank: Rank) -> bool {
        self.ranks.contains(&rank)
    }

    /// Number of service ranks.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Service ranks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Rank> + '_ {
        self.ranks.iter().copied()
    }
}

#[derive(Debug, Deserialize)]
struct PoolResponse {
    response: PoolResponseBody,
}

#[derive(Debug, Deserialize)]
struct PoolResponseBody {
    svc_reps: Vec<Rank>,
}

// =============================================================================
// Failure Selection
// =============================================================================

/// Ordered sequence of ranks chosen to be taken down for a scenario.
///
/// Produced by the resolver, consumed by the external fault-injection
/// mechanism as a comma-separated rank list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSelection {
    ranks: Vec<Rank>,
}

impl FailureSelection {
    /// Wrap an ordered list of ranks.
    pub fn new(ranks: Vec<Rank>) -> Self {
        Self { ranks }
    }

    /// Selected ranks in selection order.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Number of selected ranks.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Whether the selection contains the given rank.
    pub fn contains(&self, rank: Rank) -> bool {
        self.ranks.contains(&rank)
    }

    /// How many of the selected ranks are service ranks.
    pub fn service_rank_count(&self, service_ranks: &ServiceRankSet) -> usize {
        self.ranks
            .iter()
            .filter(|r| service_ranks.contains(**r))
            .count()
    }

    /// Comma-separated rank list for the external rank-stop mechanism,
    /// e.g. `"0,1,4,5"`.
    pub fn to_rank_list(&self) -> String {
        let strings: Vec<String> = self.ranks.iter().map(|r| r.to_string()).collect();
        strings.join(",")
    }
}

impl std::fmt::Display for FailureSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rank_list())
    }
}

impl From<Vec<Rank>> for FailureSelection {
    fn from(ranks: Vec<Rank>) -> Self {
        Self::new(ranks)
    }
}

// =============================================================================
// Tests
// =============================================================================
