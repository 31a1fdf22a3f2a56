//! Cluster Membership Model
//!
//! A point-in-time view of cluster membership: which ranks exist and which
//! physical node each one lives on. The snapshot is immutable once built;
//! callers construct a fresh one per decision point from the management
//! plane's system-query output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Unique integer identifier for one storage-engine instance.
pub type Rank = u32;

// =============================================================================
// Cluster Member
// =============================================================================

/// One storage-engine instance as reported by the management plane.
///
/// Multiple ranks may share one address (co-located engines on the same
/// physical node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// Unique rank within the snapshot
    pub rank: Rank,
    /// Node address, either `ip:port` or bare `ip`
    pub address: String,
}

impl ClusterMember {
    /// Create a new member record.
    pub fn new(rank: Rank, address: impl Into<String>) -> Self {
        Self {
            rank,
            address: address.into(),
        }
    }

    /// Node key for fault-domain grouping: the host portion of the
    /// address (substring before the first `:`, or the whole address
    /// when no port suffix is present).
    pub fn node_key(&self) -> &str {
        match self.address.find(':') {
            Some(idx) => &self.address[..idx],
            None => &self.address,
        }
    }
}

// =============================================================================
// Membership Snapshot
// =============================================================================

/// Ordered collection of cluster members observed at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipSnapshot {
    members: Vec<ClusterMember>,
}

impl MembershipSnapshot {
    /// Build a snapshot from an ordered list of members.
    pub fn new(members: Vec<ClusterMember>) -> Self {
        Self { members }
    }

    /// Build a snapshot from `(rank, address)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Rank, S)>,
        S: Into<String>,
    {
        Self {
            members: pairs
                .into_iter()
                .map(|(rank, address)| ClusterMember::new(rank, address))
                .collect(),
        }
    }

    /// Parse the management plane's system-query JSON response:
    ///
    /// ```json
    /// {"response": {"members": [{"rank": 0, "addr": "10.8.1.1:10001"}, ...]}}
    /// ```
    ///
    /// Fields other than `rank` and `addr` are ignored.
    pub fn from_system_query(json: &str) -> Result<Self> {
        let parsed: SystemQueryResponse = serde_json::from_str(json)?;
        let members = parsed
            .response
            .members
            .into_iter()
            .map(|m| ClusterMember::new(m.rank, m.addr))
            .collect();
        Ok(Self { members })
    }

    /// Members in observation order.
    pub fn members(&self) -> &[ClusterMember] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the snapshot has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Node key of the given rank, if present in the snapshot.
    pub fn node_of(&self, rank: Rank) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.rank == rank)
            .map(|m| m.node_key())
    }

    /// Group ranks by node, preserving first-seen order of both nodes
    /// and ranks within a node.
    ///
    /// Fails with [`Error::EmptySnapshot`] when the snapshot has no
    /// members, since an empty grouping cannot answer any fault-domain
    /// question.
    pub fn group_by_node(&self) -> Result<NodeGroups> {
        if self.members.is_empty() {
            return Err(Error::EmptySnapshot);
        }

        let mut groups: Vec<NodeGroup> = Vec::new();
        for member in &self.members {
            let key = member.node_key();
            match groups.iter_mut().find(|g| g.node == key) {
                Some(group) => group.ranks.push(member.rank),
                None => groups.push(NodeGroup {
                    node: key.to_string(),
                    ranks: vec![member.rank],
                }),
            }
        }

        debug!(
            nodes = groups.len(),
            ranks = self.members.len(),
            "grouped membership by node"
        );
        Ok(NodeGroups { groups })
    }
}

// =============================================================================
// Node Groups
// =============================================================================

/// All ranks observed at one node, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGroup {
    node: String,
    ranks: Vec<Rank>,
}

impl NodeGroup {
    /// Node key shared by every rank in this group.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Ranks at this node, in first-seen order.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Number of co-located ranks.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the group holds no ranks (never true for groups built by
    /// [`MembershipSnapshot::group_by_node`]).
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Node-to-ranks index derived from a snapshot.
///
/// Group order is the order nodes were first seen while scanning the
/// snapshot; that ordering is what makes rank selection deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGroups {
    groups: Vec<NodeGroup>,
}

impl NodeGroups {
    /// Groups in first-seen node order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeGroup> {
        self.groups.iter()
    }

    /// Look up the group for a node key.
    pub fn get(&self, node: &str) -> Option<&NodeGroup> {
        self.groups.iter().find(|g| g.node == node)
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.groups.len()
    }

    /// Size of the largest co-located group.
    pub fn largest_group(&self) -> usize {
        self.groups.iter().map(|g| g.ranks.len()).max().unwrap_or(0)
    }
}

// =============================================================================
// Management-Plane JSON Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct SystemQueryResponse {
    response: SystemQueryBody,
}

#[derive(Debug, Deserialize)]
struct SystemQueryBody {
    members: Vec<SystemMember>,
}

#[derive(Debug, Deserialize)]
struct SystemMember {
    rank: Rank,
    addr: String,
}

// =============================================================================
// Tests
// =============================================================================
