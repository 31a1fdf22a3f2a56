//! Fault-Domain Resolver
//!
//! Selects rank subsets satisfying a requested fault pattern and predicts
//! the resulting container health outcome under a redundancy policy.
//!
//! ```text
//! membership snapshot + policy ──▶ resolver ──▶ (rank selection, outcome)
//! ```
//!
//! The resolver is stateless and purely functional over its inputs: it
//! never caches or mutates a snapshot, and every selection is
//! deterministic (scan order breaks ties), which is what makes fault
//! scenarios reproducible.

use tracing::debug;

use crate::error::{Error, Result};
use crate::membership::{MembershipSnapshot, Rank};
use crate::policy::{HealthOutcome, RedundancyLevel, RedundancyPolicy};
use crate::selection::{FailureSelection, ServiceRankSet};

/// Stateless resolver over cluster fault-domain topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultDomainResolver;

impl FaultDomainResolver {
    /// Create a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Select `count` ranks guaranteed to share exactly one node.
    ///
    /// Groups the snapshot by node, picks the first node whose group holds
    /// at least `count` ranks, and returns that group's first `count`
    /// ranks in first-seen order.
    pub fn select_same_node(
        &self,
        snapshot: &MembershipSnapshot,
        count: usize,
    ) -> Result<FailureSelection> {
        let groups = snapshot.group_by_node()?;

        let group = groups.iter().find(|g| g.len() >= count).ok_or_else(|| {
            Error::NoSuchNodeGroup {
                requested: count,
                largest_group: groups.largest_group(),
            }
        })?;

        let ranks: Vec<Rank> = group.ranks()[..count].to_vec();
        debug!(node = group.node(), ranks = ?ranks, "selected co-located ranks");
        Ok(FailureSelection::new(ranks))
    }

    /// Select `count` ranks such that no two share a node, skipping any
    /// rank in `excluding`.
    ///
    /// Scans ranks in snapshot order and takes the first rank seen for
    /// each node not yet represented in the selection, so repeated calls
    /// on the same snapshot always return the same ranks.
    pub fn select_distinct_nodes(
        &self,
        snapshot: &MembershipSnapshot,
        count: usize,
        excluding: &[Rank],
    ) -> Result<FailureSelection> {
        if snapshot.is_empty() {
            return Err(Error::EmptySnapshot);
        }

        let mut selected: Vec<Rank> = Vec::with_capacity(count);
        let mut seen_nodes: Vec<&str> = Vec::new();

        for member in snapshot.members() {
            if selected.len() == count {
                break;
            }
            if excluding.contains(&member.rank) {
                continue;
            }
            let node = member.node_key();
            if seen_nodes.contains(&node) {
                continue;
            }
            seen_nodes.push(node);
            selected.push(member.rank);
        }

        if selected.len() < count {
            return Err(Error::InsufficientDistinctNodes {
                requested: count,
                available: selected.len(),
            });
        }

        debug!(ranks = ?selected, "selected distinct-node ranks");
        Ok(FailureSelection::new(selected))
    }

    /// Select `total_count` ranks mixing co-located pairs and singletons,
    /// never taking more than `max_service_ranks_affected` service ranks.
    ///
    /// Non-service ranks are consumed first: co-located pairs in node
    /// first-seen order, then singletons from nodes not yet touched, then
    /// any leftover non-service ranks. Only when those run out are
    /// service ranks drawn, in snapshot order, up to the cap. Stopping
    /// more service ranks than the cap would stall quorum-dependent
    /// tooling, so the cap is a hard bound rather than a preference.
    pub fn select_mixed_fault_pattern(
        &self,
        snapshot: &MembershipSnapshot,
        service_ranks: &ServiceRankSet,
        total_count: usize,
        max_service_ranks_affected: usize,
    ) -> Result<FailureSelection> {
        let groups = snapshot.group_by_node()?;

        let mut selected: Vec<Rank> = Vec::with_capacity(total_count);

        // Co-located non-service pairs, two at a time per node group.
        for group in groups.iter() {
            let mut candidates = group
                .ranks()
                .iter()
                .copied()
                .filter(|r| !service_ranks.contains(*r));
            loop {
                if total_count - selected.len() < 2 {
                    break;
                }
                match (candidates.next(), candidates.next()) {
                    (Some(a), Some(b)) => {
                        selected.push(a);
                        selected.push(b);
                    }
                    _ => break,
                }
            }
            if total_count - selected.len() < 2 {
                break;
            }
        }

        // Non-service singletons, preferring nodes not yet represented.
        for member in snapshot.members() {
            if selected.len() == total_count {
                break;
            }
            if service_ranks.contains(member.rank) || selected.contains(&member.rank) {
                continue;
            }
            let node_touched = selected
                .iter()
                .any(|r| snapshot.node_of(*r) == Some(member.node_key()));
            if !node_touched {
                selected.push(member.rank);
            }
        }
        for member in snapshot.members() {
            if selected.len() == total_count {
                break;
            }
            if service_ranks.contains(member.rank) || selected.contains(&member.rank) {
                continue;
            }
            selected.push(member.rank);
        }

        // Fall back to service ranks, bounded by the cap.
        let mut service_taken = 0;
        for member in snapshot.members() {
            if selected.len() == total_count || service_taken == max_service_ranks_affected {
                break;
            }
            if !service_ranks.contains(member.rank) || selected.contains(&member.rank) {
                continue;
            }
            selected.push(member.rank);
            service_taken += 1;
        }

        if selected.len() < total_count {
            return Err(Error::UnsatisfiableFaultPattern {
                requested: total_count,
                selectable: selected.len(),
            });
        }

        debug!(
            ranks = ?selected,
            service_taken,
            "selected mixed fault pattern"
        );
        Ok(FailureSelection::new(selected))
    }

    /// Predict the container health outcome after `selection` goes down
    /// under `policy`.
    ///
    /// At engine granularity every selected rank counts as one
    /// fault-domain unit; at node granularity all selected ranks sharing
    /// a node collapse to one unit. The outcome is `Unclean` exactly when
    /// the unit count exceeds the redundancy factor. A selected rank
    /// missing from the snapshot cannot be collapsed and counts as its
    /// own unit.
    pub fn predict_health(
        &self,
        policy: RedundancyPolicy,
        selection: &FailureSelection,
        snapshot: &MembershipSnapshot,
    ) -> HealthOutcome {
        let units = self.fault_domain_units(policy.level, selection, snapshot);
        let outcome = if units > policy.factor as usize {
            HealthOutcome::Unclean
        } else {
            HealthOutcome::Healthy
        };
        debug!(%policy, units, %outcome, "predicted health outcome");
        outcome
    }

    /// Number of fault-domain units represented by `selection` at the
    /// given granularity.
    pub fn fault_domain_units(
        &self,
        level: RedundancyLevel,
        selection: &FailureSelection,
        snapshot: &MembershipSnapshot,
    ) -> usize {
        match level {
            RedundancyLevel::Engine => selection.len(),
            RedundancyLevel::Node => {
                let mut nodes: Vec<&str> = Vec::new();
                let mut unplaced = 0;
                for rank in selection.ranks() {
                    match snapshot.node_of(*rank) {
                        Some(node) => {
                            if !nodes.contains(&node) {
                                nodes.push(node);
                            }
                        }
                        None => unplaced += 1,
                    }
                }
                nodes.len() + unplaced
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
