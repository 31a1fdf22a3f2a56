//! Property-Based Tests for the Fault-Domain Resolver
//!
//! Uses proptest to verify the resolver's guarantees across arbitrary
//! topologies instead of the fixed eight-rank cluster of the unit tests.
//!
//! # Test Properties
//!
//! 1. **Same-node guarantee**: every satisfiable same-node selection
//!    returns ranks sharing exactly one node.
//! 2. **Distinct-node guarantee**: distinct-node selections are pairwise
//!    node-disjoint and deterministic.
//! 3. **Monotonicity**: growing a selection never lowers the fault-domain
//!    unit count, so UNCLEAN can never flip back to HEALTHY.
//! 4. **Aggregation law**: node-level units equal engine-level units minus
//!    the ranks collapsed into already-counted nodes.
//! 5. **Service cap**: mixed-pattern selections never exceed the
//!    service-rank cap.

#![cfg(test)]

use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::membership::{MembershipSnapshot, Rank};
use crate::policy::{HealthOutcome, RedundancyLevel, RedundancyPolicy};
use crate::resolver::FaultDomainResolver;
use crate::selection::{FailureSelection, ServiceRankSet};

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for generating topologies: 1-5 nodes hosting 1-4 ranks each,
/// with sequential rank numbering.
fn topology_strategy() -> impl Strategy<Value = MembershipSnapshot> {
    prop::collection::vec(1usize..=4, 1..=5).prop_map(|node_sizes| {
        let mut members: Vec<(Rank, String)> = Vec::new();
        let mut rank: Rank = 0;
        for (node, size) in node_sizes.iter().enumerate() {
            for _ in 0..*size {
                members.push((rank, format!("10.0.{node}.1:10001")));
                rank += 1;
            }
        }
        MembershipSnapshot::from_pairs(members)
    })
}

/// Strategy pairing a topology with an arbitrary subset of its ranks.
fn topology_and_subset() -> impl Strategy<Value = (MembershipSnapshot, Vec<Rank>)> {
    topology_strategy().prop_flat_map(|snapshot| {
        let ranks: Vec<Rank> = snapshot.members().iter().map(|m| m.rank).collect();
        let len = ranks.len();
        (Just(snapshot), subsequence(ranks, 0..=len))
    })
}

// =============================================================================
// Selection Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: same-node selections of any satisfiable size share
    /// exactly one node.
    #[test]
    fn prop_same_node_shares_one_node(snapshot in topology_strategy()) {
        let resolver = FaultDomainResolver::new();
        let largest = snapshot.group_by_node().unwrap().largest_group();

        for count in 1..=largest {
            let selection = resolver.select_same_node(&snapshot, count)?;
            prop_assert_eq!(selection.len(), count);

            let mut nodes: Vec<&str> = selection
                .ranks()
                .iter()
                .filter_map(|r| snapshot.node_of(*r))
                .collect();
            nodes.dedup();
            prop_assert_eq!(nodes.len(), 1, "selection spans more than one node");
        }
    }

    /// Property: distinct-node selections are pairwise node-disjoint and
    /// repeated calls return the same ranks.
    #[test]
    fn prop_distinct_nodes_disjoint_and_deterministic(snapshot in topology_strategy()) {
        let resolver = FaultDomainResolver::new();
        let node_count = snapshot.group_by_node().unwrap().node_count();

        for count in 1..=node_count {
            let selection = resolver.select_distinct_nodes(&snapshot, count, &[])?;
            prop_assert_eq!(selection.len(), count);

            let mut nodes: Vec<&str> = selection
                .ranks()
                .iter()
                .filter_map(|r| snapshot.node_of(*r))
                .collect();
            let total = nodes.len();
            nodes.sort();
            nodes.dedup();
            prop_assert_eq!(nodes.len(), total, "two selected ranks share a node");

            let again = resolver.select_distinct_nodes(&snapshot, count, &[])?;
            prop_assert_eq!(selection, again);
        }
    }

    /// Property: mixed-pattern selections never contain more service
    /// ranks than the cap allows.
    #[test]
    fn prop_mixed_pattern_respects_service_cap(
        (snapshot, service) in topology_and_subset(),
        total_count in 1usize..=8,
        cap in 0usize..=2,
    ) {
        let resolver = FaultDomainResolver::new();
        let service = ServiceRankSet::new(service);

        if let Ok(selection) =
            resolver.select_mixed_fault_pattern(&snapshot, &service, total_count, cap)
        {
            prop_assert_eq!(selection.len(), total_count);
            prop_assert!(
                selection.service_rank_count(&service) <= cap,
                "selection exceeds service-rank cap"
            );
        }
    }
}

// =============================================================================
// Health-Prediction Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: growing a selection never lowers the unit count, hence a
    /// HEALTHY superset implies a HEALTHY subset.
    #[test]
    fn prop_unit_count_monotonic(
        (snapshot, subset) in topology_and_subset(),
        factor in 0u32..=4,
    ) {
        let resolver = FaultDomainResolver::new();
        let all: Vec<Rank> = snapshot.members().iter().map(|m| m.rank).collect();
        let full = FailureSelection::new(all);
        let part = FailureSelection::new(subset);

        for level in [RedundancyLevel::Engine, RedundancyLevel::Node] {
            let part_units = resolver.fault_domain_units(level, &part, &snapshot);
            let full_units = resolver.fault_domain_units(level, &full, &snapshot);
            prop_assert!(part_units <= full_units);

            let policy = RedundancyPolicy::new(level, factor);
            if resolver.predict_health(policy, &full, &snapshot) == HealthOutcome::Healthy {
                prop_assert_eq!(
                    resolver.predict_health(policy, &part, &snapshot),
                    HealthOutcome::Healthy
                );
            }
        }
    }

    /// Property: node-level units equal engine-level units minus the
    /// selected ranks collapsed into a node already counted.
    #[test]
    fn prop_node_aggregation_law((snapshot, subset) in topology_and_subset()) {
        let resolver = FaultDomainResolver::new();
        let selection = FailureSelection::new(subset);

        let engine_units =
            resolver.fault_domain_units(RedundancyLevel::Engine, &selection, &snapshot);
        let node_units =
            resolver.fault_domain_units(RedundancyLevel::Node, &selection, &snapshot);

        let mut per_node: Vec<(&str, usize)> = Vec::new();
        for rank in selection.ranks() {
            let node = snapshot.node_of(*rank).unwrap();
            match per_node.iter_mut().find(|(n, _)| *n == node) {
                Some((_, count)) => *count += 1,
                None => per_node.push((node, 1)),
            }
        }
        let collapsed: usize = per_node.iter().map(|(_, count)| count - 1).sum();

        prop_assert_eq!(node_units, engine_units - collapsed);
    }
}
