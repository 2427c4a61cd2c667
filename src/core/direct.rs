use crate::core::graph::{DesireEdge, DesireGraph};
use crate::models::OfficerId;

/// A mutual two-party exchange seen from the requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectSwap {
    pub partner: OfficerId,
    /// `priority(A -> B) + priority(B -> A)`; lower is better
    pub combined_score: u64,
    pub outbound: DesireEdge,
    pub inbound: DesireEdge,
}

/// Every `B` such that `A` wants `B`'s post and `B` wants `A`'s
///
/// Sorted by combined score, then partner id, and truncated to `limit`.
pub fn find_direct(a: OfficerId, graph: &DesireGraph, limit: usize) -> Vec<DirectSwap> {
    let mut swaps: Vec<DirectSwap> = graph
        .out_edges(a)
        .filter_map(|outbound| {
            graph.edge(outbound.to, a).map(|inbound| DirectSwap {
                partner: outbound.to,
                combined_score: u64::from(outbound.priority) + u64::from(inbound.priority),
                outbound: *outbound,
                inbound: *inbound,
            })
        })
        .collect();

    swaps.sort_by_key(|swap| (swap.combined_score, swap.partner));
    swaps.truncate(limit);
    swaps
}
