use std::collections::HashMap;
use crate::core::graph::{DesireEdge, DesireGraph};
use crate::models::OfficerId;

/// Three-party cycle A -> B -> C -> A seen from A
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleCycle {
    pub b: OfficerId,
    pub c: OfficerId,
    pub a_to_b: DesireEdge,
    pub b_to_c: DesireEdge,
    pub c_to_a: DesireEdge,
}

/// Every `(B, C)` with edges `A -> B`, `B -> C` and `C -> A`, all three distinct
///
/// For each `B` in `A`'s out-neighbours the candidates for `C` are
/// `out(B) ∩ in(A)`; whichever side is smaller is walked and the other is
/// probed, so work per `B` is `min(|out(B)|, |in(A)|)`.
///
/// Emission order is `B` by `priority(A -> B)` then `C` by
/// `priority(B -> C)`, ids breaking ties; output stops at `limit`.
pub fn find_triangular(a: OfficerId, graph: &DesireGraph, limit: usize) -> Vec<TriangleCycle> {
    let mut cycles = Vec::new();
    if limit == 0 {
        return cycles;
    }

    let closing: HashMap<OfficerId, &DesireEdge> = graph
        .in_edges(a)
        .filter(|edge| edge.from != a)
        .map(|edge| (edge.from, edge))
        .collect();
    if closing.is_empty() {
        return cycles;
    }

    let mut firsts: Vec<&DesireEdge> = graph.out_edges(a).filter(|edge| edge.to != a).collect();
    firsts.sort_by_key(|edge| (edge.priority, edge.to));

    for a_to_b in firsts {
        let b = a_to_b.to;

        let mut seconds: Vec<&DesireEdge> = if graph.out_degree(b) <= closing.len() {
            graph
                .out_edges(b)
                .filter(|edge| closing.contains_key(&edge.to))
                .collect()
        } else {
            closing.keys().filter_map(|&c| graph.edge(b, c)).collect()
        };
        seconds.retain(|edge| edge.to != a && edge.to != b);
        seconds.sort_by_key(|edge| (edge.priority, edge.to));

        for b_to_c in seconds {
            let c_to_a = closing[&b_to_c.to];
            cycles.push(TriangleCycle {
                b,
                c: b_to_c.to,
                a_to_b: *a_to_b,
                b_to_c: *b_to_c,
                c_to_a: *c_to_a,
            });
            if cycles.len() >= limit {
                return cycles;
            }
        }
    }

    cycles
}
