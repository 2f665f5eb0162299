//! Path enumeration over the segmentation DAG.
//!
//! - `k_shortest_paths`: Yen's algorithm. The spur searches are single-source
//!   shortest paths in topological order, which is exact for a DAG and does not
//!   care about the sign of the weights.
//! - `all_simple_paths`: plain DFS, bounded by a hard ceiling.

use super::graph::{SandhiGraph, Vertex};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Edge cost: scorer weight, or one per hop.
fn edge_cost(g: &SandhiGraph, u: Vertex, v: Vertex, weighted: bool) -> f64 {
    if weighted { g.weight(u, v) } else { 1.0 }
}

fn path_cost(g: &SandhiGraph, path: &[Vertex], weighted: bool) -> f64 {
    path.windows(2).map(|e| edge_cost(g, e[0], e[1], weighted)).sum()
}

/// Shortest `from -> to` path avoiding the banned vertices and edges.
fn shortest_path(
    g: &SandhiGraph,
    order: &[Vertex],
    from: Vertex,
    to: Vertex,
    weighted: bool,
    banned_nodes: &HashSet<Vertex>,
    banned_edges: &HashSet<(Vertex, Vertex)>,
) -> Option<Vec<Vertex>> {
    let size = order.len();
    let mut dist: Vec<Option<f64>> = vec![None; size];
    let mut prev: Vec<Option<Vertex>> = vec![None; size];
    dist[from] = Some(0.0);

    for &u in order {
        let Some(du) = dist[u] else {
            continue;
        };
        for &v in g.succ_map().get(&u).into_iter().flatten() {
            if banned_nodes.contains(&v) || banned_edges.contains(&(u, v)) {
                continue;
            }
            let nd = du + edge_cost(g, u, v, weighted);
            if dist[v].is_none_or(|d| nd < d) {
                dist[v] = Some(nd);
                prev[v] = Some(u);
            }
        }
    }

    dist[to]?;
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur]?;
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

/// Up to `k` loopless `source -> target` paths, cheapest first.
pub(crate) fn k_shortest_paths(
    g: &SandhiGraph,
    source: Vertex,
    target: Vertex,
    k: usize,
    weighted: bool,
) -> Vec<Vec<Vertex>> {
    if k == 0 {
        return Vec::new();
    }
    let order = g.vertex_order();
    assert!(order.is_some(), "segmentation graph must be acyclic");
    let order = order.unwrap_or_default();

    let none = HashSet::new();
    let Some(first) = shortest_path(g, &order, source, target, weighted, &none, &HashSet::new()) else {
        return Vec::new();
    };

    let mut found = vec![first.clone()];
    let mut seen: HashSet<Vec<Vertex>> = HashSet::from([first]);
    // (cost, insertion counter, path); the counter keeps ties stable.
    let mut candidates: Vec<(f64, usize, Vec<Vertex>)> = Vec::new();
    let mut counter = 0;

    while found.len() < k {
        let last = found[found.len() - 1].clone();
        for i in 0..last.len() - 1 {
            let spur = last[i];
            let root = &last[..=i];

            let banned_edges: HashSet<(Vertex, Vertex)> = found
                .iter()
                .filter(|p| p.len() > i + 1 && &p[..=i] == root)
                .map(|p| (p[i], p[i + 1]))
                .collect();
            let banned_nodes: HashSet<Vertex> = root[..i].iter().copied().collect();

            if let Some(spur_path) = shortest_path(g, &order, spur, target, weighted, &banned_nodes, &banned_edges) {
                let mut path = root[..i].to_vec();
                path.extend(spur_path);
                if seen.insert(path.clone()) {
                    candidates.push((path_cost(g, &path, weighted), counter, path));
                    counter += 1;
                }
            }
        }

        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(ix, _)| ix);
        let Some(best) = best else {
            break;
        };
        found.push(candidates.swap_remove(best).2);
    }

    log::trace!("[paths] yen k={k} weighted={weighted} found={}", found.len());
    found
}

/// Every `source -> target` path. More than `ceiling` paths is an error.
pub(crate) fn all_simple_paths(
    g: &SandhiGraph,
    source: Vertex,
    target: Vertex,
    ceiling: usize,
) -> Result<Vec<Vec<Vertex>>> {
    fn walk(
        g: &SandhiGraph,
        target: Vertex,
        path: &mut Vec<Vertex>,
        out: &mut Vec<Vec<Vertex>>,
        ceiling: usize,
    ) -> Result<()> {
        let Some(&v) = path.last() else {
            return Ok(());
        };
        if v == target {
            out.push(path.clone());
            if out.len() > ceiling {
                log::warn!("[paths] enumeration exceeded ceiling={ceiling}");
                return Err(Error::ResourceLimit { limit: ceiling });
            }
            return Ok(());
        }
        for &w in g.succ_map().get(&v).into_iter().flatten() {
            if path.contains(&w) {
                continue;
            }
            path.push(w);
            walk(g, target, path, out, ceiling)?;
            path.pop();
        }
        Ok(())
    }

    let mut out = Vec::new();
    walk(g, target, &mut vec![source], &mut out, ceiling)?;
    Ok(out)
}
