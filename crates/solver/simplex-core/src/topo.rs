use std::collections::VecDeque;

/// Order nodes so every node comes after the nodes it depends on.
///
/// `deps[i]` lists the nodes `i` reads from. Ties keep ascending index order so
/// the result is deterministic. On a cycle, returns `Err` with the lowest index
/// left unordered.
pub fn topo_order(deps: &[Vec<usize>]) -> Result<Vec<usize>, usize> {
    let n = deps.len();
    let mut indeg = vec![0usize; n];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (node, inputs) in deps.iter().enumerate() {
        for &inp in inputs {
            if inp < n {
                adj[inp].push(node);
                indeg[node] += 1;
            }
        }
    }

    let mut q: VecDeque<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();

    let mut order = Vec::with_capacity(n);
    while let Some(u) = q.pop_front() {
        order.push(u);
        for &v in &adj[u] {
            indeg[v] -= 1;
            if indeg[v] == 0 {
                q.push_back(v);
            }
        }
    }

    if order.len() != n {
        let stuck = (0..n).find(|&i| indeg[i] > 0).unwrap_or(0);
        return Err(stuck);
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_ordered() {
        // 0 reads 2, 2 reads 1
        let order = topo_order(&[vec![2], vec![], vec![1]]).unwrap();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn independent_nodes_keep_index_order() {
        assert_eq!(topo_order(&[vec![], vec![], vec![]]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn cycle_is_reported() {
        assert_eq!(topo_order(&[vec![1], vec![0], vec![]]), Err(0));
        assert_eq!(topo_order(&[vec![0]]), Err(0));
    }
}
