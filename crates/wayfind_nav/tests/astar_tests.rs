//! A* checked against a brute-force shortest-path reference
//!
//! Small random directed graphs with integer edge costs, so that costs
//! sum exactly in `f32`.

use proptest::prelude::*;

use wayfind_nav::prelude::*;
use wayfind_nav::path_cost;

/// All-pairs shortest costs; the last weight given for an edge wins
fn floyd_warshall(n: usize, edges: &[(usize, usize, u32)]) -> Vec<Vec<Option<u32>>> {
    let mut dist = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = Some(0);
    }
    let mut weight = vec![vec![None; n]; n];
    for &(a, b, c) in edges {
        if a != b {
            weight[a][b] = Some(c);
        }
    }
    for a in 0..n {
        for b in 0..n {
            if let Some(c) = weight[a][b] {
                dist[a][b] = Some(c);
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if let (Some(ik), Some(kj)) = (dist[i][k], dist[k][j]) {
                    if dist[i][j].map_or(true, |ij| ik + kj < ij) {
                        dist[i][j] = Some(ik + kj);
                    }
                }
            }
        }
    }
    dist
}

fn build(n: usize, edges: &[(usize, usize, u32)], mode: SearchMode) -> AdjacencyGraph<usize> {
    let mut graph = AdjacencyGraph::new().with_astar(AStarConfig::default().with_search_mode(mode));
    for node in 0..n {
        graph.add_node(node);
    }
    for &(a, b, c) in edges {
        graph.add_edge(a, b, c as f32);
    }
    graph
}

fn graphs() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
    (2usize..=10).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 1u32..20), 0..30),
        )
    })
}

fn assert_valid_path(graph: &AdjacencyGraph<usize>, path: &[usize], from: usize, to: usize) {
    assert_eq!(path.first(), Some(&from));
    assert_eq!(path.last(), Some(&to));
    for w in path.windows(2) {
        assert!(graph.neighbours(w[0]).contains(&w[1]));
    }
}

proptest! {
    #[test]
    fn test_dijkstra_matches_reference((n, edges) in graphs()) {
        let reference = floyd_warshall(n, &edges);
        let graph = build(n, &edges, SearchMode::Dijkstra);
        for from in 0..n {
            for to in 0..n {
                let path = graph.find_path(from, to);
                match reference[from][to] {
                    None => prop_assert_eq!(path, None),
                    Some(cost) => {
                        let path = path.expect("reachable target must yield a path");
                        assert_valid_path(&graph, &path, from, to);
                        prop_assert_eq!(path_cost(&graph, &path), cost as f32);
                    }
                }
            }
        }
    }

    #[test]
    fn test_heuristic_mode_without_estimate_is_optimal((n, edges) in graphs()) {
        let reference = floyd_warshall(n, &edges);
        let graph = build(n, &edges, SearchMode::Heuristic);
        for to in 0..n {
            if let Some(cost) = reference[0][to] {
                let path = graph.find_path(0, to).expect("reachable target must yield a path");
                prop_assert_eq!(path_cost(&graph, &path), cost as f32);
            }
        }
    }

    #[test]
    fn test_greedy_finds_some_valid_path((n, edges) in graphs()) {
        let reference = floyd_warshall(n, &edges);
        let graph = build(n, &edges, SearchMode::Greedy);
        for to in 0..n {
            let path = graph.find_path(0, to);
            prop_assert_eq!(path.is_some(), reference[0][to].is_some());
            if let Some(path) = path {
                assert_valid_path(&graph, &path, 0, to);
            }
        }
    }
}

#[test]
fn test_blocked_edge_forces_detour() {
    let mut graph = AdjacencyGraph::new();
    graph.connect('a', 'b', 1.0);
    graph.connect('b', 'c', 1.0);
    graph.connect('a', 'd', 2.0);
    graph.connect('d', 'c', 2.0);

    assert_eq!(graph.find_path('a', 'c'), Some(vec!['a', 'b', 'c']));
    assert!(graph.set_cost('b', 'c', f32::INFINITY));
    assert_eq!(graph.find_path('a', 'c'), Some(vec!['a', 'd', 'c']));
    assert!(graph.set_cost('a', 'd', f32::INFINITY));
    assert_eq!(graph.find_path('a', 'c'), None);
}

#[test]
fn test_iteration_cap_gives_up() {
    let mut graph = AdjacencyGraph::new();
    for i in 0..50u32 {
        graph.connect(i, i + 1, 1.0);
    }
    let capped = AStar::new(AStarConfig::default().with_max_iterations(10));
    assert_eq!(capped.find_path(&graph, 0, 50), None);
    assert!(capped.find_path(&graph, 0, 5).is_some());

    let unbounded = AStar::with_mode(SearchMode::Dijkstra);
    assert_eq!(unbounded.find_path(&graph, 0, 50).map(|p| p.len()), Some(51));
}
