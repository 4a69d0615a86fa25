//! Configuration loading tests

use wayfind_nav::prelude::*;

#[test]
fn test_partial_astar_config() {
    let config: AStarConfig = serde_json::from_str(r#"{ "max_iterations": 200 }"#).unwrap();
    assert_eq!(config.search_mode, SearchMode::Heuristic);
    assert_eq!(config.max_iterations, Some(200));

    let config: AStarConfig = serde_json::from_str(r#"{ "search_mode": "greedy" }"#).unwrap();
    assert_eq!(config.search_mode, SearchMode::Greedy);
    assert_eq!(config.max_iterations, None);
}

#[test]
fn test_nested_surface_config() {
    let json = r#"{
        "travel_preference": "prefer_border",
        "astar": { "search_mode": "dijkstra" }
    }"#;
    let config: SurfaceConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.travel_preference, TravelPreference::PreferBorder);
    assert_eq!(config.centre_area_threshold, 0.0);
    assert_eq!(config.astar.search_mode, SearchMode::Dijkstra);
}

#[test]
fn test_empty_documents_give_defaults() {
    let layered: LayeredConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(layered, LayeredConfig::default());
    let tiles: TileGridConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(tiles, TileGridConfig::default());
}

#[test]
fn test_config_round_trip() {
    let config = TileGridConfig::default()
        .with_diagonal_movement(true)
        .with_astar(AStarConfig::default().with_max_iterations(64));
    let json = serde_json::to_string(&config).unwrap();
    let back: TileGridConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_unknown_search_mode_rejected() {
    let result: std::result::Result<AStarConfig, _> =
        serde_json::from_str(r#"{ "search_mode": "bfs" }"#);
    assert!(result.is_err());
}

#[test]
fn test_config_drives_grid() {
    let config: TileGridConfig = serde_json::from_str(r#"{ "diagonal_movement": true }"#).unwrap();
    let mut grid = TileGrid::with_config(3, 3, config);
    grid.set_perfect_memory(true);
    assert_eq!(grid.find_path(Tile::new(0, 0), Tile::new(2, 2)).map(|p| p.len()), Some(3));
}
