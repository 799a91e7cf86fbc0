use std::collections::BTreeSet;

use landmass::{
    create_grid, generate_population,
    rng::{RngManager, ROAD_STREAM},
    roads::RoadBuilder,
    CellPos, City, GraphConfig, PopulationConfig, PopulationField, SettlementGraph, Suburb,
};

fn assert_well_formed(graph: &SettlementGraph, field: &PopulationField) {
    let nodes: BTreeSet<CellPos> = graph.positions().iter().copied().collect();
    assert_eq!(&nodes, field.suburb_centers());
    assert_eq!(graph.component_count(), 1);

    for a in graph.nodes() {
        assert_eq!(graph.is_linked(a, a), Ok(false), "self link on {a:?}");
        for &b in graph.neighbors(a).unwrap() {
            assert_eq!(graph.is_linked(b, a), Ok(true), "asymmetric link {a:?}-{b:?}");
        }
    }

    let start = graph.nodes().next().unwrap();
    let reached = graph.reachable_from(&[start], |_| true).unwrap();
    assert_eq!(reached.len(), graph.node_count());
}

#[test]
fn generated_graphs_form_one_component() {
    let grid = create_grid(80_000.0, 50_000.0, 1_000.0).unwrap();
    let population = PopulationConfig {
        city_count: 10,
        max_suburbs_per_city: 24,
        ..PopulationConfig::default()
    };

    for (seed, max_connections) in [(1, 2), (2, 2), (3, 3), (4, 4), (5, 2)] {
        let field = generate_population(&grid, &population, seed).unwrap();
        let config = GraphConfig {
            max_connections_per_node: max_connections,
            ..GraphConfig::default()
        };
        let mut rng = RngManager::new(seed).stream(ROAD_STREAM);

        let network = RoadBuilder::new(&grid, &field, &config)
            .build(&mut rng)
            .unwrap();

        assert_well_formed(&network.graph, &field);
    }
}

#[test]
fn sparse_settlements_are_repaired() {
    // short searches leave most nodes without a frontier path
    let grid = create_grid(120_000.0, 120_000.0, 1_000.0).unwrap();
    let population = PopulationConfig {
        city_count: 20,
        max_suburbs_per_city: 3,
        ..PopulationConfig::default()
    };
    let config = GraphConfig {
        max_ring_iterations: 2,
        ..GraphConfig::default()
    };
    let field = generate_population(&grid, &population, 77).unwrap();
    let mut rng = RngManager::new(77).stream(ROAD_STREAM);

    let network = RoadBuilder::new(&grid, &field, &config)
        .build(&mut rng)
        .unwrap();

    assert_well_formed(&network.graph, &field);
    assert!(network.stats.exhausted_searches > 0);
}

#[test]
fn stranded_nodes_are_bridged_to_nearest_connected_node() {
    let grid = create_grid(10.0, 10.0, 1.0).unwrap();
    let mut city = City::new(Suburb::new(CellPos::new(0, 0), 1_000), 2_000);
    city.push_suburb(Suburb::new(CellPos::new(0, 1), 300));
    city.push_suburb(Suburb::new(CellPos::new(5, 5), 200));
    city.push_suburb(Suburb::new(CellPos::new(5, 6), 100));
    let field = PopulationField::from_cities(&grid, vec![city]).unwrap();

    // one ring only: the far pair is never found from the backbone
    let config = GraphConfig {
        max_ring_iterations: 1,
        ..GraphConfig::default()
    };
    let mut rng = RngManager::new(0).stream(ROAD_STREAM);
    let network = RoadBuilder::new(&grid, &field, &config)
        .build(&mut rng)
        .unwrap();
    let graph = &network.graph;

    let id = |row, col| graph.node(CellPos::new(row, col)).unwrap();
    let (center, near, far, farthest) = (id(0, 0), id(0, 1), id(5, 5), id(5, 6));

    assert_eq!(
        graph.edges(),
        vec![(center, near), (near, far), (far, farthest)]
    );
    assert_eq!(network.stats.island_seeds, 1);
    assert_eq!(network.stats.bridges, 1);
    assert_eq!(network.stats.absorbed, 1);
    assert_eq!(network.stats.zero_candidate_nodes, 2);
    assert_well_formed(graph, &field);
}

#[test]
fn unlinked_leftovers_each_get_a_bridge() {
    let grid = create_grid(20.0, 20.0, 1.0).unwrap();
    let mut city = City::new(Suburb::new(CellPos::new(0, 0), 900), 2_000);
    city.push_suburb(Suburb::new(CellPos::new(10, 0), 500));
    city.push_suburb(Suburb::new(CellPos::new(0, 15), 400));
    let field = PopulationField::from_cities(&grid, vec![city]).unwrap();

    let config = GraphConfig {
        max_ring_iterations: 1,
        ..GraphConfig::default()
    };
    let mut rng = RngManager::new(4).stream(ROAD_STREAM);
    let network = RoadBuilder::new(&grid, &field, &config)
        .build(&mut rng)
        .unwrap();

    assert_eq!(network.graph.edge_count(), 2);
    assert_eq!(network.stats.bridges, 2);
    assert_well_formed(&network.graph, &field);
}
