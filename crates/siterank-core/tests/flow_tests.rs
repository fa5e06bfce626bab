use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use siterank_core::config::HeuristicProfile;
use siterank_core::flow::{analyze_flow, solve_max_flow, FlowNetwork, NetworkBuilder};
use siterank_core::types::{
    AdjacencyMap, AgeDistribution, CommercialMetrics, LocationDataset, PopulationMetrics, SINK,
    SOURCE,
};

// ===========================================================================
// Flow network and Edmonds-Karp solver tests
// Properties: known-graph optimality, capacity respect, flow conservation,
// and the end-to-end estimation scenario.
// ===========================================================================

fn district(name: &str, population_max: u64, non_resident: Decimal, payments: u64) -> LocationDataset {
    LocationDataset {
        name: name.to_string(),
        region: "Seoul".to_string(),
        population: PopulationMetrics {
            population_min: population_max / 2,
            population_max,
            age_distribution: AgeDistribution::default(),
            female_ratio: dec!(50),
            resident_ratio: dec!(100) - non_resident,
            non_resident_ratio: non_resident,
            designated_tourist_zone: false,
        },
        commercial: CommercialMetrics {
            payment_count: payments,
            ..CommercialMetrics::default()
        },
        rent: None,
        sales: None,
        subway_access: false,
    }
}

// ---------------------------------------------------------------------------
// Known small graphs
// ---------------------------------------------------------------------------

#[test]
fn test_parallel_paths_max_flow_is_fifteen() {
    let mut network = FlowNetwork::new();
    network.add_edge(SOURCE, "A", 10);
    network.add_edge("A", SINK, 10);
    network.add_edge(SOURCE, "B", 5);
    network.add_edge("B", SINK, 5);

    let solution = solve_max_flow(network);
    assert_eq!(solution.max_flow, 15);
}

#[test]
fn test_flow_never_exceeds_capacity() {
    let mut network = FlowNetwork::new();
    network.add_edge(SOURCE, "A", 12);
    network.add_edge(SOURCE, "B", 7);
    network.add_edge("A", "B", 4);
    network.add_edge("B", "A", 2);
    network.add_edge("A", SINK, 9);
    network.add_edge("B", SINK, 8);
    let capacities = network.clone();

    let solution = solve_max_flow(network);
    assert!(solution.max_flow > 0);
    for ((from, to), flow) in &solution.flows {
        assert!(
            *flow <= capacities.capacity(from, to),
            "{} -> {} routed {} over capacity {}",
            from,
            to,
            flow,
            capacities.capacity(from, to)
        );
    }
}

#[test]
fn test_flow_conservation_at_every_district() {
    let mut network = FlowNetwork::new();
    network.add_edge(SOURCE, "A", 20);
    network.add_edge(SOURCE, "B", 10);
    network.add_edge("A", "B", 6);
    network.add_edge("A", "C", 5);
    network.add_edge("B", "C", 8);
    network.add_edge("A", SINK, 9);
    network.add_edge("B", SINK, 7);
    network.add_edge("C", SINK, 11);

    let solution = solve_max_flow(network);
    for node in ["A", "B", "C"] {
        let inflow: u64 = solution
            .flows
            .iter()
            .filter(|((_, to), _)| to == node)
            .map(|(_, f)| *f)
            .sum();
        let outflow: u64 = solution
            .flows
            .iter()
            .filter(|((from, _), _)| from == node)
            .map(|(_, f)| *f)
            .sum();
        assert_eq!(inflow, outflow, "conservation violated at {}", node);
    }
}

#[test]
fn test_analyzer_balance_is_zero_in_a_valid_flow() {
    let mut network = FlowNetwork::new();
    network.add_edge(SOURCE, "A", 15);
    network.add_edge("A", "B", 10);
    network.add_edge("A", SINK, 5);
    network.add_edge("B", SINK, 10);

    let solution = solve_max_flow(network);
    let metrics = analyze_flow(&solution, ["A", "B"]);
    for (name, m) in &metrics {
        assert_eq!(m.balance, 0, "non-zero balance at {}", name);
        assert!(m.efficiency >= Decimal::ZERO && m.efficiency <= Decimal::ONE);
    }
}

// ---------------------------------------------------------------------------
// End-to-end estimation scenario
// ---------------------------------------------------------------------------

#[test]
fn test_three_district_scenario_produces_positive_flow() {
    let locations = [
        district("Gangnam", 100000, dec!(50), 50000),
        district("Hongdae", 80000, dec!(50), 40000),
        district("Mullae", 20000, dec!(50), 5000),
    ];
    let profile = HeuristicProfile::estimated();
    let adjacency = AdjacencyMap::new();

    let network = NetworkBuilder::new(&profile, &adjacency)
        .build(&locations, None)
        .unwrap();
    assert_eq!(network.info().node_count, 5);

    let solution = solve_max_flow(network);
    assert!(solution.max_flow > 0, "expected positive max flow");

    let metrics = analyze_flow(&solution, locations.iter().map(|l| l.name.as_str()));
    assert_eq!(metrics.len(), 3);
    for (name, m) in &metrics {
        assert!(
            m.efficiency >= Decimal::ZERO && m.efficiency <= Decimal::ONE,
            "{} efficiency {} out of range",
            name,
            m.efficiency
        );
    }
}

#[test]
fn test_empty_candidate_set_solves_to_zero_flow() {
    let profile = HeuristicProfile::estimated();
    let adjacency = AdjacencyMap::new();
    let network = NetworkBuilder::new(&profile, &adjacency).build(&[], None).unwrap();
    let solution = solve_max_flow(network);
    assert_eq!(solution.max_flow, 0);
}

#[test]
fn test_solver_is_deterministic_across_runs() {
    let locations = [
        district("Gangnam", 100000, dec!(50), 50000),
        district("Hongdae", 80000, dec!(50), 40000),
        district("Mullae", 20000, dec!(50), 5000),
    ];
    let profile = HeuristicProfile::estimated();
    let adjacency = AdjacencyMap::new();

    let first = solve_max_flow(
        NetworkBuilder::new(&profile, &adjacency)
            .build(&locations, None)
            .unwrap(),
    );
    let second = solve_max_flow(
        NetworkBuilder::new(&profile, &adjacency)
            .build(&locations, None)
            .unwrap(),
    );
    assert_eq!(first.max_flow, second.max_flow);
    assert_eq!(first.flows, second.flows);
}
