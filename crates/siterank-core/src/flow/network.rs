//! Capacitated flow network over candidate districts.
//!
//! The network models customer traffic as a single-commodity flow: a
//! synthetic SOURCE feeds each district with its external inflow, districts
//! exchange floating population, and each district drains into a synthetic
//! SINK at its purchase-conversion rate. Capacities come from observed
//! movement data when available and from a [`HeuristicProfile`] otherwise.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{is_percent, HeuristicProfile};
use crate::error::SiteRankError;
use crate::types::{decimal_to_u64, AdjacencyMap, LocationDataset, MovementTable, SINK, SOURCE};
use crate::SiteRankResult;

/// Directed graph with non-negative integer capacities and a residual
/// mirror. Node identifiers are district names plus the reserved `SOURCE`
/// and `SINK`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowNetwork {
    nodes: BTreeSet<String>,
    edges: BTreeMap<String, BTreeMap<String, u64>>,
    residual: BTreeMap<String, BTreeMap<String, u64>>,
    edge_count: usize,
    total_capacity: u64,
}

/// Summary counters for a built network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_capacity: u64,
}

impl FlowNetwork {
    pub fn new() -> Self {
        let mut network = FlowNetwork::default();
        network.nodes.insert(SOURCE.to_string());
        network.nodes.insert(SINK.to_string());
        network
    }

    /// Insert a directed edge. Zero capacity is a no-op; each direction is
    /// inserted independently. Re-inserting an edge overwrites its capacity.
    pub fn add_edge(&mut self, from: &str, to: &str, capacity: u64) {
        if capacity == 0 {
            return;
        }
        let previous = self
            .edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), capacity);
        self.residual
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), capacity);
        // Reverse residual edge for flow cancellation, capacity 0 if absent.
        self.residual
            .entry(to.to_string())
            .or_default()
            .entry(from.to_string())
            .or_insert(0);

        self.nodes.insert(from.to_string());
        self.nodes.insert(to.to_string());
        match previous {
            Some(old) => self.total_capacity = self.total_capacity - old + capacity,
            None => {
                self.edge_count += 1;
                self.total_capacity += capacity;
            }
        }
    }

    pub fn capacity(&self, from: &str, to: &str) -> u64 {
        self.edges
            .get(from)
            .and_then(|dests| dests.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub fn info(&self) -> NetworkInfo {
        NetworkInfo {
            node_count: self.nodes.len(),
            edge_count: self.edge_count,
            total_capacity: self.total_capacity,
        }
    }

    pub(crate) fn residual_neighbors<'a>(
        &'a self,
        node: &str,
    ) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        self.residual
            .get(node)
            .into_iter()
            .flat_map(|dests| dests.iter().map(|(to, cap)| (to.as_str(), *cap)))
    }

    pub(crate) fn residual_capacity(&self, from: &str, to: &str) -> u64 {
        self.residual
            .get(from)
            .and_then(|dests| dests.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn adjust_residual(&mut self, from: &str, to: &str, delta: i64) {
        if let Some(cap) = self.residual.get_mut(from).and_then(|d| d.get_mut(to)) {
            *cap = (*cap as i64 + delta).max(0) as u64;
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`FlowNetwork`] from district datasets, preferring observed
/// movement counts and falling back to profile heuristics.
#[derive(Debug, Clone)]
pub struct NetworkBuilder<'a> {
    profile: &'a HeuristicProfile,
    adjacency: &'a AdjacencyMap,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(profile: &'a HeuristicProfile, adjacency: &'a AdjacencyMap) -> Self {
        NetworkBuilder { profile, adjacency }
    }

    /// Build the network. N districts yield N+2 nodes; an empty district
    /// list yields SOURCE/SINK with no edges, which is valid and solves to
    /// zero flow.
    pub fn build(
        &self,
        locations: &[LocationDataset],
        movement: Option<&MovementTable>,
    ) -> SiteRankResult<FlowNetwork> {
        for loc in locations {
            validate_location(loc)?;
        }

        let mut network = FlowNetwork::new();
        match movement {
            Some(table) => self.build_from_movement(&mut network, locations, table),
            None => self.build_from_estimates(&mut network, locations),
        }
        Ok(network)
    }

    fn build_from_estimates(&self, network: &mut FlowNetwork, locations: &[LocationDataset]) {
        let hundred = Decimal::from(100u64);

        for loc in locations {
            let population = Decimal::from(loc.population.population_max);
            let non_resident = loc.population.non_resident_ratio / hundred;
            let inflow = decimal_to_u64(population * non_resident * self.profile.source_scale);
            network.add_edge(SOURCE, &loc.name, inflow.max(self.profile.source_floor));
        }

        for (i, a) in locations.iter().enumerate() {
            for b in locations.iter().skip(i + 1) {
                let smaller = a.population.population_max.min(b.population.population_max);
                let base = decimal_to_u64(Decimal::from(smaller) * self.profile.link_scale)
                    .max(self.profile.link_floor);
                let multiplier = if self.adjacency.are_adjacent(&a.name, &b.name) {
                    self.profile.adjacent_multiplier
                } else {
                    self.profile.distant_multiplier
                };
                let capacity = base.saturating_mul(multiplier);
                network.add_edge(&a.name, &b.name, capacity);
                network.add_edge(&b.name, &a.name, capacity);
            }
        }

        for loc in locations {
            let payments = Decimal::from(loc.commercial.payment_count);
            let conversion = decimal_to_u64(payments * self.profile.sink_conversion);
            network.add_edge(&loc.name, SINK, conversion.max(self.profile.sink_floor));
        }
    }

    fn build_from_movement(
        &self,
        network: &mut FlowNetwork,
        locations: &[LocationDataset],
        table: &MovementTable,
    ) {
        let divisor = self.profile.peak_hour_divisor.max(1);

        // SOURCE → district: inflow not explained by candidate-set movement.
        for loc in locations {
            let total_inflow = table.daily_inflow.get(&loc.name).copied().unwrap_or(0);
            let from_candidates =
                table.inbound_from(locations.iter().map(|l| l.name.as_str()), &loc.name);
            let external = total_inflow.saturating_sub(from_candidates);
            network.add_edge(SOURCE, &loc.name, external / divisor);
        }

        // district → district: observed pairwise movement only.
        for from in locations {
            for to in locations {
                if from.name == to.name {
                    continue;
                }
                let daily = table.count(&from.name, &to.name);
                network.add_edge(&from.name, &to.name, daily / divisor);
            }
        }

        // district → SINK: daily purchase conversions at peak hour.
        for loc in locations {
            let daily_customers =
                loc.commercial.payment_count / self.profile.days_per_month.max(1);
            let conversion = (daily_customers / divisor).max(self.profile.sink_floor);
            network.add_edge(&loc.name, SINK, conversion);
        }
    }
}

fn validate_location(loc: &LocationDataset) -> SiteRankResult<()> {
    if loc.name.is_empty() || loc.name == SOURCE || loc.name == SINK {
        return Err(SiteRankError::InvalidInput {
            field: "name".into(),
            reason: format!("'{}' is empty or a reserved node identifier", loc.name),
        });
    }
    if !is_percent(loc.population.non_resident_ratio) {
        return Err(SiteRankError::MalformedNetwork(format!(
            "{}: non-resident ratio {} outside [0, 100] would produce a negative capacity",
            loc.name, loc.population.non_resident_ratio
        )));
    }
    Ok(())
}
