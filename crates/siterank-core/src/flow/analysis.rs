//! Per-district metrics derived from a solved flow.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::flow::solver::MaxFlowSolution;
use crate::types::{Fraction, SINK, SOURCE};

/// How traffic moved through one district in the solved flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Inflow routed directly from SOURCE.
    pub from_source: u64,
    /// Inflow routed from other districts.
    pub from_others: u64,
    /// Outflow converting at SINK.
    pub to_sink: u64,
    /// Outflow routed onward to other districts.
    pub to_others: u64,
    pub total_inflow: u64,
    pub total_outflow: u64,
    /// `to_sink / total_inflow`; 0 when nothing flows in.
    pub efficiency: Fraction,
    /// `total_inflow − total_outflow`. Zero for every district in a valid
    /// flow; kept as a consistency signal.
    pub balance: i64,
}

/// Derive per-district flow metrics. Read-only over the solution.
pub fn analyze_flow<'a>(
    solution: &MaxFlowSolution,
    names: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, FlowMetrics> {
    let mut metrics = BTreeMap::new();

    for name in names {
        let mut m = FlowMetrics::default();

        for ((from, to), flow) in &solution.flows {
            if to == name {
                if from == SOURCE {
                    m.from_source += flow;
                } else {
                    m.from_others += flow;
                }
            } else if from == name {
                if to == SINK {
                    m.to_sink += flow;
                } else {
                    m.to_others += flow;
                }
            }
        }

        m.total_inflow = m.from_source + m.from_others;
        m.total_outflow = m.to_sink + m.to_others;
        m.efficiency = if m.total_inflow > 0 {
            Decimal::from(m.to_sink) / Decimal::from(m.total_inflow)
        } else {
            Decimal::ZERO
        };
        m.balance = m.total_inflow as i64 - m.total_outflow as i64;

        metrics.insert(name.to_string(), m);
    }

    metrics
}
