//! Output formatting for the CLI.
//!
//! All commands produce a `serde_json::Value`; the formatters here render
//! it as pretty JSON, a table, CSV, or a minimal one-line-per-district view.

use colored::Colorize;
use serde_json::Value;
use std::io;
use tabled::{builder::Builder, Table};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_table(value),
        OutputFormat::Csv => print_csv(value),
        OutputFormat::Minimal => print_minimal(value),
    }
    print_warnings(value);
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Rows for the main table: recommendations if present, otherwise the
/// per-district map from `flow`/`score`, otherwise a flat field/value dump.
fn recommendation_rows(value: &Value) -> Option<Vec<Vec<String>>> {
    let recs = value
        .get("result")
        .and_then(|r| r.get("recommendations"))
        .and_then(|r| r.as_array())?;
    let mut rows = vec![vec![
        "rank".to_string(),
        "district".to_string(),
        "region".to_string(),
        "score".to_string(),
        "revenue".to_string(),
        "merchants".to_string(),
        "price".to_string(),
    ]];
    for (i, rec) in recs.iter().enumerate() {
        rows.push(vec![
            (i + 1).to_string(),
            field_string(rec, "name"),
            field_string(rec, "region"),
            field_string(rec, "score"),
            field_string(rec.get("metrics").unwrap_or(&Value::Null), "monthly_revenue"),
            field_string(rec.get("metrics").unwrap_or(&Value::Null), "merchant_count"),
            field_string(rec.get("metrics").unwrap_or(&Value::Null), "price_point"),
        ]);
    }
    Some(rows)
}

fn district_rows(value: &Value) -> Option<Vec<Vec<String>>> {
    let districts = value.get("districts")?.as_object()?;
    let mut rows = vec![vec!["district".to_string(), "detail".to_string()]];
    for (name, detail) in districts {
        rows.push(vec![name.clone(), compact(detail)]);
    }
    Some(rows)
}

fn print_table(value: &Value) {
    let rows = recommendation_rows(value)
        .or_else(|| district_rows(value))
        .unwrap_or_else(|| flat_rows(value));

    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn flat_rows(value: &Value) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["field".to_string(), "value".to_string()]];
    if let Value::Object(map) = value {
        for (key, val) in map {
            rows.push(vec![key.clone(), compact(val)]);
        }
    } else {
        rows.push(vec!["value".to_string(), compact(value)]);
    }
    rows
}

fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let rows = recommendation_rows(value)
        .or_else(|| district_rows(value))
        .unwrap_or_else(|| flat_rows(value));
    for row in rows {
        let _ = wtr.write_record(&row);
    }
    let _ = wtr.flush();
}

/// One line per district: `rank. name  score`.
fn print_minimal(value: &Value) {
    if let Some(rows) = recommendation_rows(value) {
        for row in rows.iter().skip(1) {
            println!("{}. {}  {}", row[0], row[1], row[3]);
        }
        return;
    }
    if let Some(max_flow) = value.get("max_flow") {
        println!("{}", max_flow);
        return;
    }
    println!("{}", compact(value));
}

fn print_warnings(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for warning in warnings {
            if let Value::String(text) = warning {
                eprintln!("{}: {}", "warning".yellow().bold(), text);
            }
        }
    }
}

fn field_string(value: &Value, key: &str) -> String {
    value.get(key).map(compact).unwrap_or_default()
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
