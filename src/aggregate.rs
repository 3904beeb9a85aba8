use crate::factors::EmissionFactorTable;
use crate::models::{ActivityRecord, AggregateResult, Category, DegradedCategory, Period};
use std::collections::BTreeMap;
use tracing::debug;

pub fn aggregate(
    table: &EmissionFactorTable,
    records: &[ActivityRecord],
    period: Period,
) -> AggregateResult {
    aggregate_partial(table, records, period, Vec::new())
}

// Degraded categories are left out rather than reported as zero.
pub fn aggregate_partial(
    table: &EmissionFactorTable,
    records: &[ActivityRecord],
    period: Period,
    degraded: Vec<DegradedCategory>,
) -> AggregateResult {
    let mut contributions: BTreeMap<Category, Vec<f64>> = Category::ALL
        .iter()
        .filter(|category| !degraded.iter().any(|d| d.category == **category))
        .map(|category| (*category, Vec::new()))
        .collect();

    for record in records {
        if !period.contains(record.date()) {
            debug!(date = %record.date(), %period, "skipping record outside period");
            continue;
        }
        if let Some(values) = contributions.get_mut(&record.category()) {
            values.push(table.emission_of(record));
        }
    }

    let subtotals: BTreeMap<Category, f64> = contributions
        .into_iter()
        .map(|(category, values)| (category, stable_sum(values)))
        .collect();
    let total = stable_sum(subtotals.values().copied().collect());

    AggregateResult {
        period,
        per_category: subtotals
            .into_iter()
            .map(|(category, value)| (category, round2(value)))
            .collect(),
        total: round2(total),
        degraded,
    }
}

pub fn round2(value: f64) -> f64 {
    // 1.275 * 100.0 is 127.49999999999999; snapping the scaled value to six
    // decimals first lets exact halves round up.
    let scaled = value * 100.0;
    let snapped = format!("{scaled:.6}").parse::<f64>().unwrap_or(scaled);
    snapped.round() / 100.0
}

// Sorting first makes the float sum independent of input order.
fn stable_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
