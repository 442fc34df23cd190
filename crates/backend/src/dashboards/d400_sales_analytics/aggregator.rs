use contracts::dashboards::d400_sales_analytics::{ProductSummary, SalesRecord};
use std::collections::BTreeMap;

/// Sales record with its derived metrics and the values of the same
/// product's previous period
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord<'a> {
    pub record: &'a SalesRecord,
    pub avg_price: Option<f64>,
    pub margin: Option<f64>,
    pub prev_avg_price: Option<f64>,
    pub prev_margin: Option<f64>,
    pub prev_units_sold: Option<f64>,
}

/// Division that yields `None` instead of inf/NaN
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Arithmetic mean over the defined values, `None` if there are none
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sum over the defined values; nothing defined sums to 0
fn sum(values: impl Iterator<Item = Option<f64>>) -> f64 {
    values.flatten().sum()
}

/// Group records by product, each group in chronological order.
///
/// Records of the same period keep their input order.
pub fn partition_by_product(records: &[SalesRecord]) -> BTreeMap<&str, Vec<&SalesRecord>> {
    let mut partitions: BTreeMap<&str, Vec<&SalesRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(record.product.as_str())
            .or_default()
            .push(record);
    }
    for group in partitions.values_mut() {
        group.sort_by_key(|r| r.period());
    }
    partitions
}

/// Derive price and margin for every record and attach the previous
/// period's values (lag of 1 within each product).
pub fn derive_records(records: &[SalesRecord]) -> BTreeMap<&str, Vec<DerivedRecord<'_>>> {
    partition_by_product(records)
        .into_iter()
        .map(|(product, group)| {
            let mut derived: Vec<DerivedRecord<'_>> = Vec::with_capacity(group.len());
            for record in group {
                let avg_price = ratio(record.total_revenue, record.units_sold);
                let margin = ratio(
                    record.total_revenue - record.total_cost,
                    record.total_revenue,
                );
                let (prev_avg_price, prev_margin, prev_units_sold) = match derived.last() {
                    Some(prev) => (prev.avg_price, prev.margin, defined(prev.record.units_sold)),
                    None => (None, None, None),
                };
                derived.push(DerivedRecord {
                    record,
                    avg_price,
                    margin,
                    prev_avg_price,
                    prev_margin,
                    prev_units_sold,
                });
            }
            (product, derived)
        })
        .collect()
}

/// Per-product summary of the given (already branch-filtered) records,
/// sorted by product name.
pub fn compute_summary(records: &[SalesRecord]) -> Vec<ProductSummary> {
    derive_records(records)
        .into_iter()
        .map(|(product, group)| ProductSummary {
            product: product.to_string(),
            average_price: mean(group.iter().map(|d| d.avg_price)),
            previous_average_price: mean(group.iter().map(|d| d.prev_avg_price)),
            average_margin: mean(group.iter().map(|d| d.margin)),
            previous_average_margin: mean(group.iter().map(|d| d.prev_margin)),
            total_units_sold: sum(group.iter().map(|d| defined(d.record.units_sold))),
            previous_total_units_sold: sum(group.iter().map(|d| d.prev_units_sold)),
        })
        .collect()
}
