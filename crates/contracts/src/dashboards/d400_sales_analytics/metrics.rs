use serde::{Deserialize, Serialize};

use super::dto::ProductSummary;

/// Signed percentage change of `current` against `previous`.
///
/// Returns 0 when either side is undefined or `previous` is zero: a product
/// without history reports "no change" instead of an infinite delta.
pub fn percent_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    let (Some(current), Some(previous)) = (current, previous) else {
        return 0.0;
    };
    if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Period-over-period deltas shown next to each metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub price_pct: f64,
    pub margin_pct: f64,
    pub units_pct: f64,
}

impl MetricDeltas {
    pub fn from_summary(summary: &ProductSummary) -> Self {
        Self {
            price_pct: percent_change(summary.average_price, summary.previous_average_price),
            margin_pct: percent_change(summary.average_margin, summary.previous_average_margin),
            units_pct: percent_change(
                Some(summary.total_units_sold),
                Some(summary.previous_total_units_sold),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ProductSummary {
        ProductSummary {
            product: "A".to_string(),
            average_price: Some(11.0),
            previous_average_price: Some(10.0),
            average_margin: Some(0.5),
            previous_average_margin: Some(0.5),
            total_units_sold: 250.0,
            previous_total_units_sold: 100.0,
        }
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(Some(11.0), Some(10.0)) - 10.0).abs() < 1e-9);
        assert!((percent_change(Some(5.0), Some(10.0)) + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_undefined_previous_is_zero() {
        assert_eq!(percent_change(Some(10.0), None), 0.0);
        assert_eq!(percent_change(Some(10.0), Some(0.0)), 0.0);
        assert_eq!(percent_change(Some(10.0), Some(f64::NAN)), 0.0);
        assert_eq!(percent_change(None, Some(10.0)), 0.0);
    }

    #[test]
    fn test_deltas_from_summary() {
        let deltas = summary().deltas();
        assert!((deltas.price_pct - 10.0).abs() < 1e-9);
        assert_eq!(deltas.margin_pct, 0.0);
        assert!((deltas.units_pct - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_deltas_single_record_product() {
        let s = ProductSummary {
            previous_average_price: None,
            previous_average_margin: None,
            previous_total_units_sold: 0.0,
            ..summary()
        };
        assert_eq!(s.deltas(), MetricDeltas::default());
    }
}
