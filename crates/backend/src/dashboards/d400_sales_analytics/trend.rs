use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_sales_analytics::{
    BranchFilter, SalesRecord, TrendAxis, TrendPoint, TrendSeries,
};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_WINDOW: usize = 3;

/// Ordinary least squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit over x = 0..n-1. Fewer than two points give a flat line at the mean.
    pub fn fit(values: &[f64]) -> Self {
        let n = values.len() as f64;
        if values.is_empty() {
            return Self {
                slope: 0.0,
                intercept: 0.0,
            };
        }
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            num += dx * (y - y_mean);
            den += dx * dx;
        }

        let slope = if den.abs() < 1e-12 { 0.0 } else { num / den };
        Self {
            slope,
            intercept: y_mean - slope * x_mean,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Trailing rolling mean; `None` until the window is full or when the
/// window contains an undefined value.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let total: Option<f64> = slice.iter().copied().sum();
            total.map(|t| t / window as f64)
        })
        .collect()
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Units per period of one product, ordered by date.
///
/// With `All` the product's records are summed per (year, month); with a
/// specific branch the records were already narrowed upstream and are used
/// one point per record.
fn units_by_period(
    records: &[SalesRecord],
    product: &str,
    branch: &BranchFilter,
) -> Vec<(NaiveDate, Option<f64>)> {
    let product_records = records.iter().filter(|r| r.product == product);

    let mut points: Vec<(NaiveDate, Option<f64>)> = if branch.is_all() {
        let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for r in product_records {
            let entry = totals.entry(r.period()).or_insert(0.0);
            if r.units_sold.is_finite() {
                *entry += r.units_sold;
            }
        }
        totals
            .into_iter()
            .filter_map(|((year, month), units)| {
                Some((first_of_month(year, month)?, Some(units)))
            })
            .collect()
    } else {
        product_records
            .filter_map(|r| {
                let units = r.units_sold.is_finite().then_some(r.units_sold);
                Some((first_of_month(r.year, r.month)?, units))
            })
            .collect()
    };

    points.sort_by_key(|(date, _)| *date);
    points
}

/// Gridline and tick metadata for the dates of a series
pub fn build_axis(dates: &[NaiveDate]) -> TrendAxis {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return TrendAxis::default();
    };

    let years: Vec<i32> = dates
        .iter()
        .map(|d| d.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let year_starts = years
        .iter()
        .filter_map(|&y| first_of_month(y, 1))
        .collect();

    let mut month_starts = Vec::new();
    let (mut year, mut month) = (first.year(), first.month());
    while let Some(date) = first_of_month(year, month) {
        if date > *last {
            break;
        }
        month_starts.push(date);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    TrendAxis {
        years,
        year_starts,
        month_starts,
    }
}

/// Smoothed units series and linear trend for one product.
///
/// `records` must already be filtered by `branch`. Returns `None` when the
/// product has no records in the selection.
pub fn build_trend(
    records: &[SalesRecord],
    product: &str,
    branch: &BranchFilter,
    window: usize,
) -> Option<TrendSeries> {
    let periods = units_by_period(records, product, branch);
    if periods.is_empty() {
        return None;
    }

    let units: Vec<Option<f64>> = periods.iter().map(|(_, u)| *u).collect();
    let smoothed = rolling_mean(&units, window);

    // Undefined smoothed values enter the fit as 0
    let fit_input: Vec<f64> = smoothed.iter().map(|s| s.unwrap_or(0.0)).collect();
    let fit = LinearFit::fit(&fit_input);

    let dates: Vec<NaiveDate> = periods.iter().map(|(d, _)| *d).collect();
    let points = periods
        .iter()
        .zip(&smoothed)
        .enumerate()
        .map(|(i, ((date, units), smoothed))| TrendPoint {
            date: *date,
            units_sold: *units,
            smoothed_units: *smoothed,
            trend: fit.evaluate(i as f64),
        })
        .collect();

    Some(TrendSeries {
        product: product.to_string(),
        branch: branch.clone(),
        window: window.max(1),
        slope: fit.slope,
        intercept: fit.intercept,
        points,
        axis: build_axis(&dates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(branch: &str, product: &str, year: i32, month: u32, units: f64) -> SalesRecord {
        SalesRecord {
            branch: branch.to_string(),
            product: product.to_string(),
            year,
            month,
            units_sold: units,
            total_revenue: units * 10.0,
            total_cost: units * 5.0,
        }
    }

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_rolling_mean_window_three() {
        let smoothed = rolling_mean(&[Some(10.0), Some(20.0), Some(30.0)], 3);
        assert_eq!(smoothed, vec![None, None, Some(20.0)]);
    }

    #[test]
    fn test_rolling_mean_undefined_in_window() {
        let smoothed = rolling_mean(&[Some(3.0), None, Some(3.0), Some(3.0), Some(3.0)], 3);
        assert_eq!(smoothed, vec![None, None, None, None, Some(3.0)]);
    }

    #[test]
    fn test_fit_positive_slope() {
        let fit = LinearFit::fit(&[0.0, 0.0, 20.0]);
        assert!(fit.slope > 0.0);
        assert!((fit.slope - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_constant_series_is_flat() {
        let fit = LinearFit::fit(&[5.0, 5.0, 5.0, 5.0]);
        assert!(fit.slope.abs() < 1e-12);
        for x in 0..4 {
            assert!((fit.evaluate(x as f64) - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_degenerate_inputs() {
        assert_eq!(LinearFit::fit(&[]).evaluate(3.0), 0.0);
        let single = LinearFit::fit(&[7.0]);
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.evaluate(0.0), 7.0);
    }

    #[test]
    fn test_all_branches_sums_per_period() {
        let records = vec![
            rec("N", "A", 2023, 2, 5.0),
            rec("N", "A", 2023, 1, 10.0),
            rec("S", "A", 2023, 1, 5.0),
            rec("S", "B", 2023, 1, 99.0),
            rec("S", "A", 2023, 3, 15.0),
        ];
        let series = build_trend(&records, "A", &BranchFilter::All, 3).unwrap();
        let units: Vec<Option<f64>> = series.points.iter().map(|p| p.units_sold).collect();
        assert_eq!(units, vec![Some(15.0), Some(5.0), Some(15.0)]);
        assert_eq!(series.points[0].date, date(2023, 1));
        assert_eq!(series.points[2].smoothed_units, Some(35.0 / 3.0));
    }

    #[test]
    fn test_single_branch_uses_records_directly() {
        let records = vec![
            rec("N", "A", 2023, 3, 30.0),
            rec("N", "A", 2023, 1, 10.0),
            rec("N", "A", 2023, 2, 20.0),
        ];
        let branch = BranchFilter::from("N");
        let series = build_trend(&records, "A", &branch, 3).unwrap();
        let smoothed: Vec<Option<f64>> = series.points.iter().map(|p| p.smoothed_units).collect();
        assert_eq!(smoothed, vec![None, None, Some(20.0)]);
        // Fit over [0, 0, 20]
        assert!(series.slope > 0.0);
        assert!(series.points[2].trend > series.points[0].trend);
        assert_eq!(series.branch, branch);
    }

    #[test]
    fn test_missing_product_is_none() {
        let records = vec![rec("N", "A", 2023, 1, 1.0)];
        assert!(build_trend(&records, "Nope", &BranchFilter::All, 3).is_none());
    }

    #[test]
    fn test_axis_metadata() {
        let axis = build_axis(&[date(2022, 11), date(2023, 2), date(2022, 12)]);
        assert_eq!(axis.years, vec![2022, 2023]);
        assert_eq!(axis.year_starts, vec![date(2022, 1), date(2023, 1)]);
        assert_eq!(
            axis.month_starts,
            vec![date(2022, 11), date(2022, 12), date(2023, 1), date(2023, 2)]
        );
    }

    #[test]
    fn test_axis_empty() {
        assert_eq!(build_axis(&[]), TrendAxis::default());
    }
}
