use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_sales_analytics::TrendSeries;

/// Mapping of dates and unit values onto the SVG canvas of a trend chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    x_min: i32,
    x_max: i32,
    pub y_max: f64,
}

impl ChartGeometry {
    pub const MARGIN_LEFT: f64 = 56.0;
    pub const MARGIN_RIGHT: f64 = 16.0;
    pub const MARGIN_TOP: f64 = 16.0;
    pub const MARGIN_BOTTOM: f64 = 32.0;

    /// The x range covers every point and every year boundary, the y range
    /// starts at 0 and ends at a rounded tick above the highest value.
    pub fn for_series(series: &TrendSeries, width: f64, height: f64) -> Self {
        let days = series
            .points
            .iter()
            .map(|p| p.date)
            .chain(series.axis.year_starts.iter().copied())
            .map(|d| d.num_days_from_ce());
        let (x_min, x_max) = days.fold((i32::MAX, i32::MIN), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });
        let (x_min, x_max) = if x_min > x_max { (0, 0) } else { (x_min, x_max) };

        let highest = series
            .points
            .iter()
            .flat_map(|p| [p.smoothed_units.unwrap_or(0.0), p.trend])
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let step = nice_step(highest / 5.0);
        let y_max = ((highest / step).ceil() * step).max(step);

        Self {
            width,
            height,
            left: Self::MARGIN_LEFT,
            right: width - Self::MARGIN_RIGHT,
            top: Self::MARGIN_TOP,
            bottom: height - Self::MARGIN_BOTTOM,
            x_min,
            x_max,
            y_max,
        }
    }

    pub fn x(&self, date: NaiveDate) -> f64 {
        let span = (self.x_max - self.x_min) as f64;
        if span <= 0.0 {
            return (self.left + self.right) / 2.0;
        }
        let t = (date.num_days_from_ce() - self.x_min) as f64 / span;
        self.left + t * (self.right - self.left)
    }

    /// Values below 0 are clamped to the x axis
    pub fn y(&self, value: f64) -> f64 {
        let t = (value.max(0.0) / self.y_max).min(1.0);
        self.bottom - t * (self.bottom - self.top)
    }

    /// Polyline `points` attributes, split wherever a value is undefined
    pub fn segments(
        &self,
        values: impl IntoIterator<Item = (NaiveDate, Option<f64>)>,
    ) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for (date, value) in values {
            match value.filter(|v| v.is_finite()) {
                Some(v) => current.push(format!("{:.1},{:.1}", self.x(date), self.y(v))),
                None if !current.is_empty() => {
                    segments.push(std::mem::take(&mut current).join(" "))
                }
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current.join(" "));
        }
        segments
    }

    /// Horizontal gridline values from 0 to `y_max`
    pub fn y_ticks(&self) -> Vec<f64> {
        let step = nice_step(self.y_max / 5.0);
        (0..)
            .map(|i| i as f64 * step)
            .take_while(|v| *v <= self.y_max + step * 1e-9)
            .collect()
    }
}

/// 1, 2 or 5 times a power of ten, not below `raw`
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Tick label for a year boundary
pub fn year_label(date: NaiveDate) -> String {
    date.year().to_string()
}
