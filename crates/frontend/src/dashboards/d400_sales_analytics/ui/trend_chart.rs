use contracts::dashboards::d400_sales_analytics::TrendSeries;
use leptos::prelude::*;

use crate::dashboards::d400_sales_analytics::chart_geometry::{year_label, ChartGeometry};
use crate::shared::number_format::format_units;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;

/// Monthly units chart: smoothed series, linear trend, month and year gridlines
#[component]
pub fn TrendChart(series: TrendSeries) -> impl IntoView {
    let g = ChartGeometry::for_series(&series, WIDTH, HEIGHT);
    let coord = |v: f64| format!("{:.1}", v);

    let month_lines = series
        .axis
        .month_starts
        .iter()
        .map(|d| {
            let x = coord(g.x(*d));
            view! {
                <line
                    class="d400-chart__grid-month"
                    x1=x.clone() x2=x
                    y1=coord(g.top) y2=coord(g.bottom)
                    stroke="gray" stroke-width="0.5" stroke-dasharray="4 4" stroke-opacity="0.5"
                />
            }
        })
        .collect_view();

    let year_lines = series
        .axis
        .year_starts
        .iter()
        .map(|d| {
            let x = coord(g.x(*d));
            view! {
                <line
                    class="d400-chart__grid-year"
                    x1=x.clone() x2=x.clone()
                    y1=coord(g.top) y2=coord(g.bottom)
                    stroke="black" stroke-width="1" stroke-opacity="0.8"
                />
                <text x=x y=coord(g.bottom + 20.0) text-anchor="middle" class="d400-chart__tick">
                    {year_label(*d)}
                </text>
            }
        })
        .collect_view();

    let y_grid = g
        .y_ticks()
        .into_iter()
        .map(|v| {
            let y = coord(g.y(v));
            view! {
                <line
                    x1=coord(g.left) x2=coord(g.right)
                    y1=y.clone() y2=y.clone()
                    stroke="#ccc" stroke-width="0.5" stroke-dasharray="4 4"
                />
                <text
                    x=coord(g.left - 6.0) y=y
                    text-anchor="end" dominant-baseline="middle"
                    class="d400-chart__tick"
                >
                    {format_units(v)}
                </text>
            }
        })
        .collect_view();

    let smoothed = g
        .segments(series.points.iter().map(|p| (p.date, p.smoothed_units)))
        .into_iter()
        .map(|points| {
            view! {
                <polyline points=points fill="none" stroke="#2271b3" stroke-width="2" />
            }
        })
        .collect_view();

    let trend = g
        .segments(series.points.iter().map(|p| (p.date, Some(p.trend))))
        .into_iter()
        .map(|points| {
            view! {
                <polyline
                    points=points fill="none"
                    stroke="red" stroke-width="1.5" stroke-dasharray="6 4"
                />
            }
        })
        .collect_view();

    let view_box = format!("0 0 {} {}", WIDTH, HEIGHT);
    let product = series.product.clone();

    view! {
        <figure class="d400-chart">
            <figcaption class="d400-chart__title">"Monthly sales evolution"</figcaption>
            <svg viewBox=view_box class="d400-chart__svg" role="img">
                {y_grid}
                {month_lines}
                {year_lines}
                <line
                    x1=coord(g.left) x2=coord(g.right)
                    y1=coord(g.bottom) y2=coord(g.bottom)
                    stroke="black" stroke-width="1"
                />
                {smoothed}
                {trend}
            </svg>
            <div class="d400-chart__legend">
                <span class="d400-chart__legend-series">{product}</span>
                <span class="d400-chart__legend-trend">"Trend"</span>
            </div>
        </figure>
    }
}
