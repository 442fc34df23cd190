use contracts::dashboards::d400_sales_analytics::ProductCard;
use leptos::prelude::*;

use super::trend_chart::TrendChart;
use crate::shared::number_format::{format_currency, format_delta, format_percent, format_units};

/// Одна метрика с дельтой к предыдущему периоду
#[component]
fn Metric(label: &'static str, value: String, delta: f64) -> impl IntoView {
    let delta_class = if format_delta(delta) == "0.00%" {
        "d400-metric__delta"
    } else if delta > 0.0 {
        "d400-metric__delta d400-metric__delta--up"
    } else {
        "d400-metric__delta d400-metric__delta--down"
    };

    view! {
        <div class="d400-metric">
            <div class="d400-metric__label">{label}</div>
            <div class="d400-metric__value">{value}</div>
            <div class=delta_class>{format_delta(delta)}</div>
        </div>
    }
}

/// Product block: metrics on the left, trend chart on the right
#[component]
pub fn ProductCardView(card: ProductCard) -> impl IntoView {
    let ProductCard {
        summary,
        deltas,
        trend,
    } = card;

    view! {
        <section class="d400-card">
            <div class="d400-card__metrics">
                <h2 class="d400-card__title">{summary.product.clone()}</h2>
                <Metric
                    label="Average price"
                    value=format_currency(summary.average_price)
                    delta=deltas.price_pct
                />
                <Metric
                    label="Average margin"
                    value=format_percent(summary.average_margin)
                    delta=deltas.margin_pct
                />
                <Metric
                    label="Units sold"
                    value=format_units(summary.total_units_sold)
                    delta=deltas.units_pct
                />
            </div>
            <div class="d400-card__chart">
                <TrendChart series=trend />
            </div>
        </section>
    }
}
