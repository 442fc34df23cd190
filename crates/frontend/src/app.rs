use crate::dashboards::d400_sales_analytics::SalesAnalyticsDashboard;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <header class="app-header">
                <h1>"Sales Analytics"</h1>
            </header>
            <SalesAnalyticsDashboard />
        </ConfigProvider>
    }
}
