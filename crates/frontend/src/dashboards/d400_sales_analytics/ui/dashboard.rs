use contracts::dashboards::d400_sales_analytics::{BranchFilter, SalesDashboardResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen::JsCast;

use super::metric_card::ProductCardView;
use crate::dashboards::d400_sales_analytics::api;
use crate::dashboards::d400_sales_analytics::request_tracker::RequestTracker;

/// Sales analytics dashboard: upload, branch selector, product cards
#[component]
pub fn SalesAnalyticsDashboard() -> impl IntoView {
    let (branches, set_branches) = signal(Vec::<String>::new());
    let (selected_branch, set_selected_branch) = signal(BranchFilter::All);
    let (file_name, set_file_name) = signal(None::<String>);

    // Data state
    let (data, set_data) = signal(None::<SalesDashboardResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    // Ответы старых запросов и прошлых загрузок отбрасываются
    let tracker = StoredValue::new(RequestTracker::default());

    // Загрузка данных дашборда; quiet: не показывать ошибку (нет файла при старте)
    let load_dashboard = move |branch: BranchFilter, quiet: bool| {
        let mut ticket = 0;
        tracker.update_value(|t| ticket = t.begin());
        set_loading.set(true);
        spawn_local(async move {
            let result = api::get_dashboard(branch).await;
            if !tracker.with_value(|t| t.is_latest(ticket)) {
                log::debug!("D400: dropping stale dashboard response");
                return;
            }
            set_loading.set(false);
            match result {
                Ok(response) => {
                    if !tracker.with_value(|t| t.accepts(ticket, response.upload_id)) {
                        log::debug!("D400: dropping response for upload {}", response.upload_id);
                        return;
                    }
                    tracker.update_value(|t| t.set_upload(response.upload_id));
                    set_branches.set(response.branches.clone());
                    set_file_name.set(Some(response.file_name.clone()));
                    set_data.set(Some(response));
                    set_error.set(None);
                }
                Err(e) => {
                    if !quiet {
                        set_error.set(Some(e));
                    }
                }
            }
        });
    };

    // On mount: pick up a file uploaded earlier in this server session
    Effect::new(move |_| load_dashboard(BranchFilter::All, true));

    let handle_file_select = move |ev: web_sys::Event| {
        let input = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok());
        let Some(input) = input else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow re-selecting the same file
        input.set_value("");

        // Dashboard requests in flight belong to the previous file
        tracker.update_value(|t| {
            t.begin();
        });
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::upload_file(file).await {
                Ok(upload) => {
                    log::info!(
                        "Uploaded {}: {} rows, {} products",
                        upload.file_name,
                        upload.row_count,
                        upload.products.len()
                    );
                    tracker.update_value(|t| t.set_upload(upload.upload_id));
                    set_branches.set(upload.branches);
                    set_file_name.set(Some(upload.file_name));
                    set_selected_branch.set(BranchFilter::All);
                    load_dashboard(BranchFilter::All, false);
                }
                Err(e) => {
                    log::error!("Upload failed: {}", e);
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    };

    let handle_branch_change = move |ev: web_sys::Event| {
        let branch = BranchFilter::from(event_target_value(&ev));
        set_selected_branch.set(branch.clone());
        load_dashboard(branch, false);
    };

    let handle_clear = move |_| {
        tracker.update_value(|t| t.reset());
        set_loading.set(false);
        spawn_local(async move {
            match api::clear_dataset().await {
                Ok(()) => {
                    set_data.set(None);
                    set_branches.set(Vec::new());
                    set_selected_branch.set(BranchFilter::All);
                    set_file_name.set(None);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div id="d400_sales_analytics--dashboard" class="d400-dashboard">
            <aside class="d400-sidebar">
                <h3>"Upload data file"</h3>
                <label class="button button--primary" for="d400-file-input">
                    "Choose CSV file"
                </label>
                <input
                    id="d400-file-input"
                    type="file"
                    accept=".csv"
                    class="hidden"
                    on:change=handle_file_select
                />
                {move || file_name.get().map(|name| view! {
                    <div class="d400-sidebar__file">{name}</div>
                })}

                <Show when=move || !branches.get().is_empty()>
                    <label class="d400-sidebar__label" for="d400-branch-select">
                        "Select branch"
                    </label>
                    <select
                        id="d400-branch-select"
                        class="d400-sidebar__select"
                        prop:value=move || selected_branch.get().to_string()
                        on:change=handle_branch_change
                    >
                        {move || branches.get().into_iter().map(|branch| {
                            let value = branch.clone();
                            let current = branch.clone();
                            view! {
                                <option
                                    value=value
                                    selected=move || selected_branch.get().as_str() == current
                                >
                                    {branch}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                    <Button appearance=ButtonAppearance::Secondary on_click=handle_clear>
                        "Clear data"
                    </Button>
                </Show>
            </aside>

            <main class="d400-main">
                {move || loading.get().then(|| view! {
                    <div class="d400-loading">"Loading data..."</div>
                })}

                {move || error.get().map(|err| view! {
                    <div class="warning-box warning-box--error">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{err}</span>
                    </div>
                })}

                {move || match data.get() {
                    None => view! {
                        <h2 class="d400-prompt">"Please upload a CSV file from the sidebar."</h2>
                    }.into_any(),
                    Some(response) => {
                        let header = if response.branch.is_all() {
                            "Data for all branches".to_string()
                        } else {
                            format!("Data for branch {}", response.branch)
                        };
                        view! {
                            <h2 class="d400-header">{header}</h2>
                            {response.products.into_iter().map(|card| view! {
                                <ProductCardView card=card />
                            }).collect_view()}
                        }.into_any()
                    }
                }}
            </main>
        </div>
    }
}
