use contracts::dashboards::d400_sales_analytics::{
    BranchFilter, SalesDashboardRequest, SalesDashboardResponse, UploadResponse,
};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, error_message};

const API_BASE: &str = "/api/d400";

/// Загрузить CSV файл (multipart, поле "file")
pub async fn upload_file(file: web_sys::File) -> Result<UploadResponse, String> {
    let form = web_sys::FormData::new().map_err(|e| format!("FormData error: {:?}", e))?;
    form.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| format!("FormData error: {:?}", e))?;

    let url = api_url(&format!("{}/upload", API_BASE));
    let response = Request::post(&url)
        .body(form)
        .map_err(|e| format!("Request failed: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Получить данные дашборда для выбранного филиала
pub async fn get_dashboard(branch: BranchFilter) -> Result<SalesDashboardResponse, String> {
    let query = serde_qs::to_string(&SalesDashboardRequest { branch })
        .map_err(|e| format!("Invalid request: {}", e))?;
    let url = api_url(&format!("{}/dashboard?{}", API_BASE, query));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Сбросить загруженные данные
pub async fn clear_dataset() -> Result<(), String> {
    let url = api_url(&format!("{}/dataset", API_BASE));
    let response = Request::delete(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}
