use axum::{
    extract::{rejection::QueryRejection, Multipart, Query},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d400_sales_analytics::{
    SalesDashboardRequest, SalesDashboardResponse, TrendRequest, TrendSeries, UploadResponse,
};

use crate::dashboards::d400_sales_analytics::{service, session, SalesDataError};
use crate::shared::config;

/// POST /api/d400/upload (multipart, field "file")
pub async fn upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, SalesDataError> {
    while let Some(field) = multipart.next_field().await? {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await?;

        tracing::info!(
            "D400 Dashboard: Received '{}' ({} bytes)",
            file_name,
            bytes.len()
        );

        // При ошибке предыдущая загрузка остаётся в сессии
        let dataset = service::load_dataset(&file_name, &bytes)?;
        let response = service::upload_response(&dataset);

        tracing::info!(
            "D400 Dashboard: Loaded {} rows, {} branches, {} products (upload_id={}, at {})",
            response.row_count,
            dataset.branches.len(),
            response.products.len(),
            response.upload_id,
            dataset.loaded_at.format("%Y-%m-%d %H:%M:%S")
        );

        session::replace(dataset);
        return Ok(Json(response));
    }

    Err(SalesDataError::MissingFile)
}

/// GET /api/d400/branches
pub async fn get_branches() -> Result<Json<Vec<String>>, SalesDataError> {
    let dataset = session::current().ok_or(SalesDataError::NoDataset)?;
    Ok(Json(service::branch_options(&dataset)))
}

/// GET /api/d400/dashboard?branch=All
pub async fn get_dashboard(
    query: Result<Query<SalesDashboardRequest>, QueryRejection>,
) -> Result<Json<SalesDashboardResponse>, SalesDataError> {
    let Query(request) = query?;
    tracing::info!("D400 Dashboard: Building dashboard for branch {}", request.branch);

    let dataset = session::current().ok_or(SalesDataError::NoDataset)?;
    let window = config::analytics().rolling_window;
    let response = service::get_dashboard(&dataset, &request.branch, window)?;

    tracing::info!(
        "D400 Dashboard: Returning {} products for branch {}",
        response.products.len(),
        response.branch
    );
    Ok(Json(response))
}

/// GET /api/d400/trend?product=A&branch=All
pub async fn get_trend(
    query: Result<Query<TrendRequest>, QueryRejection>,
) -> Result<Json<TrendSeries>, SalesDataError> {
    let Query(request) = query?;
    let dataset = session::current().ok_or(SalesDataError::NoDataset)?;
    let window = config::analytics().rolling_window;
    let series = service::get_trend(&dataset, &request.product, &request.branch, window)?;
    Ok(Json(series))
}

/// DELETE /api/d400/dataset
pub async fn delete_dataset() -> StatusCode {
    if session::clear() {
        tracing::info!("D400 Dashboard: Session dataset cleared");
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::Uri, response::IntoResponse};
    use contracts::dashboards::d400_sales_analytics::ErrorResponse;

    async fn error_body(err: SalesDataError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_trend_without_product_is_json_error() {
        let uri: Uri = "/api/d400/trend?branch=All".parse().unwrap();
        let rejection = Query::<TrendRequest>::try_from_uri(&uri).unwrap_err();

        let response = get_trend(Err(rejection)).await.unwrap_err();
        let (status, body) = error_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "invalid_query");
        assert!(!body.message.is_empty());
    }

    #[tokio::test]
    async fn test_schema_error_body() {
        let (status, body) = error_body(SalesDataError::EmptyFile).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "input_schema");
        assert!(body.message.ends_with("Please upload a valid CSV file."));
    }
}
