use axum::{
    extract::{multipart::MultipartError, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d400_sales_analytics::ErrorResponse;
use thiserror::Error;

/// Ошибки загрузки и анализа данных о продажах
#[derive(Debug, Error)]
pub enum SalesDataError {
    #[error("The file is empty or has no data rows")]
    EmptyFile,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Line {line}: column {column} must be an integer, got '{value}'")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: month must be between 1 and 12, got {value}")]
    MonthOutOfRange { line: u64, value: i64 },

    #[error("Line {line}: year {value} is outside the supported calendar range")]
    YearOutOfRange { line: u64, value: i32 },

    #[error("Line {line}: column {column} must be a number, got '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The uploaded file is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("Upload failed: {0}")]
    Upload(#[from] MultipartError),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("No file field in the upload")]
    MissingFile,

    #[error("No sales file has been uploaded yet")]
    NoDataset,

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    #[error("No sales for product '{product}' in branch {branch}")]
    EmptySelection { product: String, branch: String },
}

impl SalesDataError {
    /// Fatal input-schema problems: the file itself has to be fixed
    pub fn is_input_schema(&self) -> bool {
        matches!(
            self,
            SalesDataError::EmptyFile
                | SalesDataError::MissingColumns(_)
                | SalesDataError::InvalidInteger { .. }
                | SalesDataError::MonthOutOfRange { .. }
                | SalesDataError::YearOutOfRange { .. }
                | SalesDataError::InvalidNumber { .. }
                | SalesDataError::Csv(_)
                | SalesDataError::InvalidEncoding
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            e if e.is_input_schema() => "input_schema",
            SalesDataError::Upload(_) | SalesDataError::MissingFile => "upload",
            SalesDataError::InvalidQuery(_) => "invalid_query",
            SalesDataError::NoDataset => "no_dataset",
            SalesDataError::UnknownBranch(_) => "unknown_branch",
            SalesDataError::EmptySelection { .. } => "empty_selection",
            _ => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SalesDataError::NoDataset | SalesDataError::EmptySelection { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SalesDataError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.is_input_schema() {
            format!("{}. Please upload a valid CSV file.", self)
        } else if matches!(self, SalesDataError::NoDataset) {
            "Please upload a CSV file from the sidebar.".to_string()
        } else {
            self.to_string()
        };

        tracing::warn!("D400: request failed ({}): {}", status.as_u16(), self);

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });
        (status, body).into_response()
    }
}
