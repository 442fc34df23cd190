use chrono::{DateTime, Utc};
use contracts::dashboards::d400_sales_analytics::SalesRecord;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// The uploaded table, kept until the next upload
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub upload_id: Uuid,
    pub file_name: String,
    pub records: Vec<SalesRecord>,
    /// Distinct branches in order of first appearance
    pub branches: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDataset {
    pub fn new(file_name: impl Into<String>, records: Vec<SalesRecord>) -> Self {
        let mut branches: Vec<String> = Vec::new();
        for record in &records {
            if !branches.iter().any(|b| b == &record.branch) {
                branches.push(record.branch.clone());
            }
        }
        Self {
            upload_id: Uuid::new_v4(),
            file_name: file_name.into(),
            records,
            branches,
            loaded_at: Utc::now(),
        }
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }
}

/// Единственный слот сессии: одна загрузка за раз
static CURRENT: Lazy<RwLock<Option<Arc<LoadedDataset>>>> = Lazy::new(|| RwLock::new(None));

/// Replace the session dataset, returning the previous one
pub fn replace(dataset: LoadedDataset) -> Option<Arc<LoadedDataset>> {
    let mut slot = CURRENT.write().unwrap_or_else(|e| e.into_inner());
    slot.replace(Arc::new(dataset))
}

pub fn current() -> Option<Arc<LoadedDataset>> {
    CURRENT
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Drop the session dataset; returns whether one was loaded
pub fn clear() -> bool {
    CURRENT
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .is_some()
}
