use contracts::dashboards::d400_sales_analytics::{
    BranchFilter, ProductCard, SalesDashboardResponse, SalesRecord, TrendSeries, UploadResponse,
    ALL_BRANCHES,
};

use super::aggregator;
use super::error::SalesDataError;
use super::loader;
use super::session::LoadedDataset;
use super::trend;

/// Parse an uploaded file into a dataset (not yet stored in the session)
pub fn load_dataset(file_name: &str, bytes: &[u8]) -> Result<LoadedDataset, SalesDataError> {
    let text = std::str::from_utf8(bytes).map_err(|_| SalesDataError::InvalidEncoding)?;
    let records = loader::parse_sales_csv(text)?;
    Ok(LoadedDataset::new(file_name, records))
}

/// Options of the branch selector: "All" first
pub fn branch_options(dataset: &LoadedDataset) -> Vec<String> {
    std::iter::once(ALL_BRANCHES.to_string())
        .chain(dataset.branches.iter().cloned())
        .collect()
}

pub fn upload_response(dataset: &LoadedDataset) -> UploadResponse {
    let mut products: Vec<String> = dataset.records.iter().map(|r| r.product.clone()).collect();
    products.sort();
    products.dedup();

    UploadResponse {
        upload_id: dataset.upload_id,
        file_name: dataset.file_name.clone(),
        row_count: dataset.records.len(),
        branches: branch_options(dataset),
        products,
    }
}

/// Records of the selected branch; every record for `All`
fn filter_by_branch(
    dataset: &LoadedDataset,
    branch: &BranchFilter,
) -> Result<Vec<SalesRecord>, SalesDataError> {
    if let BranchFilter::Branch(name) = branch {
        if !dataset.has_branch(name) {
            return Err(SalesDataError::UnknownBranch(name.clone()));
        }
    }
    Ok(dataset
        .records
        .iter()
        .filter(|r| branch.matches(&r.branch))
        .cloned()
        .collect())
}

/// Metric cards and trend charts for every product in the selection
pub fn get_dashboard(
    dataset: &LoadedDataset,
    branch: &BranchFilter,
    window: usize,
) -> Result<SalesDashboardResponse, SalesDataError> {
    let records = filter_by_branch(dataset, branch)?;

    let products: Vec<ProductCard> = aggregator::compute_summary(&records)
        .into_iter()
        .filter_map(|summary| {
            let trend = trend::build_trend(&records, &summary.product, branch, window)?;
            Some(ProductCard {
                deltas: summary.deltas(),
                summary,
                trend,
            })
        })
        .collect();

    Ok(SalesDashboardResponse {
        upload_id: dataset.upload_id,
        file_name: dataset.file_name.clone(),
        branch: branch.clone(),
        branches: branch_options(dataset),
        products,
    })
}

/// Trend chart of a single product
pub fn get_trend(
    dataset: &LoadedDataset,
    product: &str,
    branch: &BranchFilter,
    window: usize,
) -> Result<TrendSeries, SalesDataError> {
    let records = filter_by_branch(dataset, branch)?;
    trend::build_trend(&records, product, branch, window).ok_or_else(|| {
        SalesDataError::EmptySelection {
            product: product.to_string(),
            branch: branch.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost
North,A,2023,1,100,1000,500
North,A,2023,2,150,1800,900
South,A,2023,1,50,600,300
South,B,2023,2,10,100,80
";

    fn dataset() -> LoadedDataset {
        load_dataset("sales.csv", CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_upload_response() {
        let response = upload_response(&dataset());
        assert_eq!(response.row_count, 4);
        assert_eq!(response.branches, vec!["All", "North", "South"]);
        assert_eq!(response.products, vec!["A", "B"]);
        assert_eq!(response.file_name, "sales.csv");
    }

    #[test]
    fn test_dashboard_all_branches() {
        let response = get_dashboard(&dataset(), &BranchFilter::All, 3).unwrap();
        assert_eq!(response.products.len(), 2);
        let a = &response.products[0];
        assert_eq!(a.summary.product, "A");
        assert_eq!(a.summary.total_units_sold, 300.0);
        // Two periods, North and South summed in January
        let units: Vec<Option<f64>> = a.trend.points.iter().map(|p| p.units_sold).collect();
        assert_eq!(units, vec![Some(150.0), Some(150.0)]);
    }

    #[test]
    fn test_dashboard_single_branch_omits_other_products() {
        let branch = BranchFilter::from("North");
        let response = get_dashboard(&dataset(), &branch, 3).unwrap();
        assert_eq!(response.branch, branch);
        assert_eq!(response.products.len(), 1);
        let a = &response.products[0];
        assert_eq!(a.summary.total_units_sold, 250.0);
        assert_eq!(a.summary.previous_total_units_sold, 100.0);
        assert!((a.deltas.units_pct - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_branch() {
        let err = get_dashboard(&dataset(), &BranchFilter::from("West"), 3).unwrap_err();
        assert!(matches!(err, SalesDataError::UnknownBranch(name) if name == "West"));
    }

    #[test]
    fn test_trend_empty_selection() {
        let err = get_trend(&dataset(), "B", &BranchFilter::from("North"), 3).unwrap_err();
        assert!(matches!(err, SalesDataError::EmptySelection { .. }));
        assert!(get_trend(&dataset(), "B", &BranchFilter::All, 3).is_ok());
    }

    #[test]
    fn test_unplottable_year_rejects_upload() {
        let csv = "Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n\
                   N,A,2023,1,10,100,50\n\
                   N,B,300000,1,10,100,50\n";
        let err = load_dataset("sales.csv", csv.as_bytes()).unwrap_err();
        assert!(err.is_input_schema());
    }

    #[test]
    fn test_every_summarized_product_gets_a_card() {
        let dataset = dataset();
        let records = filter_by_branch(&dataset, &BranchFilter::All).unwrap();
        let summaries = aggregator::compute_summary(&records);
        let response = get_dashboard(&dataset, &BranchFilter::All, 3).unwrap();
        assert_eq!(response.products.len(), summaries.len());
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = load_dataset("bad.csv", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, SalesDataError::InvalidEncoding));
    }
}
