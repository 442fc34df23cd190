use chrono::NaiveDate;
use contracts::dashboards::d400_sales_analytics::SalesRecord;

use super::error::SalesDataError;

/// Required columns and the header names accepted for each of them
/// (English and the Spanish export), matched case-insensitively.
const COLUMNS: [(&str, &[&str]); 7] = [
    ("Branch", &["Branch", "Sucursal"]),
    ("Product", &["Product", "Producto"]),
    ("Year", &["Year", "Año"]),
    ("Month", &["Month", "Mes"]),
    ("UnitsSold", &["UnitsSold", "Unidades_vendidas"]),
    ("TotalRevenue", &["TotalRevenue", "Ingreso_total"]),
    ("TotalCost", &["TotalCost", "Costo_total"]),
];

/// Positions of the required columns inside the file header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    branch: usize,
    product: usize,
    year: usize,
    month: usize,
    units_sold: usize,
    total_revenue: usize,
    total_cost: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SalesDataError> {
        let find = |aliases: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim();
                aliases.iter().any(|alias| h.to_lowercase() == alias.to_lowercase())
            })
        };

        let positions: Vec<Option<usize>> =
            COLUMNS.iter().map(|(_, aliases)| find(aliases)).collect();

        let missing: Vec<String> = COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|((name, _), _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SalesDataError::MissingColumns(missing));
        }

        let at = |i: usize| positions[i].unwrap_or_default();
        Ok(Self {
            branch: at(0),
            product: at(1),
            year: at(2),
            month: at(3),
            units_sold: at(4),
            total_revenue: at(5),
            total_cost: at(6),
        })
    }
}

/// Parse uploaded CSV text into sales records.
///
/// Year and month must be integer-like; numeric columns accept a decimal
/// comma and load empty cells as NaN. Any other malformed value rejects the
/// whole file.
pub fn parse_sales_csv(csv_text: &str) -> Result<Vec<SalesRecord>, SalesDataError> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');
    if text.trim().is_empty() {
        return Err(SalesDataError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let field = |i: usize| row.get(i).map(str::trim).unwrap_or("");

        // Полностью пустые строки пропускаем
        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let year = parse_integer(field(columns.year), line, "Year")?;
        let month = parse_integer(field(columns.month), line, "Month")?;
        if !(1..=12).contains(&month) {
            return Err(SalesDataError::MonthOutOfRange { line, value: month });
        }
        let year = i32::try_from(year).map_err(|_| SalesDataError::InvalidInteger {
            line,
            column: "Year",
            value: field(columns.year).to_string(),
        })?;
        // Период должен превращаться в дату графика
        if NaiveDate::from_ymd_opt(year, month as u32, 1).is_none() {
            return Err(SalesDataError::YearOutOfRange { line, value: year });
        }

        records.push(SalesRecord {
            branch: field(columns.branch).to_string(),
            product: field(columns.product).to_string(),
            year,
            month: month as u32,
            units_sold: parse_number(field(columns.units_sold), line, "UnitsSold")?,
            total_revenue: parse_number(field(columns.total_revenue), line, "TotalRevenue")?,
            total_cost: parse_number(field(columns.total_cost), line, "TotalCost")?,
        });
    }

    if records.is_empty() {
        return Err(SalesDataError::EmptyFile);
    }

    Ok(records)
}

/// Accepts "2023" as well as "2023.0" (spreadsheet exports)
fn parse_integer(raw: &str, line: u64, column: &'static str) -> Result<i64, SalesDataError> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(SalesDataError::InvalidInteger {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

fn parse_number(raw: &str, line: u64, column: &'static str) -> Result<f64, SalesDataError> {
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    let normalized = if raw.contains(',') && !raw.contains('.') {
        raw.replace(',', ".")
    } else {
        raw.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|_| SalesDataError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost
North,A,2023,1,100,1000,500
North,A,2023,2,150,1800,900
South,B,2023,1,40,400.5,
";

    #[test]
    fn test_parse_sample() {
        let records = parse_sales_csv(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].branch, "North");
        assert_eq!(records[1].period(), (2023, 2));
        assert_eq!(records[2].total_revenue, 400.5);
        assert!(records[2].total_cost.is_nan());
    }

    #[test]
    fn test_spanish_headers_and_bom() {
        let csv = "\u{FEFF}Sucursal,Producto,Año,Mes,Unidades_vendidas,Ingreso_total,Costo_total\n\
                   Centro,Leche,2024,3.0,10,\"25,5\",12\n";
        let records = parse_sales_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, 3);
        assert_eq!(records[0].total_revenue, 25.5);
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let err = parse_sales_csv("Branch,Product,UnitsSold\nN,A,1\n").unwrap_err();
        match err {
            SalesDataError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Year", "Month", "TotalRevenue", "TotalCost"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_month_is_fatal() {
        let csv = "Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n\
                   N,A,2023,1,1,1,1\n\
                   N,A,2023,feb,1,1,1\n";
        match parse_sales_csv(csv).unwrap_err() {
            SalesDataError::InvalidInteger { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Month");
                assert_eq!(value, "feb");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_month_out_of_range() {
        let csv = "Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n\
                   N,A,2023,13,1,1,1\n";
        assert!(matches!(
            parse_sales_csv(csv),
            Err(SalesDataError::MonthOutOfRange { value: 13, .. })
        ));
    }

    #[test]
    fn test_year_outside_calendar_range() {
        let csv = "Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n\
                   N,A,2023,1,1,1,1\n\
                   N,B,300000,1,1,1,1\n";
        match parse_sales_csv(csv).unwrap_err() {
            SalesDataError::YearOutOfRange { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, 300000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_number() {
        let csv = "Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n\
                   N,A,2023,1,many,1,1\n";
        assert!(matches!(
            parse_sales_csv(csv),
            Err(SalesDataError::InvalidNumber { column: "UnitsSold", .. })
        ));
    }

    #[test]
    fn test_empty_and_header_only_files() {
        assert!(matches!(parse_sales_csv(""), Err(SalesDataError::EmptyFile)));
        assert!(matches!(
            parse_sales_csv("Branch,Product,Year,Month,UnitsSold,TotalRevenue,TotalCost\n"),
            Err(SalesDataError::EmptyFile)
        ));
    }
}
