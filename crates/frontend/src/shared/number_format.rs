//! Форматирование значений для карточек метрик

/// Число с разделителем тысяч (запятая) и заданным числом знаков
///
/// ```ignore
/// assert_eq!(format_number_with_decimals(1234.567, 2), "1,234.57");
/// ```
pub fn format_number_with_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match decimal_part {
        Some(d) => format!("{}{}.{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Денежное значение: `$1,234.57`; undefined values render as "n/a"
pub fn format_currency(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) if v < 0.0 => format!("-${}", format_number_with_decimals(-v, 2)),
        Some(v) => format!("${}", format_number_with_decimals(v, 2)),
        None => "n/a".to_string(),
    }
}

/// Ratio as percentage: 0.5 -> `50.00%`
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio.filter(|v| v.is_finite()) {
        Some(v) => format!("{}%", format_number_with_decimals(v * 100.0, 2)),
        None => "n/a".to_string(),
    }
}

/// Units as a grouped integer (fraction truncated): `1,250`
pub fn format_units(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    format_number_with_decimals(value.trunc(), 0)
}

/// Signed delta: `+12.50%`, `-3.00%`, `0.00%`
pub fn format_delta(pct: f64) -> String {
    let rounded = format!("{:.2}", pct);
    if rounded == "0.00" || rounded == "-0.00" || !pct.is_finite() {
        return "0.00%".to_string();
    }
    if pct > 0.0 {
        format!("+{}%", rounded)
    } else {
        format!("{}%", rounded)
    }
}
