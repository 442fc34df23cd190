/// Группирует разряды числа по три (для логов)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1 234 567");
/// ```
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&digits[..head]);
    }
    let mut start = head;
    while start < digits.len() {
        groups.push(&digits[start..start + 3]);
        start += 3;
    }
    groups.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1 000");
        assert_eq!(format_number(123456), "123 456");
        assert_eq!(format_number(1234567890), "1 234 567 890");
    }
}
