//! Display formatting for dashboard figures

/// Currency code printed before amounts
pub const DEFAULT_CURRENCY: &str = "AED";

/// Whole currency units with thousands separators, e.g. `AED 12,346`
pub fn format_currency(value: f64, currency: &str) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{} {}{}", currency, sign, group_thousands(rounded.abs() as u64))
}

/// A value already in percent, one decimal, e.g. `12.5%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Integer with thousands separators
pub fn format_count(value: usize) -> String {
    group_thousands(value as u64)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_rounded_and_grouped() {
        assert_eq!(format_currency(1234567.6, "AED"), "AED 1,234,568");
        assert_eq!(format_currency(999.4, "AED"), "AED 999");
        assert_eq!(format_currency(-1500.0, "AED"), "AED -1,500");
        assert_eq!(format_currency(0.0, "AED"), "AED 0");
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(12.345), "12.3%");
        assert_eq!(format_count(1000), "1,000");
    }
}
