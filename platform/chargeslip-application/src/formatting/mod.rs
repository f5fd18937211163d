use crate::config::{DisplayConfig, Grouping};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub grouping: Grouping,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for MoneyFormat {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            symbol: display.currency_symbol.clone(),
            grouping: display.grouping,
        }
    }
}

/// Renders `value` as `[-]<symbol><grouped magnitude>.<2 decimals>`.
///
/// The magnitude is formatted first and the sign prepended afterwards, so a
/// negative amount never shows a sign inside the grouped digits.
pub fn format_money(value: f64, format: &MoneyFormat) -> String {
    let magnitude = format_grouped(value.abs(), format.grouping);
    if value < 0.0 {
        format!("-{}{}", format.symbol, magnitude)
    } else {
        format!("{}{}", format.symbol, magnitude)
    }
}

/// Non-negative `value` with two decimals and a grouped integer part.
pub fn format_grouped(value: f64, grouping: Grouping) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}.{}", group_digits(int_part, grouping), frac_part)
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }
    let (head, last3) = digits.split_at(len - 3);
    let chunk = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(chunk);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(last3);
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::{format_grouped, format_money, MoneyFormat};
    use crate::config::Grouping;

    fn western() -> MoneyFormat {
        MoneyFormat {
            symbol: "₹".to_string(),
            grouping: Grouping::Western,
        }
    }

    #[test]
    fn negative_sign_precedes_symbol() {
        assert_eq!(format_money(-1234.5, &western()), "-₹1,234.50");
        assert_eq!(format_money(1234.5, &western()), "₹1,234.50");
    }

    #[test]
    fn indian_grouping_uses_lakh_separators() {
        let fmt = MoneyFormat::default();
        assert_eq!(format_money(1_234_567.891, &fmt), "₹12,34,567.89");
        assert_eq!(format_money(100_000.0, &fmt), "₹1,00,000.00");
        assert_eq!(format_money(999.999, &fmt), "₹1,000.00");
    }

    #[test]
    fn small_values_are_not_grouped() {
        assert_eq!(format_grouped(0.0, Grouping::Indian), "0.00");
        assert_eq!(format_grouped(48.9208, Grouping::Western), "48.92");
        assert_eq!(format_grouped(123.0, Grouping::Indian), "123.00");
    }

    #[test]
    fn tiny_negative_keeps_its_sign() {
        assert_eq!(format_money(-0.001, &western()), "-₹0.00");
        assert_eq!(format_money(0.0, &western()), "₹0.00");
    }

    #[test]
    fn western_grouping_on_millions() {
        assert_eq!(format_grouped(12_345_678.0, Grouping::Western), "12,345,678.00");
        assert_eq!(format_grouped(12_345_678.0, Grouping::Indian), "1,23,45,678.00");
    }
}
