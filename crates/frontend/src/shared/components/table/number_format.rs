//! Number formatting for table cells (en-US: comma thousands separator, dot decimals)

/// Formats a number with a comma thousands separator and at most `max_decimals` fraction
/// digits; trailing zeros in the fraction are dropped.
///
/// # Examples
///
/// ```
/// use putaway_frontend::shared::components::table::format_number_en_us;
/// assert_eq!(format_number_en_us(1234.5, 3), "1,234.5");
/// ```
pub fn format_number_en_us(value: f64, max_decimals: usize) -> String {
    let formatted = format!("{:.*}", max_decimals, value);

    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((integer, decimals)) => (integer, decimals.trim_end_matches('0')),
        None => (formatted.as_str(), ""),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer_part),
    };

    // Вставляем запятые каждые 3 цифры с конца целой части
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if decimal_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{decimal_part}")
    }
}

/// Formats a put-away quantity the way `Number.toLocaleString("en-US")` does
///
/// # Examples
///
/// ```
/// use putaway_frontend::shared::components::table::format_quantity;
/// assert_eq!(format_quantity(1234567.0), "1,234,567");
/// ```
pub fn format_quantity(value: f64) -> String {
    format_number_en_us(value, 3)
}
