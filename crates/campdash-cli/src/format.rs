//! Number and text formatting shared by the report commands.

/// Formats a count with comma thousands separators, e.g. `12,345`.
///
/// Fractional parts are rounded away; counts from the API are whole numbers.
pub(crate) fn fmt_count(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a percentage with two decimals.
pub(crate) fn fmt_pct(value: f64) -> String {
    format!("{value:.2}")
}

/// Truncates `text` to `max` characters, appending `...` when shortened.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
