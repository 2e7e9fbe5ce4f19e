//! Text formatting helpers shared by the page renderers

/// Format a monthly amount as euros with two decimals, e.g. `€1,234.50`.
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    format!("{}€{}.{:02}", sign, whole, cents % 100)
}

/// Relative change between two months, e.g. `+12.5%`. `None` without a baseline.
pub fn format_change(current: f64, previous: f64) -> Option<String> {
    if previous == 0.0 {
        return None;
    }
    let pct = (current - previous) / previous * 100.0;
    Some(format!("{:+.1}%", pct))
}

/// Format a count that arrives as a JSON number, dropping a `.0` fraction.
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        let sign = if count < 0.0 { "-" } else { "" };
        format!("{}{}", sign, group_thousands(count.abs() as u64))
    } else {
        format!("{:.1}", count)
    }
}

/// Compact `YYYY-MM-DD` from an ISO-8601 timestamp.
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Fallback to original timestamp if it is too short to hold a date
    timestamp.get(0..10).unwrap_or(timestamp).to_string()
}

/// Pads or truncates `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
