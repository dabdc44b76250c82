//! Formatting helpers shared by report presenters.

use std::fmt::Display;

/// Format an hour of day as a one-hour range (e.g., "9am–10am").
pub fn hour_display(hour: u32) -> String {
    let label = |h: u32| -> String {
        let h = h % 24;
        let period = if h < 12 { "am" } else { "pm" };
        let h12 = if h % 12 == 0 { 12 } else { h % 12 };
        format!("{}{}", h12, period)
    };
    format!("{}–{}", label(hour), label(hour + 1))
}

/// Format a percentage with two decimals (e.g., "66.67%").
pub fn pct_display(pct: f64) -> String {
    format!("{:.2}%", pct)
}

/// Format an optional value, or "n/a" if missing.
pub fn optional_display<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "n/a".to_string(),
    }
}
