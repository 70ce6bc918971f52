//! Formatted terminal output for the CLI front-end.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays clean and testable
//! - output changes are localized

use crate::domain::ForecastResponse;

/// Format a human-readable run summary for `ef predict --summary`.
pub fn format_summary(building_id: &str, response: &ForecastResponse) -> String {
    let mut out = String::new();

    out.push_str("=== ef - Building Expense Forecast ===\n");
    out.push_str(&format!("Building: {building_id}\n"));
    out.push_str(&format!("Method: {}\n", response.method));

    let observed: Vec<_> = response.data.iter().filter(|p| p.actual.is_some()).collect();
    let predicted_only: Vec<_> = response
        .data
        .iter()
        .filter(|p| p.actual.is_none() && p.forecast.is_some())
        .collect();

    if let (Some(first), Some(last)) = (observed.first(), observed.last()) {
        out.push_str(&format!(
            "Observed: {} months [{} .. {}]\n",
            observed.len(),
            first.date.format("%Y-%m"),
            last.date.format("%Y-%m"),
        ));
    }

    if let (Some(first), Some(last)) = (predicted_only.first(), predicted_only.last()) {
        let total: f64 = predicted_only.iter().filter_map(|p| p.forecast).sum();
        out.push_str(&format!(
            "Forecast: {} months [{} .. {}] | total={:.2}\n",
            predicted_only.len(),
            first.date.format("%Y-%m"),
            last.date.format("%Y-%m"),
            total,
        ));
    }

    out
}
