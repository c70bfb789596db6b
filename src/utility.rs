/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Formats a value the way every output file and report line does: two decimals.
pub fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}
