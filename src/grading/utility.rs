/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to 2 decimal places. Exact halves go to the even digit
/// (`50.625` -> `50.62`); values whose binary form only looks like a half
/// after scaling round toward where they actually lie (`2.675` -> `2.67`).
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.fract().abs() != 0.5 {
        return scaled.round() / 100.0;
    }

    // Exact error of the scaled product decides which side of the tie it is on.
    let error = value.mul_add(100.0, -scaled);
    let rounded = if error > 0.0 {
        scaled.ceil()
    } else if error < 0.0 {
        scaled.floor()
    } else {
        scaled.round_ties_even()
    };
    rounded / 100.0
}

/// Formats a percentage the way it is shown in reports and written to CSV:
/// shortest exact form, with a trailing `.0` on whole numbers (`87.5`, `90.0`).
pub fn format_percentage(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
