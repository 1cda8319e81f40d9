use crate::time_series::WpmSample;

/// X (seconds) and Y (wpm) upper bounds for the results chart.
///
/// Both the wpm and raw series share the Y axis, so the taller of the two
/// sets the bound.
pub fn chart_bounds(samples: &[WpmSample], duration_secs: f64) -> (f64, f64) {
    let highest = samples
        .iter()
        .map(|s| s.wpm.max(s.raw_wpm))
        .fold(0.0_f64, f64::max);

    let last_t = samples.last().map(|s| s.t).unwrap_or(0.0);
    let overall_duration = last_t.max(duration_secs).max(1.0);

    (overall_duration, highest.ceil().max(1.0))
}

pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
