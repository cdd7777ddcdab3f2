//! Time formatting helpers.

use std::fmt::Write;

/// Format a whole number of days as years/days, e.g. `540` -> `"1y 175d"`.
pub fn format_days(days: u64) -> String {
    let mut out = String::new();
    let years = days / 365;
    let rest = days % 365;
    if years > 0 {
        let _ = write!(out, "{}y", years);
        if rest > 0 {
            let _ = write!(out, " {}d", rest);
        }
    } else {
        let _ = write!(out, "{}d", rest);
    }
    out
}
