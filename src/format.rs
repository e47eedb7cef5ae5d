//! Number formatting for metric tiles and axis ticks.

/// Format `v` rounded to a whole number with `,` thousands separators,
/// e.g. `1234567.4` → `"1,234,567"`.
pub fn format_thousands(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let rounded = v.round();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded }; // normalize `-0.0`
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an integer count with thousands separators.
pub fn format_count(n: u64) -> String {
    format_thousands(n as f64)
}

/// Prefix a formatted amount with a currency symbol, e.g. `"Rp 1,500"`.
pub fn format_currency(prefix: &str, v: f64) -> String {
    format!("{prefix}{}", format_thousands(v))
}
