//! Formatting helpers shared by front ends.

/// Format a count with thousands separators (e.g., "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a signed difference with an explicit sign (e.g., "+1,204", "-3").
pub fn format_diff(n: i64) -> String {
    let sign = if n >= 0 { "+" } else { "-" };
    format!("{}{}", sign, format_count(n.unsigned_abs()))
}

/// Format a percentage change with one decimal and an explicit sign (e.g., "+12.5%").
pub fn format_percentage(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}
