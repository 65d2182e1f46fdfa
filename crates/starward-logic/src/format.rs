//! Text formatting for boarding reports and mission text.

use std::collections::BTreeMap;

/// Format a value with exactly one decimal place, rounding half away from zero.
pub fn round1(value: f64) -> String {
    let tenths = (value * 10.0).round() as i64;
    let sign = if tenths < 0 { "-" } else { "" };
    let tenths = tenths.unsigned_abs();
    format!("{}{}.{}", sign, tenths / 10, tenths % 10)
}

/// Format a number: whole numbers with digit grouping, others with one decimal.
pub fn number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "infinity".into() } else { "-infinity".into() };
    }
    if value.fract() == 0.0 {
        group_digits(value as i64)
    } else {
        round1(value)
    }
}

/// Format an amount of credits, abbreviating very large amounts.
pub fn credits(value: i64) -> String {
    let magnitude = value.unsigned_abs() as f64;
    let scaled = |divisor: f64, suffix: &str| {
        let sign = if value < 0 { "-" } else { "" };
        format!("{}{:.3}{}", sign, magnitude / divisor, suffix)
    };
    if magnitude >= 1e12 {
        scaled(1e12, "T")
    } else if magnitude >= 1e9 {
        scaled(1e9, "B")
    } else if magnitude >= 1e6 {
        scaled(1e6, "M")
    } else {
        group_digits(value)
    }
}

fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Replace every `<key>` in `text` that appears in `subs`. Keys include the
/// angle brackets. Unknown keys are left as written.
pub fn replace(text: &str, subs: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find('>') {
            Some(end) => {
                let key = &candidate[..=end];
                match subs.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(key),
                }
                rest = &candidate[end + 1..];
            }
            None => {
                out.push_str(candidate);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
