//! Locale formatting for the console's pt-BR UI.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Format a value as Brazilian reais, e.g. `R$ 1.234,56`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {},{:02}", group_thousands(cents / 100), cents % 100)
}

/// Stock quantity with the unit suffix used in badges, e.g. `3 un.`.
#[must_use]
pub fn format_units(stock: i32) -> String {
    format!("{stock} un.")
}

/// Integer with `.` thousands separators.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
