/// Bill amounts are integer cents. 150.00 is stored as 15000.
pub type Cents = i64;

/// Format cents as a plain decimal string.
/// Example: 15000 -> "150.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents with the currency symbol used on bill labels.
/// Example: 15500 -> "$155.00"
pub fn format_amount(cents: Cents) -> String {
    format!("${}", format_cents(cents))
}
