/// Format an amount the way `id-ID` renders `IDR` with two fraction digits,
/// e.g. `Rp 1.234.567,89` (the space is U+00A0).
pub fn format_idr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("Rp\u{a0}{}", amount);
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    // Intl keeps the sign on values that round to zero, and on -0
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    format!("{}Rp\u{a0}{},{:02}", sign, grouped, fraction)
}
