/// Parses user-entered numeric text the way a browser's `parseFloat` does:
/// leading whitespace is skipped and the longest numeric prefix is read, so
/// `"600 USD"` is `600`. The first `,` counts as the decimal separator.
/// Returns `0.0` when no prefix parses or the result is not finite.
pub fn parse_number(text: &str) -> f64 {
    let normalized = text.trim_start().replacen(',', ".", 1);
    numeric_prefix(&normalized)
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

// Longest `[sign] digits [. digits] [e [sign] digits]` prefix with at least
// one mantissa digit; empty when there is none.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;

    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = digits_from(end + 1);
        if mantissa_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
            mantissa_digits += fraction_digits;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exponent_digits = digits_from(exp_end);
        if exponent_digits > 0 {
            end = exp_end + exponent_digits;
        }
    }

    &text[..end]
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
