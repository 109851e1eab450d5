//! Fixed-width number rendering for report columns

/// Inserts `,` between groups of three digits in the integer part.
pub fn group_thousands(digits: &str) -> String {
    let (sign, rest) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Integer right-aligned in `width` columns with thousands separators.
pub fn count(value: u64, width: usize) -> String {
    format!("{:>width$}", group_thousands(&value.to_string()), width = width)
}

/// Decimal right-aligned in `width` columns with `precision` fraction digits.
pub fn fixed(value: f64, width: usize, precision: usize) -> String {
    format!("{:>width$.precision$}", value, width = width, precision = precision)
}

/// Like [`fixed`] but with thousands separators.
pub fn grouped(value: f64, width: usize, precision: usize) -> String {
    let digits = format!("{:.precision$}", value, precision = precision);
    format!("{:>width$}", group_thousands(&digits), width = width)
}

/// Renders `value`, or `placeholder` right-aligned when there is none.
pub fn or_placeholder(value: Option<f64>, width: usize, placeholder: &str, render: impl Fn(f64, usize) -> String) -> String {
    match value {
        Some(v) if v.is_finite() => render(v, width),
        _ => format!("{:>width$}", placeholder, width = width),
    }
}
