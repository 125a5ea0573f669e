//! Formats whole amounts of money for messages shown to the user.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::amount::Amount;

/// The currency used until the user picks another one.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// How a currency is written in its usual locale.
struct CurrencyStyle {
    prefix: String,
    suffix: &'static str,
    /// Group thousands with '.' instead of ','.
    dot_grouping: bool,
}

impl CurrencyStyle {
    fn for_code(code: &str) -> Self {
        match code {
            "IDR" => Self {
                prefix: "Rp ".to_owned(),
                suffix: "",
                dot_grouping: true,
            },
            "USD" => Self {
                prefix: "$".to_owned(),
                suffix: "",
                dot_grouping: false,
            },
            "EUR" => Self {
                prefix: String::new(),
                suffix: " €",
                dot_grouping: true,
            },
            "JPY" => Self {
                prefix: "¥".to_owned(),
                suffix: "",
                dot_grouping: false,
            },
            code => Self {
                prefix: format!("{code} "),
                suffix: "",
                dot_grouping: false,
            },
        }
    }
}

/// Format `amount` in `currency`, e.g. "Rp 10.000" or "$10,000".
///
/// Unknown currency codes are written in front of the amount, e.g. "SGD 10,000".
pub fn format_currency(amount: Amount, currency: &str) -> String {
    let style = CurrencyStyle::for_code(currency);
    let mut digits = group_thousands(amount.unsigned_abs());

    if style.dot_grouping {
        digits = digits.replace(',', ".");
    }

    let sign = if amount < 0 { "-" } else { "" };

    format!("{sign}{}{digits}{}", style.prefix, style.suffix)
}

/// The largest integer an `f64` holds exactly.
const MAX_EXACT_FLOAT_INTEGER: u64 = 1 << f64::MANTISSA_DIGITS;

fn group_thousands(number: u64) -> String {
    static GROUPING_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let grouping_fmt = GROUPING_FMT.get_or_init(|| {
        Formatter::currency("")
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
            .map_err(|error| tracing::error!("Could not create number formatter: {error:?}"))
            .ok()
    });

    match grouping_fmt {
        // Zero is hardcoded as "0" by the formatter, and it formats through `f64`.
        Some(formatter) if number > 0 && number <= MAX_EXACT_FLOAT_INTEGER => {
            formatter.fmt_string(number as f64)
        }
        _ => group_digits(number),
    }
}

/// Insert a ',' between every group of three digits.
fn group_digits(number: u64) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_currency, group_digits};

    #[test]
    fn formats_known_currencies() {
        assert_eq!(format_currency(10_000, "IDR"), "Rp 10.000");
        assert_eq!(format_currency(10_000, "USD"), "$10,000");
        assert_eq!(format_currency(10_000, "EUR"), "10.000 €");
        assert_eq!(format_currency(10_000, "JPY"), "¥10,000");
    }

    #[test]
    fn unknown_currency_uses_code() {
        assert_eq!(format_currency(1_234_567, "SGD"), "SGD 1,234,567");
    }

    #[test]
    fn negative_and_zero() {
        assert_eq!(format_currency(-2_500_000, "IDR"), "-Rp 2.500.000");
        assert_eq!(format_currency(0, "USD"), "$0");
        assert_eq!(format_currency(999, "EUR"), "999 €");
    }

    #[test]
    fn amounts_beyond_float_precision_keep_every_digit() {
        assert_eq!(format_currency(i64::MAX, "USD"), "$9,223,372,036,854,775,807");
        assert_eq!(
            format_currency(-9_007_199_254_740_993, "IDR"),
            "-Rp 9.007.199.254.740.993"
        );
    }

    #[test]
    fn groups_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(123_456_789), "123,456,789");
    }
}
