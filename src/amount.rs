//! Parsing of monetary amounts submitted through forms.

use crate::Error;

/// A whole amount of money in the user's currency.
pub type Amount = i64;

/// The largest transaction amount, and the largest absolute account balance.
///
/// Keeps balances and sums of many amounts well inside [Amount].
pub const MAX_AMOUNT: Amount = 1_000_000_000_000_000;

/// Parse a transaction amount from user input such as "Rp 10.000" or "1,250".
///
/// Every character that is not an ASCII digit is discarded, so grouping
/// separators and currency symbols are accepted. The sign is discarded too:
/// whether money comes in or goes out is decided by the category.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if no digits remain or the digits parse to zero,
/// and [Error::AmountTooLarge] if the amount is above [MAX_AMOUNT].
pub fn parse_amount(input: &str) -> Result<Amount, Error> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(Error::NonPositiveAmount);
    }

    // Digits that overflow an `Amount` are above the maximum too.
    let amount: Amount = digits.parse().map_err(|_| Error::AmountTooLarge)?;

    if amount <= 0 {
        return Err(Error::NonPositiveAmount);
    }

    if amount > MAX_AMOUNT {
        return Err(Error::AmountTooLarge);
    }

    Ok(amount)
}

/// Parse an optional account balance, which may be negative.
///
/// # Errors
/// Returns [Error::InvalidNumber] with `field` if the input is not an integer,
/// and [Error::BalanceOutOfRange] if its absolute value is above [MAX_AMOUNT].
pub fn parse_optional_balance(input: &str, field: &'static str) -> Result<Option<Amount>, Error> {
    match parse_optional_integer(input, field)? {
        Some(balance) if !is_valid_balance(balance) => Err(Error::BalanceOutOfRange),
        balance => Ok(balance),
    }
}

/// Whether `balance` is between -[MAX_AMOUNT] and [MAX_AMOUNT].
pub fn is_valid_balance(balance: Amount) -> bool {
    (-MAX_AMOUNT..=MAX_AMOUNT).contains(&balance)
}

/// Parse an optional signed whole number.
///
/// Blank input yields `None`.
///
/// # Errors
/// Returns [Error::InvalidNumber] with `field` if the trimmed input is not an integer.
pub fn parse_optional_integer(input: &str, field: &'static str) -> Result<Option<i64>, Error> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidNumber(field))
}
