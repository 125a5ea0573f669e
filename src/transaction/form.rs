//! Parsing and validation of the transaction form shared by create and edit.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error, UserId,
    account::get_account,
    amount::parse_amount,
    category::{CategoryType, get_category},
    transaction::{TransactionFields, core::DEFAULT_DESCRIPTION},
};

/// The form data for creating or editing a transaction.
///
/// Every field is kept as text so that blank fields can be reported with a
/// friendly message instead of a deserialization error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The amount, e.g. "Rp 10.000". Non-digits are ignored.
    #[serde(default)]
    pub amount: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// When the transaction happened, formatted YYYY-MM-DD.
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "categoryId")]
    pub category_id: String,
    #[serde(default, alias = "accountId")]
    pub account_id: String,
}

impl TryFrom<&TransactionForm> for TransactionFields {
    type Error = Error;

    fn try_from(form: &TransactionForm) -> Result<Self, Self::Error> {
        let amount = form.amount.trim();
        let date = form.date.trim();
        let category_id = form.category_id.trim();
        let account_id = form.account_id.trim();

        if amount.is_empty() || date.is_empty() || category_id.is_empty() || account_id.is_empty()
        {
            return Err(Error::MissingTransactionFields);
        }

        let amount = parse_amount(amount)?;
        let date = parse_date(date)?;
        let category_id = category_id
            .parse()
            .map_err(|_| Error::InvalidNumber("category_id"))?;
        let account_id = account_id
            .parse()
            .map_err(|_| Error::InvalidNumber("account_id"))?;

        let description = match form.description.trim() {
            "" => DEFAULT_DESCRIPTION,
            description => description,
        };

        Ok(Self {
            amount,
            description: description.to_owned(),
            date,
            category_id,
            account_id: Some(account_id),
        })
    }
}

/// Parse a date formatted as YYYY-MM-DD.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Check that the category and account in `fields` belong to the user.
///
/// Returns the type of the category, which decides the balance effect.
///
/// # Errors
/// Returns [Error::InvalidCategory] or [Error::InvalidAccount] when either does
/// not refer to one of the user's rows.
pub fn resolve_references(
    fields: &TransactionFields,
    user_id: UserId,
    connection: &Connection,
) -> Result<CategoryType, Error> {
    let category_type = match get_category(fields.category_id, user_id, connection) {
        Ok(category) => category.category_type,
        Err(Error::NotFound) => return Err(Error::InvalidCategory(fields.category_id)),
        Err(error) => return Err(error),
    };

    if let Some(account_id) = fields.account_id {
        match get_account(account_id, user_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidAccount(account_id)),
            Err(error) => return Err(error),
        }
    }

    Ok(category_type)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionFields};

    use super::{TransactionForm, parse_date};

    fn valid_form() -> TransactionForm {
        TransactionForm {
            amount: "Rp 10.000".to_owned(),
            description: "  Groceries ".to_owned(),
            date: "2025-10-15".to_owned(),
            category_id: "3".to_owned(),
            account_id: "7".to_owned(),
        }
    }

    #[test]
    fn parses_valid_form() {
        let fields = TransactionFields::try_from(&valid_form()).unwrap();

        assert_eq!(
            fields,
            TransactionFields {
                amount: 10_000,
                description: "Groceries".to_owned(),
                date: date!(2025 - 10 - 15),
                category_id: 3,
                account_id: Some(7),
            }
        );
    }

    #[test]
    fn blank_description_gets_default() {
        let form = TransactionForm {
            description: String::new(),
            ..valid_form()
        };

        let fields = TransactionFields::try_from(&form).unwrap();

        assert_eq!(fields.description, "No description");
    }

    #[test]
    fn missing_fields_are_rejected_before_amount() {
        let form = TransactionForm {
            amount: "0".to_owned(),
            account_id: String::new(),
            ..valid_form()
        };

        assert_eq!(
            TransactionFields::try_from(&form),
            Err(Error::MissingTransactionFields)
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let form = TransactionForm {
            amount: "Rp 0".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            TransactionFields::try_from(&form),
            Err(Error::NonPositiveAmount)
        );
    }

    #[test]
    fn invalid_date_is_rejected() {
        assert_eq!(
            parse_date("15/10/2025"),
            Err(Error::InvalidDate("15/10/2025".to_owned()))
        );
    }
}
