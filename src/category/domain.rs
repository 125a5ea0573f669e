//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Error, UserId, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// The color given to a category when the form leaves it blank.
pub const DEFAULT_CATEGORY_COLOR: &str = "#64748B";

/// Categories that every user relies on and that cannot be deleted.
pub const SYSTEM_CATEGORIES: [&str; 2] = ["Uncategorized", "Transfer"];

/// Whether money is coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    /// The icon shown next to categories of this type.
    pub fn icon(&self) -> &'static str {
        match self {
            CategoryType::Income => "trending-up",
            CategoryType::Expense => "shopping-bag",
        }
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            _ => Err(Error::InvalidCategoryType(s.to_owned())),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A label (income or expense) applied to transactions, e.g. "Salary" or "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// A CSS color, e.g. "#64748B".
    pub color: String,
    pub icon: String,
}

impl Category {
    /// Whether this is one of the [SYSTEM_CATEGORIES].
    pub fn is_system(&self) -> bool {
        is_system_category(&self.name)
    }
}

pub fn is_system_category(name: &str) -> bool {
    SYSTEM_CATEGORIES.contains(&name)
}

/// Form data for category creation and editing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryFormData {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub category_type: String,
    #[serde(default)]
    pub color: String,
}

/// The validated fields of a [CategoryFormData].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub category_type: CategoryType,
    pub color: String,
}

impl CategoryFields {
    /// Validate the form data.
    ///
    /// `missing_fields_error` is returned when the name or type is blank, since
    /// creating and updating report that case differently.
    ///
    /// # Errors
    /// Returns `missing_fields_error` or [Error::InvalidCategoryType].
    pub fn parse(form: &CategoryFormData, missing_fields_error: Error) -> Result<Self, Error> {
        let name = form.name.trim();

        if name.is_empty() || form.category_type.trim().is_empty() {
            return Err(missing_fields_error);
        }

        let color = match form.color.trim() {
            "" => DEFAULT_CATEGORY_COLOR,
            color => color,
        };

        Ok(Self {
            name: name.to_owned(),
            category_type: form.category_type.parse()?,
            color: color.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CategoryFields, CategoryFormData, CategoryType, DEFAULT_CATEGORY_COLOR};

    #[test]
    fn icon_follows_type() {
        assert_eq!(CategoryType::Income.icon(), "trending-up");
        assert_eq!(CategoryType::Expense.icon(), "shopping-bag");
    }

    #[test]
    fn blank_color_gets_default() {
        let form = CategoryFormData {
            name: "Groceries".to_owned(),
            category_type: "expense".to_owned(),
            color: " ".to_owned(),
        };

        let fields = CategoryFields::parse(&form, Error::MissingCategoryFields).unwrap();

        assert_eq!(fields.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(fields.category_type, CategoryType::Expense);
    }

    #[test]
    fn missing_name_returns_given_error() {
        let form = CategoryFormData {
            category_type: "income".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            CategoryFields::parse(&form, Error::MissingCategoryUpdateFields),
            Err(Error::MissingCategoryUpdateFields)
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let form = CategoryFormData {
            name: "Gifts".to_owned(),
            category_type: "transfer".to_owned(),
            color: String::new(),
        };

        assert_eq!(
            CategoryFields::parse(&form, Error::MissingCategoryFields),
            Err(Error::InvalidCategoryType("transfer".to_owned()))
        );
    }
}
