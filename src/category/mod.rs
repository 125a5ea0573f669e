//! Categories label transactions as income or expense.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{create_category_table, get_all_categories, get_category};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryFields, CategoryFormData, CategoryId, CategoryType, is_system_category,
};
pub use edit::edit_category_endpoint;
pub use list::get_category_list;

#[cfg(test)]
pub use db::test_utils;
