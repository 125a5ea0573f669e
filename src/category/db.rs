//! Database operations for categories.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserId,
    category::{Category, CategoryFields, CategoryId, is_system_category},
};

/// Create a category and return it with its generated ID.
///
/// The icon is derived from the category type.
pub fn create_category(
    user_id: UserId,
    fields: &CategoryFields,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .query_one(
            "INSERT INTO category (user_id, name, type, color, icon) VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, user_id, name, type, color, icon",
            params![
                user_id,
                fields.name,
                fields.category_type,
                fields.color,
                fields.category_type.icon()
            ],
            map_row,
        )
        .map_err(Error::from)
}

/// Retrieve one of the user's categories by ID.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, color, icon FROM category
            WHERE id = ?1 AND user_id = ?2;",
        )?
        .query_row(params![category_id, user_id], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of the user's categories ordered alphabetically by name.
pub fn get_all_categories(user_id: UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, color, icon FROM category
            WHERE user_id = ?1
            ORDER BY name ASC;",
        )?
        .query_map(params![user_id], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name, type and color. The icon is left as it was.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if the user has no category with `category_id`.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserId,
    fields: &CategoryFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2, color = ?3 WHERE id = ?4 AND user_id = ?5",
        params![
            fields.name,
            fields.category_type,
            fields.color,
            category_id,
            user_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// # Errors
/// Returns:
/// - [Error::DeleteMissingCategory] if the user has no category with `category_id`,
/// - [Error::SystemCategory] if the category is one of the system categories,
/// - [Error::CategoryInUse] if a transaction still refers to the category.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = match get_category(category_id, user_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error),
    };

    if is_system_category(&category.name) {
        return Err(Error::SystemCategory(category.name));
    }

    connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            params![category_id, user_id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CategoryInUse,
            error => error.into(),
        })?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            color TEXT NOT NULL,
            icon TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_name ON category(user_id, name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category_type: row.get(3)?,
        color: row.get(4)?,
        icon: row.get(5)?,
    })
}


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error, UserId,
        category::{CategoryFields, CategoryType},
        initialize_db,
    };

    use super::{
        delete_category, get_all_categories, get_category, test_utils::must_create_category,
        update_category,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection
    }

    #[test]
    fn create_sets_icon_from_type() {
        let connection = get_test_connection();

        let income =
            must_create_category(UserId::new(1), "Salary", CategoryType::Income, &connection);
        let expense =
            must_create_category(UserId::new(1), "Food", CategoryType::Expense, &connection);

        assert_eq!(income.icon, "trending-up");
        assert_eq!(expense.icon, "shopping-bag");
    }

    #[test]
    fn get_all_is_sorted_and_scoped_to_user() {
        let connection = get_test_connection();
        let user_id = UserId::new(1);
        must_create_category(user_id, "Transport", CategoryType::Expense, &connection);
        must_create_category(user_id, "Bonus", CategoryType::Income, &connection);
        must_create_category(UserId::new(2), "Another", CategoryType::Income, &connection);

        let names: Vec<_> = get_all_categories(user_id, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();

        assert_eq!(names, vec!["Bonus", "Transport"]);
    }

    #[test]
    fn update_keeps_icon() {
        let connection = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Gift", CategoryType::Income, &connection);
        let fields = CategoryFields {
            name: "Gifts".to_owned(),
            category_type: CategoryType::Expense,
            color: "#FF0000".to_owned(),
        };

        update_category(category.id, user_id, &fields, &connection).unwrap();

        let got = get_category(category.id, user_id, &connection).unwrap();
        assert_eq!(got.name, "Gifts");
        assert_eq!(got.category_type, CategoryType::Expense);
        assert_eq!(got.color, "#FF0000");
        assert_eq!(got.icon, "trending-up");
    }

    #[test]
    fn update_missing_category() {
        let connection = get_test_connection();
        let fields = CategoryFields {
            name: "Gifts".to_owned(),
            category_type: CategoryType::Expense,
            color: "#FF0000".to_owned(),
        };

        assert_eq!(
            update_category(99, UserId::new(1), &fields, &connection),
            Err(Error::UpdateMissingCategory)
        );
    }

    #[test]
    fn delete_removes_category() {
        let connection = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Gift", CategoryType::Income, &connection);

        delete_category(category.id, user_id, &connection).unwrap();

        assert_eq!(
            get_category(category.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn cannot_delete_system_category() {
        let connection = get_test_connection();
        let user_id = UserId::new(1);
        let category =
            must_create_category(user_id, "Transfer", CategoryType::Expense, &connection);

        assert_eq!(
            delete_category(category.id, user_id, &connection),
            Err(Error::SystemCategory("Transfer".to_owned()))
        );
    }

    #[test]
    fn cannot_delete_category_in_use() {
        let connection = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Food", CategoryType::Expense, &connection);
        connection
            .execute(
                "INSERT INTO \"transaction\" (user_id, amount, description, date, category_id, created_at)
                VALUES (?1, 10, 'Lunch', '2025-10-01', ?2, '2025-10-01 12:00:00.0 +00:00:00')",
                (user_id, category.id),
            )
            .unwrap();

        assert_eq!(
            delete_category(category.id, user_id, &connection),
            Err(Error::CategoryInUse)
        );
    }

    #[test]
    fn delete_missing_category() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category(1, UserId::new(1), &connection),
            Err(Error::DeleteMissingCategory)
        );
    }
}
