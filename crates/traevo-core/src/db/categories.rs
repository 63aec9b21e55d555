//! Category operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;
use crate::models::Category;
use crate::store::CategoryStore;

impl Database {
    /// Create a category; `user_id = None` makes it shared/global
    pub fn create_category(&self, user_id: Option<i64>, name: &str) -> Result<Category> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (user_id, name) VALUES (?, ?)",
            params![user_id, name],
        )?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
        })
    }
}

impl CategoryStore for Database {
    fn category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, user_id, name FROM categories WHERE id = ?",
                params![category_id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn category_available(&self, category_id: i64, user_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        // Available when owned by the user or shared (no owner)
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ? AND (user_id = ? OR user_id IS NULL)",
            params![category_id, user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn categories_for_user(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name FROM categories
             WHERE user_id = ? OR user_id IS NULL
             ORDER BY name",
        )?;

        let categories = stmt
            .query_map(params![user_id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }
}
