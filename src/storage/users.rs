//! Account rows.

use rusqlite::{params, OptionalExtension, Row};

use super::{now_text, parse_timestamp, Database, StorageError};
use crate::models::User;

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
        updated_at: parse_timestamp(5, &updated_at)?,
    })
}

const USER_COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

impl Database {
    /// Insert a new account. Returns `None` when the email is already
    /// registered.
    pub fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, StorageError> {
        let conn = self.conn()?;
        let now = now_text();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (email, name, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![email, name, password_hash, now],
        )?;
        if inserted == 0 {
            return Ok(None);
        }
        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )?;
        Ok(Some(user))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch by email, creating a passwordless account on first use.
    /// Backs the development login.
    pub fn get_or_create_user(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<User, StorageError> {
        if let Some(existing) = self.find_user_by_email(email)? {
            return Ok(existing);
        }
        match self.create_user(email, name, None)? {
            Some(user) => Ok(user),
            // Lost a creation race; the row exists now.
            None => {
                let conn = self.conn()?;
                let user = conn.query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                    params![email],
                    user_from_row,
                )?;
                Ok(user)
            }
        }
    }
}
