use crate::errors::ApiError;
use crate::models::{ApiKey, NewUser, UnusedApiKey, User};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("../db/schema.sql"))?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.conn.lock().map_err(|_| {
            tracing::error!("database connection lock poisoned");
            ApiError::Internal
        })
    }

    // API key operations
    pub fn create_api_key(&self, api_key: &str, service_name: &str) -> Result<i64, ApiError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO apikeys (api_key, service_name) VALUES (?, ?)",
            params![api_key, service_name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_api_key(&self, api_key: &str) -> Result<Option<ApiKey>, ApiError> {
        let conn = self.conn()?;
        let key = conn
            .query_row(
                "SELECT id, api_key, service_name, created_at, out_of_date FROM apikeys WHERE api_key = ?",
                params![api_key],
                api_key_from_row,
            )
            .optional()?;
        Ok(key)
    }

    pub fn api_key_exists(&self, api_key: &str) -> Result<bool, ApiError> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM apikeys WHERE api_key = ?",
                params![api_key],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn list_unused_api_keys(&self) -> Result<Vec<UnusedApiKey>, ApiError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT a.api_key, a.service_name
             FROM apikeys a
             LEFT JOIN users u ON a.api_key = u.api_key
             WHERE u.api_key IS NULL
             ORDER BY a.id",
        )?;

        let keys = stmt
            .query_map([], |row| {
                Ok(UnusedApiKey {
                    api_key: row.get(0)?,
                    service_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    pub fn list_api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, api_key, service_name, created_at, out_of_date FROM apikeys ORDER BY id",
        )?;
        let keys = stmt
            .query_map([], api_key_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    pub fn delete_api_key(&self, id: i64) -> Result<(), ApiError> {
        let conn = self.conn()?;
        let affected = conn
            .execute("DELETE FROM apikeys WHERE id = ?", params![id])
            .map_err(|err| match constraint_code(&err) {
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => ApiError::KeyInUse,
                _ => ApiError::Database(err),
            })?;

        if affected == 0 {
            return Err(ApiError::KeyNotFound);
        }
        Ok(())
    }

    // User operations
    pub fn create_user(&self, user: &NewUser) -> Result<i64, ApiError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, api_key) VALUES (?, ?, ?, ?)",
            params![user.first_name, user.last_name, user.email, user.api_key],
        )
        .map_err(|err| match constraint_code(&err) {
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE) if violates_column(&err, "users.email") => {
                ApiError::EmailExists
            }
            // The key was deleted after it was validated.
            Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => ApiError::InvalidApiKey,
            _ => ApiError::Database(err),
        })?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, email, api_key, created_at FROM users ORDER BY id",
        )?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    email: row.get(3)?,
                    api_key: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }

    // Admin operations
    pub fn create_admin(&self, email: &str, password_hash: &str) -> Result<i64, ApiError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO admins (email, password) VALUES (?, ?)",
            params![email, password_hash],
        )
        .map_err(|err| match constraint_code(&err) {
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => ApiError::AdminExists,
            _ => ApiError::Database(err),
        })?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_admin_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        let conn = self.conn()?;
        let hash = conn
            .query_row(
                "SELECT password FROM admins WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }
}

fn api_key_from_row(row: &Row<'_>) -> rusqlite::Result<ApiKey> {
    Ok(ApiKey {
        id: row.get(0)?,
        api_key: row.get(1)?,
        service_name: row.get(2)?,
        created_at: row.get(3)?,
        out_of_date: row.get(4)?,
    })
}

/// Extended SQLite result code of a constraint violation, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ffi::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

fn violates_column(err: &rusqlite::Error, column: &str) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains(column))
}
