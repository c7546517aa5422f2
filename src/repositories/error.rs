use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    /// A unique or foreign key constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                let constraint = db_err.constraint().unwrap_or("integrity constraint");
                Self::Conflict(constraint.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
