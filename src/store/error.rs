use thiserror::Error;

/// Failure reported by a store, tagged with an HTTP-style status.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Erreur 400")]
    BadRequest,

    #[error("Erreur 401")]
    Unauthorized,

    #[error("Erreur 404")]
    NotFound,

    #[error("Erreur 500")]
    Internal,

    #[error("Erreur 500")]
    Database(#[source] sqlx::Error),

    #[error("Erreur 500")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => StoreError::BadRequest,
            401 => StoreError::Unauthorized,
            404 => StoreError::NotFound,
            _ => StoreError::Internal,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            StoreError::BadRequest => 400,
            StoreError::Unauthorized => 401,
            StoreError::NotFound => 404,
            StoreError::Internal | StoreError::Database(_) | StoreError::Io(_) => 500,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}
