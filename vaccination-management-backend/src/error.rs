use axum::response::IntoResponse;
use http::StatusCode;
use tracing::error;
use vaccination_management_database::error::DatabaseError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] vaccination_management_config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("Hospital not found")]
    HospitalNotFound,
    #[error("unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for AppError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value.into())
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for AppError {
    fn from(value: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        Self::Database(value.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::HospitalNotFound => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            _ => {
                error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Something went wrong: {self}"),
                )
                    .into_response()
            }
        }
    }
}
