use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("City not found")]
    CityNotFound { slug: String },

    #[error("Cuisine not found")]
    CuisineNotFound { cuisine: String },

    #[error("Restaurant not found")]
    RestaurantNotFound { restaurant_id: Uuid },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::CityNotFound { .. }
                | CatalogError::CuisineNotFound { .. }
                | CatalogError::RestaurantNotFound { .. }
        )
    }

    pub fn status(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<diesel::result::Error> for CatalogError {
    fn from(err: diesel::result::Error) -> Self {
        CatalogError::DatabaseError {
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.is_not_found() {
            self.to_string()
        } else {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_city_not_found_maps_to_404_with_message() {
        let response = CatalogError::CityNotFound {
            slug: "atlantis".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "message": "City not found" })
        );
    }

    #[tokio::test]
    async fn test_database_error_detail_is_not_leaked() {
        let response = CatalogError::DatabaseError {
            message: "password authentication failed".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "message": "Internal server error" })
        );
    }

    #[test]
    fn test_diesel_not_found_is_an_unexpected_failure() {
        let err = CatalogError::from(diesel::result::Error::NotFound);

        assert!(!err.is_not_found());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
