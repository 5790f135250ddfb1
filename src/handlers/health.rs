use axum::Json;

use crate::models::HealthResponse;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        message: "Quote API is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
