use serde::{Deserialize, Serialize};

// GET /api/quote success body
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuoteResponse {
    pub quote: String,
}

// Error body, used for 429 and internal failures
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

// GET /api/health body
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}
