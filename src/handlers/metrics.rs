use crate::error::ApiError;
use crate::metrics;

pub async fn metrics_handler() -> Result<String, ApiError> {
    Ok(metrics::gather()?)
}
