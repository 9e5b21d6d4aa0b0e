pub mod groups;
pub mod health;
pub mod students;

use crate::shared::errors::ApiError;

// Path ids are parsed by hand so a bad id yields the standard error body
// instead of the framework's plain-text rejection.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::BadRequest {
        message: "invalid id parameter".to_string(),
    })
}
