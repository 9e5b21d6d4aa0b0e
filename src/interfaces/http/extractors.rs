use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::errors::ApiError;

/// JSON body extraction followed by declarative validation of the payload.
/// Both failure modes surface as a 400 with the standard `{message}` body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest {
                message: "invalid request body".to_string(),
            })?;

        value.validate().map_err(|_| ApiError::BadRequest {
            message: "validation failed".to_string(),
        })?;

        Ok(Self(value))
    }
}
