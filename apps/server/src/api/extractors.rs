//! Custom Axum extractors that report failures through [`crate::Error`].

use crate::Error;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// `Query<T>` whose rejections become 400 responses with the uniform error body.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// `Multipart` that rejects non-multipart requests with 415.
pub struct Upload(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for Upload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| Error::UnsupportedMediaType(e.body_text()))?;
        Ok(Self(multipart))
    }
}
