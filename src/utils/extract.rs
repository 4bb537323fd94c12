//! Extractor de cuerpos form o JSON
//!
//! El dashboard envía `application/x-www-form-urlencoded`, algunos
//! dispositivos envían JSON y otros no mandan cuerpo. `FormOrJson` acepta los
//! tres casos; un cuerpo vacío equivale a todos los campos ausentes.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::utils::errors::AppError;

pub struct FormOrJson<T>(pub T);

fn is_json_content_type(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = is_json_content_type(&req);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Unreadable request body: {}", e)))?;

        let value = if body.iter().all(u8::is_ascii_whitespace) {
            serde_urlencoded::from_str("")
                .map_err(|e| AppError::BadRequest(format!("Malformed form body: {}", e)))?
        } else if is_json {
            serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {}", e)))?
        } else {
            serde_urlencoded::from_bytes(&body)
                .map_err(|e| AppError::BadRequest(format!("Malformed form body: {}", e)))?
        };

        Ok(FormOrJson(value))
    }
}
