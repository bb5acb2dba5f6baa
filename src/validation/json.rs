use axum::{
    extract::{FromRequest, Request, rejection::JsonRejection},
    Json,
};
use garde::Validate;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// JSON body extractor that runs the body's garde rules.
///
/// Malformed JSON and rule violations are both reported as
/// [`AppError::Validation`] (400).
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate<Context = ()>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|report| AppError::Validation(report.to_string()))?;

        Ok(ValidJson(value))
    }
}

/// Parses and validates a raw JSON body.
///
/// For handlers that must authorize the caller before the body is looked at;
/// they take the body as `Bytes` and call this afterwards.
pub fn parse_valid<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    let value: T = sonic_rs::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;

    value
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use garde::Validate;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[garde(custom(crate::validation::auth::not_blank))]
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidJson(probe) = ValidJson::<Probe>::from_request(request(r#"{"name":"Luna"}"#), &())
            .await
            .unwrap();
        assert_eq!(probe.name, "Luna");
    }

    #[tokio::test]
    async fn rule_violation_is_validation_error() {
        let err = ValidJson::<Probe>::from_request(request(r#"{"name":"   "}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("name")));
    }

    #[tokio::test]
    async fn malformed_json_is_validation_error() {
        let err = ValidJson::<Probe>::from_request(request(r#"{"name":"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn raw_body_is_parsed_and_checked() {
        let probe: Probe = parse_valid(br#"{"name":"Luna"}"#).unwrap();
        assert_eq!(probe.name, "Luna");

        assert!(matches!(
            parse_valid::<Probe>(br#"{"name":" "}"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_valid::<Probe>(b"not json"),
            Err(AppError::Validation(_))
        ));
    }
}
