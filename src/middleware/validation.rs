use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::{
    dev::Payload, http::StatusCode, web, FromRequest, HttpRequest, HttpResponse, ResponseError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Request rejected before reaching its handler. Rendered as
/// `400 {"error": [{"field", "message"}, ...]}`.
#[derive(Debug, Error)]
#[error("request validation failed")]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: "body".to_string(),
                message: message.into(),
            }],
        }
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut collected: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code)),
                })
            })
            .collect();
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors: collected }
    }
}

impl ResponseError for ValidationFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(serde_json::json!({ "error": self.errors }))
    }
}

/// JSON body extractor that runs the payload's `validator` rules and
/// short-circuits the request with a 400 when any of them fail.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let value = json
                .await
                .map_err(|e| ValidationFailure::malformed(e.to_string()))?
                .into_inner();
            value.validate().map_err(ValidationFailure::from)?;
            Ok(ValidatedJson(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(email(message = "Email address is invalid"))]
        email: String,
        #[validate(length(min = 3, message = "Name is too short"))]
        name: String,
    }

    async fn handler(body: ValidatedJson<Probe>) -> HttpResponse {
        HttpResponse::Ok().body(body.name.clone())
    }

    #[actix_web::test]
    async fn valid_body_reaches_handler() {
        let app = test::init_service(App::new().route("/", web::post().to(handler))).await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({"email": "a@x.com", "name": "Ana"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn failing_rules_stop_the_request() {
        let app = test::init_service(App::new().route("/", web::post().to(handler))).await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({"email": "nope", "name": "A"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let errors = body["error"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "email");
        assert_eq!(errors[0]["message"], "Email address is invalid");
        assert_eq!(errors[1]["field"], "name");
    }

    #[actix_web::test]
    async fn malformed_json_is_rejected() {
        let app = test::init_service(App::new().route("/", web::post().to(handler))).await;
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
