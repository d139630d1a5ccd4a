use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use fauna_ml::{FormError, PredictError};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: Option<String>,
    report: bool,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: &'static str,
        public_message: Option<String>,
        report: bool,
    ) -> Self {
        Self {
            status,
            public_code,
            public_message,
            report,
        }
    }

    /// Reported: logged with an error id that is echoed in `x-error-id`.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            Some(msg.into()),
            true,
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", Some(msg), false)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let public_message = self
            .public_message
            .as_deref()
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Error"));

        let error_id = self.report.then(fauna_types::create_id);
        if let Some(id) = error_id.as_deref() {
            tracing::error!(
                error_id = id,
                status = self.status.as_u16(),
                code = self.public_code,
                "{}",
                public_message
            );
        }

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code: self.public_code,
                    id: error_id.as_deref(),
                    message: public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = error_id.as_deref() {
            if let Ok(v) = HeaderValue::from_str(id) {
                response.headers_mut().insert("x-error-id", v);
            }
        }

        response
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Input(err) => err.into(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected JSON body: {}", rejection.body_text());
        Self::new(
            rejection.status(),
            "INVALID_JSON",
            Some(rejection.body_text()),
            false,
        )
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        Self::internal(format!("Failed to render page: {err:#}"))
    }
}
