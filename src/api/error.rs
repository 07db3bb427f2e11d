use actix_web::{
    error::{BlockingError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Internal Server Error: {0}")]
    InternalServer(Cow<'static, str>),
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub error: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalServer(msg.into())
    }

    /// Converts an internal error into a client-facing one, replacing the
    /// message of anything 500-class with `fallback`. The cause is logged.
    pub fn from_system(err: SystemError, fallback: impl Into<Cow<'static, str>>) -> Self {
        match err {
            SystemError::BadRequest(msg) | SystemError::NoTextFound(msg) => Error::BadRequest(msg),
            SystemError::Unauthorized(msg) => Error::Unauthorized(msg),
            SystemError::NotConfigured(msg) => {
                log::error!("Missing configuration: {}", msg);
                Error::InternalServer(msg)
            }
            other => {
                log::error!("Internal Server Error: {:?}", other);
                Error::InternalServer(fallback.into())
            }
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            Error::BadRequest(msg) | Error::Unauthorized(msg) | Error::InternalServer(msg) => {
                res.json(ErrorBody { error: msg.clone() })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // jwt errors
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // image codec errors
    #[error("Image Error: {0}")]
    ImageError(#[from] image::ImageError),
    // OCR / AI services
    #[error("Upstream Error: {0}")]
    Upstream(Cow<'static, str>),
    #[error("Not Configured: {0}")]
    NotConfigured(Cow<'static, str>),
    // Custom Errors
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("No Text Found: {0}")]
    NoTextFound(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        Error::from_system(value, "Internal Server Error")
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23514") | Some("23502") => {
                    let field = db_err.constraint().unwrap_or("value").to_string();
                    return SystemError::BadRequest(format!("Invalid {field}").into());
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        SystemError::InternalError(Box::new(err))
    }
}

impl From<BlockingError> for SystemError {
    fn from(err: BlockingError) -> Self {
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn no_text_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NoTextFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn upstream(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn not_configured(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotConfigured(msg.into())
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::bad_request(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::bad_request(err.to_string()).into()
}
