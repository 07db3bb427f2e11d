use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{
    api::error,
    constants::SESSION_COOKIE,
    utils::{Claims, SessionVerifier},
};

fn session_token(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

fn verify_session(req: &ServiceRequest) -> Option<Claims> {
    let verifier = req.app_data::<web::Data<SessionVerifier>>()?;
    let token = session_token(req)?;

    match verifier.verify(&token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::debug!("Rejected session token: {}", e);
            None
        }
    }
}

/// Attaches session claims when a valid token is present. Never rejects.
pub async fn identify<B>(req: ServiceRequest, next: Next<B>) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    if let Some(claims) = verify_session(&req) {
        req.extensions_mut().insert(claims);
    }

    next.call(req).await
}

/// Rejects requests without a valid session before the body is read.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let authenticated = req.extensions().contains::<Claims>();

    if !authenticated {
        match verify_session(&req) {
            Some(claims) => {
                req.extensions_mut().insert(claims);
            }
            None => {
                let err = error::Error::unauthorized("Unauthorized");
                return Ok(req.error_response(err).map_into_right_body());
            }
        }
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

/// Who is making the request, as far as the session provider is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    User(Uuid),
}

impl AuthContext {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::User(id) => Some(*id),
        }
    }

    pub fn require_user(&self) -> Result<Uuid, error::SystemError> {
        self.user_id().ok_or_else(|| error::SystemError::unauthorized("Unauthorized"))
    }
}

impl FromRequest for AuthContext {
    type Error = error::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = match req.extensions().get::<Claims>() {
            Some(claims) => AuthContext::User(claims.sub),
            None => AuthContext::Anonymous,
        };
        ready(Ok(context))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, middleware::from_fn, test, App, HttpResponse};

    use super::*;

    async fn whoami(auth: AuthContext) -> HttpResponse {
        match auth.user_id() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(SessionVerifier::new("secret")))
                    .wrap(from_fn(identify))
                    .route("/open", web::get().to(whoami))
                    .service(
                        web::scope("/closed")
                            .wrap(from_fn(authentication))
                            .route("", web::get().to(whoami)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn anonymous_requests_pass_through_identify() {
        let app = app!();
        let req = test::TestRequest::get().uri("/open").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn bearer_token_identifies_user() {
        let app = app!();
        let user_id = Uuid::now_v7();
        let token = Claims::new(&user_id, 60).encode(b"secret").unwrap();
        let req = test::TestRequest::get()
            .uri("/open")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string());
    }

    #[actix_web::test]
    async fn session_cookie_identifies_user() {
        let app = app!();
        let user_id = Uuid::now_v7();
        let token = Claims::new(&user_id, 60).encode(b"secret").unwrap();
        let req = test::TestRequest::get()
            .uri("/closed")
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string());
    }

    #[actix_web::test]
    async fn authentication_rejects_missing_session() {
        let app = app!();
        let req = test::TestRequest::get().uri("/closed").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let body: error::ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Unauthorized");
    }

    #[actix_web::test]
    async fn authentication_rejects_forged_token() {
        let app = app!();
        let token = Claims::new(&Uuid::now_v7(), 60).encode(b"not-the-secret").unwrap();
        let req = test::TestRequest::get()
            .uri("/closed")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
