/// HTTP middleware utilities for board-service
///
/// Provides anonymous session extraction and simple request metrics
/// logging. Identity here is a bare opaque token from the `X-Session-Id`
/// header: no accounts, no cryptographic validation. This is a known trust
/// boundary weakness of the board (tokens can be spoofed); fixing it is
/// out of scope.
use crate::error::AppError;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

/// Longest session token accepted; anything bigger is rejected outright.
const SESSION_ID_MAX_LEN: usize = 128;

// =====================================================================
// Session extraction
// =====================================================================

/// Extracted session identifier stored in request extensions.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Actix middleware that pulls the opaque session token from the
/// `X-Session-Id` header and stores it for handlers to extract.
pub struct SessionAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let session_header = req
                .headers()
                .get("X-Session-Id")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    AppError::Unauthorized("Missing X-Session-Id header".to_string())
                })?;

            let session_id = session_header.trim();
            if session_id.is_empty() {
                return Err(AppError::Unauthorized("Empty session id".to_string()).into());
            }
            if session_id.len() > SESSION_ID_MAX_LEN {
                return Err(AppError::Unauthorized("Session id too long".to_string()).into());
            }

            req.extensions_mut()
                .insert(SessionId(session_id.to_string()));

            service.call(req).await
        })
    }
}

impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionId>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Unauthorized("Session id missing".to_string()).into()
                }),
        )
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            tracing::debug!(%method, %path, %elapsed, "request completed");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn echo_session(session: SessionId) -> HttpResponse {
        HttpResponse::Ok().body(session.0)
    }

    #[actix_web::test]
    async fn missing_session_header_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(SessionAuthMiddleware)
                .route("/echo", web::get().to(echo_session)),
        )
        .await;

        let req = test::TestRequest::get().uri("/echo").to_request();
        // App-level middleware errors surface as Err here; in production
        // actix-http renders them via ResponseError.
        let err = test::try_call_service(&app, req)
            .await
            .expect_err("middleware should reject the request");
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_session_header_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(SessionAuthMiddleware)
                .route("/echo", web::get().to(echo_session)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header(("X-Session-Id", "   "))
            .to_request();
        let err = test::try_call_service(&app, req)
            .await
            .expect_err("middleware should reject the request");
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn oversized_session_header_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(SessionAuthMiddleware)
                .route("/echo", web::get().to(echo_session)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header(("X-Session-Id", "x".repeat(SESSION_ID_MAX_LEN + 1)))
            .to_request();
        let err = test::try_call_service(&app, req)
            .await
            .expect_err("middleware should reject the request");
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn valid_session_header_reaches_extractor() {
        let app = test::init_service(
            App::new()
                .wrap(SessionAuthMiddleware)
                .route("/echo", web::get().to(echo_session)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header(("X-Session-Id", "session-abc"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        assert_eq!(body, "session-abc");
    }
}
