//! Security headers set on every outgoing response.

use std::{future::Future, rc::Rc, task::{Context, Poll}};

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{
        HeaderMap, HeaderName, HeaderValue, CONTENT_SECURITY_POLICY, REFERRER_POLICY,
        X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
    },
    Error,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use once_cell::sync::Lazy;

// 'unsafe-inline' is kept for the site's inline scripts and styles.
pub const CSP_DIRECTIVES: [&str; 7] = [
    "default-src 'self'",
    "script-src 'self' https://kit.fontawesome.com 'unsafe-inline'",
    "style-src 'self' https://fonts.googleapis.com https://cdn.jsdelivr.net 'unsafe-inline'",
    "font-src 'self' https://fonts.gstatic.com https://cdn.jsdelivr.net data:",
    "img-src 'self' data:",
    "connect-src 'self'",
    "frame-ancestors 'none'",
];

static SECURITY_HEADERS: Lazy<Vec<(HeaderName, HeaderValue)>> = Lazy::new(|| {
    let csp = content_security_policy();

    [
        (CONTENT_SECURITY_POLICY, csp.as_str()),
        (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (X_FRAME_OPTIONS, "DENY"),
        (X_XSS_PROTECTION, "1; mode=block"),
        (REFERRER_POLICY, "strict-origin-when-cross-origin"),
        (
            HeaderName::from_static("permissions-policy"),
            "geolocation=(), microphone=(), camera=()",
        ),
    ]
    .into_iter()
    .filter_map(|(name, value)| match HeaderValue::from_str(value) {
        Ok(value) => Some((name, value)),
        Err(e) => {
            tracing::error!("Invalid value for security header {}: {}", name, e);
            None
        }
    })
    .collect()
});

/// The `Content-Security-Policy` value, directives joined with `; `.
pub fn content_security_policy() -> String {
    CSP_DIRECTIVES.join("; ")
}

/// The fixed header set, in the order it is applied.
pub fn security_headers() -> &'static [(HeaderName, HeaderValue)] {
    &SECURITY_HEADERS
}

/// Sets every security header, replacing any value already present.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in security_headers() {
        headers.insert(name.clone(), value.clone());
    }
}

/// Runs `next` once for `req` and stamps the security headers on the
/// response it produces. An error from `next` is returned untouched.
pub async fn add_security_headers<F, Fut, B>(
    req: ServiceRequest,
    next: F,
) -> Result<ServiceResponse<B>, Error>
where
    F: FnOnce(ServiceRequest) -> Fut,
    Fut: Future<Output = Result<ServiceResponse<B>, Error>>,
{
    let mut res = next(req).await?;
    apply_security_headers(res.headers_mut());
    Ok(res)
}

pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityHeadersService {
            service: Rc::new(service),
        })
    }
}

pub struct SecurityHeadersService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(add_security_headers(req, move |req| service.call(req)))
    }
}
