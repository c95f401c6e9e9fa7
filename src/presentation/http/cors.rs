use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Browser origins allowed to call the API.
#[derive(Clone, Debug)]
pub struct OriginAllowList(Arc<Vec<HeaderValue>>);

impl OriginAllowList {
    pub fn new(origins: &[String]) -> Self {
        let values = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring_invalid_allowed_origin");
                    None
                }
            })
            .collect();
        Self(Arc::new(values))
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|o| o == origin)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.0.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }
}

/// Rejects requests whose `Origin` is not allow-listed before they reach a
/// handler. Requests without an `Origin` header pass.
pub async fn origin_guard(
    State(allow): State<OriginAllowList>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if !allow.allows(origin) {
            tracing::warn!(origin = ?origin, "cors_origin_rejected");
            return (StatusCode::FORBIDDEN, "Not allowed by CORS").into_response();
        }
    }
    next.run(req).await
}
