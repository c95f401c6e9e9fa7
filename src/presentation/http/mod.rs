pub mod cors;
pub mod health;
pub mod links;

use axum::{Router, extract::MatchedPath, http::Request, middleware};
use tower_http::trace::TraceLayer;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::cors::{OriginAllowList, origin_guard};

pub fn router(ctx: AppContext) -> Router {
    let allow = OriginAllowList::new(&ctx.cfg.allowed_origins);
    Router::new()
        .merge(links::routes(ctx.clone()))
        .merge(health::routes(ctx))
        .layer(allow.cors_layer())
        // Outermost so disallowed origins never reach CORS handling or routes.
        .layer(middleware::from_fn_with_state(allow, origin_guard))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
