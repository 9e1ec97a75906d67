use std::convert::TryFrom;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Query, Request, State},
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Form, Router,
};
use tokio::net::TcpListener;
use tracing::{debug, info};

use super::response::ApiResponse;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::query::{QueryParams, QueryRequest};

pub const QUERY_PATH: &str = "/api/v1/query";
pub const QUERY_RANGE_PATH: &str = "/api/v1/query_range";

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

/// `query_path` and the range endpoint share one handler: whether a query
/// is ranged depends on its parameters only.
pub fn router(engine: Engine, query_path: &str) -> Router {
    let mut app = Router::new().route(query_path, get(handle_query).post(handle_query));
    if query_path != QUERY_RANGE_PATH {
        app = app.route(QUERY_RANGE_PATH, get(handle_query).post(handle_query));
    }
    app.with_state(AppState { engine })
}

pub async fn serve(addr: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_query(
    State(state): State<AppState>,
    Params(params): Params,
) -> Result<ApiResponse> {
    let request = QueryRequest::try_from(params).map_err(|e| {
        debug!(error = %e, "rejected query parameters");
        e
    })?;

    let data = state.engine.execute(&request).await?;
    Ok(ApiResponse::success(data))
}

/// Query parameters from the URL, completed from the body of a POST: a
/// urlencoded form when the content type says so, JSON otherwise. An empty
/// body, or an unlabelled one that isn't JSON, adds nothing.
struct Params(QueryParams);

#[async_trait]
impl<S> FromRequest<S> for Params
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Query(mut params) = Query::<QueryParams>::try_from_uri(req.uri())
            .map_err(|e| Error::bad_data(e.body_text()))?;

        if *req.method() != Method::POST || params.query().is_some() {
            return Ok(Params(params));
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let body = if content_type.starts_with("application/x-www-form-urlencoded") {
            Form::<QueryParams>::from_request(req, state)
                .await
                .map(|Form(p)| p)
                .map_err(|e| Error::bad_data(e.body_text()))?
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| Error::bad_data(e.body_text()))?;
            if bytes.is_empty() {
                QueryParams::default()
            } else if content_type.starts_with("application/json") {
                serde_json::from_slice(&bytes)
                    .map_err(|e| Error::bad_data(format!("invalid JSON body: {}", e)))?
            } else {
                serde_json::from_slice(&bytes).unwrap_or_default()
            }
        };

        params.query = body.query;
        params.start = params.start.or(body.start);
        params.end = params.end.or(body.end);
        params.step = params.step.or(body.step);
        params.time = params.time.or(body.time);
        Ok(Params(params))
    }
}
