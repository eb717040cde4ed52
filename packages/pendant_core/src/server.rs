//! server.rs
//!
//! warp filters serving the device context over HTTP.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::contract::{self, ApiRoute, ErrorBody, HttpMethod};
use crate::device::DeviceContext;
use crate::error::PendantError;

/// Raised when a response body cannot be produced.
#[derive(Debug)]
struct InternalFailure(String);

impl warp::reject::Reject for InternalFailure {}

fn with_context(
    ctx: Arc<DeviceContext>,
) -> impl Filter<Extract = (Arc<DeviceContext>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&ctx))
}

/// Match exactly the method and path of a contract route.
fn endpoint(route: ApiRoute) -> BoxedFilter<()> {
    let method = match route.method {
        HttpMethod::Get => warp::get().boxed(),
        HttpMethod::Post => warp::post().boxed(),
    };

    route
        .segments()
        .fold(warp::any().boxed(), |filter, segment| {
            filter.and(warp::path(segment)).boxed()
        })
        .and(warp::path::end())
        .and(method)
        .boxed()
}

fn json_reply<T: Serialize>(value: &T) -> Result<warp::reply::Json, Rejection> {
    serde_json::to_value(value)
        .map(|json| warp::reply::json(&json))
        .map_err(|e| warp::reject::custom(InternalFailure(e.to_string())))
}

async fn handle_status(ctx: Arc<DeviceContext>) -> Result<impl Reply, Rejection> {
    let reading = ctx.latest_reading();
    json_reply(&reading)
}

async fn handle_history(ctx: Arc<DeviceContext>) -> Result<impl Reply, Rejection> {
    let history = ctx.history();
    json_reply(&history)
}

async fn handle_sos(ctx: Arc<DeviceContext>) -> Result<impl Reply, Rejection> {
    match ctx.send_sos().await {
        Ok(ack) => json_reply(&ack),
        Err(e) => {
            log::error!("SOS dispatch failed: {}", e);
            Err(warp::reject::custom(InternalFailure(e.to_string())))
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorBody::new("Not found"))
    } else if let Some(InternalFailure(reason)) = err.find::<InternalFailure>() {
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(reason.clone()))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, ErrorBody::new("Method not allowed"))
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new("Internal server error"))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

/// The full API: status, history and SOS, with error bodies, CORS and
/// request logging.
pub fn routes(
    ctx: Arc<DeviceContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone + Send + Sync + 'static {
    // CORS headers so a browser dashboard on another origin can poll
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    let status = endpoint(contract::STATUS)
        .and(with_context(Arc::clone(&ctx)))
        .and_then(handle_status);

    let history = endpoint(contract::HISTORY)
        .and(with_context(Arc::clone(&ctx)))
        .and_then(handle_history);

    let sos = endpoint(contract::SOS)
        .and(with_context(Arc::clone(&ctx)))
        .and_then(handle_sos);

    status
        .or(history)
        .or(sos)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("pendant::api"))
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    ctx: Arc<DeviceContext>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), PendantError> {
    let (bound, server) = warp::serve(routes(ctx))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| PendantError::Bind {
            addr,
            reason: e.to_string(),
        })?;

    log::info!("Pendant telemetry service listening on http://{}", bound);
    for route in contract::ROUTES {
        log::info!("  {} {}", route.method, route.path);
    }

    server.await;
    log::info!("Pendant telemetry service stopped");
    Ok(())
}
