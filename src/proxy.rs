//! Single-route forwarding endpoint: `GET /proxy?url=<target>` fetches the
//! target and relays its body, status and content type. Lets a browser page
//! reach hosts that don't send CORS headers.

use serde::Deserialize;
use std::convert::Infallible;
use std::io::Read;
use std::net::SocketAddr;
use tracing::{info, warn};
use warp::http::{header::CONTENT_TYPE, Response, StatusCode};
use warp::hyper::Body;
use warp::Filter;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    url: Option<String>,
}

#[derive(Debug)]
pub struct Upstream {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Only absolute http(s) URLs are forwarded.
pub fn valid_target(url: Option<&str>) -> Option<&str> {
    url.filter(|u| u.starts_with("http://") || u.starts_with("https://"))
}

/// Blocking fetch; upstream error statuses are relayed, not treated as failures.
pub fn fetch_upstream(url: &str) -> Result<Upstream, String> {
    let response = match ureq::get(url).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => return Err(e.to_string()),
    };

    let status = response.status();
    let content_type = response
        .header("Content-Type")
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| e.to_string())?;

    Ok(Upstream {
        status,
        content_type,
        body,
    })
}

fn text_response(status: StatusCode, message: String) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}

async fn handle(query: ProxyQuery) -> Result<Response<Body>, Infallible> {
    let Some(url) = valid_target(query.url.as_deref()).map(str::to_string) else {
        return Ok(text_response(
            StatusCode::BAD_REQUEST,
            "Invalid or missing url parameter".to_string(),
        ));
    };

    let target = url.clone();
    let fetched = tokio::task::spawn_blocking(move || fetch_upstream(&target))
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r);

    match fetched {
        Ok(upstream) => {
            info!(%url, status = upstream.status, bytes = upstream.body.len(), "proxied");
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut response = Response::new(Body::from(upstream.body));
            *response.status_mut() = status;
            if let Ok(value) = upstream.content_type.parse() {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            Ok(response)
        }
        Err(e) => {
            warn!(%url, error = %e, "proxy fetch failed");
            Ok(text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {}", e),
            ))
        }
    }
}

pub fn routes() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);

    warp::path("proxy")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ProxyQuery>())
        .and_then(handle)
        .with(cors)
}

pub async fn serve(addr: SocketAddr) {
    info!(%addr, "proxy listening");
    warp::serve(routes()).run(addr).await;
}
