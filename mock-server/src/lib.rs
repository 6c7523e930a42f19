use std::collections::BTreeMap;

use axum::{
    extract::{Path, RawQuery},
    http::{header, HeaderMap, Method, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::{any, get},
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

/// What the server saw of a request, returned by `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect", get(redirect))
        .route("/redirect/{hops}", get(redirect_chain))
        .route("/cookies/set", get(set_cookies))
        .route("/status/{code}", any(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    debug!("echo {method} query={query:?}");
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    (
        [("X-Echo", "1")],
        Json(Echo {
            method: method.to_string(),
            query,
            body,
            headers,
        }),
    )
}

async fn redirect() -> Redirect {
    Redirect::to("/echo")
}

async fn redirect_chain(Path(hops): Path<u32>) -> Redirect {
    if hops <= 1 {
        Redirect::to("/echo")
    } else {
        Redirect::to(&format!("/redirect/{}", hops - 1))
    }
}

async fn set_cookies() -> impl IntoResponse {
    let session = format!("session={}; Path=/", Uuid::new_v4());
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, "theme=dark; Path=/".to_string()),
            (header::SET_COOKIE, session),
        ]),
    )
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}
