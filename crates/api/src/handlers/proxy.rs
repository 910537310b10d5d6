use std::time::Duration;

use actix_web::{http::StatusCode, web, HttpResponse};
use metrics::counter;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{debug, warn};

use crate::state::AppState;

use super::ErrorBody;

/// Per-call timeouts; on expiry the call is reported like any other
/// transport failure.
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

pub async fn user_balance_handler(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let user_id = path.into_inner();
    let url = format!("{}/balance/{user_id}", state.transactions_base());
    forward(&state, "balance", Method::GET, url, READ_TIMEOUT).await
}

pub async fn user_addresses_handler(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let user_id = path.into_inner();
    let url = format!("{}/addresses?user_id={user_id}", state.monero_base());
    forward(&state, "addresses", Method::GET, url, READ_TIMEOUT).await
}

pub async fn queue_stats_handler(state: web::Data<AppState>) -> HttpResponse {
    let url = format!("{}/admin/queue", state.monero_base());
    forward(&state, "queue", Method::GET, url, READ_TIMEOUT).await
}

pub async fn drain_queue_handler(state: web::Data<AppState>) -> HttpResponse {
    let url = format!("{}/admin/drain", state.monero_base());
    forward(&state, "drain", Method::POST, url, DRAIN_TIMEOUT).await
}

/// Issues the single downstream call behind every proxy route and maps the
/// outcome: 200 and non-200 responses pass through verbatim (status, body,
/// content type), anything that fails before the response is complete becomes
/// a 502 carrying the failure description. Never retries.
async fn forward(
    state: &AppState,
    endpoint: &'static str,
    method: Method,
    url: String,
    timeout: Duration,
) -> HttpResponse {
    let response = state
        .http()
        .request(method, &url)
        .timeout(timeout)
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(err) => return bad_gateway(endpoint, &url, err),
    };

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    // 读取 body 途中失败同样按传输故障处理。
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => return bad_gateway(endpoint, &url, err),
    };

    let outcome = if status == 200 { "ok" } else { "passthrough" };
    counter!("admin_proxy_requests_total", 1, "endpoint" => endpoint, "outcome" => outcome);
    if status != 200 {
        debug!(endpoint, url = %url, status, "passing through downstream status");
    }

    let mut builder =
        HttpResponse::build(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY));
    if let Some(content_type) = content_type {
        builder.content_type(content_type);
    }
    builder.body(body)
}

fn bad_gateway(endpoint: &'static str, url: &str, err: reqwest::Error) -> HttpResponse {
    counter!("admin_proxy_requests_total", 1, "endpoint" => endpoint, "outcome" => "bad_gateway");
    warn!(endpoint, url = %url, error = %err, "downstream call failed");
    HttpResponse::BadGateway().json(ErrorBody {
        error: err.to_string(),
    })
}
