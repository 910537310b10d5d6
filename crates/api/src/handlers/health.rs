use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
