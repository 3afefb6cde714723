//! HTTP API - thin JSON wrapper around the estimator

use crate::estimation::{
    estimate_request, EstimationError, EstimationPolicy, EstimationResult, ProjectRequest,
};
use crate::pricing::{MaterialPrice, PriceBook};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub prices: Arc<PriceBook>,
    pub policy: EstimationPolicy,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

#[derive(Serialize)]
pub struct PriceTableResponse {
    pub city: String,
    pub fallback: bool,
    pub prices: Vec<MaterialPrice>,
}

/// Caller errors: an unreadable body or an estimate that cannot be made
pub enum ApiError {
    Request(JsonRejection),
    Estimation(EstimationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Request(rejection) => {
                (rejection.status(), "invalid_request", rejection.body_text())
            }
            ApiError::Estimation(e) => {
                let kind = match &e {
                    EstimationError::InvalidUnit(_) => "invalid_unit",
                    EstimationError::InvalidEnumValue { .. } => "invalid_enum_value",
                    EstimationError::InvalidInput { .. } => "invalid_input",
                    EstimationError::OutOfRange(_) => "out_of_range",
                };
                (StatusCode::UNPROCESSABLE_ENTITY, kind, e.to_string())
            }
        };
        let body = ErrorBody {
            error: kind.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/estimate", post(create_estimate))
        .route("/api/prices", get(list_cities))
        .route("/api/prices/:city", get(get_prices))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Construction estimator is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn create_estimate(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<EstimationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable estimate request: {}", rejection.body_text());
        ApiError::Request(rejection)
    })?;

    estimate_request(request, &state.prices, &state.policy)
        .map(Json)
        .map_err(|e| {
            warn!("Rejected estimate request: {}", e);
            ApiError::Estimation(e)
        })
}

async fn list_cities(State(state): State<AppState>) -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: state.prices.cities().into_iter().map(String::from).collect(),
    })
}

async fn get_prices(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<PriceTableResponse> {
    let table = state.prices.table_for(&city);
    Json(PriceTableResponse {
        city: table.city.to_string(),
        fallback: table.is_fallback,
        prices: table.prices.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::builtin_price_book;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            prices: Arc::new(builtin_price_book()),
            policy: EstimationPolicy::default(),
        })
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_estimate_endpoint() {
        let request = serde_json::to_value(ProjectRequest::default()).unwrap();
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["totalCoveredAreaSqft"], "1125");
        assert_eq!(body["steelTons"], "4.28");
        assert_eq!(body["isFeasible"], true);
        assert_eq!(body["materialBreakdown"].as_array().unwrap().len(), 3);
        assert_eq!(body["materialBreakdown"][0]["category"], "Cement");
    }

    #[tokio::test]
    async fn test_estimate_rejects_bad_enum() {
        let mut request = serde_json::to_value(ProjectRequest::default()).unwrap();
        request["floors"] = serde_json::json!("Ground + 7");
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_enum_value");
    }

    #[tokio::test]
    async fn test_estimate_rejects_bad_unit() {
        let mut request = serde_json::to_value(ProjectRequest::default()).unwrap();
        request["unitType"] = serde_json::json!("Acre");
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "invalid_unit");
    }

    #[tokio::test]
    async fn test_price_lookup() {
        let response = app()
            .oneshot(Request::builder().uri("/api/prices/karachi").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["city"], "Karachi");
        assert_eq!(body["fallback"], false);

        let response = app()
            .oneshot(Request::builder().uri("/api/prices/Gwadar").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["fallback"], true);
        assert_eq!(body["prices"][0]["material"], "Cement");
    }

    #[tokio::test]
    async fn test_list_cities() {
        let response = app()
            .oneshot(Request::builder().uri("/api/prices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        let cities = body["cities"].as_array().unwrap();

        assert!(cities.iter().any(|c| c == "Lahore"));
        assert!(cities.iter().any(|c| c == "Peshawar"));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_error_body() {
        let mut request = serde_json::to_value(ProjectRequest::default()).unwrap();
        request.as_object_mut().unwrap().remove("unitType");
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_request");
        assert!(body["message"].as_str().unwrap().contains("unitType"));

        let mut request = serde_json::to_value(ProjectRequest::default()).unwrap();
        request["rooms"] = serde_json::json!(-2);
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "invalid_request");

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/estimate")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid_request");
    }

    #[tokio::test]
    async fn test_huge_labor_rate_is_out_of_range() {
        let mut request = serde_json::to_value(ProjectRequest::default()).unwrap();
        request["laborRate"] = serde_json::json!(1e28);
        let response = app().oneshot(post_json("/api/estimate", request)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "out_of_range");
    }
}
