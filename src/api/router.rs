//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::metrics::MetricsState;
use crate::api::handlers::{bikes, health, metrics, reservations, RentalState};
use crate::api::middleware::http_metrics_middleware;
use crate::application::RentalService;

/// Router state; each handler extracts its own part via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub rental: Arc<RentalService>,
    pub prometheus: PrometheusHandle,
}

impl FromRef<ApiState> for RentalState {
    fn from_ref(s: &ApiState) -> Self {
        RentalState {
            rental: Arc::clone(&s.rental),
        }
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        bikes::list_bikes,
        reservations::active_reservation,
        reservations::create_reservation,
        reservations::delete_reservation,
    ),
    components(schemas(
        BikeDto,
        CreateReservationRequest,
        CreateReservationResponse,
        MessageResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Bikes", description = "Bike listing"),
        (name = "Reservations", description = "Reserve and release bikes"),
    ),
    info(
        title = "eBike Rental API",
        description = "Reserve and release shared electric bikes",
    )
)]
pub struct ApiDoc;

/// Build the HTTP router.
pub fn create_api_router(rental: Arc<RentalService>, prometheus: PrometheusHandle) -> Router {
    let state = ApiState { rental, prometheus };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/bikes", get(bikes::list_bikes))
        .route("/bikes/", get(bikes::list_bikes))
        .route(
            "/reservation",
            get(reservations::active_reservation).post(reservations::create_reservation),
        )
        .route("/reservation/", post(reservations::create_reservation))
        .route(
            "/reservation/bike/{bike_id}",
            delete(reservations::delete_reservation),
        )
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .with_state(state)
        .merge(swagger_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::WriteMode;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn app() -> Router {
        let store = InMemoryRepositoryProvider::new();
        store.add_user("alice");
        store.add_user("bob");
        store.add_bike("Alpha", "52.0", "13.0");
        let rental = Arc::new(RentalService::new(
            Arc::new(store),
            WriteMode::Transactional,
        ));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(rental, handle)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn reserve(username: &str, bike_id: i32) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/reservation")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"username": username, "bikeid": bike_id}).to_string(),
            ))
            .unwrap()
    }

    fn release(bike_id: i32) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(format!("/reservation/bike/{}", bike_id))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn reservation_lifecycle_over_http() {
        let app = app();

        let (status, body) = send(&app, get_req("/bikes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["bikeId"], 1);
        assert_eq!(body["data"][0]["rented"], false);

        let (status, body) = send(&app, reserve("alice", 1)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["reservation_id"].as_str().is_some());

        let (_, body) = send(&app, get_req("/bikes/")).await;
        assert_eq!(body["data"][0]["rented"], true);

        let (status, body) = send(&app, get_req("/reservation?user=alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Alpha");

        let (status, body) = send(&app, reserve("bob", 1)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, release(1)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, release(1)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, get_req("/reservation?user=alice")).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn error_statuses() {
        let app = app();

        let (status, _) = send(&app, get_req("/reservation")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, reserve("", 1)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, reserve("mallory", 1)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, release(999)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: Bike with bikeid=999");
    }

    #[tokio::test]
    async fn bad_bike_id_keeps_the_envelope() {
        let app = app();
        for uri in ["/reservation/bike/abc", "/reservation/bike/99999999999"] {
            let req = Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["success"], false);
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("Validation: invalid bike id"));
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/reservation/")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(&app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/bikes"));
        assert!(doc.paths.paths.contains_key("/reservation/bike/{bike_id}"));
    }
}
