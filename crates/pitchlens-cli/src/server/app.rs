//! Axum application setup.

use std::future::Future;

use axum::{Router, routing::{get, post}};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use crate::web::static_handler;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Roster uploads
        .route("/upload/:slot", post(handlers::upload_table))
        .route("/status", get(handlers::get_status))
        .route("/ids", get(handlers::list_ids))
        // Analysis session
        .route("/analyze", post(handlers::analyze))
        .route("/export", get(handlers::export_csv))
        .route("/session/clear", post(handlers::clear_session));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until `shutdown` resolves.
pub async fn run_server(
    state: AppState,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    log::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pitchlens::llm::RecordingSleeper;
    use pitchlens::{Analyzer, InferenceClient, InferenceConfig, MockTransport, TransportResponse};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const TEAM1: &str =
        "player_id,average_speed_over_a_game,no_of_goals_made,fouls,yellow_card,red_card\n\
         7,8.0,2,1,0,0\n\
         9,7.1,0,3,1,0\n";
    const TEAM2: &str =
        "player_id,average_speed_over_a_game,no_of_goals_made,fouls,yellow_card,red_card\n\
         11,6.4,1,0,0,0\n";
    const KEEPER1: &str = "player_id,no_of_goals_save\n1,5\n";
    const KEEPER2: &str = "player_id,no_of_goals_save\n12,3\n";

    fn state_with(transport: MockTransport) -> AppState {
        let client =
            InferenceClient::with_transport(InferenceConfig::default(), Arc::new(transport))
                .with_sleeper(Arc::new(RecordingSleeper::new()));
        AppState::new(Analyzer::new(client))
    }

    fn state() -> AppState {
        state_with(MockTransport::new())
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(state, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn upload(slot: &str, csv: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/upload/{}?name={}.csv", slot, slot))
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(csv.to_string()))
            .unwrap()
    }

    fn analyze(role: &str, id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "role": role, "player_id": id }).to_string(),
            ))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn load_all(state: &AppState) {
        for (slot, csv) in [
            ("team1", TEAM1),
            ("team2", TEAM2),
            ("goalkeeper1", KEEPER1),
            ("goalkeeper2", KEEPER2),
        ] {
            let (status, _) = send(state, upload(slot, csv)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_upload_reports_rows() {
        let state = state();
        let (status, body) = send_json(&state, upload("team1", TEAM1)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slot"], "team1");
        assert_eq!(body["rows"], 2);
        assert_eq!(body["label"], "team1.csv");
    }

    #[tokio::test]
    async fn test_upload_unknown_slot() {
        let state = state();
        let (status, body) = send_json(&state, upload("team3", TEAM1)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_upload_missing_column() {
        let state = state();
        let missing = upload("team1", "player_id,no_of_goals_made\n7,2\n");
        let (status, body) = send_json(&state, missing).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_upload");
    }

    #[tokio::test]
    async fn test_status_tracks_slots() {
        let state = state();
        send(&state, upload("gk2", KEEPER2)).await;

        let (status, body) = send_json(&state, get("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["complete"], false);
        assert_eq!(body["transport"], "mock");

        let slots = body["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[3]["slot"], "goalkeeper2");
        assert_eq!(slots[3]["loaded"], true);
        assert_eq!(slots[0]["loaded"], false);
    }

    #[tokio::test]
    async fn test_ids_by_role() {
        let state = state();
        load_all(&state).await;

        let (_, players) = send_json(&state, get("/api/ids?role=player")).await;
        assert_eq!(players["ids"], json!(["7", "9", "11"]));

        let (_, keepers) = send_json(&state, get("/api/ids?role=goalkeeper")).await;
        assert_eq!(keepers["ids"], json!(["1", "12"]));
    }

    #[tokio::test]
    async fn test_analyze_requires_all_tables() {
        let state = state();
        send(&state, upload("team1", TEAM1)).await;

        let (status, body) = send_json(&state, analyze("player", "7")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "not_loaded");
    }

    #[tokio::test]
    async fn test_analyze_and_export() {
        let state = state();
        load_all(&state).await;

        let (status, body) = send_json(&state, analyze("player", "11")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Performance Analysis for Player ID: 11");
        assert_eq!(body["analyses"][0]["player_id"], "11");
        assert_eq!(body["analyses"][0]["success"], true);

        let (status, _) = send_json(&state, analyze("goalkeeper", "12")).await;
        assert_eq!(status, StatusCode::OK);

        let response = create_router(state.clone())
            .oneshot(get("/api/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"performance_analysis.csv\""
        );

        let csv = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(csv.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Player ID,Analysis");
        assert!(lines[1].starts_with("11,"));
        assert!(lines[2].starts_with("12,"));
    }

    #[tokio::test]
    async fn test_analyze_unknown_id() {
        let state = state();
        load_all(&state).await;

        let (status, body) = send_json(&state, analyze("goalkeeper", "7")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_analyze_exhausted_hides_body() {
        let loading = || TransportResponse::new(503, r#"{"error":"Model is loading"}"#);
        let state = state_with(MockTransport::scripted(vec![
            loading(),
            loading(),
            loading(),
            loading(),
            loading(),
        ]));
        load_all(&state).await;

        let (status, body) = send_json(&state, analyze("player", "7")).await;
        assert_eq!(status, StatusCode::OK);

        let view = &body["analyses"][0];
        assert_eq!(view["success"], false);
        assert_eq!(view["failure"], "retries_exhausted");
        assert_eq!(view["text"], pitchlens::InferenceError::SENTINEL);
        assert!(!body.to_string().contains("Model is loading"));
    }

    #[tokio::test]
    async fn test_export_empty_session() {
        let state = state();
        let (status, _) = send(&state, get("/api/export")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_session() {
        let state = state();
        load_all(&state).await;
        send(&state, analyze("player", "7")).await;

        let clear = Request::builder()
            .method("POST")
            .uri("/api/session/clear")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&state, clear).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleared"], 1);

        let (status, _) = send(&state, get("/api/export")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_served() {
        let state = state();
        let (status, body) = send(&state, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("Pitchlens"));
        assert!(page.contains("a.failure"));
    }
}
