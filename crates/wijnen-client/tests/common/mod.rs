//! In-process mock of the wijnen web-api for integration tests.

// Allow dead_code because each test file is compiled as a separate crate,
// so not all helpers are used in every test file.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// Variation that makes the mock answer with HTTP 500.
pub const SERVER_ERROR_VARIATION: &str = "trigger:500";

/// Variation that makes the mock answer with a body that is not JSON.
pub const MALFORMED_VARIATION: &str = "trigger:malformed";

/// Everything the mock server saw.
#[derive(Default)]
pub struct Recorded {
    pub attribute_bodies: Mutex<Vec<Value>>,
    pub variation_bodies: Mutex<Vec<Value>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Recorded {
    pub fn variation_calls(&self) -> usize {
        self.variation_bodies.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Recorded>,
    delay: Duration,
}

/// A running mock server.
pub struct MockServer {
    pub addr: SocketAddr,
    pub recorded: Arc<Recorded>,
}

/// Starts the mock on an ephemeral loopback port.
///
/// Each variation request sleeps for `delay` before answering, so tests can
/// observe how many requests overlap.
pub async fn start_mock_server(delay: Duration) -> MockServer {
    let recorded = Arc::new(Recorded::default());
    let state = MockState {
        recorded: Arc::clone(&recorded),
        delay,
    };

    let router = Router::new()
        .route("/attribute_summary", post(attribute_summary))
        .route("/process_variations", post(process_variations))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockServer { addr, recorded }
}

async fn attribute_summary(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.recorded.attribute_bodies.lock().unwrap().push(body);
    Json(json!({
        "gene": "HGNC gene symbol",
        "clinical_significance": "ClinVar classification",
    }))
}

async fn process_variations(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let recorded = &state.recorded;
    let current = recorded.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    recorded.peak_in_flight.fetch_max(current, Ordering::SeqCst);

    tokio::time::sleep(state.delay).await;

    let variations: Vec<String> = body["variations"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    recorded.variation_bodies.lock().unwrap().push(body);
    recorded.in_flight.fetch_sub(1, Ordering::SeqCst);

    if variations.iter().any(|v| v == SERVER_ERROR_VARIATION) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if variations.iter().any(|v| v == MALFORMED_VARIATION) {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    // Even positions are "found", odd ones are not.
    let (found, not_found): (Vec<_>, Vec<_>) = variations
        .into_iter()
        .partition(|v| v.rsplit(':').next().and_then(|n| n.parse::<u32>().ok()).unwrap_or(1) % 2 == 0);

    Json(json!({ "found": found, "not_found": not_found })).into_response()
}

/// Variations `pos:0` .. `pos:{count-1}`.
pub fn variations(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("pos:{i}")).collect()
}
