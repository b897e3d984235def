//! In-process stub of the marketplace backend.

#![allow(dead_code, missing_docs, clippy::panic)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const SELLER: &str = "0x00000000000000000000000000000000000000A1";
pub const BUYER: &str = "0x00000000000000000000000000000000000000b1";

/// Requests the stub received, for assertions.
#[derive(Debug, Default)]
pub struct Recorded {
    pub purchases: Mutex<Vec<Value>>,
    pub generations: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<HashMap<String, String>>>,
    pub fail_settlement: AtomicBool,
}

impl Recorded {
    pub fn purchases(&self) -> Vec<Value> {
        self.purchases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generations(&self) -> Vec<Value> {
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn uploads(&self) -> Vec<HashMap<String, String>> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fail_settlement(&self) {
        self.fail_settlement.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct StubState {
    base_url: String,
    recorded: Arc<Recorded>,
}

/// A running stub backend.
#[derive(Debug)]
pub struct StubBackend {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

/// Starts the stub on an ephemeral port.
pub async fn spawn_backend() -> StubBackend {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind stub backend");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let base_url = format!("http://{addr}");
    let recorded = Arc::new(Recorded::default());
    let state = StubState {
        base_url: base_url.clone(),
        recorded: Arc::clone(&recorded),
    };

    let app = Router::new()
        .route("/workflow/getAll", get(get_all))
        .route("/workflow/getTopWorkflows", get(get_top))
        .route("/workflow/getIndividual", get(get_individual))
        .route("/workflow/hasPurchasedWorkflow", get(has_purchased))
        .route("/workflow/purchase", post(purchase))
        .route("/workflow/create", post(upload))
        .route("/workflow/edit", post(upload))
        .route("/dashboard/getStats", get(stats))
        .route("/dashboard/getListedWorkflows", get(listed))
        .route("/dashboard/getPurchasedWorkflows", get(purchased))
        .route("/generatedWorkflow/generate", post(generate))
        .route("/generatedWorkflow/getPrevious", get(previous))
        .route("/files/data-flow.json", get(file))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubBackend { base_url, recorded }
}

fn workflows(base_url: &str) -> Vec<Value> {
    vec![
        json!({
            "_id": "w1",
            "name": "Data Workflow",
            "desc": "Cleans CSV files",
            "price": "5",
            "seller": SELLER,
            "fileUrl": format!("{base_url}/files/data-flow.json"),
            "isActive": true,
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-02T11:30:00Z"
        }),
        json!({
            "_id": "w2",
            "name": "Report Tool",
            "desc": "Weekly reports",
            "price": 2.5,
            "seller": SELLER
        }),
    ]
}

async fn get_all(State(state): State<StubState>) -> Json<Value> {
    let mut rows = workflows(&state.base_url);
    rows.push(json!({ "_id": "w3", "name": "Broken", "price": "1", "seller": "" }));
    rows.push(json!({ "_id": "w4", "name": "Micro Flow", "price": 1e-7, "seller": SELLER }));
    Json(json!({ "workflows": rows }))
}

async fn get_top(State(state): State<StubState>) -> Json<Value> {
    let top: Vec<Value> = workflows(&state.base_url).into_iter().take(1).collect();
    Json(json!({ "workflows": top }))
}

async fn get_individual(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let id = query.get("id").cloned().unwrap_or_default();
    workflows(&state.base_url)
        .into_iter()
        .find(|w| w.get("_id").and_then(Value::as_str) == Some(id.as_str()))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn has_purchased(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let owned = query.get("workflowId").map(String::as_str) == Some("w1")
        && query.contains_key("buyer");
    Json(json!({ "hasPurchased": owned }))
}

async fn purchase(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if state.recorded.fail_settlement.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state
        .recorded
        .purchases
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body);
    Ok(Json(json!({ "message": "Purchase recorded" })))
}

async fn upload(State(state): State<StubState>, mut multipart: Multipart) -> StatusCode {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let Ok(bytes) = field.bytes().await else {
            return StatusCode::BAD_REQUEST;
        };
        let value = match file_name {
            Some(file_name) => format!(
                "{file_name};{};{}",
                content_type.unwrap_or_default(),
                bytes.len()
            ),
            None => String::from_utf8_lossy(&bytes).into_owned(),
        };
        fields.insert(name, value);
    }
    state
        .recorded
        .uploads
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(fields);
    StatusCode::CREATED
}

async fn stats(Query(query): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    if !query.contains_key("seller") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({
        "lifetimeRevenue": 120.5,
        "revenueWeekAgo": 40,
        "revenueDayAgo": 5
    })))
}

async fn listed(State(state): State<StubState>) -> Json<Value> {
    Json(json!({ "workflows": workflows(&state.base_url) }))
}

async fn purchased(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let buyer = query.get("buyer").cloned().unwrap_or_default();
    Json(json!({
        "workflows": [{
            "_id": "p1",
            "buyer": buyer,
            "seller": SELLER,
            "workflowId": "w1",
            "workflowName": "Data Workflow",
            "amount": "5",
            "txnHash": "0xabc",
            "purchasedAt": "2025-03-03T09:15:00Z"
        }]
    }))
}

async fn generate(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if state.recorded.fail_settlement.load(Ordering::SeqCst) {
        return Err(StatusCode::BAD_GATEWAY);
    }
    state
        .recorded
        .generations
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body);
    Ok(Json(json!({ "message": "Workflow generated" })))
}

async fn previous(State(state): State<StubState>) -> Json<Value> {
    Json(json!({
        "workflows": [{
            "_id": "g1",
            "requester": BUYER,
            "desc": "summarise my inbox",
            "fileUrl": format!("{}/files/data-flow.json", state.base_url),
            "generatedAt": "2025-03-04T08:00:00Z"
        }]
    }))
}

async fn file() -> &'static str {
    r#"{"nodes":[{"id":"n1"}]}"#
}
