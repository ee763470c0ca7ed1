//! Shared helpers for client integration tests
//!
//! An in-process axum server stands in for the calculator-results API. It
//! stores rows exactly as they were posted, so listings exercise the same
//! legacy shapes the real service returns.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use farm_calc_client::external::{RemoteHistoryClient, StaticCredentials};
use farm_calc_client::services::MemoryStore;
use farm_calc_client::{AppContext, Config};
use shared::models::{
    ApplicationMethod, FertilizerInput, Formulation, GrowthStage, Pest, PesticideInput,
    ProfitInput, Severity, SoilType,
};
use shared::{Area, CalculationInput, Crop};

pub const TOKEN: &str = "test-token";

// ============================================================================
// Mock remote
// ============================================================================

#[derive(Default)]
pub struct MockInner {
    /// (calculator type, stored row)
    pub rows: Vec<(String, Value)>,
    pub next_id: i64,
    pub requests: Vec<String>,
    pub bodies: Vec<Value>,
    pub fail_saves: bool,
    /// Number of upcoming list calls answered with 500
    pub failing_lists: u32,
    pub reject_auth: bool,
}

#[derive(Clone)]
pub struct MockRemote {
    inner: Arc<Mutex<MockInner>>,
    started: DateTime<Utc>,
}

impl MockRemote {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner::default())),
            started: Utc::now(),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockInner) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<String> {
        self.with(|m| m.requests.clone())
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.with(|m| m.bodies.clone())
    }

    pub fn row_count(&self, calculator_type: &str) -> usize {
        self.with(|m| m.rows.iter().filter(|(t, _)| t == calculator_type).count())
    }
}

fn authorized(inner: &MockInner, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TOKEN);
    !inner.reject_auth
        && headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid token"})))
}

async fn save_result(
    State(mock): State<MockRemote>,
    Path(calculator_type): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut inner = mock.inner.lock().unwrap();
    inner.requests.push(format!("POST {}", calculator_type));
    inner.bodies.push(body.clone());
    if !authorized(&inner, &headers) {
        return unauthorized();
    }
    if inner.fail_saves {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "down"})));
    }

    inner.next_id += 1;
    let id = inner.next_id;
    let created_at = (mock.started + Duration::seconds(id)).to_rfc3339();

    let mut row = body;
    row["id"] = json!(id);
    row["created_at"] = json!(created_at);
    inner.rows.push((calculator_type.clone(), row));

    // The fertilizer endpoint answers flat, the others wrap the row.
    let response = if calculator_type == "fertilizer" {
        json!({"id": id, "created_at": created_at})
    } else {
        json!({"message": "Result saved", "saved_result": {"id": id.to_string(), "created_at": created_at}})
    };
    (StatusCode::CREATED, Json(response))
}

async fn list_results(
    State(mock): State<MockRemote>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut inner = mock.inner.lock().unwrap();
    let calculator_type = params.get("type").cloned().unwrap_or_default();
    inner.requests.push(format!("GET {}", calculator_type));
    if !authorized(&inner, &headers) {
        return unauthorized();
    }
    if inner.failing_lists > 0 {
        inner.failing_lists -= 1;
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})));
    }

    let results: Vec<Value> = inner
        .rows
        .iter()
        .rev()
        .filter(|(t, _)| *t == calculator_type)
        .map(|(_, row)| row.clone())
        .take(10)
        .collect();
    (StatusCode::OK, Json(json!({"results": results})))
}

async fn delete_result(
    State(mock): State<MockRemote>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut inner = mock.inner.lock().unwrap();
    inner.requests.push(format!("DELETE {}", id));
    if !authorized(&inner, &headers) {
        return unauthorized();
    }

    let before = inner.rows.len();
    inner.rows.retain(|(_, row)| row["id"].to_string() != id);
    if inner.rows.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found"})));
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

/// Start the mock on an ephemeral port and return its base URL
pub async fn spawn_mock() -> (String, MockRemote) {
    let mock = MockRemote::new();
    let app = Router::new()
        .route("/calculator-results/list", get(list_results))
        .route(
            "/calculator-results/:key",
            post(save_result).delete(delete_result),
        )
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

// ============================================================================
// Application under test
// ============================================================================

pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<MemoryStore>,
    pub credentials: Arc<StaticCredentials>,
}

pub fn build_app(base_url: &str, token: Option<&str>) -> TestApp {
    let credentials = Arc::new(StaticCredentials::new(token.map(str::to_string), "farmer-1"));
    let store = Arc::new(MemoryStore::new());
    let remote = Arc::new(RemoteHistoryClient::with_base_url(base_url, credentials.clone()));
    let ctx = AppContext::with_parts(Config::default(), credentials.clone(), remote, store.clone())
        .unwrap();
    TestApp {
        ctx,
        store,
        credentials,
    }
}

/// App wired to a running mock with a valid token
pub async fn online_app() -> (TestApp, MockRemote) {
    let (base_url, mock) = spawn_mock().await;
    (build_app(&base_url, Some(TOKEN)), mock)
}

/// App whose remote refuses connections
pub fn offline_app() -> TestApp {
    build_app("http://127.0.0.1:1", Some(TOKEN))
}

// ============================================================================
// Inputs
// ============================================================================

/// Wheat, 2 acres, flowering, loamy
pub fn wheat_fertilizer() -> CalculationInput {
    CalculationInput::Fertilizer(FertilizerInput {
        crop: Crop::Wheat.into(),
        area: Area::acres(dec!(2)),
        growth_stage: GrowthStage::Flowering,
        soil_type: SoilType::Loamy,
        nutrient_focus: None,
    })
}

/// Rice aphids, high severity, foliar, 1 hectare
pub fn rice_aphids() -> CalculationInput {
    CalculationInput::Pesticide(PesticideInput {
        crop: Crop::Rice.into(),
        pest: Pest::Aphids,
        plot: Area::hectares(dec!(1)),
        severity: Severity::High,
        application_method: ApplicationMethod::Foliar,
        formulation: Formulation::Liquid,
        gallons_per_acre: None,
        tank_capacity: None,
    })
}

/// Wheat, 5 acres at 2200 with 50000 input cost
pub fn wheat_profit() -> CalculationInput {
    CalculationInput::Profit(ProfitInput {
        crop: Crop::Wheat.into(),
        area: Area::acres(dec!(5)),
        market_price: dec!(2200),
        input_cost: dec!(50000),
        yield_override: None,
    })
}

pub fn profit_with_area(acres: i64) -> CalculationInput {
    CalculationInput::Profit(ProfitInput {
        crop: Crop::Wheat.into(),
        area: Area::acres(rust_decimal::Decimal::from(acres)),
        market_price: dec!(2200),
        input_cost: dec!(50000),
        yield_override: None,
    })
}
