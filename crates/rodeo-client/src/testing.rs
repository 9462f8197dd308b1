//! In-process mock of the shop API for tests.
//!
//! Runs an axum server on a random local port. It serves the same routes and
//! JSON shapes as the real API: bearer auth, `{error}` bodies and stock
//! checks on sale creation. Tests can inject failures and inspect the
//! requests that arrived.
//!
//! Enabled for this crate's tests and, through the `test-support` feature,
//! for other crates' tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use rodeo_core::settlement::SalePayload;
use rodeo_core::{Product, ProductInput};

use crate::client::{ApiClient, ClientConfig};
use crate::session::{AuthToken, Session};

pub const TEST_USERNAME: &str = "owner";
pub const TEST_PASSWORD: &str = "rodeo1234";
pub const TEST_TOKEN: &str = "mock-token";

/// Message the mock sends when a sale would drive stock negative.
pub const STOCK_REJECTED: &str = "재고가 부족합니다.";

/// A request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// Failure injected into non-login routes.
#[derive(Debug, Clone)]
struct Failure {
    status: StatusCode,
    message: Option<String>,
    /// Only requests with this method fail; `None` means all of them.
    method: Option<String>,
}

/// Server-side data.
#[derive(Debug, Default)]
pub struct MockState {
    pub products: Vec<Product>,
    /// Sale rows in the list-by-date JSON shape.
    pub sales: Vec<Value>,
    pub memos: Vec<Value>,
    pub monthly: Value,
    /// Every accepted `POST /api/sales` body.
    pub posted_sales: Vec<SalePayload>,
    requests: Vec<RecordedRequest>,
    failure: Option<Failure>,
    valid_token: String,
    next_id: i64,
}

impl MockState {
    pub fn new() -> Self {
        MockState {
            valid_token: TEST_TOKEN.to_string(),
            next_id: 1000,
            monthly: json!({
                "monthlyData": [],
                "summary": { "annualTotal": 0, "currentMonthSales": 0, "topMonth": null }
            }),
            ..Default::default()
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<RwLock<MockState>>;

/// Running mock API server.
pub struct MockApi {
    state: Shared,
    /// Kept alive so the server keeps running.
    _handle: JoinHandle<()>,
    addr: SocketAddr,
}

impl MockApi {
    pub async fn start() -> Self {
        Self::start_with(MockState::new()).await
    }

    pub async fn start_with(state: MockState) -> Self {
        let state = Arc::new(RwLock::new(state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route("/api/auth/login", post(handle_login))
            .route("/api/inventory", get(handle_list_inventory))
            .route("/api/inventory-manage/item", post(handle_create_product))
            .route(
                "/api/inventory-manage/item/{id}",
                put(handle_update_product).delete(handle_delete_product),
            )
            .route("/api/sales", post(handle_create_sale))
            .route("/api/sales/date/{date}", get(handle_sales_by_date))
            .route("/api/sales/{id}", axum::routing::delete(handle_delete_sale))
            .route("/api/monthly", get(handle_monthly))
            .route("/api/memos", get(handle_list_memos).post(handle_create_memo))
            .route("/api/memos/{id}", axum::routing::delete(handle_delete_memo))
            .layer(middleware::from_fn_with_state(state.clone(), guard))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock API failed");
        });

        MockApi {
            state,
            _handle: handle,
            addr,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:12345`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client against this server with the given session.
    pub fn client(&self, session: Session) -> ApiClient {
        let config = ClientConfig::new(&self.url()).expect("mock URL is valid");
        ApiClient::new(config, session).expect("client builds")
    }

    /// Client whose in-memory session already holds the valid token.
    pub fn signed_in_client(&self) -> ApiClient {
        let session = Session::in_memory();
        session
            .sign_in(AuthToken::new(TEST_TOKEN))
            .expect("memory store accepts token");
        self.client(session)
    }

    /// Makes every non-login route answer `status`, with `{error: message}`
    /// when a message is given.
    pub async fn fail_with(&self, status: u16, message: Option<&str>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.state.write().await.failure = Some(Failure {
            status,
            message: message.map(str::to_string),
            method: None,
        });
    }

    /// Like [`MockApi::fail_with`], but only for requests using `method`
    /// (e.g. `"GET"`), so a write can succeed while the reload after it fails.
    pub async fn fail_method_with(&self, method: &str, status: u16, message: Option<&str>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.state.write().await.failure = Some(Failure {
            status,
            message: message.map(str::to_string),
            method: Some(method.to_uppercase()),
        });
    }

    pub async fn clear_failure(&self) {
        self.state.write().await.failure = None;
    }

    /// Invalidates the current token; later requests carrying it get 401.
    pub async fn revoke_token(&self) {
        self.state.write().await.valid_token = format!("revoked-{}", Utc::now().timestamp());
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn posted_sales(&self) -> Vec<SalePayload> {
        self.state.read().await.posted_sales.clone()
    }

    pub async fn set_products(&self, products: Vec<Product>) {
        self.state.write().await.products = products;
    }

    /// Adds a raw sale row, served as-is by list-by-date.
    pub async fn push_sale_row(&self, row: Value) {
        self.state.write().await.sales.push(row);
    }

    pub async fn push_memo_row(&self, row: Value) {
        self.state.write().await.memos.push(row);
    }

    pub async fn set_monthly(&self, body: Value) {
        self.state.write().await.monthly = body;
    }
}

// =============================================================================
// Middleware
// =============================================================================

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Records the request, then applies injected failures and the bearer check.
async fn guard(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().to_string();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut locked = state.write().await;
    locked.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
    });

    if path == "/api/auth/login" {
        drop(locked);
        return next.run(request).await;
    }

    let expected = format!("Bearer {}", locked.valid_token);
    if authorization.as_deref() != Some(expected.as_str()) {
        return error_response(StatusCode::UNAUTHORIZED, "인증이 만료되었습니다.");
    }

    let failure = locked
        .failure
        .clone()
        .filter(|f| f.method.as_deref().map_or(true, |m| m == method));
    if let Some(failure) = failure {
        return match failure.message {
            Some(message) => error_response(failure.status, &message),
            None => failure.status.into_response(),
        };
    }

    drop(locked);
    next.run(request).await
}

// =============================================================================
// Handlers
// =============================================================================

async fn handle_login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if username == Some(TEST_USERNAME) && password == Some(TEST_PASSWORD) {
        let token = state.read().await.valid_token.clone();
        Json(json!({ "token": token })).into_response()
    } else {
        error_response(
            StatusCode::UNAUTHORIZED,
            "아이디 또는 비밀번호가 올바르지 않습니다.",
        )
    }
}

async fn handle_list_inventory(State(state): State<Shared>) -> Response {
    Json(state.read().await.products.clone()).into_response()
}

async fn handle_create_product(
    State(state): State<Shared>,
    Json(input): Json<ProductInput>,
) -> Response {
    let mut state = state.write().await;
    let id = state.next_id();
    state.products.push(Product::new(
        id,
        input.name,
        input.category,
        input.price,
        input.quantity,
    ));
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn handle_update_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Response {
    let mut state = state.write().await;
    match state.products.iter_mut().find(|p| p.id == id) {
        Some(product) => {
            *product = Product::new(id, input.name, input.category, input.price, input.quantity);
            Json(json!({ "id": id })).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "상품을 찾을 수 없습니다."),
    }
}

async fn handle_delete_product(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return error_response(StatusCode::NOT_FOUND, "상품을 찾을 수 없습니다.");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_sales_by_date(State(state): State<Shared>, Path(date): Path<String>) -> Response {
    let state = state.read().await;
    let rows: Vec<Value> = state
        .sales
        .iter()
        .filter(|row| {
            row.get("sale_date")
                .and_then(Value::as_str)
                .is_some_and(|d| d.starts_with(&date))
        })
        .cloned()
        .collect();
    Json(rows).into_response()
}

/// Stores the sale and decrements stock, rejecting it whole when any line
/// exceeds what is on hand.
async fn handle_create_sale(
    State(state): State<Shared>,
    Json(payload): Json<SalePayload>,
) -> Response {
    let mut state = state.write().await;

    for item in &payload.sale_items {
        let taken: i64 = payload
            .sale_items
            .iter()
            .filter(|i| i.inventory_id == item.inventory_id)
            .map(|i| i.quantity)
            .sum();
        match state.products.iter().find(|p| p.id == item.inventory_id) {
            Some(product) if product.quantity >= taken => {}
            Some(_) => return error_response(StatusCode::BAD_REQUEST, STOCK_REJECTED),
            None => return error_response(StatusCode::NOT_FOUND, "상품을 찾을 수 없습니다."),
        }
    }

    let sale_id = state.next_id();
    let mut items = Vec::with_capacity(payload.sale_items.len());
    for item in &payload.sale_items {
        let item_id = state.next_id();
        let (name, category) = match state
            .products
            .iter_mut()
            .find(|p| p.id == item.inventory_id)
        {
            Some(product) => {
                product.quantity -= item.quantity;
                (product.name.clone(), product.category.clone())
            }
            None => (String::new(), String::new()),
        };
        items.push(json!({
            "id": item_id,
            "inventory_id": item.inventory_id,
            "name": name,
            "category": category,
            "quantity": item.quantity,
            "price_per_unit": item.price_per_unit.won(),
            "item_total": item.item_total.won(),
        }));
    }

    let data = &payload.sale_data;
    state.sales.push(json!({
        "id": sale_id,
        "items": items,
        "total_amount": data.total_amount.won(),
        "payment_method": data.payment_method.as_str(),
        "note": data.note,
        "sale_date": data.sale_date.format("%Y-%m-%d").to_string(),
        "sale_time": data.sale_time.format("%H:%M:%S").to_string(),
    }));
    state.posted_sales.push(payload);

    (StatusCode::CREATED, Json(json!({ "id": sale_id }))).into_response()
}

async fn handle_delete_sale(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    let before = state.sales.len();
    state
        .sales
        .retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
    if state.sales.len() == before {
        return error_response(StatusCode::NOT_FOUND, "판매 기록을 찾을 수 없습니다.");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_monthly(State(state): State<Shared>) -> Response {
    Json(state.read().await.monthly.clone()).into_response()
}

async fn handle_list_memos(State(state): State<Shared>) -> Response {
    Json(state.read().await.memos.clone()).into_response()
}

async fn handle_create_memo(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let content = body
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let mut state = state.write().await;
    let id = state.next_id();
    let row = json!({
        "id": id,
        "content": content,
        "created_at": Utc::now().to_rfc3339(),
    });
    state.memos.push(row.clone());
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn handle_delete_memo(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    state
        .memos
        .retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
    StatusCode::NO_CONTENT.into_response()
}
