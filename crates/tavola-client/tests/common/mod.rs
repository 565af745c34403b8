//! In-process fake of the ordering backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tavola_client::{ApiClient, RetryPolicy};
use tokio::net::TcpListener;
use url::Url;

pub const ORDER_ID: &str = "a1b2c3d4-e5f6-7890";
pub const RESTAURANT_COUNT: usize = 20;

/// What the backend saw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub listing_queries: Vec<HashMap<String, String>>,
    pub orders: Vec<Value>,
    pub ratings: Vec<(String, Value)>,
    pub cuisine_calls: u32,
    pub order_detail_ids: Vec<String>,
    /// Answer the next order POST with a 503 after recording it.
    pub fail_next_order: bool,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub fn issue_token(id: Value, name: &str, email: &str, ttl_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    encode(
        &Header::default(),
        &json!({ "id": id, "name": name, "email": email, "exp": exp }),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

pub struct Backend {
    pub url: Url,
    pub recorded: Shared,
}

impl Backend {
    pub async fn spawn() -> Self {
        let recorded: Shared = Arc::default();
        let app = router(recorded.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Backend {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            recorded,
        }
    }

    pub fn client(&self) -> ApiClient {
        let retry = RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
        };
        ApiClient::new(self.url.clone(), Duration::from_secs(5), retry).unwrap()
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/profile", get(profile))
        .route("/api/restaurants", get(restaurants))
        .route("/api/restaurants/search", get(search))
        .route("/api/restaurants/{id}", get(restaurant))
        .route("/api/restaurants/{id}/menu", get(menu))
        .route("/api/cuisines", get(cuisines))
        .route("/api/orders", post(create_order))
        .route("/api/orders/user/{user_id}", get(orders_for_user))
        .route("/api/orders/{id}", get(order_detail))
        .route("/api/rating/{order_id}/rating", post(rate))
        .with_state(recorded)
}

// =============================================================================
// Handlers
// =============================================================================

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

fn ana() -> Value {
    json!({
        "id": 1,
        "name": "Ana",
        "email": "ana@example.com",
        "phone_number": "+1 555 0100",
        "address": "1 Main St"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "ana@example.com" && body["password"] == "secret1" {
        let token = issue_token(json!(1), "Ana", "ana@example.com", 3600);
        Json(json!({ "token": token, "user": ana() })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@example.com" {
        return (StatusCode::BAD_REQUEST, Json(json!({}))).into_response();
    }
    let name = body["name"].as_str().unwrap_or_default();
    let token = issue_token(json!("u-2"), name, email, 3600);
    (StatusCode::CREATED, Json(json!({ "token": token }))).into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "user": ana() })).into_response()
}

fn restaurant_json(i: usize) -> Value {
    json!({
        "id": i,
        "name": format!("Place {i:02}"),
        "rating": "4.2",
        "cuisines": ["Italian"],
        "availability": { "isOpen": i % 2 == 0 }
    })
}

async fn restaurants(
    State(recorded): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|p| p.parse().ok()).unwrap_or(9);
    recorded.lock().unwrap().listing_queries.push(params);

    let data: Vec<Value> = (1..=RESTAURANT_COUNT)
        .skip((page - 1) * limit)
        .take(limit)
        .map(restaurant_json)
        .collect();

    Json(json!({
        "data": data,
        "pagination": {
            "currentPage": page,
            "totalPages": RESTAURANT_COUNT.div_ceil(limit),
            "totalItems": RESTAURANT_COUNT,
            "itemsPerPage": limit
        }
    }))
    .into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    let hits: Vec<Value> = (1..=RESTAURANT_COUNT)
        .map(restaurant_json)
        .filter(|r| r["name"].as_str().is_some_and(|n| n.ends_with(&q)))
        .collect();
    Json(json!(hits)).into_response()
}

async fn restaurant(Path(id): Path<String>) -> Response {
    if id == "404" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Restaurant not found" })),
        )
            .into_response();
    }
    Json(json!({
        "restaurant": {
            "id": id,
            "name": "Trattoria",
            "cuisines": [{ "id": 1, "name": "Italian" }],
            "availability": { "isOpen": true, "hours": "11:00-22:00" },
            "menu": [{ "id": "m1", "name": "Margherita", "price": "12.50" }]
        }
    }))
    .into_response()
}

async fn menu(Path(_id): Path<String>) -> Response {
    Json(json!({
        "menu": [
            { "id": "m1", "name": "Margherita", "price": "12.50" },
            { "id": "m2", "name": "Tiramisu", "price": 6 }
        ]
    }))
    .into_response()
}

/// Fails the first call with a bare 503.
async fn cuisines(State(recorded): State<Shared>) -> Response {
    let calls = {
        let mut rec = recorded.lock().unwrap();
        rec.cuisine_calls += 1;
        rec.cuisine_calls
    };
    if calls == 1 {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!([{ "id": 1, "name": "Italian" }, { "id": 2, "name": "Thai" }])).into_response()
}

async fn create_order(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    {
        let mut rec = recorded.lock().unwrap();
        rec.orders.push(body);
        if std::mem::take(&mut rec.fail_next_order) {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created",
            "order": { "id": ORDER_ID, "status": "pending" }
        })),
    )
        .into_response()
}

async fn orders_for_user(Path(user_id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if user_id != "1" {
        return Json(json!([])).into_response();
    }
    Json(json!([{
        "id": ORDER_ID,
        "restaurant_name": "Trattoria",
        "created_at": "2026-10-19T12:00:00Z",
        "total_amount": "31.00",
        "status": "delivered"
    }]))
    .into_response()
}

async fn order_detail(
    State(recorded): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    recorded.lock().unwrap().order_detail_ids.push(id.clone());
    Json(json!({
        "order": {
            "id": id,
            "restaurant_name": "Trattoria",
            "restaurant_address": "2 Market Sq",
            "created_at": "2026-10-19T12:00:00Z",
            "status": "delivered",
            "payment_method": "card",
            "items": [
                { "menu_item_name": "Margherita", "menu_item_price": "12.50", "quantity": 2 },
                { "menu_item_name": "Tiramisu", "menu_item_price": 6, "quantity": 1 }
            ],
            "total_amount": 31
        }
    }))
    .into_response()
}

async fn rate(
    State(recorded): State<Shared>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if order_id == "locked" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Order already rated" })),
        )
            .into_response();
    }
    recorded.lock().unwrap().ratings.push((order_id, body.clone()));
    (StatusCode::CREATED, Json(json!({ "rating": body }))).into_response()
}
