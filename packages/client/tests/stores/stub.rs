//! A throwaway in-memory imitation of the HTTP API, just enough for the stores.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use client::ApiClient;
use serde_json::{Value, json};
use uuid::Uuid;

pub const TOKEN: &str = "stub-token";
pub const PASSWORD: &str = "secret";
const NOW: &str = "2024-05-01T12:00:00Z";

#[derive(Default)]
struct Data {
    categories: Vec<Value>,
    items: Vec<Value>,
    costs: Vec<Value>,
}

type Shared = Arc<Mutex<Data>>;

pub struct StubServer {
    pub addr: SocketAddr,
    data: Shared,
}

impl StubServer {
    pub async fn spawn() -> Self {
        let data = Shared::default();
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(me))
            .route("/api/categories", get(list_categories).post(create_category))
            .route(
                "/api/categories/{id}",
                axum::routing::put(update_category).delete(delete_category),
            )
            .route("/api/items", get(list_items).post(create_item))
            .route("/api/items/stats/summary", get(stats))
            .route(
                "/api/items/{id}",
                get(get_item).put(update_item).delete(delete_item),
            )
            .route("/api/costs", post(create_cost))
            .route("/api/costs/item/{item_id}", get(list_costs))
            .route(
                "/api/costs/{id}",
                axum::routing::put(update_cost).delete(delete_cost),
            )
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, data }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(format!("http://{}/api", self.addr)).unwrap()
    }

    pub fn authed_api(&self) -> ApiClient {
        let api = self.api();
        api.set_token(Some(TOKEN.to_string()));
        api
    }

    pub fn seed_item(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.data.lock().unwrap().items.push(item_json(id, name));
        id
    }

    pub fn seed_cost(&self, item_id: Uuid, description: &str, date: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.data
            .lock()
            .unwrap()
            .costs
            .push(cost_json(id, item_id, description, 10.0, date));
        id
    }

    pub fn category_count(&self) -> usize {
        self.data.lock().unwrap().categories.len()
    }
}

pub fn user_json(username: &str) -> Value {
    json!({
        "id": "11111111-1111-1111-1111-111111111111",
        "email": format!("{username}@example.com"),
        "username": username,
        "firstName": null,
        "lastName": null,
        "isActive": true,
        "createdAt": NOW,
        "updatedAt": NOW,
    })
}

fn item_json(id: Uuid, name: &str) -> Value {
    json!({
        "id": id,
        "userId": "11111111-1111-1111-1111-111111111111",
        "categoryId": null,
        "name": name,
        "description": null,
        "brand": null,
        "model": null,
        "serialNumber": null,
        "condition": null,
        "status": "owned",
        "purchasePrice": null,
        "purchaseDate": null,
        "purchaseLocation": null,
        "salePrice": null,
        "saleDate": null,
        "saleLocation": null,
        "notes": null,
        "images": [],
        "metafields": {},
        "category": null,
        "additionalCosts": [],
        "createdAt": NOW,
        "updatedAt": NOW,
    })
}

fn cost_json(id: Uuid, item_id: Uuid, description: &str, amount: f64, date: &str) -> Value {
    json!({
        "id": id,
        "itemId": item_id,
        "description": description,
        "amount": amount,
        "date": date,
        "type": null,
        "notes": null,
        "createdAt": NOW,
        "updatedAt": NOW,
    })
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({"code": code, "message": message}))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found")
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(v) if v == format!("Bearer {TOKEN}") => Ok(()),
        Some(_) => Err(error(
            StatusCode::UNAUTHORIZED,
            "TOKEN_INVALID",
            "Invalid or expired token",
        )),
        None => Err(error(
            StatusCode::UNAUTHORIZED,
            "TOKEN_MISSING",
            "No token provided",
        )),
    }
}

/// Copy every key of `patch` over `target`. Money arrives as decimal strings
/// and leaves as numbers, like the real API.
fn merge(target: &mut Value, patch: Value) {
    const MONEY: [&str; 3] = ["amount", "purchasePrice", "salePrice"];
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        for (k, v) in patch {
            let v = match v.as_str().and_then(|s| s.parse::<f64>().ok()) {
                Some(n) if MONEY.contains(&k.as_str()) => json!(n),
                _ => v,
            };
            target.insert(k, v);
        }
    }
}

fn find<'a>(list: &'a mut [Value], id: Uuid) -> Option<&'a mut Value> {
    let id = id.to_string();
    list.iter_mut().find(|v| v["id"] == id.as_str())
}

fn remove(list: &mut Vec<Value>, id: Uuid) -> bool {
    let id = id.to_string();
    let before = list.len();
    list.retain(|v| v["id"] != id.as_str());
    list.len() < before
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({"user": user_json("alice"), "token": TOKEN})).into_response()
    } else {
        error(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        )
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({"user": user_json(username), "token": TOKEN})),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    match authorize(&headers) {
        Ok(()) => Json(user_json("alice")).into_response(),
        Err(res) => res,
    }
}

async fn list_categories(State(data): State<Shared>) -> Response {
    Json(data.lock().unwrap().categories.clone()).into_response()
}

async fn create_category(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let category = json!({
        "id": Uuid::new_v4(),
        "userId": "11111111-1111-1111-1111-111111111111",
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "color": body.get("color").cloned().unwrap_or(json!("#3B82F6")),
        "createdAt": NOW,
        "updatedAt": NOW,
    });
    data.lock().unwrap().categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn update_category(
    State(data): State<Shared>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    match find(&mut data.categories, id) {
        Some(category) => {
            merge(category, body);
            Json(category.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_category(State(data): State<Shared>, Path(id): Path<Uuid>) -> Response {
    if remove(&mut data.lock().unwrap().categories, id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

async fn list_items(
    State(data): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if query.get("search").is_some_and(|s| s == "boom") {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        );
    }
    let items = data.lock().unwrap().items.clone();
    let page: u64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u64 = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(50);
    let total = items.len() as u64;
    Json(json!({
        "items": items,
        "pagination": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": total.div_ceil(limit),
        },
    }))
    .into_response()
}

async fn get_item(State(data): State<Shared>, Path(id): Path<Uuid>) -> Response {
    match find(&mut data.lock().unwrap().items, id) {
        Some(item) => Json(item.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_item(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut item = item_json(Uuid::new_v4(), "");
    merge(&mut item, body);
    data.lock().unwrap().items.push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn update_item(
    State(data): State<Shared>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    match find(&mut data.items, id) {
        Some(item) => {
            merge(item, body);
            Json(item.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_item(State(data): State<Shared>, Path(id): Path<Uuid>) -> Response {
    if remove(&mut data.lock().unwrap().items, id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

async fn stats() -> Response {
    Json(json!({
        "stats": [
            {"status": "owned", "count": 2, "totalPurchasePrice": 150.5, "totalSalePrice": 0.0},
        ],
        "totalAdditionalCosts": 12.25,
    }))
    .into_response()
}

async fn list_costs(State(data): State<Shared>, Path(item_id): Path<Uuid>) -> Response {
    let item_id = item_id.to_string();
    let mut costs: Vec<Value> = data
        .lock()
        .unwrap()
        .costs
        .iter()
        .filter(|c| c["itemId"] == item_id.as_str())
        .cloned()
        .collect();
    // RFC 3339 in UTC sorts lexicographically.
    costs.sort_by(|a, b| b["date"].as_str().cmp(&a["date"].as_str()));
    Json(costs).into_response()
}

async fn create_cost(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let item_id: Uuid = match body["itemId"].as_str().and_then(|s| s.parse().ok()) {
        Some(id) => id,
        None => return error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "itemId"),
    };
    let mut data = data.lock().unwrap();
    if find(&mut data.items, item_id).is_none() {
        return not_found();
    }
    let mut cost = cost_json(Uuid::new_v4(), item_id, "", 0.0, NOW);
    merge(&mut cost, body);
    data.costs.push(cost.clone());
    (StatusCode::CREATED, Json(cost)).into_response()
}

async fn update_cost(
    State(data): State<Shared>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    match find(&mut data.costs, id) {
        Some(cost) => {
            merge(cost, body);
            Json(cost.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_cost(State(data): State<Shared>, Path(id): Path<Uuid>) -> Response {
    if remove(&mut data.lock().unwrap().costs, id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
