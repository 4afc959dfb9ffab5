//! Integration test harness for the TaskMart client.
//!
//! Spins up an in-process mock of the TaskMart REST backend on an ephemeral
//! port. The mock speaks the backend's wire format (camelCase timestamps,
//! snake_case statuses, `message` fields on errors) and enforces bearer-token
//! auth on everything except register/login, so the client library can be
//! exercised end to end without a real server.
//!
//! ```rust,ignore
//! let backend = MockBackend::spawn().await;
//! let config = ClientConfig::new(&backend.base_url, dir.path());
//! let client = ApiClient::new(&config)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use taskmart_core::{
    CartItem, CartItemId, CartSummary, Product, ProductDraft, ProductId, ProductPatch,
    ProductStatus, ProductVariant, Task, TaskDraft, TaskId, TaskPatch, User, UserId, Variations,
};

type SharedState = Arc<Mutex<BackendState>>;
type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

/// An in-process mock of the TaskMart backend.
pub struct MockBackend {
    /// Base URL of the running mock, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    state: SharedState,
}

#[derive(Default)]
struct BackendState {
    next_id: i64,
    accounts: Vec<Account>,
    tokens: Vec<String>,
    tasks: Vec<Task>,
    products: Vec<Product>,
    cart: Vec<CartItem>,
    task_create_calls: u64,
}

struct Account {
    user: User,
    email: String,
    password: String,
}

impl BackendState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        let token = format!("mock-token-{user_id}-{}", self.tokens.len());
        self.tokens.push(token.clone());
        token
    }
}

impl MockBackend {
    /// Bind an ephemeral port and serve the mock on it.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound; tests cannot proceed without
    /// a running backend.
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/tasks", get(list_tasks).post(create_task))
            .route(
                "/api/tasks/{id}",
                get(get_task).put(update_task).patch(patch_task).delete(delete_task),
            )
            .route("/api/products", get(list_products).post(create_product))
            .route(
                "/api/products/{id}",
                get(get_product)
                    .put(update_product)
                    .patch(patch_product)
                    .delete(delete_product),
            )
            .route("/api/cart/summary", get(cart_summary))
            .route("/api/cart/add", post(cart_add))
            .route("/api/cart/update/{id}", axum::routing::put(cart_update))
            .route("/api/cart/remove/{id}", delete(cart_remove))
            .route("/api/cart/clear", delete(cart_clear))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend listener");
        let addr = listener.local_addr().expect("mock backend local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("mock backend state poisoned")
    }

    /// Insert a product directly, bypassing the API.
    pub fn seed_product(
        &self,
        title: &str,
        price: &str,
        discount: Option<&str>,
        stock: Option<i64>,
    ) -> Product {
        let mut state = self.lock();
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(state.next_id()),
            title: title.to_string(),
            description: String::new(),
            price: parse_decimal(price),
            discount_price: discount.map(parse_decimal),
            status: ProductStatus::Available,
            images: vec![],
            variations: None,
            variants: None,
            stock,
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        product
    }

    /// Attach concrete variants to an already-seeded product.
    pub fn seed_variants(&self, id: ProductId, variants: Vec<ProductVariant>) {
        let mut state = self.lock();
        if let Some(product) = state.products.iter_mut().find(|product| product.id == id) {
            product.variants = Some(variants);
        }
    }

    /// Number of tasks the backend currently holds.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    /// How many `POST /api/tasks` requests have arrived.
    #[must_use]
    pub fn task_create_calls(&self) -> u64 {
        self.lock().task_create_calls
    }

    /// Server-side cart line count.
    #[must_use]
    pub fn cart_line_count(&self) -> usize {
        self.lock().cart.len()
    }
}

fn parse_decimal(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    #[allow(dead_code)]
    password_confirmation: String,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<Value> {
    let mut state = lock(&state);
    if state.accounts.iter().any(|account| account.email == body.email) {
        return Err(error(422, "The email has already been taken."));
    }

    let id = state.next_id();
    let user = User {
        id: Some(UserId::new(id)),
        name: body.name,
        email: taskmart_core::Email::parse(&body.email).ok(),
    };
    state.accounts.push(Account {
        user: user.clone(),
        email: body.email,
        password: body.password,
    });
    let token = state.issue_token(id);

    Ok(Json(json!({ "user": user, "token": token })))
}

async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Value> {
    let mut state = lock(&state);
    let Some(user) = state
        .accounts
        .iter()
        .find(|account| account.email == body.email && account.password == body.password)
        .map(|account| account.user.clone())
    else {
        return Err(error(401, "Invalid credentials"));
    };

    let id = user.id.map_or(0, |id| id.as_i64());
    let token = state.issue_token(id);
    Ok(Json(json!({ "user": user, "token": token })))
}

/// Reject requests without a known bearer token.
fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match token {
        Some(token) if state.tokens.iter().any(|known| known == token) => Ok(()),
        _ => Err(error(401, "Unauthenticated.")),
    }
}

// ============================================================================
// Tasks
// ============================================================================

async fn list_tasks(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<Vec<Task>> {
    let state = lock(&state);
    authorize(&state, &headers)?;
    Ok(Json(state.tasks.clone()))
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<Task> {
    let mut state = lock(&state);
    state.task_create_calls += 1;
    authorize(&state, &headers)?;
    if draft.title.trim().is_empty() {
        return Err(error(422, "The title field is required."));
    }

    let now = Utc::now();
    let task = Task {
        id: TaskId::new(state.next_id()),
        title: draft.title,
        description: draft.description,
        status: draft.status,
        created_at: now,
        updated_at: now,
    };
    state.tasks.push(task.clone());
    Ok(Json(task))
}

async fn get_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Task> {
    let state = lock(&state);
    authorize(&state, &headers)?;
    state
        .tasks
        .iter()
        .find(|task| task.id == TaskId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| error(404, "Task not found"))
}

async fn update_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<Task> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(task) = state.tasks.iter_mut().find(|task| task.id == TaskId::new(id)) else {
        return Err(error(404, "Task not found"));
    };
    task.title = draft.title;
    task.description = draft.description;
    task.status = draft.status;
    task.updated_at = Utc::now();
    Ok(Json(task.clone()))
}

async fn patch_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Task> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(task) = state.tasks.iter_mut().find(|task| task.id == TaskId::new(id)) else {
        return Err(error(404, "Task not found"));
    };
    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = Some(description);
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    task.updated_at = Utc::now();
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let before = state.tasks.len();
    state.tasks.retain(|task| task.id != TaskId::new(id));
    if state.tasks.len() == before {
        return Err(error(404, "Task not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Products
// ============================================================================

async fn list_products(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Vec<Product>> {
    let state = lock(&state);
    authorize(&state, &headers)?;
    Ok(Json(state.products.clone()))
}

async fn create_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Product> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    if draft.title.trim().is_empty() {
        return Err(error(422, "The title field is required."));
    }

    let now = Utc::now();
    let product = Product {
        id: ProductId::new(state.next_id()),
        title: draft.title,
        description: draft.description,
        price: draft.price,
        discount_price: draft.discount_price,
        status: draft.status,
        images: vec![],
        variations: draft.variations,
        variants: None,
        stock: draft.stock,
        created_at: now,
        updated_at: now,
    };
    state.products.push(product.clone());
    Ok(Json(product))
}

async fn get_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    let state = lock(&state);
    authorize(&state, &headers)?;
    state
        .products
        .iter()
        .find(|product| product.id == ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| error(404, "Product not found"))
}

async fn update_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Product> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(product) = state
        .products
        .iter_mut()
        .find(|product| product.id == ProductId::new(id))
    else {
        return Err(error(404, "Product not found"));
    };
    product.title = draft.title;
    product.description = draft.description;
    product.price = draft.price;
    product.discount_price = draft.discount_price;
    product.status = draft.status;
    product.variations = draft.variations;
    product.stock = draft.stock;
    product.updated_at = Utc::now();
    Ok(Json(product.clone()))
}

async fn patch_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> ApiResult<Product> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(product) = state
        .products
        .iter_mut()
        .find(|product| product.id == ProductId::new(id))
    else {
        return Err(error(404, "Product not found"));
    };
    if let Some(title) = patch.title {
        product.title = title;
    }
    if let Some(description) = patch.description {
        product.description = description;
    }
    if let Some(price) = patch.price {
        product.price = price;
    }
    if let Some(discount) = patch.discount_price {
        product.discount_price = Some(discount);
    }
    if let Some(status) = patch.status {
        product.status = status;
    }
    if let Some(stock) = patch.stock {
        product.stock = Some(stock);
    }
    product.updated_at = Utc::now();
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let before = state.products.len();
    state.products.retain(|product| product.id != ProductId::new(id));
    if state.products.len() == before {
        return Err(error(404, "Product not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Cart
// ============================================================================

#[derive(Deserialize)]
struct CartAddBody {
    product_id: ProductId,
    quantity: u32,
    #[serde(default)]
    variations: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct CartUpdateBody {
    quantity: u32,
}

async fn cart_summary(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<CartSummary> {
    let state = lock(&state);
    authorize(&state, &headers)?;
    Ok(Json(summary_of(&state.cart)))
}

async fn cart_add(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CartAddBody>,
) -> ApiResult<CartItem> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(product) = state
        .products
        .iter()
        .find(|product| product.id == body.product_id)
        .cloned()
    else {
        return Err(error(404, "Product not found"));
    };

    let variations: Variations = body.variations;
    if let Some(line) = state
        .cart
        .iter_mut()
        .find(|line| line.matches(body.product_id, &variations))
    {
        line.quantity += body.quantity;
        return Ok(Json(line.clone()));
    }

    let item = CartItem {
        id: CartItemId::new(state.next_id()),
        product_id: body.product_id,
        product: Some(product),
        quantity: body.quantity,
        variations,
    };
    state.cart.push(item.clone());
    Ok(Json(item))
}

async fn cart_update(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<CartUpdateBody>,
) -> ApiResult<CartItem> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let Some(line) = state
        .cart
        .iter_mut()
        .find(|line| line.id == CartItemId::new(id))
    else {
        return Err(error(404, "Cart item not found"));
    };
    line.quantity = body.quantity;
    Ok(Json(line.clone()))
}

async fn cart_remove(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    let before = state.cart.len();
    state.cart.retain(|line| line.id != CartItemId::new(id));
    if state.cart.len() == before {
        return Err(error(404, "Cart item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn cart_clear(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut state = lock(&state);
    authorize(&state, &headers)?;
    state.cart.clear();
    Ok(StatusCode::NO_CONTENT)
}

fn summary_of(cart: &[CartItem]) -> CartSummary {
    CartSummary {
        items: cart.to_vec(),
        total_quantity: CartSummary::derived_quantity(cart),
        total_price: CartSummary::derived_total(cart),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn lock(state: &SharedState) -> MutexGuard<'_, BackendState> {
    state.lock().expect("mock backend state poisoned")
}

fn error(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "message": message })),
    )
}
