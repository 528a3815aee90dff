// 🌐 API Layer - HTTP routes over the expense store
//
// Every JSON response uses the same envelope:
//   success -> {"status": "success", "data": ...}
//   error   -> {"status": "error", "error": "..."}

use crate::categories::Category;
use crate::error::ValidationError;
use crate::store::SharedStore;
use crate::summary::SummaryFilter;
use crate::validation::{parse_amount, validate, ExpenseCandidate};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Expense Tracker API. Use /add-expense or /expenses in the browser.";

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            error: Some(message.into()),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(self.to_string())),
        )
            .into_response()
    }
}

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// Raw query parameters in request order. Repeated keys are allowed; the
/// first occurrence wins.
#[derive(Debug)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Unwrap the extractor, answering undecodable query strings with the error envelope
    fn extract(
        query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    ) -> Result<Self, Response> {
        match query {
            Ok(Query(pairs)) => Ok(QueryParams(pairs)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Query string rejected");
                Err((
                    rejection.status(),
                    Json(ApiResponse::error(rejection.body_text())),
                )
                    .into_response())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// GET /add-expense fields, kept as text so bad input reaches the validator
    pub fn to_candidate(&self) -> ExpenseCandidate {
        ExpenseCandidate::from_text(
            self.get("category"),
            self.get("amount").as_deref(),
            self.get("date"),
        )
    }

    /// GET /expenses fields
    pub fn to_filter(&self) -> SummaryFilter {
        SummaryFilter {
            category: self.get("category"),
            start_date: self.get("startDate"),
            end_date: self.get("endDate"),
        }
    }
}

/// JSON body of POST /expenses. `amount` may be a number or numeric text.
#[derive(Debug, Deserialize)]
pub struct AddExpenseBody {
    category: Option<String>,
    amount: Option<serde_json::Value>,
    date: Option<String>,
}

impl From<AddExpenseBody> for ExpenseCandidate {
    fn from(body: AddExpenseBody) -> Self {
        let amount = body.amount.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Some(parse_amount(&s)),
            _ => Some(f64::NAN),
        });

        ExpenseCandidate {
            category: body.category,
            amount,
            date: body.date,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    expenses: usize,
    version: &'static str,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET / - Welcome message
async fn root() -> &'static str {
    WELCOME_MESSAGE
}

/// GET /health - Liveness plus record count
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let expenses = state.store.read().len();
    Json(ApiResponse::ok(HealthResponse {
        status: "ok",
        expenses,
        version: crate::VERSION,
    }))
}

/// GET /categories - The registry, in order
async fn list_categories() -> impl IntoResponse {
    Json(ApiResponse::ok(Category::labels()))
}

/// GET /add-expense - Add an expense from query parameters
async fn add_expense_query(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    match QueryParams::extract(query) {
        Ok(params) => add_expense(&state, params.to_candidate()),
        Err(response) => response,
    }
}

/// POST /expenses - Add an expense from a JSON body
async fn add_expense_json(
    State(state): State<AppState>,
    Json(body): Json<AddExpenseBody>,
) -> Response {
    add_expense(&state, body.into())
}

fn add_expense(state: &AppState, candidate: ExpenseCandidate) -> Response {
    match validate(&candidate) {
        Ok(accepted) => {
            let expense = state.store.append(accepted);
            info!(
                id = expense.id,
                category = %expense.category,
                amount = expense.amount,
                date = %expense.date,
                "Expense added"
            );
            (StatusCode::CREATED, Json(ApiResponse::ok(expense))).into_response()
        }
        Err(e) => {
            warn!(error = %e, ?candidate, "Expense rejected");
            e.into_response()
        }
    }
}

/// GET /expenses - Filtered summary (category, startDate, endDate)
async fn get_expenses(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let params = match QueryParams::extract(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let summary = state.store.read().summarize(&params.to_filter());
    Json(ApiResponse::ok(summary)).into_response()
}

/// GET /expenses/analysis - Totals by category and by month
async fn get_analysis(State(state): State<AppState>) -> impl IntoResponse {
    let analysis = state.store.read().analyze();
    Json(ApiResponse::ok(analysis))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/add-expense", get(add_expense_query))
        .route("/expenses", get(get_expenses).post(add_expense_json))
        .route("/expenses/analysis", get(get_analysis))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn test_app() -> (Router, AppState) {
        let state = AppState::default();
        (router(state.clone()), state)
    }

    #[tokio::test]
    async fn test_root_returns_welcome_text() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], WELCOME_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_add_expense_via_query() {
        let (app, state) = test_app();

        let (status, body) =
            get_json(&app, "/add-expense?category=Food&amount=50&date=2024-01-10").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "status": "success",
                "data": {"id": 1, "category": "Food", "amount": 50.0, "date": "2024-01-10"}
            })
        );
        assert_eq!(state.store.read().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_expense_leaves_store_unchanged() {
        let (app, state) = test_app();

        let (status, body) =
            get_json(&app, "/add-expense?category=Rent&amount=10&date=2024-01-01").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": "error", "error": "Invalid category"}));
        assert!(state.store.read().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_reasons() {
        let (app, _) = test_app();

        let (status, body) =
            get_json(&app, "/add-expense?category=Food&amount=abc&date=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount must be a positive number");

        let (_, body) = get_json(&app, "/add-expense?category=Food&amount=-4").await;
        assert_eq!(body["error"], "Amount must be a positive number");

        let (_, body) = get_json(&app, "/add-expense?category=Food&amount=4&date=nope").await;
        assert_eq!(body["error"], "Invalid date format");

        let (_, body) = get_json(&app, "/add-expense").await;
        assert_eq!(body["error"], "Invalid category");
    }

    #[tokio::test]
    async fn test_add_expense_via_json_body() {
        let (app, state) = test_app();

        let (status, body) = post_json(
            &app,
            "/expenses",
            json!({"category": "Travel", "amount": 100, "date": "2024-01-15"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);

        let (status, body) = post_json(
            &app,
            "/expenses",
            json!({"category": "Shopping", "amount": "19.99", "date": "2024-01-16"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["amount"], 19.99);

        let (status, body) = post_json(
            &app,
            "/expenses",
            json!({"category": "Shopping", "amount": true, "date": "2024-01-16"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount must be a positive number");

        assert_eq!(state.store.read().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_and_analysis_end_to_end() {
        let (app, _) = test_app();
        for uri in [
            "/add-expense?category=Food&amount=50&date=2024-01-10",
            "/add-expense?category=Travel&amount=100&date=2024-01-15",
            "/add-expense?category=Food&amount=25&date=2024-02-01",
        ] {
            let (status, _) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = get_json(&app, "/expenses?category=Food").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["total"], 75.0);
        assert_eq!(body["data"]["expenses"].as_array().unwrap().len(), 2);

        let (_, body) =
            get_json(&app, "/expenses?startDate=2024-01-10&endDate=2024-01-15").await;
        assert_eq!(body["data"]["total"], 150.0);

        let (status, body) = get_json(&app, "/expenses/analysis").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["monthlyTotals"],
            json!({"2024-01": 150.0, "2024-02": 25.0})
        );
        assert_eq!(
            body["data"]["totalByCategory"],
            json!([
                {"category": "Food", "total": 75.0},
                {"category": "Travel", "total": 100.0},
                {"category": "Entertainment", "total": 0.0},
                {"category": "Shopping", "total": 0.0},
                {"category": "Utilities", "total": 0.0}
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_store_summary() {
        let (app, _) = test_app();

        let (status, body) = get_json(&app, "/expenses").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "success", "data": {"total": 0.0, "expenses": []}})
        );
    }

    #[tokio::test]
    async fn test_empty_totals_serialize_as_positive_zero() {
        let (app, _) = test_app();
        get_json(&app, "/add-expense?category=Food&amount=5&date=2024-01-01").await;

        for uri in ["/expenses?category=Travel", "/expenses/analysis"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let text = String::from_utf8(bytes.to_vec()).unwrap();

            assert!(text.contains("\"total\":0.0"), "{}", text);
            assert!(!text.contains("-0.0"), "{}", text);
        }
    }

    #[tokio::test]
    async fn test_repeated_query_parameters_keep_the_envelope() {
        let (app, state) = test_app();
        for uri in [
            "/add-expense?category=Food&amount=50&date=2024-01-10",
            "/add-expense?category=Travel&amount=100&date=2024-01-15",
        ] {
            get_json(&app, uri).await;
        }

        let (status, body) = get_json(&app, "/expenses?category=Food&category=Travel").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["total"], 50.0);

        let (status, body) = get_json(
            &app,
            "/add-expense?category=Shopping&category=Rent&amount=3&amount=x&date=2024-01-20",
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["category"], "Shopping");
        assert_eq!(body["data"]["amount"], 3.0);
        assert_eq!(state.store.read().len(), 3);
    }

    #[tokio::test]
    async fn test_categories_and_health() {
        let (app, _) = test_app();

        let (_, body) = get_json(&app, "/categories").await;
        assert_eq!(
            body["data"],
            json!(["Food", "Travel", "Entertainment", "Shopping", "Utilities"])
        );

        get_json(&app, "/add-expense?category=Food&amount=1&date=2024-01-01").await;
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["expenses"], 1);
    }
}
