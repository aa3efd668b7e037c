// Budget Explorer - Web Server
// Read-only JSON API over the loaded budget tables. The dashboard
// front-end draws its charts from these endpoints; all numeric
// derivation already happened at load time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use budget_explorer::{BudgetStore, ExplorerConfig, NormalizedRecord, ShareRecord};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state.
///
/// The tables are immutable after load, so the store is shared across
/// request handlers without a lock.
#[derive(Clone)]
struct AppState {
    store: Arc<BudgetStore>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Headline metrics for the dashboard's insight cards
#[derive(Serialize)]
struct SummaryResponse {
    first_year: String,
    latest_year: String,
    years: Vec<String>,
    ministries: Vec<String>,
    defence_growth_multiple: Option<f64>,
    agriculture_share_shift_pp: Option<f64>,
    latest_year_total: Option<f64>,
    latest_year_total_display: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/normalized - Full normalized table (all ministries)
async fn get_normalized(State(state): State<AppState>) -> impl IntoResponse {
    let records: Vec<NormalizedRecord> = state.store.normalized().to_vec();
    Json(ApiResponse::ok(records))
}

/// GET /api/shares - Watchlist share table
async fn get_shares(State(state): State<AppState>) -> impl IntoResponse {
    let records: Vec<ShareRecord> = state.store.shares().records().to_vec();
    Json(ApiResponse::ok(records))
}

/// GET /api/years - Year labels present in the share table
async fn get_years(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.store.shares().years()))
}

/// GET /api/years/:year - Watchlist breakdown for one year
async fn get_year_breakdown(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> impl IntoResponse {
    match state.store.shares().year_breakdown(&year) {
        Ok(rows) => {
            let records: Vec<ShareRecord> = rows.into_iter().cloned().collect();
            (StatusCode::OK, Json(ApiResponse::ok(records))).into_response()
        }
        Err(e) => no_data_response(e.to_string()),
    }
}

/// GET /api/ministries - Ministry names present in the share table
async fn get_ministries(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.store.shares().ministries()))
}

/// GET /api/ministries/:name - One ministry's rows across years
async fn get_ministry_trend(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let decoded = decode_segment(&name);

    match state.store.shares().ministry_trend(&decoded) {
        Ok(rows) => {
            let records: Vec<ShareRecord> = rows.into_iter().cloned().collect();
            (StatusCode::OK, Json(ApiResponse::ok(records))).into_response()
        }
        Err(e) => no_data_response(e.to_string()),
    }
}

/// GET /api/selection/:name/:year - A single (ministry, year) row
async fn get_selection(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, String)>,
) -> impl IntoResponse {
    let decoded = decode_segment(&name);

    match state.store.shares().select(&decoded, &year) {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record.clone()))).into_response(),
        Err(e) => no_data_response(e.to_string()),
    }
}

/// GET /api/summary - Headline metrics for the insight cards
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    let table = state.store.shares();
    let years = table.years();

    let (Some(first), Some(last)) = (years.first().cloned(), years.last().cloned()) else {
        return no_data_response("no data available for this selection: empty table".to_string());
    };

    let defence_growth_multiple = table
        .growth_multiple("MINISTRY OF DEFENCE", &first, &last)
        .ok();
    let agriculture_share_shift_pp = table
        .share_shift("MINISTRY OF AGRICULTURE AND FARMERS' WELFARE", &first, &last)
        .ok();
    let latest_year_total = table
        .year_breakdown(&last)
        .ok()
        .and_then(|rows| rows.first().and_then(|r| r.year_total));

    let summary = SummaryResponse {
        first_year: first,
        latest_year: last,
        ministries: table.ministries(),
        years,
        defence_growth_multiple,
        agriculture_share_shift_pp,
        latest_year_total,
        latest_year_total_display: budget_explorer::format_inr_opt(latest_year_total),
    };

    (StatusCode::OK, Json(ApiResponse::ok(summary))).into_response()
}

fn no_data_response(message: String) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<ShareRecord>::err(message)),
    )
        .into_response()
}

/// Ministry names carry spaces and an apostrophe; decode the URL form.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Budget Explorer - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let data_path =
        std::env::var("BUDGET_DATA").unwrap_or_else(|_| "data/budget.csv".to_string());
    let config_path =
        std::env::var("BUDGET_CONFIG").unwrap_or_else(|_| "config/explorer.json".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        match ExplorerConfig::from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config {}: {:#}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        ExplorerConfig::default()
    };

    // Fatal when the table cannot load - no partial dashboard
    let store = match BudgetStore::open(&data_path, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to load budget data from {}: {:#}", data_path, e);
            eprintln!("   Set BUDGET_DATA to the CSV path and retry.");
            std::process::exit(1);
        }
    };
    println!("✓ Loaded: {}", store.report().summary());

    let state = AppState {
        store: Arc::new(store),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/normalized", get(get_normalized))
        .route("/shares", get(get_shares))
        .route("/years", get(get_years))
        .route("/years/:year", get(get_year_breakdown))
        .route("/ministries", get(get_ministries))
        .route("/ministries/:name", get(get_ministry_trend))
        .route("/selection/:name/:year", get(get_selection))
        .route("/summary", get(get_summary))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Summary: http://localhost:3000/api/summary");
    println!("   Shares:  http://localhost:3000/api/shares");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
