use crate::config::{Config, FeatureFlags};
use crate::errors::AppError;
use crate::models::*;
use crate::services::SupplierDataClient;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Supplier data access with fallback.
    pub client: SupplierDataClient,
    /// Application configuration.
    pub config: Config,
}

/// Builds the gateway router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/features", get(features))
        .route("/api/suppliers", get(list_suppliers).post(add_supplier))
        .route("/api/suppliers/evaluate", post(evaluate_supplier))
        .route("/api/suppliers/recommendations", get(recommendations))
        .route(
            "/api/suppliers/:id/detailed_analysis",
            get(detailed_analysis),
        )
        .route("/api/suppliers/:id/analytics", get(analytics))
        .route("/api/suppliers/:id/simulate_changes", post(simulate_changes))
        .route("/api/dashboard", get(dashboard))
        .route("/api/backend/health", get(backend_health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint for the gateway itself.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "ethicsupply-gateway",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/features
///
/// Read-only feature flags for the presentation layer.
pub async fn features(State(state): State<Arc<AppState>>) -> Json<FeatureFlags> {
    Json(state.config.features)
}

/// GET /api/suppliers
pub async fn list_suppliers(State(state): State<Arc<AppState>>) -> Json<Vec<Supplier>> {
    tracing::info!("GET /suppliers");
    Json(state.client.list_suppliers().await)
}

/// POST /api/suppliers
///
/// Creates a supplier. Backend validation errors are passed through with
/// their status; an unreachable backend yields a fallback record.
pub async fn add_supplier(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SupplierInput>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    tracing::info!("POST /suppliers - name: {}", input.name);
    require_name(&input)?;

    let supplier = state.client.add_supplier(&input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// POST /api/suppliers/evaluate
pub async fn evaluate_supplier(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SupplierInput>,
) -> Result<Json<EvaluationResult>, AppError> {
    tracing::info!("POST /suppliers/evaluate - name: {}", input.name);
    require_name(&input)?;

    let result = state.client.evaluate_supplier(&input).await?;
    tracing::info!(
        "Evaluated '{}': score {} (mock: {})",
        result.name,
        result.ethical_score,
        result.is_mock_data
    );
    Ok(Json(result))
}

/// GET /api/suppliers/recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<RecommendedSupplier>> {
    Json(state.client.recommendations().await)
}

/// GET /api/suppliers/:id/detailed_analysis
pub async fn detailed_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<DetailedAnalysis> {
    tracing::info!("GET /suppliers/{}/detailed_analysis", id);
    Json(state.client.detailed_analysis(id).await)
}

/// GET /api/suppliers/:id/analytics
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<SupplierAnalytics> {
    tracing::info!("GET /suppliers/{}/analytics", id);
    Json(state.client.analytics(id).await)
}

/// POST /api/suppliers/:id/simulate_changes
pub async fn simulate_changes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<SimulationRequest>,
) -> Json<SimulationResult> {
    tracing::info!(
        "POST /suppliers/{}/simulate_changes - {} changes",
        id,
        request.changes.len()
    );
    Json(state.client.simulate_changes(id, &request.changes).await)
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardData> {
    Json(state.client.dashboard().await)
}

/// GET /api/backend/health
pub async fn backend_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let healthy = state.client.health_check().await;
    Json(json!({
        "backend": state.config.api_base_url,
        "healthy": healthy
    }))
}

fn require_name(input: &SupplierInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Supplier name is required".to_string()));
    }
    Ok(())
}
