use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::errors::{AppError, FallbackPolicy, FetchError, OperationKind};
use crate::fallback_store::FallbackStore;
use crate::mock_data;
use crate::models::*;
use crate::scoring::ScoringFormula;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;

/// Upper bound on followed `next` cursors; a backend that loops forever is
/// treated as a failed listing.
pub const MAX_PAGES: usize = 1000;

/// Supplier data access with transparent fallback to synthetic data.
///
/// Reads never fail. Writes (`evaluate_supplier`, `add_supplier`) only fall
/// back when the backend is unreachable or the endpoint is missing; other
/// backend errors reach the caller.
#[derive(Clone)]
pub struct SupplierDataClient {
    backend: BackendClient,
    store: Arc<FallbackStore>,
    formula: ScoringFormula,
}

impl SupplierDataClient {
    pub fn new(config: &Config, store: Arc<FallbackStore>) -> Result<Self, AppError> {
        Ok(Self {
            backend: BackendClient::new(config)?,
            store,
            formula: config.scoring_formula,
        })
    }

    pub fn store(&self) -> &Arc<FallbackStore> {
        &self.store
    }

    pub fn formula(&self) -> ScoringFormula {
        self.formula
    }

    /// Every supplier the backend holds, following pagination cursors in order.
    ///
    /// Falls back to the store contents when any page fails, the shape is
    /// unrecognised, or the accumulated list is empty.
    pub async fn list_suppliers(&self) -> Vec<Supplier> {
        tracing::info!("Fetching suppliers from {}", self.backend.base_url());

        match self.collect_pages::<Supplier>("suppliers/").await {
            Ok(suppliers) if !suppliers.is_empty() => {
                tracing::info!("Fetched {} suppliers from backend", suppliers.len());
                stamped(suppliers, false)
            }
            Ok(_) => {
                tracing::warn!("Backend returned no suppliers, using fallback data");
                self.store.suppliers()
            }
            Err(e) => {
                tracing::warn!("Supplier listing failed ({}), using fallback data", e);
                self.store.suppliers()
            }
        }
    }

    /// Evaluates a candidate supplier on the backend, or locally when it is unreachable.
    pub async fn evaluate_supplier(
        &self,
        input: &SupplierInput,
    ) -> Result<EvaluationResult, FetchError> {
        tracing::info!("Evaluating supplier '{}'", input.name);

        match self
            .backend
            .post_json::<_, EvaluationResult>("suppliers/evaluate/", input)
            .await
        {
            Ok(result) => Ok(stamped(result, false)),
            Err(e) => self.write_fallback(e, "evaluation", || {
                mock_data::evaluation(input, self.formula)
            }),
        }
    }

    /// Creates a supplier on the backend. On the fallback path the record is
    /// synthesized and appended to the store so later listings include it.
    pub async fn add_supplier(&self, input: &SupplierInput) -> Result<Supplier, FetchError> {
        tracing::info!("Adding supplier '{}'", input.name);

        match self
            .backend
            .post_json::<_, Supplier>("suppliers/", input)
            .await
        {
            Ok(created) => {
                tracing::info!("Backend created supplier {}", created.id);
                Ok(stamped(created, false))
            }
            Err(e) => self.write_fallback(e, "supplier creation", || {
                self.store.insert_with(|id| {
                    mock_data::new_supplier(id, input, self.formula, Utc::now())
                })
            }),
        }
    }

    pub async fn dashboard(&self) -> DashboardData {
        match self.backend.get_json::<DashboardData>("dashboard/").await {
            Ok(data) => stamped(data, false),
            Err(e) => {
                tracing::warn!("Dashboard fetch failed ({}), using fallback data", e);
                mock_data::dashboard(&self.store.suppliers(), self.formula)
            }
        }
    }

    /// Suppliers ranked for the recommendations view.
    pub async fn recommendations(&self) -> Vec<RecommendedSupplier> {
        match self
            .collect_pages::<RecommendedSupplier>("suppliers/recommendations/")
            .await
        {
            Ok(ranked) if !ranked.is_empty() => stamped(ranked, false),
            Ok(_) => {
                tracing::warn!("Backend returned no recommendations, using fallback data");
                mock_data::recommendations(&self.store.suppliers(), self.formula)
            }
            Err(e) => {
                tracing::warn!("Recommendations fetch failed ({}), using fallback data", e);
                mock_data::recommendations(&self.store.suppliers(), self.formula)
            }
        }
    }

    pub async fn detailed_analysis(&self, id: i64) -> DetailedAnalysis {
        let path = format!("suppliers/{}/detailed_analysis/", id);
        match self.backend.get_json::<DetailedAnalysis>(&path).await {
            Ok(analysis) => stamped(analysis, false),
            Err(e) => {
                tracing::warn!(
                    "Detailed analysis for supplier {} failed ({}), using fallback data",
                    id,
                    e
                );
                let supplier = self.store.get_or_first(id);
                mock_data::detailed_analysis(&supplier, &self.store.suppliers(), self.formula)
            }
        }
    }

    pub async fn analytics(&self, id: i64) -> SupplierAnalytics {
        let path = format!("suppliers/{}/analytics/", id);
        match self.backend.get_json::<SupplierAnalytics>(&path).await {
            Ok(analytics) => stamped(analytics, false),
            Err(e) => {
                tracing::warn!(
                    "Analytics for supplier {} failed ({}), using fallback data",
                    id,
                    e
                );
                let supplier = self.store.get_or_first(id);
                mock_data::analytics(&supplier, &self.store.suppliers(), self.formula)
            }
        }
    }

    /// What-if scoring for `changes` applied to supplier `id`.
    pub async fn simulate_changes(&self, id: i64, changes: &MetricChanges) -> SimulationResult {
        let path = format!("suppliers/{}/simulate_changes/", id);
        let body = json!({ "changes": changes });
        match self
            .backend
            .post_json::<_, SimulationResult>(&path, &body)
            .await
        {
            Ok(result) => stamped(result, false),
            Err(e) => {
                tracing::warn!(
                    "Simulation for supplier {} failed ({}), using fallback data",
                    id,
                    e
                );
                let supplier = self.store.get_or_first(id);
                mock_data::simulation(&supplier, changes, self.formula)
            }
        }
    }

    /// True when either backend health endpoint answers 2xx.
    pub async fn health_check(&self) -> bool {
        for path in ["health/", "health-check/"] {
            if self.backend.probe(path).await {
                return true;
            }
        }
        tracing::warn!("Backend health check failed on every endpoint");
        false
    }

    /// Applies the write policy table: synthesize on reachability problems,
    /// hand everything else back.
    fn write_fallback<T, F>(&self, err: FetchError, what: &str, synthesize: F) -> Result<T, FetchError>
    where
        F: FnOnce() -> T,
    {
        match FallbackPolicy::for_error(OperationKind::Write, &err) {
            FallbackPolicy::Fallback => {
                tracing::warn!("Backend {} unavailable ({}), using local fallback", what, err);
                Ok(synthesize())
            }
            FallbackPolicy::Propagate => {
                tracing::error!("Backend {} failed: {}", what, err);
                Err(err)
            }
        }
    }

    /// Accumulates a listing across pages. Pages are fetched one at a time;
    /// each cursor is only known once the previous page has arrived.
    async fn collect_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let mut items = Vec::new();
        let mut url = self.backend.endpoint(path);

        for page in 1..=MAX_PAGES {
            let value = self.backend.get_value(&url).await?;
            match Listing::<T>::from_value(value)? {
                Listing::Bare(results) => {
                    items.extend(results);
                    return Ok(items);
                }
                Listing::Page { results, next } => {
                    tracing::debug!("Page {} of {} held {} items", page, path, results.len());
                    items.extend(results);
                    match next {
                        Some(next) => url = self.backend.resolve(&next)?,
                        None => return Ok(items),
                    }
                }
            }
        }

        Err(FetchError::Decode(format!(
            "pagination of {} exceeded {} pages",
            path, MAX_PAGES
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> SupplierDataClient {
        SupplierDataClient::new(
            &Config::with_base_url("http://127.0.0.1:9/api"),
            Arc::new(FallbackStore::with_demo_data()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_write_fallback_policy() {
        let client = offline_client();

        let synthesized = client.write_fallback(FetchError::NotFound, "test", || 7);
        assert_eq!(synthesized, Ok(7));

        let validation = FetchError::ServerError {
            status: 400,
            message: "name is required".to_string(),
        };
        let propagated = client.write_fallback(validation.clone(), "test", || 7);
        assert_eq!(propagated, Err(validation));
    }

    #[tokio::test]
    async fn test_offline_reads_are_mock() {
        let client = offline_client();

        let suppliers = client.list_suppliers().await;
        assert_eq!(suppliers.len(), 12);
        assert!(suppliers.iter().all(|s| s.is_mock_data));

        assert!(client.dashboard().await.is_mock_data);
        assert!(client.detailed_analysis(2).await.is_mock_data);
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_offline_add_then_list() {
        let client = offline_client();
        let input = SupplierInput {
            name: "Local Co".to_string(),
            country: "Kenya".to_string(),
            ..Default::default()
        };

        let added = client.add_supplier(&input).await.unwrap();
        assert_eq!(added.id, 13);
        assert!(added.is_mock_data);

        let listed = client.list_suppliers().await;
        assert_eq!(listed.last().map(|s| s.name.as_str()), Some("Local Co"));
    }
}
