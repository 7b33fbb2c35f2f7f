/// Integration tests with a mocked backend
/// Exercises pagination, fallback and propagation without a real backend
use ethicsupply_gateway::config::Config;
use ethicsupply_gateway::errors::FetchError;
use ethicsupply_gateway::fallback_store::FallbackStore;
use ethicsupply_gateway::models::{MetricChanges, SupplierInput, SupplierMetrics};
use ethicsupply_gateway::services::SupplierDataClient;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a client against the mock backend
fn create_test_client(server: &MockServer) -> SupplierDataClient {
    let config = Config::with_base_url(format!("{}/api", server.uri()));
    SupplierDataClient::new(&config, Arc::new(FallbackStore::with_demo_data())).unwrap()
}

fn offline_client() -> SupplierDataClient {
    let config = Config::with_base_url("http://127.0.0.1:9/api");
    SupplierDataClient::new(&config, Arc::new(FallbackStore::with_demo_data())).unwrap()
}

fn supplier_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "country": "Germany",
        "industry": "Manufacturing",
        "co2_emissions": 25.0,
        "wage_fairness": 0.8,
        "ethical_score": 72.5,
        "risk_level": "Medium",
        "created_at": "2024-01-10T08:00:00Z",
        "updated_at": "2024-02-01T08:00:00Z"
    })
}

fn sample_input(name: &str) -> SupplierInput {
    SupplierInput {
        name: name.to_string(),
        country: "Vietnam".to_string(),
        industry: None,
        metrics: SupplierMetrics {
            co2_emissions: Some(60.0),
            wage_fairness: Some(0.5),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_list_follows_every_page_in_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [supplier_json(1, "Alpha"), supplier_json(2, "Beta")],
            "next": format!("{}/api/suppliers/page/2/", base)
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [supplier_json(3, "Gamma")],
            "next": "/api/suppliers/page/3/"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [supplier_json(4, "Delta")],
            "next": null
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    let names: Vec<&str> = suppliers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma", "Delta"]);
    assert!(suppliers.iter().all(|s| !s.is_mock_data));
}

#[tokio::test]
async fn test_list_accepts_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([supplier_json(7, "Solo"), supplier_json(8, "Duo")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[0].id, 7);
    assert!(!suppliers[0].is_mock_data);
}

#[tokio::test]
async fn test_list_falls_back_on_network_error() {
    let client = offline_client();
    let suppliers = client.list_suppliers().await;

    assert!(!suppliers.is_empty());
    assert!(suppliers.iter().all(|s| s.is_mock_data));
}

#[tokio::test]
async fn test_list_falls_back_on_empty_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [], "next": null})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    assert_eq!(suppliers.len(), 12);
    assert!(suppliers.iter().all(|s| s.is_mock_data));
}

#[tokio::test]
async fn test_list_falls_back_when_a_later_page_fails() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [supplier_json(1, "Alpha")],
            "next": format!("{}/api/suppliers/page/2/", base)
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/page/2/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    assert!(suppliers.iter().all(|s| s.is_mock_data));
    assert!(suppliers.iter().all(|s| s.name != "Alpha"));
}

#[tokio::test]
async fn test_list_falls_back_on_malformed_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    assert_eq!(suppliers.len(), 12);
    assert!(suppliers.iter().all(|s| s.is_mock_data));
}

#[tokio::test]
async fn test_evaluate_returns_backend_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/evaluate/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 91,
            "name": "Backend Co",
            "ethical_score": 81.2,
            "recommendation": "Keep going",
            "suggestions": ["Audit tier-two suppliers"],
            "model_version": "v3"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .evaluate_supplier(&sample_input("Backend Co"))
        .await
        .unwrap();

    assert_eq!(result.id, Some(91));
    assert_eq!(result.ethical_score, 81.2);
    assert_eq!(result.suggestions, vec!["Audit tier-two suppliers".to_string()]);
    assert_eq!(result.extra.get("model_version"), Some(&json!("v3")));
    assert!(!result.is_mock_data);
}

#[tokio::test]
async fn test_evaluate_falls_back_on_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/evaluate/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .evaluate_supplier(&sample_input("Fallback Co"))
        .await
        .unwrap();

    assert!(result.is_mock_data);
    assert_eq!(result.id, None);
    assert_eq!(result.name, "Fallback Co");
    assert_eq!(result.suggestions.len(), 5);
    assert!(result.recommendation.is_some());
}

#[tokio::test]
async fn test_evaluate_propagates_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/evaluate/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "country is required"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.evaluate_supplier(&sample_input("Invalid Co")).await;

    assert_eq!(
        result,
        Err(FetchError::ServerError {
            status: 400,
            message: "country is required".to_string()
        })
    );
}

#[tokio::test]
async fn test_add_supplier_fallback_is_listed_with_increasing_ids() {
    let client = offline_client();

    let first = client.add_supplier(&sample_input("First Local")).await.unwrap();
    let second = client.add_supplier(&sample_input("Second Local")).await.unwrap();

    assert!(first.is_mock_data && second.is_mock_data);
    assert!(second.id > first.id);
    assert_eq!(first.metrics.delivery_efficiency, Some(0.5));
    assert_eq!(first.industry.as_deref(), Some("Manufacturing"));
    assert!(first.ethical_score.is_some());

    let listed = client.list_suppliers().await;
    let ids: Vec<i64> = listed.iter().map(|s| s.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[tokio::test]
async fn test_add_supplier_returns_backend_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(supplier_json(501, "Created")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let created = client.add_supplier(&sample_input("Created")).await.unwrap();

    assert_eq!(created.id, 501);
    assert!(!created.is_mock_data);
    assert_eq!(client.store().len(), 12);
}

#[tokio::test]
async fn test_mock_record_stays_mock_through_evaluation_fallback() {
    let client = offline_client();

    let added = client.add_supplier(&sample_input("Round Trip")).await.unwrap();
    let evaluated = client
        .evaluate_supplier(&SupplierInput::from(&added))
        .await
        .unwrap();

    assert!(evaluated.is_mock_data);
    assert_eq!(evaluated.name, "Round Trip");
}

#[tokio::test]
async fn test_dashboard_uses_backend_then_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_suppliers": 40,
            "avg_ethical_score": 71.3,
            "avg_co2_emissions": 22.0,
            "suppliers_by_country": {"Germany": 40},
            "ethical_score_distribution": [{"range": "61-80", "count": 40}]
        })))
        .mount(&mock_server)
        .await;

    let live = create_test_client(&mock_server).dashboard().await;
    assert_eq!(live.total_suppliers, 40);
    assert!(!live.is_mock_data);

    let fallback = offline_client().dashboard().await;
    assert_eq!(fallback.total_suppliers, 12);
    assert!(fallback.is_mock_data);
}

#[tokio::test]
async fn test_simulation_sends_changes_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/3/simulate_changes/"))
        .and(body_json(json!({"changes": {"co2_emissions": 10.0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_scores": {"overall_score": 70.0, "environmental_score": 60.0, "social_score": 75.0, "governance_score": 72.0},
            "predicted_scores": {"overall_score": 74.0, "environmental_score": 68.0, "social_score": 75.0, "governance_score": 72.0},
            "improvements": {"overall_score": 4.0, "environmental_score": 8.0, "social_score": 0.0, "governance_score": 0.0}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut changes = MetricChanges::new();
    changes.insert("co2_emissions".to_string(), 10.0);

    let client = create_test_client(&mock_server);
    let result = client.simulate_changes(3, &changes).await;

    assert_eq!(result.improvements.overall_score, 4.0);
    assert!(!result.is_mock_data);
}

#[tokio::test]
async fn test_peripheral_reads_fall_back_when_offline() {
    let client = offline_client();

    let ranked = client.recommendations().await;
    assert_eq!(ranked.len(), 12);
    assert!(ranked.iter().all(|r| r.supplier.is_mock_data));
    assert!(ranked.iter().all(|r| r.recommendation.is_some()));

    let analytics = client.analytics(1).await;
    assert!(analytics.is_mock_data);
    assert_eq!(analytics.supplier.id, 1);

    let analysis = client.detailed_analysis(404).await;
    assert!(analysis.is_mock_data);
    assert_eq!(analysis.id, 1);
}

#[tokio::test]
async fn test_health_check_tries_both_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/health-check/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    assert!(create_test_client(&mock_server).health_check().await);
    assert!(!offline_client().health_check().await);
}

#[tokio::test]
async fn test_repeated_server_errors_keep_propagating() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/evaluate/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    for attempt in 1..=7 {
        let result = client.evaluate_supplier(&sample_input("Busy Co")).await;
        assert_eq!(
            result,
            Err(FetchError::ServerError {
                status: 500,
                message: "db down".to_string()
            }),
            "attempt {}",
            attempt
        );
    }

    for attempt in 1..=7 {
        let result = client.add_supplier(&sample_input("Busy Co")).await;
        assert!(
            matches!(result, Err(FetchError::ServerError { status: 503, .. })),
            "attempt {}",
            attempt
        );
    }
    assert_eq!(client.store().len(), 12);
}

#[tokio::test]
async fn test_list_keeps_backend_records_without_timestamps() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/suppliers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 31, "name": "Trimmed", "country": "Peru", "ethical_score": 66.0}
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suppliers = client.list_suppliers().await;

    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].name, "Trimmed");
    assert!(!suppliers[0].is_mock_data);
}
