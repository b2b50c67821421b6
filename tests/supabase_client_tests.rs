// Supabase client tests against a mock PostgREST server

use equity_match::models::UserRole;
use equity_match::services::{SupabaseClient, SupabaseError, SupabaseTables};

fn tables() -> SupabaseTables {
    SupabaseTables {
        profiles: "profiles".to_string(),
        investor_profiles: "investor_profiles".to_string(),
        companies: "companies".to_string(),
        offerings: "offerings".to_string(),
    }
}

fn client(base_url: &str) -> SupabaseClient {
    SupabaseClient::new(base_url.to_string(), "test-service-key".to_string(), tables())
}

#[tokio::test]
async fn test_investor_profile_parses() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/investor_profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{
                "user_id": "inv_1",
                "accredited": true,
                "investment_min": 1000000,
                "investment_max": 10000000,
                "sectors_of_interest": ["Fintech", "SaaS"],
                "stages_of_interest": ["seed"]
            }]"#,
        )
        .create_async()
        .await;

    let profile = client(&server.url())
        .get_investor_profile("inv_1")
        .await
        .unwrap()
        .expect("profile should be present");

    assert_eq!(profile.user_id, "inv_1");
    assert_eq!(profile.sectors_of_interest, vec!["Fintech", "SaaS"]);
    assert_eq!(profile.investment_bounds(), Some((1_000_000, 10_000_000)));
    assert!(profile.has_preferences());
}

#[tokio::test]
async fn test_missing_investor_profile_is_none_not_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/investor_profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let profile = client(&server.url()).get_investor_profile("inv_2").await.unwrap();

    assert!(profile.is_none());
}

#[tokio::test]
async fn test_upstream_failure_is_an_error_not_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/investor_profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let result = client(&server.url()).get_investor_profile("inv_3").await;

    // A failed read must not be conflated with "no preferences"
    assert!(matches!(result, Err(SupabaseError::ApiError(_))));
}

#[tokio::test]
async fn test_unauthorized_is_distinguished() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"JWT invalid"}"#)
        .create_async()
        .await;

    let result = client(&server.url()).get_profile("user_1").await;

    assert!(matches!(result, Err(SupabaseError::Unauthorized)));
}

#[tokio::test]
async fn test_live_offerings_parse_with_company_embed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/offerings")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{
                "id": "off_1",
                "company_id": "co_1",
                "title": "Seed Round",
                "description": "Raising a seed round",
                "status": "live",
                "minimum_investment": 2500000,
                "target_raise": 100000000,
                "created_at": "2025-03-01T12:00:00+00:00",
                "company": {"id": "co_1", "name": "Acme", "sector": "Fintech", "stage": "seed"}
            }]"#,
        )
        .create_async()
        .await;

    let offerings = client(&server.url()).get_live_offerings().await.unwrap();

    assert_eq!(offerings.len(), 1);
    assert_eq!(offerings[0].sector(), Some("Fintech"));
    assert_eq!(offerings[0].stage(), Some("seed"));
    // Not a Supabase column; defaults until enriched
    assert_eq!(offerings[0].interest_count, 0);
}

#[tokio::test]
async fn test_profile_role_parses() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": "user_1", "full_name": "Ada Lovelace", "role": "investor"}]"#)
        .create_async()
        .await;

    let profile = client(&server.url()).get_profile("user_1").await.unwrap();

    assert_eq!(profile.role, UserRole::Investor);
    assert_eq!(profile.full_name, "Ada Lovelace");
}

#[tokio::test]
async fn test_missing_profile_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let result = client(&server.url()).get_profile("ghost").await;

    assert!(matches!(result, Err(SupabaseError::NotFound(_))));
}

#[tokio::test]
async fn test_offerings_by_ids_empty_skips_request() {
    // No server at all: an empty id list must short-circuit
    let offerings = client("http://127.0.0.1:1")
        .get_offerings_by_ids(&[])
        .await
        .unwrap();

    assert!(offerings.is_empty());
}
