//! HTTP tests for the claim intake API
//!
//! The router runs against in-memory ports so every side effect can be
//! inspected and failed on demand.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;

use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{
    ClockFixtures, HistoryFixtures, ReportFixtures, StringFixtures, TestIntake, TestIntakeBuilder,
};

fn server_for(intake: &mut Option<TestIntake>) -> TestServer {
    server_with_config(intake, ApiConfig::default())
}

fn server_with_config(intake: &mut Option<TestIntake>, config: ApiConfig) -> TestServer {
    let built = intake.take().unwrap_or_else(|| TestIntakeBuilder::new().build());
    let ports = built.ports();
    let state = AppState::new(built.service.clone(), &ports, ClockFixtures::fixed_clock(), config);
    *intake = Some(built);
    TestServer::new(create_router(state)).unwrap()
}

fn claim_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("claim_id", StringFixtures::claim_id())
        .add_text("vin", StringFixtures::vin())
        .add_text("policy_number", StringFixtures::policy_number())
        .add_text("claim_date", "2025-06-01")
        .add_part(
            "damage_photo",
            Part::bytes(StringFixtures::jpeg_bytes())
                .file_name(StringFixtures::photo_filename())
                .mime_type("image/jpeg"),
        )
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn test_clean_submission_is_created() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let response = server.post("/api/v1/claims").multipart(claim_form()).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["message"], "Claim submitted");
        assert_eq!(body["persisted"], true);
        assert_eq!(body["notified"], true);
        assert_eq!(body["image_stored"], true);
        assert_eq!(body["report"]["claim_id"], "CLM999");
        assert_eq!(body["report"]["claim_date"], "2025-06-01");
        assert_eq!(body["report"]["damage_detected"]["damage_type"], "Rear Bumper");
        assert_eq!(body["report"]["fraud_detected"]["risk_score"], 0);
        assert_eq!(body["warnings"].as_array().unwrap().len(), 0);

        let intake = intake.unwrap();
        assert_eq!(intake.reports.len().await, 1);
        assert_eq!(intake.notifier.sent().await.len(), 1);
        assert!(intake.images.get(StringFixtures::photo_filename()).await.is_some());
    }

    #[tokio::test]
    async fn test_repeat_offender_is_flagged() {
        let mut intake = Some(
            TestIntakeBuilder::new()
                .with_history(HistoryFixtures::repeat_offender())
                .build(),
        );
        let server = server_for(&mut intake);

        let response = server.post("/api/v1/claims").multipart(claim_form()).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["report"]["fraud_detected"]["risk_score"], 95);
        assert_eq!(body["report"]["fraud_detected"]["is_fraud"], true);
        assert_eq!(body["report"]["fraud_detected"]["reason"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_date_defaults_to_today() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let form = MultipartForm::new()
            .add_text("claim_id", "CLM1")
            .add_text("vin", StringFixtures::vin())
            .add_text("policy_number", StringFixtures::policy_number())
            .add_text("claim_date", "")
            .add_part("damage_photo", Part::bytes(vec![1u8, 2, 3]).file_name("dent.png"));

        let response = server.post("/api/v1/claims").multipart(form).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["report"]["claim_date"], ClockFixtures::today().to_string());
    }

    #[tokio::test]
    async fn test_missing_photo_is_rejected_without_side_effects() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let form = MultipartForm::new()
            .add_text("claim_id", StringFixtures::claim_id())
            .add_text("vin", StringFixtures::vin());

        let response = server.post("/api/v1/claims").multipart(form).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert!(body.get("details").is_none());

        let intake = intake.unwrap();
        assert_eq!(intake.reports.len().await, 0);
        assert_eq!(intake.notifier.attempts(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_photo_format_is_rejected() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let form = MultipartForm::new()
            .add_text("claim_id", StringFixtures::claim_id())
            .add_part("damage_photo", Part::bytes(vec![1u8]).file_name("dent.gif"));

        let response = server.post("/api/v1/claims").multipart(form).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_date_is_bad_request() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let form = claim_form().add_text("claim_date", "June 1st");
        let response = server.post("/api/v1/claims").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_accepts_and_notifies() {
        let mut intake = Some(TestIntakeBuilder::new().build());
        if let Some(i) = &intake {
            i.reports.set_failing(true);
        }
        let server = server_for(&mut intake);

        let response = server.post("/api/v1/claims").multipart(claim_form()).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["persisted"], false);
        assert_eq!(body["notified"], true);
        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].as_str().unwrap().starts_with("Failed to save claim report"));

        assert_eq!(intake.unwrap().notifier.attempts(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_claim_id_is_reported_as_warning() {
        let mut intake = None;
        let server = server_for(&mut intake);

        server
            .post("/api/v1/claims")
            .multipart(claim_form())
            .await
            .assert_status(StatusCode::CREATED);
        let response = server.post("/api/v1/claims").multipart(claim_form()).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["persisted"], false);
        assert_eq!(intake.unwrap().reports.len().await, 1);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut intake = None;
        let config = ApiConfig {
            max_upload_bytes: 1024,
            ..ApiConfig::default()
        };
        let server = server_with_config(&mut intake, config);

        let form = claim_form().add_part("damage_photo", Part::bytes(vec![0u8; 4096]).file_name("big.jpg"));
        let response = server.post("/api/v1/claims").multipart(form).await;

        assert!(response.status_code().is_client_error());
        assert_eq!(intake.unwrap().reports.len().await, 0);
    }
}

mod reports {
    use super::*;

    async fn seeded_server() -> (TestServer, TestIntake) {
        let built = TestIntakeBuilder::new().build();
        for record in ReportFixtures::dashboard_sample() {
            built.reports.insert_record(record).await;
        }
        built.reports.insert_record(ReportFixtures::corrupt("CLM900")).await;

        let mut intake = Some(built);
        let server = server_for(&mut intake);
        (server, intake.unwrap())
    }

    #[tokio::test]
    async fn test_list_returns_readable_rows_and_warnings() {
        let (server, _intake) = seeded_server().await;

        let response = server.get("/api/v1/reports").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["total"], 3);
        assert_eq!(body["rows"][0]["claim_id"], "CLM100");
        assert_eq!(body["rows"][1]["fraud"], "Yes");
        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].as_str().unwrap().contains("CLM900"));
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let (server, _intake) = seeded_server().await;

        let response = server
            .get("/api/v1/reports")
            .add_query_param("damage_type", "Hood")
            .add_query_param("from", "2025-05-01")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["rows"][0]["claim_id"], "CLM102");
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let (server, _intake) = seeded_server().await;

        let response = server.get("/api/v1/reports/summary").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["total_claims"], 3);
        assert_eq!(body["by_damage_type"]["Hood"], 2);
        assert_eq!(body["fraud"]["suspected"], 1);
        assert_eq!(body["fraud"]["legitimate"], 2);
        assert_eq!(body["claims_by_date"]["2025-05-10"], 2);
    }

    #[tokio::test]
    async fn test_summary_by_fraud_status() {
        let (server, _intake) = seeded_server().await;

        let response = server
            .get("/api/v1/reports/summary")
            .add_query_param("fraud", "No")
            .await;

        let body: Value = response.json();
        assert_eq!(body["total_claims"], 2);
        assert_eq!(body["fraud"]["suspected"], 0);
    }

    #[tokio::test]
    async fn test_inverted_range_is_unprocessable() {
        let (server, _intake) = seeded_server().await;

        let response = server
            .get("/api/v1/reports")
            .add_query_param("from", "2025-06-01")
            .add_query_param("to", "2025-05-01")
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0], "'from' must not be after 'to'");
    }

    #[tokio::test]
    async fn test_submitted_claim_appears_in_list() {
        let mut intake = None;
        let server = server_for(&mut intake);

        server
            .post("/api/v1/claims")
            .multipart(claim_form())
            .await
            .assert_status(StatusCode::CREATED);

        let body: Value = server.get("/api/v1/reports").await.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["rows"][0]["damage_type"], "Rear Bumper");
        assert_eq!(body["rows"][0]["severity"], "Moderate");
        assert_eq!(body["rows"][0]["fraud"], "No");
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_adapters() {
        let mut intake = None;
        let server = server_for(&mut intake);

        let response = server.get("/health/ready").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_history_is_down() {
        let mut intake = Some(TestIntakeBuilder::new().build());
        if let Some(i) = &intake {
            i.history.set_unavailable(true);
        }
        let server = server_for(&mut intake);

        let response = server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["status"], "unavailable");
    }
}
