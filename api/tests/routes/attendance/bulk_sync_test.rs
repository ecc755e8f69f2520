#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::test_utils::seed_registration;
    use serde_json::{Value, json};
    use serial_test::serial;
    use util::config::{AppConfig, IdempotencyBackend};

    fn record(key: &str, registration_id: &str, at: &str) -> Value {
        json!({
            "idempotencyKey": key,
            "eventId": "evt-1",
            "registrationId": registration_id,
            "checkInMethod": "KIOSK",
            "checkInTime": at
        })
    }

    #[tokio::test]
    #[serial]
    async fn resubmitted_batch_is_duplicate() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;
        let body = json!({ "records": [record("k1", "reg-1", "2024-12-01T09:15:00Z")] });

        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(json["data"]["synced"], 1);
        assert_eq!(json["data"]["duplicates"], 0);
        assert_eq!(json["data"]["conflicts"], 0);
        assert_eq!(json["data"]["errors"], 0);
        assert_eq!(json["data"]["results"][0]["status"], "success");
        let record_id = json["data"]["results"][0]["recordId"].as_i64().unwrap();

        let (_, stored) = app
            .send("GET", &format!("/attendance/{record_id}"), Some("kiosk-1"), None)
            .await;
        assert_eq!(stored["data"]["checkInTime"], "2024-12-01T09:15:00+00:00");

        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(json["data"]["synced"], 0);
        assert_eq!(json["data"]["duplicates"], 1);
        assert_eq!(json["data"]["results"][0]["recordId"], record_id);
    }

    #[tokio::test]
    #[serial]
    async fn partial_failure_is_reported_per_record() {
        let app = make_test_app().await;
        for id in ["reg-1", "reg-2", "reg-4", "reg-5"] {
            seed_registration(&app.db, id, "evt-1", None, None).await;
        }

        let body = json!({
            "records": [
                record("k1", "reg-1", "2024-12-01T09:00:00Z"),
                record("k2", "reg-2", "2024-12-01T09:01:00Z"),
                record("k3", "reg-3", "2024-12-01T09:02:00Z"),
                record("k4", "reg-4", "2024-12-01T09:03:00Z"),
                record("k5", "reg-5", "2024-12-01T09:04:00Z"),
            ]
        });
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;

        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["synced"], 4);
        assert_eq!(json["data"]["errors"], 1);
        assert_eq!(json["data"]["results"][2]["status"], "error");
        assert!(json["data"]["results"][2].get("recordId").is_none());
        assert_eq!(json["data"]["errorDetails"][0]["idempotencyKey"], "k3");
        assert!(json["data"]["errorDetails"][0]["error"].is_string());
    }

    #[tokio::test]
    #[serial]
    async fn sync_after_live_check_in_conflicts() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;

        let (_, created) = app
            .send(
                "POST",
                "/attendance/check-in",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "registrationId": "reg-1", "checkInMethod": "QR" })),
            )
            .await;
        let original = created["data"]["id"].as_i64().unwrap();

        let body = json!({ "records": [record("k-late", "reg-1", "2024-12-01T09:15:00Z")] });
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;

        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(json["data"]["conflicts"], 1);
        assert_eq!(json["data"]["results"][0]["status"], "conflict");
        assert_eq!(json["data"]["results"][0]["recordId"], original);

        let (_, listed) = app
            .send("GET", "/attendance/event/evt-1", Some("staff-1"), None)
            .await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn empty_or_malformed_batches_are_400() {
        let app = make_test_app().await;

        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(json!({ "records": [] })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "records must not be empty");

        let (status, _) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing_time = json!({
            "records": [{
                "idempotencyKey": "k1",
                "eventId": "evt-1",
                "registrationId": "reg-1",
                "checkInMethod": "KIOSK"
            }]
        });
        let (status, _) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(missing_time))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let blank_key = json!({ "records": [record("", "reg-1", "2024-12-01T09:15:00Z")] });
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(blank_key))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "records[0]: idempotencyKey must be between 1 and 255 characters"
        );

        let long_key = "k".repeat(300);
        let oversized_key = json!({ "records": [record(&long_key, "reg-1", "2024-12-01T09:15:00Z")] });
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(oversized_key))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "records[0]: idempotencyKey must be between 1 and 255 characters"
        );
    }

    #[tokio::test]
    #[serial]
    async fn oversized_batch_is_400() {
        let app = make_test_app().await;
        AppConfig::set_bulk_sync_max_records(2);

        let body = json!({
            "records": [
                record("k1", "reg-1", "2024-12-01T09:00:00Z"),
                record("k2", "reg-2", "2024-12-01T09:01:00Z"),
                record("k3", "reg-3", "2024-12-01T09:02:00Z"),
            ]
        });
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;

        AppConfig::reset();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("exceeds the limit"));
    }

    #[tokio::test]
    #[serial]
    async fn memory_backend_recognises_resubmission() {
        AppConfig::set_idempotency_backend(IdempotencyBackend::Memory);
        AppConfig::set_bulk_sync_concurrency(1);
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;
        seed_registration(&app.db, "reg-2", "evt-1", None, None).await;

        let body = json!({
            "records": [
                record("k1", "reg-1", "2024-12-01T09:00:00Z"),
                record("k2", "reg-2", "2024-12-01T09:01:00Z"),
            ]
        });
        let (first, _) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body.clone()))
            .await;
        let (second, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;

        AppConfig::reset();
        assert_eq!(first, StatusCode::MULTI_STATUS);
        assert_eq!(second, StatusCode::MULTI_STATUS);
        assert_eq!(json["data"]["duplicates"], 2);
        assert_eq!(json["data"]["synced"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn timed_out_batch_is_503_and_resend_settles() {
        let app = make_test_app().await;
        for id in ["reg-1", "reg-2", "reg-3"] {
            seed_registration(&app.db, id, "evt-1", None, None).await;
        }
        let body = json!({
            "records": [
                record("k1", "reg-1", "2024-12-01T09:00:00Z"),
                record("k2", "reg-2", "2024-12-01T09:01:00Z"),
                record("k3", "reg-3", "2024-12-01T09:02:00Z"),
            ]
        });

        AppConfig::set_bulk_sync_timeout_ms(0);
        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body.clone()))
            .await;
        AppConfig::reset();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("timed out"));

        let (status, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(json["data"]["errors"], 0);
        assert_eq!(json["data"]["conflicts"], 0);
        for result in json["data"]["results"].as_array().unwrap() {
            let status = result["status"].as_str().unwrap();
            assert!(status == "success" || status == "duplicate", "{status}");
        }

        let (_, listed) = app
            .send("GET", "/attendance/event/evt-1", Some("kiosk-1"), None)
            .await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 3);
    }
}
