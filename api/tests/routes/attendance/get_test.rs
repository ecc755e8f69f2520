#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::test_utils::seed_registration;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn missing_record_is_404() {
        let app = make_test_app().await;

        let (status, json) = app.send("GET", "/attendance/42", Some("staff-1"), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn reads_require_token() {
        let app = make_test_app().await;

        let (status, _) = app.send("GET", "/attendance/event/evt-1", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn event_listing_is_ordered_by_check_in_time() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-a", "evt-1", None, None).await;
        seed_registration(&app.db, "reg-b", "evt-1", None, None).await;
        seed_registration(&app.db, "reg-x", "evt-2", None, None).await;

        let body = json!({
            "records": [
                { "idempotencyKey": "kb", "eventId": "evt-1", "registrationId": "reg-b",
                  "checkInMethod": "KIOSK", "checkInTime": "2024-12-01T10:00:00Z" },
                { "idempotencyKey": "ka", "eventId": "evt-1", "registrationId": "reg-a",
                  "checkInMethod": "KIOSK", "checkInTime": "2024-12-01T09:00:00Z" },
                { "idempotencyKey": "kx", "eventId": "evt-2", "registrationId": "reg-x",
                  "checkInMethod": "KIOSK", "checkInTime": "2024-12-01T08:00:00Z" }
            ]
        });
        app.send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;

        let (status, json) = app
            .send("GET", "/attendance/event/evt-1", Some("staff-1"), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["registrationId"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(ids, ["reg-a", "reg-b"]);
    }
}
