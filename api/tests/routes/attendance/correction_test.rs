#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::test_utils::seed_registration;
    use serde_json::json;
    use serial_test::serial;

    async fn synced_record(app: &crate::helpers::TestApp) -> i64 {
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;
        let body = json!({
            "records": [{
                "idempotencyKey": "k1",
                "eventId": "evt-1",
                "registrationId": "reg-1",
                "checkInMethod": "KIOSK",
                "checkInTime": "2024-12-01T09:15:00Z"
            }]
        });
        let (_, json) = app
            .send("POST", "/attendance/bulk-sync", Some("kiosk-1"), Some(body))
            .await;
        json["data"]["results"][0]["recordId"].as_i64().unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn correcting_check_in_time_is_audited() {
        let app = make_test_app().await;
        let id = synced_record(&app).await;

        let (status, json) = app
            .send(
                "POST",
                &format!("/attendance/{id}/correct"),
                Some("supervisor"),
                Some(json!({
                    "correctionType": "CHECK_IN_TIME",
                    "newValue": "2024-12-01T09:05:00Z",
                    "reason": "Kiosk clock was ten minutes fast"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["correction"]["oldValue"], "2024-12-01T09:15:00Z");
        assert_eq!(json["data"]["correction"]["newValue"], "2024-12-01T09:05:00Z");
        assert_eq!(json["data"]["correction"]["correctedBy"], "supervisor");
        assert_eq!(json["data"]["correction"]["correctionType"], "CHECK_IN_TIME");
        assert_eq!(json["data"]["updated"]["checkInTime"], "2024-12-01T09:05:00+00:00");

        let (status, history) = app
            .send("GET", &format!("/attendance/{id}/corrections"), Some("supervisor"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn correction_without_reason_is_400() {
        let app = make_test_app().await;
        let id = synced_record(&app).await;

        let (status, json) = app
            .send(
                "POST",
                &format!("/attendance/{id}/correct"),
                Some("supervisor"),
                Some(json!({
                    "correctionType": "PARTICIPATION_MODE",
                    "newValue": "ONSITE",
                    "reason": ""
                })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "reason is required");
    }

    #[tokio::test]
    #[serial]
    async fn correcting_missing_record_is_404() {
        let app = make_test_app().await;

        let (status, _) = app
            .send(
                "POST",
                "/attendance/999/correct",
                Some("supervisor"),
                Some(json!({
                    "correctionType": "CHECK_OUT_TIME",
                    "newValue": "2024-12-01T17:00:00Z",
                    "reason": "Forgot to check out"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
