#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::models::registration::ParticipationMode;
    use db::test_utils::{seed_center, seed_registration};
    use serde_json::json;
    use serial_test::serial;

    fn check_in_body(registration_id: &str) -> serde_json::Value {
        json!({
            "eventId": "evt-1",
            "registrationId": registration_id,
            "checkInMethod": "MANUAL"
        })
    }

    #[tokio::test]
    #[serial]
    async fn check_in_requires_token() {
        let app = make_test_app().await;

        let (status, json) = app
            .send("POST", "/attendance/check-in", None, Some(check_in_body("reg-1")))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn check_in_creates_record_once() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;

        let (status, json) = app
            .send("POST", "/attendance/check-in", Some("staff-1"), Some(check_in_body("reg-1")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["registrationId"], "reg-1");
        assert_eq!(json["data"]["checkInMethod"], "MANUAL");
        assert_eq!(json["data"]["participationMode"], "ONLINE");
        assert_eq!(json["data"]["isVerified"], false);

        let (status, json) = app
            .send("POST", "/attendance/check-in", Some("staff-1"), Some(check_in_body("reg-1")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("already recorded"));
    }

    #[tokio::test]
    #[serial]
    async fn check_in_unknown_registration_is_404() {
        let app = make_test_app().await;

        let (status, json) = app
            .send("POST", "/attendance/check-in", Some("staff-1"), Some(check_in_body("ghost")))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn check_in_at_wrong_center_is_400() {
        let app = make_test_app().await;
        seed_center(&app.db, "c-north", None).await;
        seed_center(&app.db, "c-south", None).await;
        seed_registration(
            &app.db,
            "reg-1",
            "evt-1",
            Some("c-north"),
            Some(ParticipationMode::Onsite),
        )
        .await;

        let mut body = check_in_body("reg-1");
        body["centerId"] = json!("c-south");
        let (status, json) = app
            .send("POST", "/attendance/check-in", Some("staff-1"), Some(body))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("Center mismatch"));
    }

    #[tokio::test]
    #[serial]
    async fn malformed_body_is_400_envelope() {
        let app = make_test_app().await;

        let (status, json) = app
            .send(
                "POST",
                "/attendance/check-in",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "registrationId": "reg-1", "checkInMethod": "TELEPORT" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn check_out_and_verify() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;

        let (_, created) = app
            .send("POST", "/attendance/check-in", Some("staff-1"), Some(check_in_body("reg-1")))
            .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, json) = app
            .send(
                "POST",
                "/attendance/check-out",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "registrationId": "reg-1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["checkOutTime"].is_string());

        let (status, _) = app
            .send(
                "POST",
                "/attendance/check-out",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "registrationId": "reg-1" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/attendance/{id}/verify");
        let (status, json) = app.send("POST", &uri, Some("supervisor"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["isVerified"], true);
        assert_eq!(json["data"]["verifiedBy"], "supervisor");
    }
}
