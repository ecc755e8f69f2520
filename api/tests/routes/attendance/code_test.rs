#[cfg(test)]
mod tests {
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::test_utils::seed_registration;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn generated_code_redeems_once() {
        let app = make_test_app().await;

        let (status, json) = app
            .send(
                "POST",
                "/attendance/code/generate",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "codeType": "SAC" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["codeType"], "SAC");
        assert_eq!(json["data"]["isUsed"], false);
        let code = json["data"]["code"].as_str().unwrap().to_owned();
        assert_eq!(code.len(), 6);

        let (status, json) = app
            .send(
                "POST",
                "/attendance/code/validate",
                Some("member-1"),
                Some(json!({ "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["isUsed"], true);
        assert!(json["data"]["usedAt"].is_string());

        let (status, json) = app
            .send(
                "POST",
                "/attendance/code/validate",
                Some("member-1"),
                Some(json!({ "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("already used"));
    }

    #[tokio::test]
    #[serial]
    async fn unknown_code_is_404() {
        let app = make_test_app().await;

        let (status, json) = app
            .send(
                "POST",
                "/attendance/code/validate",
                Some("member-1"),
                Some(json!({ "code": "ZZZZZZ" })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn check_in_with_qr_code() {
        let app = make_test_app().await;
        seed_registration(&app.db, "reg-1", "evt-1", None, None).await;

        let (_, generated) = app
            .send(
                "POST",
                "/attendance/code/generate",
                Some("staff-1"),
                Some(json!({ "eventId": "evt-1", "codeType": "QR" })),
            )
            .await;
        let code = generated["data"]["code"].as_str().unwrap().to_owned();

        let (status, json) = app
            .send(
                "POST",
                "/attendance/check-in",
                Some("member-reg-1"),
                Some(json!({
                    "eventId": "evt-1",
                    "registrationId": "reg-1",
                    "checkInMethod": "QR",
                    "code": code
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["checkInMethod"], "QR");

        let (status, _) = app
            .send(
                "POST",
                "/attendance/code/validate",
                Some("member-reg-1"),
                Some(json!({ "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
