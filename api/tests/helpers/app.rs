use api::auth::generate_jwt;
use api::routes::routes;
use api::state::AppState;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use util::test_helpers::setup_test_env;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Router over a fresh in-memory database with migrations applied.
pub async fn make_test_app() -> TestApp {
    setup_test_env();

    let db = setup_test_db().await;
    let state = AppState::from_config(db.clone()).expect("Failed to build app state");

    TestApp {
        router: routes(state),
        db,
    }
}

impl TestApp {
    /// Sends a request as `actor` (or anonymously) and returns status and JSON body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        actor: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(actor) = actor {
            let (token, _) = generate_jwt(actor).unwrap();
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let req = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }
}
