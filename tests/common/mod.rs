#![allow(dead_code)]

use actix_web::{http::header, test, web, App};
use secrecy::Secret;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use expenses_api::graphql::{build_schema, handlers, ApiSchema};
use expenses_api::state::AppState;
use expenses_api::store::{MemoryStore, PgStore, Store};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

static JWT_SECRET: &str = "test_jwt_secret_for_integration_tests";

pub const SIGN_UP: &str = r#"
    mutation SignUp($data: SignupUserInput!) {
        signUp(data: $data) { token user { id name email password } }
    }
"#;

pub const CREATE_EXPENSE: &str = r#"
    mutation Create($data: createExpenseInput!) {
        createExpense(data: $data) { id title description amount date owner { email } }
    }
"#;

/// Application under test. The in-memory variant starts empty; the
/// PostgreSQL one shares a database, so tests there use [`TestApp::unique_email`].
pub struct TestApp {
    pub state: AppState,
    pub schema: ApiSchema,
    pub test_id: String,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// `data` of a GraphQL response, panicking on errors
    pub fn data(&self) -> Value {
        let body = self.json();
        assert!(
            body.get("errors").is_none(),
            "Unexpected GraphQL errors: {}",
            body["errors"]
        );
        body["data"].clone()
    }

    /// Message of the first GraphQL error
    pub fn error_message(&self) -> String {
        let body = self.json();
        body["errors"][0]["message"]
            .as_str()
            .unwrap_or_else(|| panic!("Expected a GraphQL error, got: {}", body))
            .to_string()
    }

    pub fn error_code(&self) -> String {
        let body = self.json();
        body["errors"][0]["extensions"]["code"]
            .as_str()
            .unwrap_or_else(|| panic!("Expected an error code, got: {}", body))
            .to_string()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// App over the database named by `DATABASE_URL`, with migrations applied.
    /// `None` when the variable is not set.
    pub async fn postgres() -> Option<Self> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to database for tests");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self::with_store(Arc::new(PgStore::new(pool))))
    }

    fn with_store(store: Arc<dyn Store>) -> Self {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let test_id = format!("{timestamp}_{counter}");

        let state = AppState::new(store, Secret::new(JWT_SECRET.to_string()));
        let schema = build_schema(state.clone());

        TestApp {
            state,
            schema,
            test_id,
        }
    }

    /// Generate a unique email for this test run
    pub fn unique_email(&self, prefix: &str) -> String {
        format!("{prefix}_{}@test.com", self.test_id)
    }

    pub fn store(&self) -> &dyn Store {
        self.state.store.as_ref()
    }

    async fn call(&self, req: test::TestRequest) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .app_data(web::Data::new(self.schema.clone()))
                .service(handlers::health_check)
                .service(handlers::graphql)
                .service(handlers::graphiql),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.call(test::TestRequest::get().uri(path)).await
    }

    /// POST a GraphQL operation, optionally with a bearer token
    pub async fn graphql(&self, query: &str, variables: Value, token: Option<&str>) -> TestResponse {
        let mut req = test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({ "query": query, "variables": variables }));

        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
        }

        self.call(req).await
    }

    /// Sign up and return `(token, user id)`
    pub async fn sign_up(&self, name: &str, email: &str) -> (String, String) {
        let response = self
            .graphql(
                SIGN_UP,
                json!({ "data": { "name": name, "email": email, "password": "password1" } }),
                None,
            )
            .await;
        let data = response.data();

        (
            data["signUp"]["token"].as_str().expect("token").to_string(),
            data["signUp"]["user"]["id"].as_str().expect("id").to_string(),
        )
    }

    /// Create an expense for the token's owner and return it
    pub async fn create_expense(&self, token: &str, title: &str, amount: f64, date: &str) -> Value {
        let response = self
            .graphql(
                CREATE_EXPENSE,
                json!({ "data": {
                    "title": title,
                    "description": format!("{title} description"),
                    "amount": amount,
                    "date": date
                }}),
                Some(token),
            )
            .await;

        response.data()["createExpense"].clone()
    }
}
