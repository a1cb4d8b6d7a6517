use serde_json::{json, Value};

mod common;
use common::{TestApp, SIGN_UP};

const SIGN_IN: &str = r#"
    mutation SignIn($email: String!, $password: String!) {
        signIn(email: $email, password: $password) { token user { email } }
    }
"#;

const ME: &str = "query { me { id name email password } }";

const UPDATE_USER: &str = r#"
    mutation Update($data: UpdateUserInput!) {
        updateUser(data: $data) { id name email }
    }
"#;

const DELETE_USER: &str = "mutation { deleteUser { id email } }";

fn sign_up_vars(name: &str, email: &str, password: &str) -> Value {
    json!({ "data": { "name": name, "email": email, "password": password } })
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.json()["status"], "healthy");
}

#[actix_rt::test]
async fn test_playground_is_served_on_get() {
    let app = TestApp::new().await;

    let response = app.get("/graphql").await;

    assert_eq!(response.status(), 200);
    assert!(response.text().to_lowercase().contains("graphiql"));
}

#[actix_rt::test]
async fn test_sign_up_success() {
    let app = TestApp::new().await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("Jane", "jane@x.com", "password1"), None)
        .await;

    assert_eq!(response.status(), 200);
    let user = &response.data()["signUp"]["user"];
    assert!(response.data()["signUp"]["token"].is_string());
    assert_eq!(user["name"], "Jane");
    assert_eq!(user["email"], "jane@x.com");
    assert!(user["password"].is_null());
    assert!(user["id"].is_string());
}

#[actix_rt::test]
async fn test_sign_up_trims_fields() {
    let app = TestApp::new().await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("  Jane  ", "  jane@x.com ", "password1"), None)
        .await;

    let user = &response.data()["signUp"]["user"];
    assert_eq!(user["name"], "Jane");
    assert_eq!(user["email"], "jane@x.com");
}

#[actix_rt::test]
async fn test_sign_up_duplicate_email() {
    let app = TestApp::new().await;
    app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("Other", "jane@x.com", "password1"), None)
        .await;

    assert_eq!(response.error_code(), "EMAIL_IN_USE");
    assert_eq!(response.error_message(), "The email provided is already in use.");
}

#[actix_rt::test]
async fn test_sign_up_invalid_email() {
    let app = TestApp::new().await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("Jane", "not-an-email", "password1"), None)
        .await;

    assert_eq!(response.error_code(), "INVALID_EMAIL");
    assert_eq!(response.error_message(), "Please provide a valid email.");
}

#[actix_rt::test]
async fn test_sign_up_short_password() {
    let app = TestApp::new().await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("Jane", "jane@x.com", "  short  "), None)
        .await;

    assert_eq!(response.error_code(), "INVALID_PASSWORD");
    assert_eq!(
        response.error_message(),
        "Please provide a password with at least 8 characters."
    );
}

#[actix_rt::test]
async fn test_sign_up_blank_name() {
    let app = TestApp::new().await;

    let response = app
        .graphql(SIGN_UP, sign_up_vars("   ", "jane@x.com", "password1"), None)
        .await;

    assert_eq!(response.error_code(), "INVALID_NAME");
}

#[actix_rt::test]
async fn test_sign_in_success() {
    let app = TestApp::new().await;
    app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(
            SIGN_IN,
            json!({ "email": " jane@x.com ", "password": "password1" }),
            None,
        )
        .await;

    let data = response.data();
    assert!(data["signIn"]["token"].is_string());
    assert_eq!(data["signIn"]["user"]["email"], "jane@x.com");
}

#[actix_rt::test]
async fn test_sign_in_wrong_password() {
    let app = TestApp::new().await;
    app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(
            SIGN_IN,
            json!({ "email": "jane@x.com", "password": "wrongpassword" }),
            None,
        )
        .await;

    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(response.error_message(), "Invalid credentials provided.");
}

#[actix_rt::test]
async fn test_sign_in_unknown_email() {
    let app = TestApp::new().await;

    let response = app
        .graphql(
            SIGN_IN,
            json!({ "email": "nobody@x.com", "password": "password1" }),
            None,
        )
        .await;

    assert_eq!(response.error_code(), "ACCOUNT_NOT_FOUND");
}

#[actix_rt::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let response = app.graphql(ME, json!({}), None).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
    assert_eq!(response.error_message(), "You need to login first!");
}

#[actix_rt::test]
async fn test_me_rejects_garbage_token() {
    let app = TestApp::new().await;

    let response = app.graphql(ME, json!({}), Some("not.a.jwt")).await;

    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
}

#[actix_rt::test]
async fn test_me_rejects_token_signed_with_other_secret() {
    let app = TestApp::new().await;
    let (_, user_id) = app.sign_up("Jane", "jane@x.com").await;

    let forged = expenses_api::auth::create_token(
        user_id.parse().expect("uuid"),
        &secrecy::Secret::new("some_other_secret".to_string()),
    )
    .expect("token");

    let response = app.graphql(ME, json!({}), Some(&forged)).await;

    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
}

#[actix_rt::test]
async fn test_me_returns_caller() {
    let app = TestApp::new().await;
    let (token, user_id) = app.sign_up("Jane", "jane@x.com").await;

    let response = app.graphql(ME, json!({}), Some(&token)).await;

    let me = &response.data()["me"];
    assert_eq!(me["id"], user_id.as_str());
    assert_eq!(me["name"], "Jane");
    assert!(me["password"].is_null());
}

#[actix_rt::test]
async fn test_update_user_changes_given_fields_only() {
    let app = TestApp::new().await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(UPDATE_USER, json!({ "data": { "name": "Janet" } }), Some(&token))
        .await;

    let user = &response.data()["updateUser"];
    assert_eq!(user["name"], "Janet");
    assert_eq!(user["email"], "jane@x.com");
}

#[actix_rt::test]
async fn test_update_user_email_taken_by_someone_else() {
    let app = TestApp::new().await;
    app.sign_up("Bob", "bob@x.com").await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(UPDATE_USER, json!({ "data": { "email": "bob@x.com" } }), Some(&token))
        .await;

    assert_eq!(response.error_code(), "EMAIL_IN_USE");
}

#[actix_rt::test]
async fn test_update_user_keeping_own_email() {
    let app = TestApp::new().await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(UPDATE_USER, json!({ "data": { "email": "jane@x.com" } }), Some(&token))
        .await;

    assert_eq!(response.data()["updateUser"]["email"], "jane@x.com");
}

#[actix_rt::test]
async fn test_update_user_password_changes_credentials() {
    let app = TestApp::new().await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(
            UPDATE_USER,
            json!({ "data": { "password": "new-password" } }),
            Some(&token),
        )
        .await;
    response.data();

    let old = app
        .graphql(SIGN_IN, json!({ "email": "jane@x.com", "password": "password1" }), None)
        .await;
    assert_eq!(old.error_code(), "INVALID_CREDENTIALS");

    let new = app
        .graphql(SIGN_IN, json!({ "email": "jane@x.com", "password": "new-password" }), None)
        .await;
    assert!(new.data()["signIn"]["token"].is_string());
}

#[actix_rt::test]
async fn test_update_user_short_password() {
    let app = TestApp::new().await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;

    let response = app
        .graphql(UPDATE_USER, json!({ "data": { "password": "short" } }), Some(&token))
        .await;

    assert_eq!(response.error_code(), "INVALID_PASSWORD");
}

#[actix_rt::test]
async fn test_delete_user_invalidates_existing_token() {
    let app = TestApp::new().await;
    let (token, user_id) = app.sign_up("Jane", "jane@x.com").await;

    let response = app.graphql(DELETE_USER, json!({}), Some(&token)).await;
    let deleted = &response.data()["deleteUser"];
    assert_eq!(deleted["id"], user_id.as_str());
    assert_eq!(deleted["email"], "jane@x.com");

    let me = app.graphql(ME, json!({}), Some(&token)).await;
    assert_eq!(me.error_code(), "ACCOUNT_NOT_FOUND");
    assert_eq!(me.error_message(), "Account not found.");

    let sign_in = app
        .graphql(SIGN_IN, json!({ "email": "jane@x.com", "password": "password1" }), None)
        .await;
    assert_eq!(sign_in.error_code(), "ACCOUNT_NOT_FOUND");
}

#[actix_rt::test]
async fn test_deleted_email_can_sign_up_again() {
    let app = TestApp::new().await;
    let (token, _) = app.sign_up("Jane", "jane@x.com").await;
    app.graphql(DELETE_USER, json!({}), Some(&token)).await.data();

    let response = app
        .graphql(SIGN_UP, sign_up_vars("Jane", "jane@x.com", "password1"), None)
        .await;

    assert!(response.data()["signUp"]["token"].is_string());
}
