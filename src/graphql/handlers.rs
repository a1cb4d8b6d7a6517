use actix_web::guard::GuardContext;
use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse, Responder};
use async_graphql::http::GraphiQLSource;
use async_graphql::Data;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use serde_json::Value;
use tracing::warn;

use super::ApiSchema;
use crate::extractors::BearerToken;
use crate::state::AppState;

fn is_websocket_upgrade(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// POST /graphql - Execute a query or mutation
#[post("/graphql")]
pub async fn graphql(
    schema: web::Data<ApiSchema>,
    token: Option<BearerToken>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(token) = token {
        request = request.data(token);
    }
    schema.execute(request).await.into()
}

/// GET /graphql with an upgrade header - GraphQL over WebSocket. The
/// credential travels in the `connection_init` payload.
#[get("/graphql", guard = "is_websocket_upgrade")]
pub async fn graphql_ws(
    schema: web::Data<ApiSchema>,
    req: HttpRequest,
    payload: web::Payload,
) -> actix_web::Result<HttpResponse> {
    GraphQLSubscription::new(ApiSchema::clone(&schema))
        .on_connection_init(connection_init_data)
        .start(&req, payload)
}

/// Connection data for a WebSocket session: the bearer credential from the
/// `connection_init` payload, if any. Resolvers see it like a header token.
pub async fn connection_init_data(payload: Value) -> async_graphql::Result<Data> {
    let mut data = Data::default();
    if let Some(token) = BearerToken::from_connection_payload(&payload) {
        data.insert(token);
    }
    Ok(data)
}

/// GET /graphql - Interactive playground
#[get("/graphql")]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql")
                .finish(),
        )
}

/// Health check endpoint that verifies storage connectivity
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" })),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unhealthy" }))
        }
    }
}
