//! GraphQL schema and resolvers.
//!
//! Resolver bodies work in terms of [`AppError`]; [`resolve`] is the one
//! place where those errors become GraphQL errors.

pub mod handlers;
mod mutation;
mod query;
mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::extensions::Tracing;
use async_graphql::{Context, EmptySubscription, ResultExt, Schema, ID};
use std::future::Future;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::extractors::BearerToken;
use crate::state::AppState;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .extension(Tracing)
        .finish()
}

/// Await a resolver body and translate its error for the client
async fn resolve<T, F>(body: F) -> async_graphql::Result<T>
where
    F: Future<Output = Result<T, AppError>>,
{
    body.await.extend()
}

fn app_state<'a>(ctx: &Context<'a>) -> Result<&'a AppState, AppError> {
    ctx.data::<AppState>()
        .map_err(|e| AppError::internal(format!("AppState missing from schema: {}", e.message)))
}

/// Guard for every authenticated resolver
async fn caller<'a>(ctx: &Context<'a>) -> Result<(&'a AppState, Uuid), AppError> {
    let state = app_state(ctx)?;
    let credential = ctx.data_opt::<BearerToken>();
    let user_id = authenticate(state.store.as_ref(), &state.jwt_secret, credential).await?;
    Ok((state, user_id))
}

/// Ids are UUIDs; anything else cannot name an existing expense
fn expense_id(id: &ID) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.as_str()).map_err(|_| AppError::ExpenseNotFound)
}
