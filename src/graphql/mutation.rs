use async_graphql::{Context, Object, Result, ID};

use super::{app_state, caller, expense_id, resolve};
use crate::auth::models::{AuthPayload, SignUpInput, UpdateUserInput, User};
use crate::auth::AuthService;
use crate::expense::models::{CreateExpenseInput, Expense, UpdateExpenseInput};
use crate::expense::ExpenseService;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn sign_up(&self, ctx: &Context<'_>, data: SignUpInput) -> Result<AuthPayload> {
        resolve(async move {
            let state = app_state(ctx)?;
            AuthService::sign_up(state.store.as_ref(), &state.jwt_secret, data).await
        })
        .await
    }

    async fn sign_in(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        resolve(async move {
            let state = app_state(ctx)?;
            AuthService::sign_in(state.store.as_ref(), &state.jwt_secret, &email, &password).await
        })
        .await
    }

    async fn update_user(&self, ctx: &Context<'_>, data: UpdateUserInput) -> Result<User> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            AuthService::update_user(state.store.as_ref(), user_id, data).await
        })
        .await
    }

    /// Removes the caller's account together with all of its expenses
    async fn delete_user(&self, ctx: &Context<'_>) -> Result<User> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            AuthService::delete_user(state.store.as_ref(), user_id).await
        })
        .await
    }

    async fn create_expense(&self, ctx: &Context<'_>, data: CreateExpenseInput) -> Result<Expense> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            ExpenseService::create_expense(state.store.as_ref(), user_id, data).await
        })
        .await
    }

    async fn update_expense(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: UpdateExpenseInput,
    ) -> Result<Expense> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            let expense_id = expense_id(&id)?;
            ExpenseService::update_expense(state.store.as_ref(), user_id, expense_id, data).await
        })
        .await
    }

    async fn delete_expense(&self, ctx: &Context<'_>, id: ID) -> Result<Expense> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            let expense_id = expense_id(&id)?;
            ExpenseService::delete_expense(state.store.as_ref(), user_id, expense_id).await
        })
        .await
    }
}
