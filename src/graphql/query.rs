use async_graphql::{Context, Object, Result, ID};

use super::{caller, expense_id, resolve};
use crate::auth::models::User;
use crate::auth::AuthService;
use crate::expense::models::{Expense, ExpenseFilters, ExpenseOrderBy};
use crate::expense::ExpenseService;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The logged-in user
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            AuthService::me(state.store.as_ref(), user_id).await
        })
        .await
    }

    /// One of the caller's expenses
    async fn expense(&self, ctx: &Context<'_>, id: ID) -> Result<Expense> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            let expense_id = expense_id(&id)?;
            ExpenseService::get_expense(state.store.as_ref(), user_id, expense_id).await
        })
        .await
    }

    /// The caller's expenses, optionally filtered by a title substring and paged
    async fn expenses(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
        skip: Option<i32>,
        limit: Option<i32>,
        order_by: Option<ExpenseOrderBy>,
    ) -> Result<Vec<Expense>> {
        resolve(async move {
            let (state, user_id) = caller(ctx).await?;
            let filters = ExpenseFilters::new(query, skip, limit, order_by);
            ExpenseService::list_expenses(state.store.as_ref(), user_id, &filters).await
        })
        .await
    }
}
