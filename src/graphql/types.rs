//! Computed fields of the object types.

use async_graphql::{ComplexObject, Context, Result, ID};

use super::{app_state, resolve};
use crate::auth::models::User;
use crate::auth::AuthService;
use crate::expense::models::{Expense, ExpenseFilters};
use crate::expense::ExpenseService;

#[ComplexObject]
impl User {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    /// Always null
    async fn password(&self) -> Option<String> {
        None
    }

    async fn expenses(&self, ctx: &Context<'_>) -> Result<Vec<Expense>> {
        resolve(async move {
            let state = app_state(ctx)?;
            ExpenseService::list_expenses(state.store.as_ref(), self.id, &ExpenseFilters::default())
                .await
        })
        .await
    }
}

#[ComplexObject]
impl Expense {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn owner(&self, ctx: &Context<'_>) -> Result<User> {
        resolve(async move {
            let state = app_state(ctx)?;
            AuthService::me(state.store.as_ref(), self.owner_id).await
        })
        .await
    }
}
