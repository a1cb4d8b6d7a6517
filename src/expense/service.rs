use tracing::{debug, info};
use uuid::Uuid;

use super::models::{CreateExpenseInput, Expense, ExpenseFilters, UpdateExpenseInput};
use crate::errors::AppError;
use crate::sanitize;
use crate::store::{ExpenseChanges, NewExpense, Store, StoreError};

/// Service layer for expense business logic.
/// Every method takes the already-authenticated owner; an expense belonging
/// to anybody else is reported exactly like a missing one.
pub struct ExpenseService;

fn not_found_as_expense(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::ExpenseNotFound,
        other => other.into(),
    }
}

impl ExpenseService {
    /// Fails with `ExpenseNotFound` unless `owner_id` owns `expense_id`
    async fn verify_ownership(
        store: &dyn Store,
        expense_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), AppError> {
        if store.expense_owned_by(expense_id, owner_id).await? {
            Ok(())
        } else {
            debug!(%expense_id, %owner_id, "Expense missing or owned by someone else");
            Err(AppError::ExpenseNotFound)
        }
    }

    pub async fn create_expense(
        store: &dyn Store,
        owner_id: Uuid,
        input: CreateExpenseInput,
    ) -> Result<Expense, AppError> {
        let title = sanitize::title(&input.title)?;

        if store.title_in_use(owner_id, &title, None).await? {
            return Err(AppError::DuplicateTitle);
        }

        let date = sanitize::date(&input.date)?;

        let expense = store
            .create_expense(NewExpense {
                owner_id,
                title,
                description: sanitize::description(&input.description),
                amount: input.amount,
                date,
            })
            .await?;

        info!(expense_id = %expense.id, %owner_id, "Expense created");
        Ok(expense)
    }

    pub async fn update_expense(
        store: &dyn Store,
        owner_id: Uuid,
        expense_id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<Expense, AppError> {
        Self::verify_ownership(store, expense_id, owner_id).await?;

        let mut changes = ExpenseChanges {
            description: input.description.as_deref().map(sanitize::description),
            amount: input.amount,
            ..Default::default()
        };

        if let Some(title) = input.title {
            let title = sanitize::title(&title)?;
            if store.title_in_use(owner_id, &title, Some(expense_id)).await? {
                return Err(AppError::DuplicateTitle);
            }
            changes.title = Some(title);
        }

        if let Some(date) = input.date {
            changes.date = Some(sanitize::date(&date)?);
        }

        store
            .update_expense(expense_id, changes)
            .await
            .map_err(not_found_as_expense)
    }

    pub async fn delete_expense(
        store: &dyn Store,
        owner_id: Uuid,
        expense_id: Uuid,
    ) -> Result<Expense, AppError> {
        Self::verify_ownership(store, expense_id, owner_id).await?;

        let expense = store
            .delete_expense(expense_id)
            .await
            .map_err(not_found_as_expense)?;

        info!(%expense_id, %owner_id, "Expense deleted");
        Ok(expense)
    }

    /// Get a single expense by ID
    pub async fn get_expense(
        store: &dyn Store,
        owner_id: Uuid,
        expense_id: Uuid,
    ) -> Result<Expense, AppError> {
        store
            .find_expense(expense_id, owner_id)
            .await?
            .ok_or(AppError::ExpenseNotFound)
    }

    /// List the owner's expenses with filters
    pub async fn list_expenses(
        store: &dyn Store,
        owner_id: Uuid,
        filters: &ExpenseFilters,
    ) -> Result<Vec<Expense>, AppError> {
        Ok(store.list_expenses(owner_id, filters).await?)
    }
}
