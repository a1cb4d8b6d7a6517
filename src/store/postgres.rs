use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    ExpenseChanges, NewExpense, NewUser, Store, StoreError, UniqueKey, UserChanges,
};
use crate::auth::models::User;
use crate::expense::models::{Expense, ExpenseFilters, ExpenseOrderBy};

// Constraint names from migrations/0001_init.sql
const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";
const EXPENSES_TITLE_CONSTRAINT: &str = "expenses_owner_id_title_key";

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const EXPENSE_COLUMNS: &str = "id, owner_id, title, description, amount, date, created_at";

/// ORDER BY key for a listing. Text columns compare bytewise, the same way
/// `MemoryStore` orders `String`s, whatever the database collation is.
fn sort_key(order_by: ExpenseOrderBy) -> String {
    match order_by.column() {
        column @ ("title" | "description" | "date") => format!("{column} COLLATE \"C\""),
        column => column.to_string(),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => {
                if !db_err.is_unique_violation() {
                    return StoreError::Backend(db_err.to_string());
                }
                match db_err.constraint() {
                    Some(USERS_EMAIL_CONSTRAINT) => {
                        StoreError::UniqueViolation(UniqueKey::UserEmail)
                    }
                    Some(EXPENSES_TITLE_CONSTRAINT) => {
                        StoreError::UniqueViolation(UniqueKey::ExpenseTitle)
                    }
                    _ => StoreError::Backend(db_err.to_string()),
                }
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// PostgreSQL implementation of [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn email_in_use(&self, email: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<User, StoreError> {
        // expenses.owner_id is ON DELETE CASCADE
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn expense_owned_by(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM expenses WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn title_in_use(
        &self,
        owner_id: Uuid,
        title: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM expenses
                WHERE owner_id = $1
                  AND title = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_expense(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Expense>, StoreError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(expense)
    }

    async fn list_expenses(
        &self,
        owner_id: Uuid,
        filters: &ExpenseFilters,
    ) -> Result<Vec<Expense>, StoreError> {
        // Column and direction come from a closed enum, never from input.
        // strpos keeps the title match literal (no LIKE wildcards).
        let sql = format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE owner_id = $1
              AND ($2::text IS NULL OR strpos(title, $2) > 0)
            ORDER BY {key} {direction}, created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            key = sort_key(filters.order_by),
            direction = filters.order_by.direction(),
        );

        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .bind(owner_id)
            .bind(&filters.query)
            .bind(filters.limit)
            .bind(filters.skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(expenses)
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (owner_id, title, description, amount, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(expense.owner_id)
        .bind(&expense.title)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    async fn update_expense(
        &self,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Expense, StoreError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                amount = COALESCE($4, amount),
                date = COALESCE($5, date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.amount)
        .bind(&changes.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    async fn delete_expense(&self, id: Uuid) -> Result<Expense, StoreError> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "DELETE FROM expenses WHERE id = $1 RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }
}
