//! Persistence interface consumed by the services.
//!
//! Services only ever talk to a `dyn Store`. Existence predicates answer
//! without returning the record; writes return the stored row. Uniqueness
//! of `users.email` and of `(owner, title)` for expenses is enforced by the
//! implementation as well, and surfaces as [`StoreError::UniqueViolation`].

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::auth::models::User;
use crate::expense::models::{Expense, ExpenseFilters};

/// Which uniqueness rule a write collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    UserEmail,
    ExpenseTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    UniqueViolation(UniqueKey),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Record not found"),
            StoreError::UniqueViolation(key) => write!(f, "Unique constraint violated: {key:?}"),
            StoreError::Backend(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub date: String,
}

/// Partial update; `None` keeps the stored value. The owner is not part of
/// it: expenses never change hands.
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Connectivity probe for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Whether any account other than `except` uses `email`
    async fn email_in_use(&self, email: &str, except: Option<Uuid>) -> Result<bool, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError>;

    /// Deletes the user together with every expense it owns
    async fn delete_user(&self, id: Uuid) -> Result<User, StoreError>;

    async fn expense_owned_by(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError>;

    /// Whether `owner_id` has an expense titled `title`, ignoring `except`
    async fn title_in_use(
        &self,
        owner_id: Uuid,
        title: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError>;

    async fn find_expense(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Expense>, StoreError>;

    async fn list_expenses(
        &self,
        owner_id: Uuid,
        filters: &ExpenseFilters,
    ) -> Result<Vec<Expense>, StoreError>;

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError>;

    async fn update_expense(&self, id: Uuid, changes: ExpenseChanges)
        -> Result<Expense, StoreError>;

    async fn delete_expense(&self, id: Uuid) -> Result<Expense, StoreError>;
}
