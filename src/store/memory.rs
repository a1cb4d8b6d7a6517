use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ExpenseChanges, NewExpense, NewUser, Store, StoreError, UniqueKey, UserChanges,
};
use crate::auth::models::User;
use crate::expense::models::{Expense, ExpenseFilters, ExpenseOrderBy};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order is creation order
    expenses: Vec<Expense>,
}

/// In-process [`Store`] used when no database is configured and by the
/// test suite. Uniqueness checks and writes happen under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Expense, b: &Expense, order_by: ExpenseOrderBy) -> Ordering {
    let ordering = match order_by {
        ExpenseOrderBy::IdAsc | ExpenseOrderBy::IdDesc => a.id.cmp(&b.id),
        ExpenseOrderBy::TitleAsc | ExpenseOrderBy::TitleDesc => a.title.cmp(&b.title),
        ExpenseOrderBy::DescriptionAsc | ExpenseOrderBy::DescriptionDesc => {
            a.description.cmp(&b.description)
        }
        ExpenseOrderBy::AmountAsc | ExpenseOrderBy::AmountDesc => a.amount.total_cmp(&b.amount),
        ExpenseOrderBy::DateAsc | ExpenseOrderBy::DateDesc => a.date.cmp(&b.date),
        ExpenseOrderBy::CreatedAtAsc | ExpenseOrderBy::CreatedAtDesc => {
            a.created_at.cmp(&b.created_at)
        }
    };

    if order_by.is_descending() {
        ordering.reverse()
    } else {
        ordering
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|u| u.id == id))
    }

    async fn email_in_use(&self, email: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation(UniqueKey::UserEmail));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(StoreError::UniqueViolation(UniqueKey::UserEmail));
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let position = tables
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;

        let user = tables.users.remove(position);
        tables.expenses.retain(|e| e.owner_id != id);
        Ok(user)
    }

    async fn expense_owned_by(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .expenses
            .iter()
            .any(|e| e.id == id && e.owner_id == owner_id))
    }

    async fn title_in_use(
        &self,
        owner_id: Uuid,
        title: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .expenses
            .iter()
            .any(|e| e.owner_id == owner_id && e.title == title && Some(e.id) != except))
    }

    async fn find_expense(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Expense>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .expenses
            .iter()
            .find(|e| e.id == id && e.owner_id == owner_id)
            .cloned())
    }

    async fn list_expenses(
        &self,
        owner_id: Uuid,
        filters: &ExpenseFilters,
    ) -> Result<Vec<Expense>, StoreError> {
        let tables = self.tables.read().await;
        let mut expenses: Vec<Expense> = tables
            .expenses
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .filter(|e| match &filters.query {
                Some(query) => e.title.contains(query.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        // Stable sort, so ties keep creation order
        expenses.sort_by(|a, b| compare(a, b, filters.order_by));

        let skip = usize::try_from(filters.skip).unwrap_or(0);
        let take = match filters.limit {
            Some(limit) => usize::try_from(limit).unwrap_or(0),
            None => usize::MAX,
        };
        Ok(expenses.into_iter().skip(skip).take(take).collect())
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == expense.owner_id) {
            return Err(StoreError::Backend(format!(
                "owner {} does not exist",
                expense.owner_id
            )));
        }
        if tables
            .expenses
            .iter()
            .any(|e| e.owner_id == expense.owner_id && e.title == expense.title)
        {
            return Err(StoreError::UniqueViolation(UniqueKey::ExpenseTitle));
        }

        let expense = Expense {
            id: Uuid::new_v4(),
            owner_id: expense.owner_id,
            title: expense.title,
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
            created_at: Utc::now(),
        };
        tables.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn update_expense(
        &self,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Expense, StoreError> {
        let mut tables = self.tables.write().await;
        let owner_id = tables
            .expenses
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.owner_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = &changes.title {
            if tables
                .expenses
                .iter()
                .any(|e| e.owner_id == owner_id && &e.title == title && e.id != id)
            {
                return Err(StoreError::UniqueViolation(UniqueKey::ExpenseTitle));
            }
        }

        let expense = tables
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            expense.title = title;
        }
        if let Some(description) = changes.description {
            expense.description = description;
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        Ok(expense.clone())
    }

    async fn delete_expense(&self, id: Uuid) -> Result<Expense, StoreError> {
        let mut tables = self.tables.write().await;
        let position = tables
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(tables.expenses.remove(position))
    }
}
