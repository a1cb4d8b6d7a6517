use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for expenses. `id` and `owner` are resolved in
/// `graphql::types`.
#[derive(Debug, Clone, FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Expense {
    #[graphql(skip)]
    pub id: Uuid,
    #[graphql(skip)]
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub amount: f64,
    /// Calendar date exactly as submitted (trimmed)
    pub date: String,
    #[graphql(skip)]
    pub created_at: DateTime<Utc>,
}

/// Arguments of `createExpense`
#[derive(Debug, InputObject)]
#[graphql(name = "createExpenseInput")]
pub struct CreateExpenseInput {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub date: String,
}

/// Arguments of `updateExpense`; absent fields are left unchanged
#[derive(Debug, Default, InputObject)]
#[graphql(name = "updateExpenseInput")]
pub struct UpdateExpenseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
}

/// Sort order for `expenses`
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[graphql(name = "ExpenseOrderByInput")]
pub enum ExpenseOrderBy {
    #[graphql(name = "id_ASC")]
    IdAsc,
    #[graphql(name = "id_DESC")]
    IdDesc,
    #[graphql(name = "title_ASC")]
    TitleAsc,
    #[graphql(name = "title_DESC")]
    TitleDesc,
    #[graphql(name = "description_ASC")]
    DescriptionAsc,
    #[graphql(name = "description_DESC")]
    DescriptionDesc,
    #[graphql(name = "amount_ASC")]
    AmountAsc,
    #[graphql(name = "amount_DESC")]
    AmountDesc,
    #[graphql(name = "date_ASC")]
    DateAsc,
    #[graphql(name = "date_DESC")]
    DateDesc,
    /// Creation order, the default
    #[default]
    #[graphql(name = "createdAt_ASC")]
    CreatedAtAsc,
    #[graphql(name = "createdAt_DESC")]
    CreatedAtDesc,
}

impl ExpenseOrderBy {
    /// Column name in the `expenses` table
    pub fn column(&self) -> &'static str {
        match self {
            ExpenseOrderBy::IdAsc | ExpenseOrderBy::IdDesc => "id",
            ExpenseOrderBy::TitleAsc | ExpenseOrderBy::TitleDesc => "title",
            ExpenseOrderBy::DescriptionAsc | ExpenseOrderBy::DescriptionDesc => "description",
            ExpenseOrderBy::AmountAsc | ExpenseOrderBy::AmountDesc => "amount",
            ExpenseOrderBy::DateAsc | ExpenseOrderBy::DateDesc => "date",
            ExpenseOrderBy::CreatedAtAsc | ExpenseOrderBy::CreatedAtDesc => "created_at",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(
            self,
            ExpenseOrderBy::IdDesc
                | ExpenseOrderBy::TitleDesc
                | ExpenseOrderBy::DescriptionDesc
                | ExpenseOrderBy::AmountDesc
                | ExpenseOrderBy::DateDesc
                | ExpenseOrderBy::CreatedAtDesc
        )
    }

    pub fn direction(&self) -> &'static str {
        if self.is_descending() {
            "DESC"
        } else {
            "ASC"
        }
    }
}

/// Listing options for `expenses`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilters {
    /// Case-sensitive substring the title must contain
    pub query: Option<String>,
    pub skip: i64,
    /// `None` returns every remaining row
    pub limit: Option<i64>,
    pub order_by: ExpenseOrderBy,
}

impl ExpenseFilters {
    /// Builds filters from raw query arguments. An empty search string
    /// filters nothing; negative offsets and limits clamp to zero.
    pub fn new(
        query: Option<String>,
        skip: Option<i32>,
        limit: Option<i32>,
        order_by: Option<ExpenseOrderBy>,
    ) -> Self {
        Self {
            query: query.filter(|q| !q.is_empty()),
            skip: i64::from(skip.unwrap_or(0).max(0)),
            limit: limit.map(|l| i64::from(l.max(0))),
            order_by: order_by.unwrap_or_default(),
        }
    }
}
