use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Columns selected for [`Request`]; the invoice bytes are replaced by a flag.
pub const REQUEST_COLUMNS: &str = "id, user_key, requester_name, department, approver_email, category, item, \
     status, amount, initial_cost, vendor, sac_note, date, invoice_img IS NOT NULL AS has_invoice";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub id: String,
    pub user_key: String,
    pub requester_name: String,
    pub department: String,
    pub approver_email: String,
    pub category: String,
    pub item: String,
    pub status: String,
    pub amount: f64,
    pub initial_cost: f64,
    pub vendor: String,
    pub sac_note: String,
    pub date: String,
    pub has_invoice: bool,
}

/// Row of a requester's own history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestHistory {
    pub id: String,
    pub date: String,
    pub category: String,
    pub item: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavingsRow {
    pub id: String,
    pub date: String,
    pub item: String,
    pub vendor: String,
    pub initial_cost: f64,
    pub amount: f64,
    pub sac_note: String,
}

impl SavingsRow {
    pub fn savings(&self) -> f64 {
        self.initial_cost - self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpendRow {
    pub id: String,
    pub date: String,
    pub item: String,
    pub vendor: String,
    pub amount: f64,
    pub status: String,
}
