use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: String,
    pub req_id: String,
    pub amount: f64,
    pub status: String,
    pub vendor: String,
}

/// Payment joined with the request it settles, as Accounts sees it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentTask {
    pub payment_id: String,
    pub req_id: String,
    pub amount: f64,
    pub vendor: String,
    pub item: String,
    pub has_invoice: bool,
}
