use serde::{Deserialize, Serialize};

use super::{initial_status, Category, RequestStatus, WorkflowError};

/// Vendor placeholder for stationary, which is issued from the internal store
pub const STORE_VENDOR: &str = "Store";
/// Vendor placeholder until the Admin attaches a quote
pub const PENDING_VENDOR: &str = "Pending";

fn default_qty() -> u32 {
    1
}

/// One line of a staff submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub category: Category,
    pub item: String,
    #[serde(default = "default_qty")]
    pub qty: u32,
}

/// A request row to be inserted, before ids and requester details are attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRequest {
    pub category: Category,
    pub item: String,
    pub status: RequestStatus,
    pub vendor: &'static str,
}

/// Turn a cart into request rows.
///
/// Stationary lines collapse into a single store request listing every item
/// with its quantity. Every other line becomes its own request, routed by
/// [`initial_status`].
pub fn split_cart(cart: &[CartItem]) -> Result<Vec<NewRequest>, WorkflowError> {
    if cart.is_empty() {
        return Err(WorkflowError::EmptyCart);
    }

    let mut stationary = Vec::new();
    let mut others = Vec::new();

    for line in cart {
        let item = line.category.validate_item(&line.item)?;
        if line.qty == 0 {
            return Err(WorkflowError::InvalidQuantity(item));
        }
        match line.category {
            Category::Stationary => stationary.push(format!("{} ({})", item, line.qty)),
            category => others.push(NewRequest {
                category,
                status: initial_status(category, &item),
                item,
                vendor: PENDING_VENDOR,
            }),
        }
    }

    let mut requests = Vec::with_capacity(others.len() + 1);
    if !stationary.is_empty() {
        requests.push(NewRequest {
            category: Category::Stationary,
            item: stationary.join(", "),
            status: RequestStatus::PendingAdmin,
            vendor: STORE_VENDOR,
        });
    }
    requests.extend(others);
    Ok(requests)
}
