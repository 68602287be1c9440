use chrono::Local;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::models::{Request, RequestHistory, User, REQUEST_COLUMNS};
use crate::database::{DatabaseError, Repository};
use crate::services::{short_id, AuditService, ServiceError};
use crate::workflow::{
    plan, queue_status, split_cart, Action, Actor, CartItem, Category, PaymentStatus, RequestStatus, Role,
    Snapshot, Transition,
};

/// Result of applying an approval action
#[derive(Debug, Serialize)]
pub struct ActionOutcome {
    pub request: Request,
    pub transition: Transition,
    /// Set when GMD approval queued a payment for Accounts
    pub payment_id: Option<String>,
}

pub struct RequestService {
    pool: SqlitePool,
    requests: Repository<Request>,
    history: Repository<RequestHistory>,
}

pub(crate) fn role_of(user: &User) -> Result<Role, ServiceError> {
    user.role()
        .ok_or_else(|| ServiceError::Forbidden(format!("Unknown role '{}'", user.role)))
}

fn corrupt(field: &str, err: String) -> ServiceError {
    ServiceError::Database(DatabaseError::QueryError(format!("stored {} is invalid: {}", field, err)))
}

impl RequestService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            requests: Repository::new("requests", REQUEST_COLUMNS, pool.clone()),
            history: Repository::new("requests", "id, date, category, item, status", pool.clone()),
            pool,
        }
    }

    /// Record a staff member's cart as one or more requests.
    pub async fn submit_cart(&self, user: &User, cart: &[CartItem]) -> Result<Vec<Request>, ServiceError> {
        if role_of(user)? != Role::Staff {
            return Err(ServiceError::Forbidden("Only staff submit requests".to_string()));
        }
        let new_requests = split_cart(cart)?;
        let date = Local::now().date_naive().format("%Y-%m-%d").to_string();

        let mut ids = Vec::with_capacity(new_requests.len());
        let mut tx = self.pool.begin().await?;
        for new_request in &new_requests {
            let id = short_id();
            sqlx::query(
                "INSERT INTO requests (id, user_key, requester_name, department, approver_email, category, item,
                                       status, amount, initial_cost, vendor, sac_note, date)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?, '', ?)",
            )
            .bind(&id)
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.dept)
            .bind(&user.hod_email)
            .bind(new_request.category.as_str())
            .bind(&new_request.item)
            .bind(new_request.status.as_str())
            .bind(new_request.vendor)
            .bind(&date)
            .execute(&mut *tx)
            .await?;

            AuditService::record(
                &mut *tx,
                &user.username,
                "Request",
                &format!("{} #{}", new_request.category, id),
            )
            .await?;
            ids.push(id);
        }
        tx.commit().await?;

        info!("User '{}' submitted {} request(s)", user.username, ids.len());

        let mut created = Vec::with_capacity(ids.len());
        for id in &ids {
            created.push(self.requests.select_404("id", id).await?);
        }
        Ok(created)
    }

    pub async fn history(&self, user: &User) -> Result<Vec<RequestHistory>, ServiceError> {
        Ok(self.history.select_by("user_key", &user.username).await?)
    }

    /// Every request, for the Admin analysis view
    pub async fn list_all(&self) -> Result<Vec<Request>, ServiceError> {
        Ok(self.requests.select_all("date").await?)
    }

    /// Requests waiting on `user`. Department heads only see requests that
    /// name them as approver.
    pub async fn queue(&self, user: &User) -> Result<Vec<Request>, ServiceError> {
        let role = role_of(user)?;
        let status = queue_status(role)
            .ok_or_else(|| ServiceError::Forbidden(format!("{} has no approval queue", role)))?;

        let requests = if role == Role::DeptHod {
            let sql = format!(
                "SELECT {} FROM requests WHERE status = ? AND approver_email = ? COLLATE NOCASE ORDER BY rowid",
                REQUEST_COLUMNS
            );
            sqlx::query_as::<_, Request>(&sql)
                .bind(status.as_str())
                .bind(&user.email)
                .fetch_all(&self.pool)
                .await?
        } else {
            self.requests.select_by("status", status.as_str()).await?
        };
        Ok(requests)
    }

    /// Load a request. Staff can only see their own.
    pub async fn get(&self, user: &User, id: &str) -> Result<Request, ServiceError> {
        let request = self.requests.select_404("id", id).await?;
        if role_of(user)? == Role::Staff && request.user_key != user.username {
            return Err(ServiceError::NotFound(format!("requests '{}' not found", id)));
        }
        Ok(request)
    }

    pub async fn invoice(&self, user: &User, id: &str) -> Result<Vec<u8>, ServiceError> {
        self.get(user, id).await?;
        let (invoice,): (Option<Vec<u8>>,) = sqlx::query_as("SELECT invoice_img FROM requests WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        invoice.ok_or_else(|| ServiceError::NotFound(format!("No invoice attached to request '{}'", id)))
    }

    /// Apply `action` as `user`.
    ///
    /// The status update is conditioned on the status the plan was made from,
    /// so two approvers acting on the same request cannot both succeed.
    pub async fn act(&self, user: &User, id: &str, action: Action) -> Result<ActionOutcome, ServiceError> {
        let request = self.requests.select_404("id", id).await?;
        self.apply(user, &request, action).await
    }

    /// Plan against `request` as loaded, then write only if the stored
    /// status still matches it.
    async fn apply(&self, user: &User, request: &Request, action: Action) -> Result<ActionOutcome, ServiceError> {
        let id = request.id.as_str();
        let role = role_of(user)?;

        let status: RequestStatus = request.status.parse().map_err(|e| corrupt("status", e))?;
        let category: Category = request.category.parse().map_err(|e| corrupt("category", e))?;
        let snapshot = Snapshot {
            category,
            item: &request.item,
            status,
            approver_email: &request.approver_email,
        };
        let actor = Actor {
            role,
            email: &user.email,
        };

        let transition = plan(actor, &action, &snapshot).map_err(|err| {
            warn!("'{}' could not {} request {}: {}", user.username, action.name(), id, err);
            err
        })?;

        let mut tx = self.pool.begin().await?;

        let query = match &action {
            Action::Quote(quote) => sqlx::query(
                "UPDATE requests SET vendor = ?, amount = ?, initial_cost = ?, invoice_img = ?, status = ?
                 WHERE id = ? AND status = ?",
            )
            .bind(quote.vendor.trim())
            .bind(quote.cost)
            .bind(quote.cost)
            .bind(quote.invoice.as_slice()),
            Action::Validate(review) => {
                sqlx::query("UPDATE requests SET amount = ?, sac_note = ?, status = ? WHERE id = ? AND status = ?")
                    .bind(review.amount)
                    .bind(review.note.trim())
            }
            _ => sqlx::query("UPDATE requests SET status = ? WHERE id = ? AND status = ?"),
        };
        let updated = query
            .bind(transition.to.as_str())
            .bind(id)
            .bind(transition.from.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(ServiceError::Conflict(format!(
                "Request '{}' changed while it was being processed",
                id
            )));
        }

        let payment_id = if transition.creates_payment {
            let payment_id = short_id();
            sqlx::query("INSERT INTO payments (payment_id, req_id, amount, status, vendor) VALUES (?, ?, ?, ?, ?)")
                .bind(&payment_id)
                .bind(id)
                .bind(request.amount)
                .bind(PaymentStatus::ReadyForAccounts.as_str())
                .bind(&request.vendor)
                .execute(&mut *tx)
                .await?;
            Some(payment_id)
        } else {
            None
        };

        AuditService::record(
            &mut *tx,
            &user.username,
            role.as_str(),
            &format!("{} #{}: {} -> {}", action.name(), id, transition.from, transition.to),
        )
        .await?;
        tx.commit().await?;

        info!(
            "Request {} moved {} -> {} by '{}' ({})",
            id, transition.from, transition.to, user.username, role
        );

        Ok(ActionOutcome {
            request: self.requests.select_404("id", id).await?,
            transition,
            payment_id,
        })
    }
}
