use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::models::{Payment, PaymentTask};
use crate::database::Repository;
use crate::services::{AuditService, ServiceError};
use crate::workflow::{PaymentStatus, RequestStatus};

pub struct PaymentService {
    pool: SqlitePool,
    payments: Repository<Payment>,
}

impl PaymentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            payments: Repository::new("payments", "payment_id, req_id, amount, status, vendor", pool.clone()),
            pool,
        }
    }

    /// Payments approved by the GMD and waiting for Accounts
    pub async fn ready_payments(&self) -> Result<Vec<PaymentTask>, ServiceError> {
        let rows = sqlx::query_as::<_, PaymentTask>(
            "SELECT p.payment_id, p.req_id, p.amount, p.vendor, r.item, r.invoice_img IS NOT NULL AS has_invoice
             FROM payments p JOIN requests r ON p.req_id = r.id
             WHERE p.status = ?
             ORDER BY p.rowid",
        )
        .bind(PaymentStatus::ReadyForAccounts.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Settle a payment and close the request it pays for
    pub async fn mark_paid(&self, paid_by: &str, payment_id: &str) -> Result<Payment, ServiceError> {
        let payment = self.payments.select_404("payment_id", payment_id).await?;

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE payments SET status = ? WHERE payment_id = ? AND status = ?")
            .bind(PaymentStatus::Paid.as_str())
            .bind(payment_id)
            .bind(PaymentStatus::ReadyForAccounts.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(ServiceError::Conflict(format!("Payment '{}' is already {}", payment_id, payment.status)));
        }

        let closed = sqlx::query("UPDATE requests SET status = ? WHERE id = ? AND status = ?")
            .bind(RequestStatus::Paid.as_str())
            .bind(&payment.req_id)
            .bind(RequestStatus::Approved.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if closed == 0 {
            warn!("Payment {} points at request {} which is not Approved", payment_id, payment.req_id);
            return Err(ServiceError::Conflict(format!(
                "Request '{}' is no longer {}",
                payment.req_id,
                RequestStatus::Approved
            )));
        }

        AuditService::record(
            &mut *tx,
            paid_by,
            "Payment",
            &format!("Paid {:.2} to {} for #{}", payment.amount, payment.vendor, payment.req_id),
        )
        .await?;
        tx.commit().await?;

        info!("Payment {} for request {} marked paid", payment_id, payment.req_id);
        Ok(self.payments.select_404("payment_id", payment_id).await?)
    }
}
