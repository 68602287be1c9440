//! Routing rules for requests.
//!
//! Everything here is pure: the service layer loads a [`Snapshot`], asks
//! [`plan`] for the [`Transition`], then applies it with a status
//! compare-and-set so a stale snapshot can never overwrite a newer status.

use serde::Serialize;

use super::catalog::CUG_ISSUE;
use super::{Category, RequestStatus, Role, WorkflowError};

/// Where a freshly submitted request starts.
pub fn initial_status(category: Category, item: &str) -> RequestStatus {
    match category {
        Category::Stationary => RequestStatus::PendingAdmin,
        Category::Communication if item == CUG_ISSUE => RequestStatus::PendingAdmin,
        _ => RequestStatus::PendingDeptHod,
    }
}

/// The status a role works through in its task queue. Accounts works on
/// payments and the remaining roles have no request queue.
pub fn queue_status(role: Role) -> Option<RequestStatus> {
    match role {
        Role::DeptHod => Some(RequestStatus::PendingDeptHod),
        Role::Admin => Some(RequestStatus::PendingAdmin),
        Role::SsHod => Some(RequestStatus::PendingSsHod),
        Role::Sac => Some(RequestStatus::PendingSac),
        Role::Ed => Some(RequestStatus::PendingEd),
        Role::Gmd => Some(RequestStatus::PendingGmd),
        Role::Staff | Role::Accounts | Role::Superuser => None,
    }
}

/// Vendor quote attached by the Admin.
#[derive(Debug, Clone)]
pub struct Quote {
    pub vendor: String,
    pub cost: f64,
    pub invoice: Vec<u8>,
}

/// SAC cost review outcome.
#[derive(Debug, Clone)]
pub struct CostReview {
    pub amount: f64,
    pub note: String,
}

#[derive(Debug, Clone)]
pub enum Action {
    Approve,
    Decline,
    /// Hand stationary out of the store
    Issue,
    /// Close a CUG issue at no cost
    Resolve,
    Quote(Quote),
    Validate(CostReview),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Approve => "approve",
            Action::Decline => "decline",
            Action::Issue => "issue",
            Action::Resolve => "resolve",
            Action::Quote(_) => "quote",
            Action::Validate(_) => "validate",
        }
    }
}

/// Who is acting.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub role: Role,
    pub email: &'a str,
}

/// The parts of a stored request that routing depends on.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub category: Category,
    pub item: &'a str,
    pub status: RequestStatus,
    pub approver_email: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: RequestStatus,
    pub to: RequestStatus,
    /// GMD approval hands the request to Accounts
    pub creates_payment: bool,
}

impl Transition {
    fn new(from: RequestStatus, to: RequestStatus) -> Self {
        Self {
            from,
            to,
            creates_payment: false,
        }
    }
}

fn expect_status(snapshot: &Snapshot<'_>, expected: RequestStatus) -> Result<(), WorkflowError> {
    if snapshot.status != expected {
        return Err(WorkflowError::WrongStatus {
            expected,
            actual: snapshot.status,
        });
    }
    Ok(())
}

/// Decide the transition `actor` may apply to `snapshot` with `action`.
pub fn plan(actor: Actor<'_>, action: &Action, snapshot: &Snapshot<'_>) -> Result<Transition, WorkflowError> {
    use RequestStatus::*;

    let not_permitted = || WorkflowError::NotPermitted {
        role: actor.role,
        action: action.name(),
    };

    if snapshot.status.is_terminal() {
        return Err(WorkflowError::Closed(snapshot.status));
    }

    match (actor.role, action) {
        (Role::DeptHod, Action::Approve | Action::Decline) => {
            expect_status(snapshot, PendingDeptHod)?;
            if !snapshot.approver_email.eq_ignore_ascii_case(actor.email) {
                return Err(WorkflowError::NotAssignee);
            }
            let to = if matches!(action, Action::Approve) { PendingAdmin } else { Declined };
            Ok(Transition::new(PendingDeptHod, to))
        }

        (Role::Admin, Action::Issue) => {
            expect_status(snapshot, PendingAdmin)?;
            if snapshot.category != Category::Stationary {
                return Err(WorkflowError::NotApplicable(
                    "Only stationary requests are issued from the store".to_string(),
                ));
            }
            Ok(Transition::new(PendingAdmin, Fulfilled))
        }
        (Role::Admin, Action::Resolve) => {
            expect_status(snapshot, PendingAdmin)?;
            if snapshot.item != CUG_ISSUE {
                return Err(WorkflowError::NotApplicable(
                    "Only CUG issues can be resolved without cost".to_string(),
                ));
            }
            Ok(Transition::new(PendingAdmin, Resolved))
        }
        (Role::Admin, Action::Quote(quote)) => {
            expect_status(snapshot, PendingAdmin)?;
            if snapshot.category == Category::Stationary {
                return Err(WorkflowError::NotApplicable(
                    "Stationary requests are issued, not quoted".to_string(),
                ));
            }
            if quote.vendor.trim().is_empty() {
                return Err(WorkflowError::InvalidInput("Vendor is required".to_string()));
            }
            if !quote.cost.is_finite() || quote.cost <= 0.0 {
                return Err(WorkflowError::InvalidInput("Cost must be greater than zero".to_string()));
            }
            if quote.invoice.is_empty() {
                return Err(WorkflowError::InvalidInput("Invoice is required".to_string()));
            }
            Ok(Transition::new(PendingAdmin, PendingSsHod))
        }

        (Role::Sac, Action::Validate(review)) => {
            expect_status(snapshot, PendingSac)?;
            if !review.amount.is_finite() || review.amount < 0.0 {
                return Err(WorkflowError::InvalidInput(
                    "Negotiated cost must be zero or more".to_string(),
                ));
            }
            Ok(Transition::new(PendingSac, PendingEd))
        }

        (Role::SsHod | Role::Ed | Role::Gmd, Action::Approve | Action::Decline) => {
            let (from, next) = match actor.role {
                Role::SsHod => (PendingSsHod, PendingSac),
                Role::Ed => (PendingEd, PendingGmd),
                _ => (PendingGmd, Approved),
            };
            expect_status(snapshot, from)?;
            match action {
                Action::Approve => Ok(Transition {
                    from,
                    to: next,
                    creates_payment: actor.role == Role::Gmd,
                }),
                _ => Ok(Transition::new(from, Declined)),
            }
        }

        _ => Err(not_permitted()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOD_EMAIL: &str = "hod@co.com";

    fn snapshot(category: Category, item: &'static str, status: RequestStatus) -> Snapshot<'static> {
        Snapshot {
            category,
            item,
            status,
            approver_email: HOD_EMAIL,
        }
    }

    fn actor(role: Role) -> Actor<'static> {
        Actor { role, email: HOD_EMAIL }
    }

    fn quote() -> Action {
        Action::Quote(Quote {
            vendor: "Cool Air Ltd".to_string(),
            cost: 50_000.0,
            invoice: vec![1, 2, 3],
        })
    }

    #[test]
    fn initial_routing() {
        assert_eq!(initial_status(Category::Stationary, "Biro"), RequestStatus::PendingAdmin);
        assert_eq!(initial_status(Category::Communication, "CUG Issue"), RequestStatus::PendingAdmin);
        assert_eq!(
            initial_status(Category::Communication, "Airtime Request"),
            RequestStatus::PendingDeptHod
        );
        assert_eq!(initial_status(Category::Others, "Anything"), RequestStatus::PendingDeptHod);
    }

    #[test]
    fn full_approval_chain_for_a_repair() {
        let steps = [
            (Role::DeptHod, Action::Approve, RequestStatus::PendingDeptHod, RequestStatus::PendingAdmin),
            (Role::Admin, quote(), RequestStatus::PendingAdmin, RequestStatus::PendingSsHod),
            (Role::SsHod, Action::Approve, RequestStatus::PendingSsHod, RequestStatus::PendingSac),
            (
                Role::Sac,
                Action::Validate(CostReview { amount: 45_000.0, note: "negotiated".into() }),
                RequestStatus::PendingSac,
                RequestStatus::PendingEd,
            ),
            (Role::Ed, Action::Approve, RequestStatus::PendingEd, RequestStatus::PendingGmd),
            (Role::Gmd, Action::Approve, RequestStatus::PendingGmd, RequestStatus::Approved),
        ];

        for (role, action, from, to) in steps {
            let t = plan(actor(role), &action, &snapshot(Category::Facility, "AC Repair", from)).unwrap();
            assert_eq!(t.from, from);
            assert_eq!(t.to, to);
            assert_eq!(t.creates_payment, role == Role::Gmd);
        }
    }

    #[test]
    fn decline_from_each_approver() {
        for (role, status) in [
            (Role::DeptHod, RequestStatus::PendingDeptHod),
            (Role::SsHod, RequestStatus::PendingSsHod),
            (Role::Ed, RequestStatus::PendingEd),
            (Role::Gmd, RequestStatus::PendingGmd),
        ] {
            let t = plan(actor(role), &Action::Decline, &snapshot(Category::Facility, "Plumbing", status)).unwrap();
            assert_eq!(t.to, RequestStatus::Declined);
            assert!(!t.creates_payment);
        }
    }

    #[test]
    fn hod_must_be_the_assigned_approver() {
        let other = Actor {
            role: Role::DeptHod,
            email: "someone-else@co.com",
        };
        let err = plan(
            other,
            &Action::Approve,
            &snapshot(Category::Facility, "Plumbing", RequestStatus::PendingDeptHod),
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::NotAssignee);
    }

    #[test]
    fn admin_shortcuts_only_apply_to_their_categories() {
        let issue = plan(
            actor(Role::Admin),
            &Action::Issue,
            &snapshot(Category::Stationary, "Biro (2)", RequestStatus::PendingAdmin),
        )
        .unwrap();
        assert_eq!(issue.to, RequestStatus::Fulfilled);

        let resolve = plan(
            actor(Role::Admin),
            &Action::Resolve,
            &snapshot(Category::Communication, "CUG Issue", RequestStatus::PendingAdmin),
        )
        .unwrap();
        assert_eq!(resolve.to, RequestStatus::Resolved);

        assert!(matches!(
            plan(
                actor(Role::Admin),
                &Action::Issue,
                &snapshot(Category::Facility, "Plumbing", RequestStatus::PendingAdmin)
            ),
            Err(WorkflowError::NotApplicable(_))
        ));
        assert!(matches!(
            plan(
                actor(Role::Admin),
                &quote(),
                &snapshot(Category::Stationary, "Biro (1)", RequestStatus::PendingAdmin)
            ),
            Err(WorkflowError::NotApplicable(_))
        ));
    }

    #[test]
    fn quote_requires_vendor_cost_and_invoice() {
        let snap = snapshot(Category::Facility, "Generator", RequestStatus::PendingAdmin);
        let bad = [
            Quote { vendor: " ".into(), cost: 10.0, invoice: vec![1] },
            Quote { vendor: "V".into(), cost: 0.0, invoice: vec![1] },
            Quote { vendor: "V".into(), cost: f64::NAN, invoice: vec![1] },
            Quote { vendor: "V".into(), cost: 10.0, invoice: vec![] },
        ];
        for q in bad {
            assert!(matches!(
                plan(actor(Role::Admin), &Action::Quote(q), &snap),
                Err(WorkflowError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn wrong_status_and_wrong_role_are_rejected() {
        let err = plan(
            actor(Role::Ed),
            &Action::Approve,
            &snapshot(Category::Facility, "Plumbing", RequestStatus::PendingGmd),
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::WrongStatus {
                expected: RequestStatus::PendingEd,
                actual: RequestStatus::PendingGmd,
            }
        );

        for role in [Role::Staff, Role::Accounts, Role::Superuser, Role::Sac] {
            assert!(matches!(
                plan(
                    actor(role),
                    &Action::Approve,
                    &snapshot(Category::Facility, "Plumbing", RequestStatus::PendingSac)
                ),
                Err(WorkflowError::NotPermitted { .. })
            ));
        }
    }

    #[test]
    fn sac_rejects_negative_and_non_finite_amounts() {
        let snap = snapshot(Category::Facility, "Generator", RequestStatus::PendingSac);
        for amount in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let review = Action::Validate(CostReview { amount, note: String::new() });
            assert!(
                matches!(plan(actor(Role::Sac), &review, &snap), Err(WorkflowError::InvalidInput(_))),
                "amount {} should be rejected",
                amount
            );
        }

        let free = Action::Validate(CostReview { amount: 0.0, note: "donated".into() });
        assert_eq!(plan(actor(Role::Sac), &free, &snap).unwrap().to, RequestStatus::PendingEd);
    }

    #[test]
    fn closed_requests_never_move() {
        for status in RequestStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for role in [Role::DeptHod, Role::Admin, Role::SsHod, Role::Ed, Role::Gmd] {
                let err = plan(actor(role), &Action::Approve, &snapshot(Category::Facility, "Plumbing", status))
                    .unwrap_err();
                assert_eq!(err, WorkflowError::Closed(status));
            }
        }
    }

    #[test]
    fn every_queue_status_is_pending() {
        for role in Role::ALL {
            if let Some(status) = queue_status(role) {
                assert!(status.as_str().starts_with("Pending"));
            }
        }
        assert_eq!(queue_status(Role::Accounts), None);
    }
}
