use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a request. Stored verbatim in `requests.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "Pending Dept HOD")]
    PendingDeptHod,
    #[serde(rename = "Pending Admin")]
    PendingAdmin,
    #[serde(rename = "Pending SS HOD")]
    PendingSsHod,
    #[serde(rename = "Pending SAC")]
    PendingSac,
    #[serde(rename = "Pending ED")]
    PendingEd,
    #[serde(rename = "Pending GMD")]
    PendingGmd,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Paid")]
    Paid,
    #[serde(rename = "Declined")]
    Declined,
    #[serde(rename = "Completed (Fulfilled)")]
    Fulfilled,
    #[serde(rename = "Completed (Resolved)")]
    Resolved,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 11] = [
        RequestStatus::PendingDeptHod,
        RequestStatus::PendingAdmin,
        RequestStatus::PendingSsHod,
        RequestStatus::PendingSac,
        RequestStatus::PendingEd,
        RequestStatus::PendingGmd,
        RequestStatus::Approved,
        RequestStatus::Paid,
        RequestStatus::Declined,
        RequestStatus::Fulfilled,
        RequestStatus::Resolved,
    ];

    /// Statuses that count as cost-reviewed for the savings report
    pub const REVIEWED: [RequestStatus; 4] = [
        RequestStatus::PendingEd,
        RequestStatus::PendingGmd,
        RequestStatus::Approved,
        RequestStatus::Paid,
    ];

    /// Statuses that count as committed spend for a department
    pub const SPENT: [RequestStatus; 2] = [RequestStatus::Approved, RequestStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingDeptHod => "Pending Dept HOD",
            RequestStatus::PendingAdmin => "Pending Admin",
            RequestStatus::PendingSsHod => "Pending SS HOD",
            RequestStatus::PendingSac => "Pending SAC",
            RequestStatus::PendingEd => "Pending ED",
            RequestStatus::PendingGmd => "Pending GMD",
            RequestStatus::Approved => "Approved",
            RequestStatus::Paid => "Paid",
            RequestStatus::Declined => "Declined",
            RequestStatus::Fulfilled => "Completed (Fulfilled)",
            RequestStatus::Resolved => "Completed (Resolved)",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Paid
                | RequestStatus::Declined
                | RequestStatus::Fulfilled
                | RequestStatus::Resolved
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown request status '{}'", s))
    }
}

/// Payment lifecycle, stored in `payments.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Ready for Accounts")]
    ReadyForAccounts,
    #[serde(rename = "Paid")]
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::ReadyForAccounts => "Ready for Accounts",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
