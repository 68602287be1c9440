use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal roles. The string forms are what the `users.role` column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Staff")]
    Staff,
    #[serde(rename = "Dept HOD")]
    DeptHod,
    #[serde(rename = "Admin")]
    Admin,
    #[serde(rename = "SS HOD")]
    SsHod,
    #[serde(rename = "SAC")]
    Sac,
    #[serde(rename = "ED")]
    Ed,
    #[serde(rename = "GMD")]
    Gmd,
    #[serde(rename = "Accounts")]
    Accounts,
    #[serde(rename = "Superuser")]
    Superuser,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Staff,
        Role::DeptHod,
        Role::Admin,
        Role::SsHod,
        Role::Sac,
        Role::Ed,
        Role::Gmd,
        Role::Accounts,
        Role::Superuser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "Staff",
            Role::DeptHod => "Dept HOD",
            Role::Admin => "Admin",
            Role::SsHod => "SS HOD",
            Role::Sac => "SAC",
            Role::Ed => "ED",
            Role::Gmd => "GMD",
            Role::Accounts => "Accounts",
            Role::Superuser => "Superuser",
        }
    }

    /// Roles a superuser may hand out. Superuser accounts are only seeded.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Role::Superuser)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}
