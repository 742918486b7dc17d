use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission tiers known to the backend. Roles are stored by name, so
/// arbitrary extra roles may exist in the `roles` table as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Renter,
    User,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Renter => "renter",
            RoleName::User => "user",
        }
    }

    /// Lower value means more privileges.
    pub fn rank(&self) -> u8 {
        match self {
            RoleName::Admin => 0,
            RoleName::Renter => 1,
            RoleName::User => 2,
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleName::Admin),
            "renter" => Ok(RoleName::Renter),
            "user" => Ok(RoleName::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Catalog ordering. Anything other than the two price orders falls back to
/// alphabetical by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemSort {
    PriceDesc,
    PriceAsc,
    #[default]
    Name,
}

impl ItemSort {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("priceDesc") => ItemSort::PriceDesc,
            Some("priceAsc") => ItemSort::PriceAsc,
            _ => ItemSort::Name,
        }
    }
}
