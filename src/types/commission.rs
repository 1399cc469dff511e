//! Task reward types

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Source of a task commission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerKind {
    /// A real affiliate partner link
    Affiliate,

    /// A simulated placeholder partner
    Simulated,
}

impl fmt::Display for PartnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartnerKind::Affiliate => write!(f, "affiliate"),
            PartnerKind::Simulated => write!(f, "simulated"),
        }
    }
}

impl FromStr for PartnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "affiliate" => Ok(PartnerKind::Affiliate),
            "simulated" => Ok(PartnerKind::Simulated),
            other => Err(format!("unknown partner kind '{}'", other)),
        }
    }
}

/// Amount credited for one completed task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commission {
    pub partner: PartnerKind,
    pub amount: Decimal,
}

impl Commission {
    pub fn new(partner: PartnerKind, amount: Decimal) -> Self {
        Commission { partner, amount }
    }
}
