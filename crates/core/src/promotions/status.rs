//! Promotion status
//!
//! The stored status is a cache. Decisions go through
//! [`Promotion::derive_status`](crate::promotions::Promotion::derive_status);
//! writes go through [`status_on_write`]; the lifecycle sweep goes through
//! [`Promotion::sweep_transition`](crate::promotions::Promotion::sweep_transition).

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::promotions::window::ValidityWindow;

/// Promotion status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionStatus {
    /// Live, subject to the date window and usage limit.
    Active,

    /// Manually disabled or retired after reaching its usage limit.
    #[default]
    Inactive,

    /// Past its end date.
    Expired,
}

impl PromotionStatus {
    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }

    /// Parse the storage representation, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Status to persist when a promotion is created or edited.
///
/// A requested `Inactive` is a manual override and is kept. Otherwise the
/// status follows the window: `Expired` once it has ended, `Active` while it is
/// open, and the requested status before it opens.
pub fn status_on_write(
    requested: PromotionStatus,
    window: &ValidityWindow,
    now: Timestamp,
) -> PromotionStatus {
    if requested == PromotionStatus::Inactive {
        return PromotionStatus::Inactive;
    }

    if window.has_ended(now) {
        PromotionStatus::Expired
    } else if window.contains(now) {
        PromotionStatus::Active
    } else {
        requested
    }
}
