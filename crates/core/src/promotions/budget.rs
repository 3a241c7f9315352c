//! Promotion Usage Budget

/// Redemption budget for a promotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageBudget {
    /// Maximum number of redemptions; `None` means unlimited.
    pub limit: Option<u64>,

    /// Redemptions recorded so far.
    pub used: u64,
}

impl UsageBudget {
    /// Create a budget with no redemption limit
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            limit: None,
            used: 0,
        }
    }

    /// Create an unused budget capped at `limit` redemptions
    #[must_use]
    pub const fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            used: 0,
        }
    }

    /// Return the same budget with `used` redemptions already recorded
    #[must_use]
    pub const fn used(self, used: u64) -> Self {
        Self { used, ..self }
    }

    /// Whether the limit has been reached.
    pub const fn is_exhausted(&self) -> bool {
        match self.limit {
            Some(limit) => self.used >= limit,
            None => false,
        }
    }

    /// Redemptions left before the limit is reached, `None` when unlimited.
    pub const fn remaining(&self) -> Option<u64> {
        match self.limit {
            Some(limit) => Some(limit.saturating_sub(self.used)),
            None => None,
        }
    }
}
