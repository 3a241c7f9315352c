//! Promotion validity window

use jiff::Timestamp;

use crate::promotions::PromotionError;

/// Half-open `[starts_at, ends_at)` interval in which a promotion may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    starts_at: Timestamp,
    ends_at: Timestamp,
}

impl ValidityWindow {
    /// Create a window.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidWindow`] unless `starts_at < ends_at`.
    pub fn new(starts_at: Timestamp, ends_at: Timestamp) -> Result<Self, PromotionError> {
        if starts_at >= ends_at {
            return Err(PromotionError::InvalidWindow);
        }

        Ok(Self { starts_at, ends_at })
    }

    /// Window start (inclusive)
    pub const fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    /// Window end (exclusive)
    pub const fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.starts_at <= at && at < self.ends_at
    }

    /// Whether the window closed strictly before `at`.
    pub fn has_ended(&self, at: Timestamp) -> bool {
        self.ends_at < at
    }

    /// Whether `at` is before the window opens.
    pub fn is_upcoming(&self, at: Timestamp) -> bool {
        at < self.starts_at
    }
}
