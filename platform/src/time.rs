// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{
    fmt::Debug,
    ops::{Add, Sub},
    time::Duration,
};

#[allow(unused_imports)] // used in docs
use crate::Platform;

/// Analogous to the standard library `Instant` type, representing a point in
/// time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant(Duration);

impl Debug for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if *self >= Instant::reference() {
            f.debug_tuple("Instant")
                .field(&(self.0 - Instant::reference().0))
                .field(&"after reference point")
                .finish()
        } else {
            f.debug_tuple("Instant")
                .field(&(Instant::reference().0 - self.0))
                .field(&"before reference point")
                .finish()
        }
    }
}

impl Instant {
    /// An arbitrary point in time to use as a starting point for other
    /// instances of [`Instant`].
    ///
    /// Generally intended to be used once in the platform implementation. Use
    /// [`Platform::now`] to get the current point in time.
    pub const fn reference() -> Instant {
        Instant(Duration::from_secs(u64::MAX / 2))
    }

    /// Returns the duration from `past_instant` to `self`.
    ///
    /// Returns None if `past_instant` is after `self`.
    pub fn duration_since(self, past_instant: Instant) -> Option<Duration> {
        self.0.checked_sub(past_instant.0)
    }

    /// Returns the duration from `past_instant` to `self`, or zero if
    /// `past_instant` is after `self`.
    pub fn saturating_duration_since(self, past_instant: Instant) -> Duration {
        self.duration_since(past_instant).unwrap_or(Duration::ZERO)
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;
    fn sub(self, rhs: Duration) -> Self::Output {
        Instant(self.0 - rhs)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;
    fn add(self, rhs: Duration) -> Self::Output {
        Instant(self.0 + rhs)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::Instant;

    #[test]
    fn duration_since_is_none_for_future_instants() {
        let start = Instant::reference();
        let later = start + Duration::from_millis(1500);
        assert_eq!(Some(Duration::from_millis(1500)), later.duration_since(start));
        assert_eq!(None, start.duration_since(later));
        assert_eq!(Duration::ZERO, start.saturating_duration_since(later));
    }
}
