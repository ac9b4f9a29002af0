use core::fmt;
use core::ops::{Add, AddAssign};
use core::time::Duration;

/// An instant on a logical clock, measured from the clock's origin.
///
/// Logical time only moves when its owner advances it, which keeps every
/// scheduling decision deterministic and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
	/// The clock origin.
	pub const ZERO: Self = Self(Duration::ZERO);

	/// Creates a timestamp at the given offset from the origin.
	pub const fn new(offset: Duration) -> Self {
		Self(offset)
	}

	/// Creates a timestamp `ms` milliseconds after the origin.
	pub const fn from_millis(ms: u64) -> Self {
		Self(Duration::from_millis(ms))
	}

	/// Returns the offset from the origin.
	pub const fn offset(self) -> Duration {
		self.0
	}

	/// Returns the offset from the origin in whole milliseconds.
	pub const fn as_millis(self) -> u128 {
		self.0.as_millis()
	}

	/// Returns the time elapsed since `earlier`, or zero if `earlier` is later.
	pub fn saturating_since(self, earlier: Self) -> Duration {
		self.0.saturating_sub(earlier.0)
	}
}

impl Add<Duration> for Timestamp {
	type Output = Self;

	fn add(self, rhs: Duration) -> Self {
		Self(self.0.saturating_add(rhs))
	}
}

impl AddAssign<Duration> for Timestamp {
	fn add_assign(&mut self, rhs: Duration) {
		self.0 = self.0.saturating_add(rhs);
	}
}

impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "t+{}ms", self.0.as_millis())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_and_since() {
		let t = Timestamp::from_millis(10) + Duration::from_millis(290);
		assert_eq!(t, Timestamp::from_millis(300));
		assert_eq!(t.saturating_since(Timestamp::from_millis(100)), Duration::from_millis(200));
		assert_eq!(Timestamp::ZERO.saturating_since(t), Duration::ZERO);
	}

	#[test]
	fn test_display() {
		assert_eq!(Timestamp::from_millis(8000).to_string(), "t+8000ms");
	}
}
