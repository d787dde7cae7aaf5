//! Closed lumiblock ranges.

use std::{
	cmp::Ordering,
	fmt::{self, Display},
	ops::RangeInclusive,
};

use crate::{GrlError, Lumiblock};

/// An inclusive range of lumiblocks `start..=end` with `start <= end`.
///
/// A [`LumiblockRange`] can only be constructed through its validating
/// constructors and cannot be changed afterwards; operations that shrink or
/// grow a range produce a new one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LumiblockRange {
	/// First lumiblock in the range
	start: Lumiblock,
	/// Last lumiblock in the range
	end: Lumiblock,
}

impl LumiblockRange {
	/// Create a new range covering `start..=end`.
	///
	/// # Examples
	///
	/// ```
	/// # use goodruns::{GrlError, LumiblockRange};
	/// let r = LumiblockRange::new(3, 7).unwrap();
	/// assert_eq!((r.start(), r.end()), (3, 7));
	/// assert_eq!(
	/// 	LumiblockRange::new(7, 3),
	/// 	Err(GrlError::InvalidRange { start: 7, end: 3 })
	/// );
	/// ```
	pub fn new(start: Lumiblock, end: Lumiblock) -> Result<Self, GrlError> {
		if start > end {
			return Err(GrlError::InvalidRange { start, end });
		}
		Ok(Self { start, end })
	}

	/// Construct a range from bounds already known to be ordered.
	pub(crate) fn new_unchecked(start: Lumiblock, end: Lumiblock) -> Self {
		debug_assert!(start <= end, "lumiblock range in wrong order");
		Self { start, end }
	}

	/// Range containing the single lumiblock `lb`.
	pub fn single(lb: Lumiblock) -> Self {
		Self { start: lb, end: lb }
	}

	/// First lumiblock in the range.
	pub fn start(&self) -> Lumiblock {
		self.start
	}

	/// Last lumiblock in the range.
	pub fn end(&self) -> Lumiblock {
		self.end
	}

	/// Returns `true` if `lb` lies within the range.
	pub fn contains(&self, lb: Lumiblock) -> bool {
		self.start <= lb && lb <= self.end
	}

	/// Returns `true` if the ranges share at least one lumiblock.
	///
	/// Ranges that merely touch, such as `1-5` and `6-9`, do not intersect.
	///
	/// # Examples
	///
	/// ```
	/// # use goodruns::LumiblockRange;
	/// let a = LumiblockRange::new(1, 10).unwrap();
	/// let b = LumiblockRange::new(5, 50).unwrap();
	/// assert!(a.intersects(&b) && b.intersects(&a));
	/// assert!(a.intersects(&LumiblockRange::single(10)));
	/// assert!(!a.intersects(&LumiblockRange::new(11, 12).unwrap()));
	/// ```
	pub fn intersects(&self, other: &LumiblockRange) -> bool {
		self.contains(other.start)
			|| self.contains(other.end)
			|| other.contains(self.start)
			|| other.contains(self.end)
	}

	/// Returns `true` if the ranges intersect or if one starts directly after
	/// the other ends, i.e. their union is a single range.
	pub fn touches(&self, other: &LumiblockRange) -> bool {
		let (first, second) = if self.start <= other.start {
			(self, other)
		} else {
			(other, self)
		};
		first.end.saturating_add(1) >= second.start
	}

	/// Compares the range against a single lumiblock.
	///
	/// The range is [`Ordering::Less`] when it ends before `lb`,
	/// [`Ordering::Greater`] when it starts after `lb`, and
	/// [`Ordering::Equal`] when it contains `lb`. This is the ordering used
	/// to binary search the sorted ranges of a run.
	pub fn compare_to_point(&self, lb: Lumiblock) -> Ordering {
		if self.end < lb {
			Ordering::Less
		} else if self.start > lb {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}

	/// Iterator over every lumiblock in the range.
	pub fn lumiblocks(&self) -> RangeInclusive<Lumiblock> {
		self.start..=self.end
	}

	/// Number of lumiblocks in the range, saturating at [`u64::MAX`].
	pub fn len(&self) -> u64 {
		self.end.abs_diff(self.start).saturating_add(1)
	}

	/// A range is never empty; provided for symmetry with [`Self::len`].
	pub fn is_empty(&self) -> bool {
		false
	}
}

impl fmt::Debug for LumiblockRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}..={:?}", self.start, self.end)
	}
}

impl Display for LumiblockRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.start, self.end)
	}
}

impl From<LumiblockRange> for RangeInclusive<Lumiblock> {
	fn from(value: LumiblockRange) -> Self {
		value.lumiblocks()
	}
}

impl From<LumiblockRange> for (Lumiblock, Lumiblock) {
	fn from(value: LumiblockRange) -> Self {
		(value.start, value.end)
	}
}

impl TryFrom<(Lumiblock, Lumiblock)> for LumiblockRange {
	type Error = GrlError;

	fn try_from((start, end): (Lumiblock, Lumiblock)) -> Result<Self, Self::Error> {
		Self::new(start, end)
	}
}

impl TryFrom<RangeInclusive<Lumiblock>> for LumiblockRange {
	type Error = GrlError;

	fn try_from(value: RangeInclusive<Lumiblock>) -> Result<Self, Self::Error> {
		Self::new(*value.start(), *value.end())
	}
}

impl TryFrom<&[Lumiblock]> for LumiblockRange {
	type Error = GrlError;

	fn try_from(value: &[Lumiblock]) -> Result<Self, Self::Error> {
		match *value {
			[start, end] => Self::new(start, end),
			_ => Err(GrlError::InvalidBoundCount(value.len())),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cmp::Ordering;

	use expect_test::expect;

	use crate::{GrlError, LumiblockRange};

	#[test]
	fn test_construction() {
		let r = LumiblockRange::new(4, 4).unwrap();
		assert_eq!(r, LumiblockRange::single(4));
		assert_eq!(r.len(), 1);

		assert_eq!(
			LumiblockRange::new(5, 4),
			Err(GrlError::InvalidRange { start: 5, end: 4 })
		);
		assert_eq!(
			LumiblockRange::try_from(&[1, 2, 3][..]),
			Err(GrlError::InvalidBoundCount(3))
		);
		assert_eq!(
			LumiblockRange::try_from(&[1][..]),
			Err(GrlError::InvalidBoundCount(1))
		);
		assert_eq!(
			LumiblockRange::try_from(&[1, 2][..]),
			LumiblockRange::new(1, 2)
		);
		assert_eq!(LumiblockRange::try_from(2..=9), LumiblockRange::new(2, 9));
		assert!(LumiblockRange::try_from((9, 2)).is_err());

		expect!["lumiblock range in wrong order: 5-4"]
			.assert_eq(&LumiblockRange::new(5, 4).unwrap_err().to_string());
	}

	#[test]
	fn test_point_queries() {
		let r = LumiblockRange::new(10, 20).unwrap();
		assert!(r.contains(10));
		assert!(r.contains(15));
		assert!(r.contains(20));
		assert!(!r.contains(9));
		assert!(!r.contains(21));

		assert_eq!(r.compare_to_point(9), Ordering::Greater);
		assert_eq!(r.compare_to_point(10), Ordering::Equal);
		assert_eq!(r.compare_to_point(20), Ordering::Equal);
		assert_eq!(r.compare_to_point(21), Ordering::Less);
	}

	#[test]
	fn test_intersects_and_touches() {
		let a = LumiblockRange::new(1, 5).unwrap();
		let b = LumiblockRange::new(5, 9).unwrap();
		let c = LumiblockRange::new(6, 9).unwrap();
		let d = LumiblockRange::new(7, 9).unwrap();
		let inner = LumiblockRange::new(2, 3).unwrap();

		assert!(a.intersects(&b));
		assert!(!a.intersects(&c));
		assert!(a.intersects(&inner) && inner.intersects(&a));

		assert!(a.touches(&c) && c.touches(&a));
		assert!(!a.touches(&d));

		let top = LumiblockRange::new(i64::MAX - 1, i64::MAX).unwrap();
		assert!(top.touches(&LumiblockRange::single(i64::MAX)));
	}

	#[test]
	fn test_display() {
		let r = LumiblockRange::new(-3, 12).unwrap();
		expect!["-3-12"].assert_eq(&r.to_string());
		expect!["-3..=12"].assert_eq(&format!("{r:?}"));
		assert_eq!(r.lumiblocks().count() as u64, r.len());
		assert_eq!(LumiblockRange::new(i64::MIN, i64::MAX).unwrap().len(), u64::MAX);
	}
}
