//! The [`Grl`] type: per-run sorted lists of lumiblock ranges.

use std::{
	collections::{
		btree_map::{self, Entry},
		BTreeMap,
	},
	fmt::{self, Debug, Display},
	iter::FusedIterator,
	ops::{
		Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub,
		SubAssign,
	},
	slice,
};

use crate::{GrlError, Lumiblock, LumiblockRange, Run};

/// A good run list: a mapping from run numbers to the lumiblock ranges that
/// are considered valid in that run.
///
/// For every run the ranges are kept sorted by their start, and no two ranges
/// overlap or are adjacent: inserting `1-5` and `6-10` yields the single range
/// `1-10`. A run is never present without any ranges.
///
/// The descriptive [`GrlInfo`] carried by a list takes no part in equality and
/// is reset by every set operation.
#[derive(Clone, Default)]
pub struct Grl {
	/// Sorted, merged lumiblock ranges for every run
	runs: BTreeMap<Run, Vec<LumiblockRange>>,
	/// Name, version and free-form metadata
	info: GrlInfo,
}

/// Descriptive attributes of a [`Grl`] that are carried through the external
/// formats, but have no meaning for the set operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GrlInfo {
	/// Name of the list
	pub name: Option<String>,
	/// Version string of the list
	pub version: Option<String>,
	/// Named free-form metadata entries, in document order
	pub metadata: Vec<Metadata>,
}

/// A named free-form metadata entry of a [`Grl`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
	/// Name of the entry
	pub name: String,
	/// Uninterpreted content of the entry
	pub value: String,
}

/// Window used by [`Grl::clip`]. Every bound is inclusive and optional.
///
/// `start_lb` only applies to the run `start_run`, and `end_lb` only to the
/// run `end_run`; they are ignored when the corresponding run is not given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClipBounds {
	/// First run to keep
	pub start_run: Option<Run>,
	/// First lumiblock to keep in `start_run`
	pub start_lb: Option<Lumiblock>,
	/// Last run to keep
	pub end_run: Option<Run>,
	/// Last lumiblock to keep in `end_run`
	pub end_lb: Option<Lumiblock>,
}

/// Iterator over the `(run, range)` pairs of a [`Grl`], ordered by run and
/// then by range.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
	/// Remaining runs
	runs: btree_map::Iter<'a, Run, Vec<LumiblockRange>>,
	/// Run currently being yielded and its remaining ranges
	current: Option<(Run, slice::Iter<'a, LumiblockRange>)>,
}

impl Grl {
	/// Create an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a list from `(run, start, end)` triples, validating each range.
	///
	/// The order of the triples does not matter. No list is returned if any of
	/// the triples is not a valid range.
	pub fn from_triples<I>(triples: I) -> Result<Self, GrlError>
	where
		I: IntoIterator<Item = (Run, Lumiblock, Lumiblock)>,
	{
		let mut grl = Self::new();
		for (run, start, end) in triples {
			grl.insert(run, LumiblockRange::new(start, end)?);
		}
		Ok(grl)
	}

	/// Replace the descriptive information of the list.
	pub fn with_info(mut self, info: GrlInfo) -> Self {
		self.info = info;
		self
	}

	/// Descriptive information of the list.
	pub fn info(&self) -> &GrlInfo {
		&self.info
	}

	/// Mutable access to the descriptive information of the list.
	pub fn info_mut(&mut self) -> &mut GrlInfo {
		&mut self.info
	}

	/// Returns `true` if the list contains no runs.
	pub fn is_empty(&self) -> bool {
		self.runs.is_empty()
	}

	/// Number of runs in the list.
	pub fn len(&self) -> usize {
		self.runs.len()
	}

	/// Total number of lumiblocks over all runs, saturating at [`u64::MAX`].
	pub fn lumiblock_count(&self) -> u64 {
		self.iter()
			.fold(0u64, |acc, (_, r)| acc.saturating_add(r.len()))
	}

	/// Returns `true` if `run` has at least one valid lumiblock.
	pub fn has_run(&self, run: Run) -> bool {
		self.runs.contains_key(&run)
	}

	/// The sorted lumiblock ranges of `run`.
	pub fn get(&self, run: Run) -> Option<&[LumiblockRange]> {
		self.runs.get(&run).map(Vec::as_slice)
	}

	/// Remove `run` and all of its ranges, returning the ranges.
	pub fn remove_run(&mut self, run: Run) -> Option<Vec<LumiblockRange>> {
		self.runs.remove(&run)
	}

	/// Iterator over the runs in ascending order.
	pub fn runs(&self) -> impl DoubleEndedIterator<Item = Run> + ExactSizeIterator + '_ {
		self.runs.keys().copied()
	}

	/// Iterator over the `(run, range)` pairs, ordered by run and then range.
	pub fn iter(&self) -> Iter<'_> {
		Iter {
			runs: self.runs.iter(),
			current: None,
		}
	}

	/// Iterator over `(run, start, end)` triples, ordered by run and then
	/// range.
	pub fn triples(&self) -> impl Iterator<Item = (Run, Lumiblock, Lumiblock)> + '_ {
		self.iter().map(|(run, r)| (run, r.start(), r.end()))
	}

	/// Returns `true` if lumiblock `lb` of `run` is in the list.
	///
	/// The ranges of the run are binary searched.
	///
	/// # Examples
	///
	/// ```
	/// # use goodruns::Grl;
	/// let grl = Grl::from_triples([(1234, 1, 2), (1234, 4, 5)]).unwrap();
	/// assert!(grl.contains(1234, 1));
	/// assert!(grl.contains(1234, 5));
	/// assert!(!grl.contains(1234, 3));
	/// assert!(!grl.contains(1235, 1));
	/// ```
	pub fn contains(&self, run: Run, lb: Lumiblock) -> bool {
		self.runs.get(&run).is_some_and(|ranges| {
			ranges
				.binary_search_by(|r| r.compare_to_point(lb))
				.is_ok()
		})
	}

	/// Add the lumiblocks of `range` to `run`.
	///
	/// Ranges of the run that overlap or are adjacent to `range` are merged
	/// with it.
	pub fn insert(&mut self, run: Run, range: LumiblockRange) {
		match self.runs.entry(run) {
			Entry::Vacant(e) => {
				let _ = e.insert(vec![range]);
			}
			Entry::Occupied(mut e) => {
				let ranges = e.get_mut();
				let i = ranges.partition_point(|r| r.start() < range.start());
				ranges.insert(i, range);
				merge_touching(ranges);
			}
		}
	}

	/// Validate the bounds `start..=end` and add them to `run`.
	///
	/// The list is left unchanged when the bounds are invalid.
	pub fn insert_bounds(
		&mut self,
		run: Run,
		start: Lumiblock,
		end: Lumiblock,
	) -> Result<(), GrlError> {
		self.insert(run, LumiblockRange::new(start, end)?);
		Ok(())
	}

	/// Remove the lumiblocks of `range` from `run`.
	///
	/// Ranges that contain `range` strictly inside them are split in two,
	/// ranges it partially covers are truncated, and ranges it fully covers are
	/// dropped. The run is removed when none of its ranges remain.
	pub fn remove(&mut self, run: Run, range: LumiblockRange) {
		let Entry::Occupied(mut e) = self.runs.entry(run) else {
			return;
		};
		let ranges = e.get_mut();
		// Skip the ranges ending before the removed range starts
		let mut i = ranges.partition_point(|mine| mine.end() < range.start());
		while let Some(&mine) = ranges.get(i) {
			if mine.start() > range.end() {
				break;
			}
			match (range.start() <= mine.start(), mine.end() <= range.end()) {
				(true, true) => {
					let _ = ranges.remove(i);
				}
				(true, false) => {
					ranges[i] = LumiblockRange::new_unchecked(range.end() + 1, mine.end());
					break;
				}
				(false, true) => {
					ranges[i] = LumiblockRange::new_unchecked(mine.start(), range.start() - 1);
					i += 1;
				}
				(false, false) => {
					ranges[i] = LumiblockRange::new_unchecked(mine.start(), range.start() - 1);
					ranges.insert(
						i + 1,
						LumiblockRange::new_unchecked(range.end() + 1, mine.end()),
					);
					break;
				}
			}
		}
		if ranges.is_empty() {
			log::trace!("run {run} emptied by removal of {range}");
			let _ = e.remove();
		}
	}

	/// Validate the bounds `start..=end` and remove them from `run`.
	///
	/// The list is left unchanged when the bounds are invalid.
	pub fn remove_bounds(
		&mut self,
		run: Run,
		start: Lumiblock,
		end: Lumiblock,
	) -> Result<(), GrlError> {
		self.remove(run, LumiblockRange::new(start, end)?);
		Ok(())
	}

	/// Restrict the list to the window described by `bounds`.
	///
	/// Runs outside `start_run..=end_run` are removed. In the boundary runs,
	/// ranges outside the lumiblock bounds are dropped and ranges straddling a
	/// bound are truncated to it. A boundary run left without ranges is
	/// removed.
	pub fn clip(&mut self, bounds: &ClipBounds) {
		if let Some(start_run) = bounds.start_run {
			self.runs = self.runs.split_off(&start_run);
			if let Some(start_lb) = bounds.start_lb {
				self.clip_run(start_run, |ranges| {
					ranges.retain(|r| r.end() >= start_lb);
					if let Some(first) = ranges.first_mut() {
						if first.start() < start_lb {
							*first = LumiblockRange::new_unchecked(start_lb, first.end());
						}
					}
				});
			}
		}
		if let Some(end_run) = bounds.end_run {
			if let Some(after) = end_run.checked_add(1) {
				let _ = self.runs.split_off(&after);
			}
			if let Some(end_lb) = bounds.end_lb {
				self.clip_run(end_run, |ranges| {
					ranges.retain(|r| r.start() <= end_lb);
					if let Some(last) = ranges.last_mut() {
						if last.end() > end_lb {
							*last = LumiblockRange::new_unchecked(last.start(), end_lb);
						}
					}
				});
			}
		}
	}

	/// Apply `f` to the ranges of `run`, removing the run if it is left empty.
	fn clip_run(&mut self, run: Run, f: impl FnOnce(&mut Vec<LumiblockRange>)) {
		if let Entry::Occupied(mut e) = self.runs.entry(run) {
			f(e.get_mut());
			if e.get().is_empty() {
				log::trace!("run {run} emptied by clipping");
				let _ = e.remove();
			}
		}
	}

	/// Add all lumiblocks of `other` to `self`.
	pub fn union_with(&mut self, other: &Grl) {
		for (run, range) in other {
			self.insert(run, range);
		}
		self.info = GrlInfo::default();
	}

	/// Remove all lumiblocks of `other` from `self`.
	pub fn difference_with(&mut self, other: &Grl) {
		for (run, range) in other {
			self.remove(run, range);
		}
		self.info = GrlInfo::default();
	}

	/// Keep only the lumiblocks of `self` that are also in `other`.
	pub fn intersect_with(&mut self, other: &Grl) {
		let outside = self.difference(other);
		self.difference_with(&outside);
	}

	/// Keep the lumiblocks that are in exactly one of `self` and `other`.
	pub fn symmetric_difference_with(&mut self, other: &Grl) {
		let common = self.intersection(other);
		self.union_with(other);
		self.difference_with(&common);
	}

	/// Set union of two lists.
	pub fn union(&self, other: &Grl) -> Grl {
		let mut res = self.clone();
		res.union_with(other);
		res
	}

	/// Set difference of two lists.
	pub fn difference(&self, other: &Grl) -> Grl {
		let mut res = self.clone();
		res.difference_with(other);
		res
	}

	/// Set intersection of two lists.
	pub fn intersection(&self, other: &Grl) -> Grl {
		let mut res = self.clone();
		res.intersect_with(other);
		res
	}

	/// Symmetric difference of two lists.
	pub fn symmetric_difference(&self, other: &Grl) -> Grl {
		let mut res = self.clone();
		res.symmetric_difference_with(other);
		res
	}
}

/// Merge overlapping and adjacent ranges of a run sorted by start.
fn merge_touching(ranges: &mut Vec<LumiblockRange>) {
	ranges.dedup_by(|next, first| {
		if first.end() >= next.end() {
			// `next` is absorbed by `first`
			true
		} else if first.touches(next) {
			*first = LumiblockRange::new_unchecked(first.start(), next.end());
			true
		} else {
			false
		}
	});
}

impl PartialEq for Grl {
	fn eq(&self, other: &Self) -> bool {
		self.runs == other.runs
	}
}

impl Eq for Grl {}

impl Debug for Grl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.runs.iter()).finish()
	}
}

impl Display for Grl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (run, ranges) in &self.runs {
			if !first {
				writeln!(f)?;
			}
			first = false;
			let width = ranges
				.iter()
				.map(|r| r.start().to_string().len())
				.max()
				.unwrap_or(0);
			writeln!(f, "{}", "-".repeat(15))?;
			writeln!(f, "RUN: {run}")?;
			write!(f, "LUMIBLOCKS:")?;
			for r in ranges {
				if r.start() == r.end() {
					write!(f, "\n  {}", r.start())?;
				} else {
					write!(f, "\n  {:<width$} - {}", r.start(), r.end())?;
				}
			}
		}
		Ok(())
	}
}

impl<'a> Iterator for Iter<'a> {
	type Item = (Run, LumiblockRange);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some((run, ranges)) = &mut self.current {
				if let Some(r) = ranges.next() {
					return Some((*run, *r));
				}
			}
			let (run, ranges) = self.runs.next()?;
			self.current = Some((*run, ranges.iter()));
		}
	}
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Grl {
	type IntoIter = Iter<'a>;
	type Item = (Run, LumiblockRange);

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl FromIterator<(Run, LumiblockRange)> for Grl {
	fn from_iter<T: IntoIterator<Item = (Run, LumiblockRange)>>(iter: T) -> Self {
		let mut grl = Grl::new();
		grl.extend(iter);
		grl
	}
}

impl Extend<(Run, LumiblockRange)> for Grl {
	fn extend<T: IntoIterator<Item = (Run, LumiblockRange)>>(&mut self, iter: T) {
		for (run, range) in iter {
			self.insert(run, range);
		}
	}
}

/// Implement a binary operator, together with its assigning form, in terms of
/// the in-place method of [`Grl`].
macro_rules! set_op {
	($op:ident, $fn:ident, $op_assign:ident, $fn_assign:ident, $method:ident) => {
		impl $op<&Grl> for &Grl {
			type Output = Grl;

			fn $fn(self, rhs: &Grl) -> Grl {
				let mut res = self.clone();
				res.$method(rhs);
				res
			}
		}

		impl $op<&Grl> for Grl {
			type Output = Grl;

			fn $fn(mut self, rhs: &Grl) -> Grl {
				self.$method(rhs);
				self
			}
		}

		impl $op_assign<&Grl> for Grl {
			fn $fn_assign(&mut self, rhs: &Grl) {
				self.$method(rhs);
			}
		}
	};
}

set_op!(BitOr, bitor, BitOrAssign, bitor_assign, union_with);
set_op!(Add, add, AddAssign, add_assign, union_with);
set_op!(Sub, sub, SubAssign, sub_assign, difference_with);
set_op!(BitAnd, bitand, BitAndAssign, bitand_assign, intersect_with);
set_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, symmetric_difference_with);
