//! A library for working with good run lists: for every run, the set of
//! lumiblocks that are considered valid, represented as inclusive ranges.
//!
//! This library provides a [`Grl`] struct mapping run numbers to sorted lists
//! of [`LumiblockRange`]s. Inserting a range merges it with any range of the
//! same run that it overlaps or touches, and removing a range truncates or
//! splits the ranges it covers, so that each run is always stored as the
//! minimal sorted list of disjoint, non-adjacent ranges.
//!
//! Lists can be combined using set union, difference, intersection, and
//! symmetric difference, either pairwise through the methods of [`Grl`] (or
//! the `|`, `+`, `-`, `&`, and `^` operators) or over many lists at once
//! through [`union_all`], [`difference_all`], [`intersection_all`], and
//! [`symmetric_difference_all`].

pub(crate) mod error;
pub(crate) mod grl;
pub(crate) mod nested;
pub(crate) mod range;

pub use crate::{
	error::GrlError,
	grl::{ClipBounds, Grl, GrlInfo, Iter, Metadata},
	nested::NestedGrl,
	range::LumiblockRange,
};

/// Run number
pub type Run = i64;

/// Lumiblock number within a run
pub type Lumiblock = i64;

/// Returns a copy of `grl` restricted to the window described by `bounds`.
///
/// See [`Grl::clip`].
pub fn clipped(grl: &Grl, bounds: &ClipBounds) -> Grl {
	let mut res = grl.clone();
	res.clip(bounds);
	res
}

/// Left-fold `op` over the lists, requiring at least two of them.
fn fold<'a>(
	grls: impl IntoIterator<Item = &'a Grl>,
	op: impl Fn(&mut Grl, &Grl),
) -> Result<Grl, GrlError> {
	let grls: Vec<&Grl> = grls.into_iter().collect();
	let [first, rest @ ..] = grls.as_slice() else {
		return Err(GrlError::Arity { given: 0 });
	};
	if rest.is_empty() {
		return Err(GrlError::Arity { given: 1 });
	}
	let mut res = (*first).clone();
	for &grl in rest {
		op(&mut res, grl);
	}
	Ok(res)
}

/// Returns the union of all lists: `A | B | C ...`.
///
/// # Examples
///
/// ```
/// # use goodruns::{union_all, Grl, GrlError};
/// let a = Grl::from_triples([(1, 1, 4)]).unwrap();
/// let b = Grl::from_triples([(1, 5, 9)]).unwrap();
/// let c = Grl::from_triples([(2, 1, 1)]).unwrap();
/// let all = union_all([&a, &b, &c]).unwrap();
/// assert_eq!(all, Grl::from_triples([(1, 1, 9), (2, 1, 1)]).unwrap());
///
/// assert_eq!(union_all([&a]), Err(GrlError::Arity { given: 1 }));
/// ```
pub fn union_all<'a>(grls: impl IntoIterator<Item = &'a Grl>) -> Result<Grl, GrlError> {
	fold(grls, Grl::union_with)
}

/// Returns the difference of the first list with all following lists:
/// `((A - B) - C) ...`.
pub fn difference_all<'a>(grls: impl IntoIterator<Item = &'a Grl>) -> Result<Grl, GrlError> {
	fold(grls, Grl::difference_with)
}

/// Returns the intersection of all lists: `A & B & C ...`.
pub fn intersection_all<'a>(grls: impl IntoIterator<Item = &'a Grl>) -> Result<Grl, GrlError> {
	fold(grls, Grl::intersect_with)
}

/// Returns the symmetric difference of all lists: `((A ^ B) ^ C) ...`.
pub fn symmetric_difference_all<'a>(
	grls: impl IntoIterator<Item = &'a Grl>,
) -> Result<Grl, GrlError> {
	fold(grls, Grl::symmetric_difference_with)
}

#[cfg(test)]
mod tests {
	use crate::{
		clipped, difference_all, intersection_all, symmetric_difference_all, union_all, ClipBounds,
		Grl, GrlError,
	};

	fn grl(triples: &[(i64, i64, i64)]) -> Grl {
		Grl::from_triples(triples.iter().copied()).unwrap()
	}

	#[test]
	fn test_folds() {
		let a = grl(&[(1, 1, 20), (2, 1, 5)]);
		let b = grl(&[(1, 5, 9), (3, 1, 1)]);
		let c = grl(&[(1, 15, 30), (2, 3, 3)]);

		assert_eq!(
			union_all([&a, &b, &c]).unwrap(),
			grl(&[(1, 1, 30), (2, 1, 5), (3, 1, 1)])
		);
		assert_eq!(
			difference_all([&a, &b, &c]).unwrap(),
			grl(&[(1, 1, 4), (1, 10, 14), (2, 1, 2), (2, 4, 5)])
		);
		assert_eq!(intersection_all([&a, &b, &c]).unwrap(), Grl::new());
		assert_eq!(intersection_all([&a, &c]).unwrap(), grl(&[(1, 15, 20), (2, 3, 3)]));
		assert_eq!(
			symmetric_difference_all([&a, &b, &c]).unwrap(),
			(&(&a ^ &b) ^ &c)
		);

		// Folding two lists is the binary operator
		assert_eq!(union_all([&a, &b]).unwrap(), &a | &b);
		assert_eq!(difference_all(vec![&b, &a]).unwrap(), &b - &a);
	}

	#[test]
	fn test_fold_arity() {
		let a = grl(&[(1, 1, 20)]);
		assert_eq!(union_all([]), Err(GrlError::Arity { given: 0 }));
		assert_eq!(intersection_all([&a]), Err(GrlError::Arity { given: 1 }));
		assert_eq!(
			difference_all([&a]).unwrap_err().to_string(),
			"at least 2 good run lists are required, 1 given"
		);
	}

	#[test]
	fn test_clipped() {
		let a = grl(&[(1, 1, 20), (2, 1, 5), (3, 4, 9)]);
		let bounds = ClipBounds {
			start_run: Some(2),
			start_lb: Some(3),
			end_run: Some(2),
			end_lb: Some(4),
		};
		assert_eq!(clipped(&a, &bounds), grl(&[(2, 3, 4)]));
		assert_eq!(a, grl(&[(1, 1, 20), (2, 1, 5), (3, 4, 9)]));
	}
}
