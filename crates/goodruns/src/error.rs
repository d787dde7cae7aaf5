//! Errors raised while constructing or combining good run lists.

use crate::Lumiblock;

/// Errors that can be produced by [`crate::LumiblockRange`] and
/// [`crate::Grl`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrlError {
	/// The lower bound of a lumiblock range is greater than its upper bound.
	#[error("lumiblock range in wrong order: {start}-{end}")]
	InvalidRange {
		/// Lower bound as supplied
		start: Lumiblock,
		/// Upper bound as supplied
		end: Lumiblock,
	},
	/// A lumiblock range was given by a number of bounds other than two.
	#[error("lumiblock range must contain exactly 2 bounds, found {0}")]
	InvalidBoundCount(usize),
	/// A run key could not be interpreted as a run number.
	#[error("run must be an integer, found {0:?}")]
	InvalidRun(String),
	/// A set operation over many lists was given fewer than two operands.
	#[error("at least 2 good run lists are required, {given} given")]
	Arity {
		/// Number of operands that were supplied
		given: usize,
	},
}

impl GrlError {
	/// Error for a run key that is not a valid [`crate::Run`].
	pub(crate) fn invalid_run(key: impl Into<String>) -> Self {
		GrlError::InvalidRun(key.into())
	}
}
