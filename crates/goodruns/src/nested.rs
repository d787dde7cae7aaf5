//! Conversion between [`Grl`] and its plain nested-collection form, a mapping
//! from run numbers to lists of `(start, end)` pairs, and the serde
//! implementations based on it.

use std::{collections::BTreeMap, fmt};

use serde::{
	de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
	ser::SerializeMap,
	Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{Grl, GrlError, Lumiblock, LumiblockRange, Run};

/// Plain nested-collection form of a [`Grl`]
pub type NestedGrl = BTreeMap<Run, Vec<(Lumiblock, Lumiblock)>>;

impl Grl {
	/// Returns the list as a mapping from runs to `(start, end)` pairs.
	///
	/// # Examples
	///
	/// ```
	/// # use goodruns::Grl;
	/// let grl = Grl::from_triples([(1234, 4, 5), (1234, 1, 2)]).unwrap();
	/// let nested = grl.to_nested();
	/// assert_eq!(nested[&1234], vec![(1, 2), (4, 5)]);
	/// assert_eq!(Grl::try_from(nested).unwrap(), grl);
	/// ```
	pub fn to_nested(&self) -> NestedGrl {
		let mut nested = NestedGrl::new();
		for (run, r) in self {
			nested.entry(run).or_default().push(r.into());
		}
		nested
	}
}

impl TryFrom<NestedGrl> for Grl {
	type Error = GrlError;

	fn try_from(value: NestedGrl) -> Result<Self, Self::Error> {
		Grl::from_triples(value.into_iter().flat_map(|(run, ranges)| {
			ranges
				.into_iter()
				.map(move |(start, end)| (run, start, end))
		}))
	}
}

impl From<&Grl> for NestedGrl {
	fn from(value: &Grl) -> Self {
		value.to_nested()
	}
}

impl Serialize for LumiblockRange {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		(self.start(), self.end()).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for LumiblockRange {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct V;
		impl<'de> Visitor<'de> for V {
			type Value = LumiblockRange;
			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a pair of integer lumiblock bounds")
			}
			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
				let mut bounds = Vec::with_capacity(2);
				while bounds.len() < 2 {
					match seq.next_element::<Lumiblock>()? {
						Some(b) => bounds.push(b),
						None => break,
					}
				}
				let mut count = bounds.len();
				while seq.next_element::<IgnoredAny>()?.is_some() {
					count += 1;
				}
				if count != 2 {
					return Err(de::Error::custom(GrlError::InvalidBoundCount(count)));
				}
				LumiblockRange::try_from(bounds.as_slice()).map_err(de::Error::custom)
			}
		}
		deserializer.deserialize_seq(V)
	}
}

/// Run number used as a mapping key, which may be written as an integer or as
/// a string containing one.
struct RunKey(Run);

impl<'de> Deserialize<'de> for RunKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct V;
		impl<'de> Visitor<'de> for V {
			type Value = RunKey;
			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("an integer run number")
			}
			fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
				Ok(RunKey(v))
			}
			fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
				Run::try_from(v)
					.map(RunKey)
					.map_err(|_| E::custom(GrlError::invalid_run(v.to_string())))
			}
			fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
				Err(E::custom(GrlError::invalid_run(v.to_string())))
			}
			fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
				v.trim()
					.parse()
					.map(RunKey)
					.map_err(|_| E::custom(GrlError::invalid_run(v)))
			}
		}
		deserializer.deserialize_any(V)
	}
}

impl Serialize for Grl {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for run in self.runs() {
			map.serialize_entry(&run, self.get(run).unwrap_or_default())?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Grl {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct V;
		impl<'de> Visitor<'de> for V {
			type Value = Grl;
			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a mapping from runs to lists of lumiblock ranges")
			}
			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
				let mut grl = Grl::new();
				while let Some((RunKey(run), ranges)) =
					map.next_entry::<RunKey, Vec<LumiblockRange>>()?
				{
					grl.extend(ranges.into_iter().map(|r| (run, r)));
				}
				Ok(grl)
			}
		}
		deserializer.deserialize_map(V)
	}
}

#[cfg(test)]
mod tests {
	use expect_test::expect;

	use crate::{Grl, GrlError, NestedGrl};

	fn grl(triples: &[(i64, i64, i64)]) -> Grl {
		Grl::from_triples(triples.iter().copied()).unwrap()
	}

	#[test]
	fn test_nested_round_trip() {
		let g = grl(&[(180225, 87, 92), (180225, 1, 4), (180241, 10, 10)]);
		let nested = g.to_nested();
		assert_eq!(nested.len(), 2);
		assert_eq!(nested[&180225], vec![(1, 4), (87, 92)]);
		assert_eq!(Grl::try_from(nested).unwrap(), g);
		assert_eq!(NestedGrl::from(&Grl::new()), NestedGrl::new());

		// Unsorted and overlapping input is normalized on load
		let nested = NestedGrl::from([(1234, vec![(4, 5), (1, 2), (2, 3)])]);
		assert_eq!(Grl::try_from(nested).unwrap(), grl(&[(1234, 1, 5)]));

		let nested = NestedGrl::from([(1234, vec![(5, 4)])]);
		assert_eq!(
			Grl::try_from(nested),
			Err(GrlError::InvalidRange { start: 5, end: 4 })
		);
	}

	#[test]
	fn test_serde_json() {
		let g = grl(&[(1234, 1, 2), (1234, 4, 5), (99, 7, 7)]);
		let json = serde_json::to_string(&g).unwrap();
		expect![[r#"{"99":[[7,7]],"1234":[[1,2],[4,5]]}"#]].assert_eq(&json);
		let back: Grl = serde_json::from_str(&json).unwrap();
		assert_eq!(back, g);

		let err = serde_json::from_str::<Grl>(r#"{"run":[[1,2]]}"#).unwrap_err();
		assert!(err
			.to_string()
			.starts_with(r#"run must be an integer, found "run""#));

		let err = serde_json::from_str::<Grl>(r#"{"1":[[1,2,3]]}"#).unwrap_err();
		assert!(err
			.to_string()
			.starts_with("lumiblock range must contain exactly 2 bounds, found 3"));

		let err = serde_json::from_str::<Grl>(r#"{"1":[[3,2]]}"#).unwrap_err();
		assert!(err.to_string().starts_with("lumiblock range in wrong order: 3-2"));

		assert!(serde_json::from_str::<Grl>(r#"{"1":[[1.5,2]]}"#).is_err());
		assert!(serde_json::from_str::<Grl>(r#"{"1":[[1]]}"#).is_err());
	}
}
