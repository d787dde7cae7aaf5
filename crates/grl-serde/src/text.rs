//! Parser for the plain-text report produced by the [`std::fmt::Display`]
//! implementation of [`Grl`].

use nom::{
	bytes::complete::tag,
	character::complete::{char, digit1, line_ending, multispace0, space0, space1},
	combinator::{all_consuming, map_res, opt, recognize},
	multi::{many0, separated_list0},
	sequence::{delimited, pair, preceded, terminated, tuple},
	IResult,
};

use goodruns::{Grl, Lumiblock, Run};

use crate::Error;

/// Line separating the runs of a report
const SEPARATOR: &str = "---------------";

/// Parse a text report into a good run list.
pub(crate) fn from_str(input: &str) -> Result<Grl, Error> {
	let (_, runs) = all_consuming(report)(input).map_err(|e| Error::Text(e.to_string()))?;
	let mut grl = Grl::new();
	for (run, ranges) in runs {
		for (start, end) in ranges {
			grl.insert_bounds(run, start, end)?;
		}
	}
	Ok(grl)
}

fn report(input: &str) -> IResult<&str, Vec<(Run, Vec<(Lumiblock, Lumiblock)>)>> {
	delimited(multispace0, separated_list0(line_ending, run_block), multispace0)(input)
}

fn run_block(input: &str) -> IResult<&str, (Run, Vec<(Lumiblock, Lumiblock)>)> {
	let (input, _) = tuple((tag(SEPARATOR), space0, line_ending))(input)?;
	let (input, run) = delimited(
		pair(tag("RUN:"), space0),
		int,
		pair(space0, line_ending),
	)(input)?;
	let (input, _) = pair(tag("LUMIBLOCKS:"), space0)(input)?;
	let (input, ranges) = many0(preceded(line_ending, lbrange))(input)?;
	Ok((input, (run, ranges)))
}

/// A single range line: `start` or `start - end`
fn lbrange(input: &str) -> IResult<&str, (Lumiblock, Lumiblock)> {
	let (input, start) = preceded(space1, int)(input)?;
	let (input, end) = terminated(
		opt(preceded(tuple((space0, char('-'), space0)), int)),
		space0,
	)(input)?;
	Ok((input, (start, end.unwrap_or(start))))
}

fn int(input: &str) -> IResult<&str, i64> {
	map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}
