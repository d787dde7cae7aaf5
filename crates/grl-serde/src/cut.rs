//! Selection expressions accepting exactly the lumiblocks of a good run list.

use goodruns::Grl;

/// Default name of the run number branch
pub const DEFAULT_RUN_NAME: &str = "RunNumber";
/// Default name of the lumiblock branch
pub const DEFAULT_LB_NAME: &str = "lbn";

/// Combine terms with `|`, parenthesizing every operand.
fn or_terms(terms: impl Iterator<Item = String>) -> String {
	terms
		.reduce(|acc, term| format!("({acc})|({term})"))
		.unwrap_or_default()
}

/// Returns a boolean expression, in the usual `TTree` selection syntax, that
/// is true exactly for the lumiblocks of `grl`.
///
/// An empty list results in an empty expression.
///
/// # Examples
///
/// ```
/// # use goodruns::Grl;
/// # use grl_serde::cut::to_cut;
/// let grl = Grl::from_triples([(1, 1, 2), (1, 4, 4)]).unwrap();
/// assert_eq!(
/// 	to_cut(&grl, "RunNumber", "lbn"),
/// 	"(RunNumber==1)&&((lbn>=1&&lbn<=2)|(lbn>=4&&lbn<=4))"
/// );
/// ```
pub fn to_cut(grl: &Grl, run_name: &str, lb_name: &str) -> String {
	or_terms(grl.runs().map(|run| {
		let lbcut = or_terms(
			grl.get(run)
				.unwrap_or_default()
				.iter()
				.map(|r| format!("{lb_name}>={}&&{lb_name}<={}", r.start(), r.end())),
		);
		format!("({run_name}=={run})&&({lbcut})")
	}))
}
