//! `grl`: combine, clip, inspect and convert good run lists.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use goodruns::{ClipBounds, Lumiblock, Run};
use grl_serde::Format;
use log::LevelFilter;

mod commands;

use crate::commands::SetOp;

#[derive(Parser)]
#[command(name = "grl")]
#[command(about = "Command-line utility for good run list operations")]
#[command(version)]
struct Cli {
	/// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Intersection of the good run lists
	And {
		/// Good run lists to combine (`-` reads XML from stdin)
		#[arg(required = true)]
		grls: Vec<PathBuf>,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Union of the good run lists
	Or {
		/// Good run lists to combine (`-` reads XML from stdin)
		#[arg(required = true)]
		grls: Vec<PathBuf>,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Symmetric difference of the good run lists
	Xor {
		/// Good run lists to combine (`-` reads XML from stdin)
		#[arg(required = true)]
		grls: Vec<PathBuf>,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Remove the following good run lists from the first one
	Diff {
		/// Good run lists to combine (`-` reads XML from stdin)
		#[arg(required = true)]
		grls: Vec<PathBuf>,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Restrict a good run list to a window of runs and lumiblocks
	Clip {
		/// Good run list to clip
		grl: PathBuf,

		/// First run to keep
		#[arg(long)]
		start_run: Option<Run>,

		/// First lumiblock to keep in the first run
		#[arg(long, requires = "start_run")]
		start_lb: Option<Lumiblock>,

		/// Last run to keep
		#[arg(long)]
		end_run: Option<Run>,

		/// Last lumiblock to keep in the last run
		#[arg(long, requires = "end_run")]
		end_lb: Option<Lumiblock>,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Write a good run list in another format
	Convert {
		/// Good run list to convert
		grl: PathBuf,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// Print the runs and lumiblocks of a good run list
	Show {
		/// Good run list to show
		grl: PathBuf,
	},

	/// Check whether a lumiblock is in a good run list
	Contains {
		/// Good run list to search
		grl: PathBuf,

		/// Run number
		run: Run,

		/// Lumiblock number
		lumiblock: Lumiblock,
	},
}

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
	/// Output file (defaults to stdout if not specified)
	#[arg(short, long)]
	pub(crate) output: Option<PathBuf>,

	/// Output format: xml, yml, json, txt or cut (defaults to the extension of
	/// the output file, or xml)
	#[arg(short, long)]
	pub(crate) format: Option<Format>,
}

/// Log level for the number of `-v` flags given.
fn level_filter(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

fn init_logging(verbose: u8) {
	env_logger::Builder::new()
		.filter_level(level_filter(verbose))
		.parse_default_env()
		.init();
}

/// Exit status of `contains`: success only when the lumiblock is present.
fn contains_status(found: bool) -> u8 {
	if found {
		0
	} else {
		1
	}
}

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match cli.command {
		Commands::And { grls, output } => commands::combine(SetOp::And, &grls, &output)?,
		Commands::Or { grls, output } => commands::combine(SetOp::Or, &grls, &output)?,
		Commands::Xor { grls, output } => commands::combine(SetOp::Xor, &grls, &output)?,
		Commands::Diff { grls, output } => commands::combine(SetOp::Diff, &grls, &output)?,
		Commands::Clip {
			grl,
			start_run,
			start_lb,
			end_run,
			end_lb,
			output,
		} => {
			let bounds = ClipBounds {
				start_run,
				start_lb,
				end_run,
				end_lb,
			};
			commands::clip(&grl, &bounds, &output)?;
		}
		Commands::Convert { grl, output } => commands::convert(&grl, &output)?,
		Commands::Show { grl } => commands::show(&grl)?,
		Commands::Contains {
			grl,
			run,
			lumiblock,
		} => {
			let found = commands::contains(&grl, run, lumiblock)?;
			println!("{found}");
			return Ok(ExitCode::from(contains_status(found)));
		}
	}
	Ok(ExitCode::SUCCESS)
}
