//! Command implementations for `grl`

use std::{
	fs::File,
	io::{self, BufWriter},
	path::Path,
};

use anyhow::{Context, Result};
use goodruns::{
	difference_all, intersection_all, symmetric_difference_all, union_all, ClipBounds, Grl,
	Lumiblock, Run,
};
use grl_serde::{Format, STDIO_PATH};
use log::{debug, info};

use crate::OutputArgs;

/// Set operation folded over the input lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetOp {
	And,
	Or,
	Xor,
	Diff,
}

impl SetOp {
	fn apply(self, grls: &[Grl]) -> Result<Grl, goodruns::GrlError> {
		match self {
			SetOp::And => intersection_all(grls),
			SetOp::Or => union_all(grls),
			SetOp::Xor => symmetric_difference_all(grls),
			SetOp::Diff => difference_all(grls),
		}
	}
}

fn read(path: &Path) -> Result<Grl> {
	grl_serde::read_path(path)
		.with_context(|| format!("Failed to read good run list: {}", path.display()))
}

/// Format used for the output: the explicit format, or the one given by the
/// output file extension, or XML.
fn output_format(output: &OutputArgs) -> Format {
	output
		.format
		.or_else(|| {
			output
				.output
				.as_deref()
				.and_then(|p| Format::from_path(p).ok())
		})
		.unwrap_or(Format::Xml)
}

fn write(grl: &Grl, output: &OutputArgs) -> Result<()> {
	let format = output_format(output);
	let res = match output.output.as_deref() {
		Some(path) if path.as_os_str() != STDIO_PATH => {
			info!("writing {format} to {}", path.display());
			let file = File::create(path)
				.with_context(|| format!("Failed to create output file: {}", path.display()))?;
			grl_serde::to_writer(grl, BufWriter::new(file), format)
		}
		_ => grl_serde::to_writer(grl, io::stdout().lock(), format),
	};
	res.context("Failed to write good run list")
}

/// Fold `op` over the lists stored at `paths`.
pub(crate) fn fold(op: SetOp, paths: &[impl AsRef<Path>]) -> Result<Grl> {
	let grls = paths
		.iter()
		.map(|p| read(p.as_ref()))
		.collect::<Result<Vec<_>>>()?;
	debug!("combining {} good run lists with {op:?}", grls.len());
	Ok(op.apply(&grls)?)
}

pub(crate) fn combine(op: SetOp, paths: &[impl AsRef<Path>], output: &OutputArgs) -> Result<()> {
	write(&fold(op, paths)?, output)
}

pub(crate) fn clip(path: &Path, bounds: &ClipBounds, output: &OutputArgs) -> Result<()> {
	let mut grl = read(path)?;
	grl.clip(bounds);
	write(&grl, output)
}

pub(crate) fn convert(path: &Path, output: &OutputArgs) -> Result<()> {
	write(&read(path)?, output)
}

pub(crate) fn show(path: &Path) -> Result<()> {
	let grl = read(path)?;
	grl_serde::to_writer(&grl, io::stdout().lock(), Format::Text)?;
	Ok(())
}

pub(crate) fn contains(path: &Path, run: Run, lumiblock: Lumiblock) -> Result<bool> {
	Ok(read(path)?.contains(run, lumiblock))
}
