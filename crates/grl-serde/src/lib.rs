//! Reading and writing good run lists.
//!
//! The following formats are supported, see [`Format`]:
//!
//! - the XML `LumiRangeCollection` documents in which good run lists are
//!   usually distributed,
//! - YAML and JSON mappings from run numbers to lists of `[start, end]` pairs,
//! - the plain-text report produced by the [`std::fmt::Display`]
//!   implementation of [`Grl`],
//! - (write only) a selection expression accepting exactly the lumiblocks in
//!   the list, see [`cut::to_cut`].

pub mod cut;
pub(crate) mod text;
pub(crate) mod xml;

use std::{
	fmt::{self, Display},
	fs::File,
	io::{self, BufReader, BufWriter, Read, Write},
	path::Path,
	str::FromStr,
};

use goodruns::{Grl, GrlError};
use log::debug;

/// Path standing for the standard input or output
pub const STDIO_PATH: &str = "-";

/// Error that can occur while reading or writing a good run list
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The format is unknown, or cannot be used in this direction
	#[error("unsupported format: {0}")]
	UnsupportedFormat(String),
	/// Malformed XML document
	#[error("invalid XML: {0}")]
	Xml(#[from] quick_xml::DeError),
	/// The XML document could not be written
	#[error("unable to write XML: {0}")]
	XmlWrite(String),
	/// Malformed YAML document
	#[error("invalid YAML: {0}")]
	Yaml(#[from] serde_yaml::Error),
	/// Malformed JSON document
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// Malformed text report
	#[error("invalid text report: {0}")]
	Text(String),
	/// Error reading or writing the underlying stream
	#[error(transparent)]
	Io(#[from] io::Error),
	/// The document contains an invalid good run list
	#[error(transparent)]
	Grl(#[from] GrlError),
}

/// Serialization format of a good run list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	/// XML `LumiRangeCollection` document
	Xml,
	/// YAML mapping from runs to `[start, end]` pairs
	Yaml,
	/// JSON object from runs to `[start, end]` pairs
	Json,
	/// Plain-text report
	Text,
	/// Selection expression (write only)
	Cut,
}

impl Format {
	/// Determine the format from the extension of `path`.
	///
	/// The path `-`, standing for the standard input or output, is XML.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		if path.as_os_str() == STDIO_PATH {
			return Ok(Format::Xml);
		}
		match path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) => ext.parse(),
			None => Err(Error::UnsupportedFormat(path.display().to_string())),
		}
	}

	/// The preferred file extension of the format
	pub fn extension(&self) -> &'static str {
		match self {
			Format::Xml => "xml",
			Format::Yaml => "yml",
			Format::Json => "json",
			Format::Text => "txt",
			Format::Cut => "cut",
		}
	}

	/// Whether good run lists can be read from this format
	pub fn is_readable(&self) -> bool {
		!matches!(self, Format::Cut)
	}
}

impl FromStr for Format {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"xml" => Ok(Format::Xml),
			"yml" | "yaml" => Ok(Format::Yaml),
			"json" => Ok(Format::Json),
			"txt" | "text" => Ok(Format::Text),
			"cut" => Ok(Format::Cut),
			_ => Err(Error::UnsupportedFormat(s.to_owned())),
		}
	}
}

impl Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}

/// Read a good run list in the given format.
pub fn from_reader<R: Read>(reader: R, format: Format) -> Result<Grl, Error> {
	let grl = match format {
		Format::Xml => xml::from_reader(BufReader::new(reader))?,
		Format::Yaml => serde_yaml::from_reader(reader)?,
		Format::Json => serde_json::from_reader(BufReader::new(reader))?,
		Format::Text => {
			let mut buf = String::new();
			BufReader::new(reader).read_to_string(&mut buf)?;
			text::from_str(&buf)?
		}
		Format::Cut => return Err(Error::UnsupportedFormat(format.to_string())),
	};
	debug!("read {format} good run list with {} runs", grl.len());
	Ok(grl)
}

/// Read a good run list in the given format from a string.
pub fn from_str(s: &str, format: Format) -> Result<Grl, Error> {
	match format {
		Format::Xml => xml::from_str(s),
		Format::Yaml => Ok(serde_yaml::from_str(s)?),
		Format::Json => Ok(serde_json::from_str(s)?),
		Format::Text => text::from_str(s),
		Format::Cut => Err(Error::UnsupportedFormat(format.to_string())),
	}
}

/// Write `grl` in the given format.
pub fn to_writer<W: Write>(grl: &Grl, mut writer: W, format: Format) -> Result<(), Error> {
	debug!("writing {format} good run list with {} runs", grl.len());
	match format {
		Format::Yaml => serde_yaml::to_writer(&mut writer, grl)?,
		Format::Json => {
			serde_json::to_writer_pretty(&mut writer, grl)?;
			writeln!(writer)?;
		}
		_ => writer.write_all(to_string(grl, format)?.as_bytes())?,
	}
	writer.flush()?;
	Ok(())
}

/// Render `grl` in the given format.
pub fn to_string(grl: &Grl, format: Format) -> Result<String, Error> {
	Ok(match format {
		Format::Xml => xml::to_string(grl)?,
		Format::Yaml => serde_yaml::to_string(grl)?,
		Format::Json => {
			let mut s = serde_json::to_string_pretty(grl)?;
			s.push('\n');
			s
		}
		Format::Text => format!("{grl}\n"),
		Format::Cut => {
			let mut s = cut::to_cut(grl, cut::DEFAULT_RUN_NAME, cut::DEFAULT_LB_NAME);
			s.push('\n');
			s
		}
	})
}

/// Read the good run list stored at `path`, in the format given by its
/// extension. The path `-` reads XML from the standard input.
pub fn read_path(path: impl AsRef<Path>) -> Result<Grl, Error> {
	let path = path.as_ref();
	let format = Format::from_path(path)?;
	debug!("reading {}", path.display());
	if path.as_os_str() == STDIO_PATH {
		from_reader(io::stdin().lock(), format)
	} else {
		from_reader(File::open(path)?, format)
	}
}

/// Write `grl` to `path`, in the format given by its extension. The path `-`
/// writes XML to the standard output.
pub fn write_path(grl: &Grl, path: impl AsRef<Path>) -> Result<(), Error> {
	let path = path.as_ref();
	let format = Format::from_path(path)?;
	if path.as_os_str() == STDIO_PATH {
		to_writer(grl, io::stdout().lock(), format)
	} else {
		to_writer(grl, BufWriter::new(File::create(path)?), format)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use expect_test::expect;
	use goodruns::{difference_all, intersection_all, union_all, Grl, GrlError};

	use crate::{from_str, read_path, to_string, write_path, Error, Format};

	fn grl(triples: &[(i64, i64, i64)]) -> Grl {
		Grl::from_triples(triples.iter().copied()).unwrap()
	}

	fn corpus_a() -> Grl {
		read_path("./corpus/grlA.xml").unwrap()
	}

	fn corpus_b() -> Grl {
		read_path("./corpus/grlB.xml").unwrap()
	}

	#[test]
	fn test_format() {
		assert_eq!("XML".parse::<Format>().unwrap(), Format::Xml);
		assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
		assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
		assert_eq!("Text".parse::<Format>().unwrap(), Format::Text);
		assert!(matches!(
			"root".parse::<Format>(),
			Err(Error::UnsupportedFormat(f)) if f == "root"
		));

		assert_eq!(Format::from_path("a/b/grl.json").unwrap(), Format::Json);
		assert_eq!(Format::from_path("grl.TXT").unwrap(), Format::Text);
		assert_eq!(Format::from_path("-").unwrap(), Format::Xml);
		assert!(Format::from_path("grl").is_err());
		assert!(Format::from_path("grl.root").is_err());

		assert!(!Format::Cut.is_readable());
		assert!(matches!(
			from_str("", Format::Cut),
			Err(Error::UnsupportedFormat(_))
		));
	}

	#[test]
	fn test_read_corpus() {
		let a = corpus_a();
		assert_eq!(
			a,
			grl(&[
				(180225, 87, 92),
				(180225, 95, 98),
				(180225, 100, 150),
				(180241, 1, 30),
				(180241, 33, 33),
				(180309, 5, 120),
			])
		);
		assert_eq!(a.info().name.as_deref(), Some("PHYS_StandardGRL_All_Good"));
		assert_eq!(a.info().version.as_deref(), Some("2.1"));
		assert_eq!(a.info().metadata.len(), 2);
		assert_eq!(a.info().metadata[1].name, "Stream");
		assert_eq!(a.info().metadata[1].value, "physics_Muons");

		assert_eq!(read_path("./corpus/grlA.yml").unwrap(), a);
		assert_eq!(read_path("./corpus/grlA.txt").unwrap(), a);
		assert_eq!(
			to_string(&a, Format::Text).unwrap(),
			fs::read_to_string("./corpus/grlA.txt").unwrap()
		);

		assert!(matches!(
			read_path("./corpus/missing.xml"),
			Err(Error::Io(_))
		));
	}

	#[test]
	fn test_corpus_algebra() {
		let a = corpus_a();
		let b = corpus_b();

		let or = union_all([&a, &b]).unwrap();
		assert_eq!(
			or,
			grl(&[
				(180225, 87, 150),
				(180241, 1, 50),
				(180309, 5, 120),
				(180400, 1, 10),
			])
		);
		assert!(or.info().name.is_none());

		let and = intersection_all([&a, &b]).unwrap();
		assert_eq!(
			and,
			grl(&[
				(180225, 90, 92),
				(180225, 95, 98),
				(180225, 100, 140),
				(180241, 10, 30),
				(180241, 33, 33),
			])
		);

		let diff = difference_all([&a, &b]).unwrap();
		assert_eq!(
			diff,
			grl(&[
				(180225, 87, 89),
				(180225, 141, 150),
				(180241, 1, 9),
				(180309, 5, 120),
			])
		);

		// Symmetric difference is what remains of the union after the intersection
		assert_eq!(&a ^ &b, &or - &and);
		assert_eq!(&(&diff | &and) | &(&b - &a), or);

		assert!(a.contains(180225, 87));
		assert!(!a.contains(180225, 1));
		assert!(!a.contains(180225, 93));
		assert!(b.contains(180400, 10));

		assert_eq!(
			union_all([&a]).unwrap_err().to_string(),
			GrlError::Arity { given: 1 }.to_string()
		);
	}

	#[test]
	fn test_write_formats() {
		let a = grl(&[(180225, 87, 92), (180225, 100, 100), (180241, 1, 3)]);

		expect![[r#"
180225:
- - 87
  - 92
- - 100
  - 100
180241:
- - 1
  - 3
"#]]
		.assert_eq(&to_string(&a, Format::Yaml).unwrap());

		expect![[r#"
{
  "180225": [
    [
      87,
      92
    ],
    [
      100,
      100
    ]
  ],
  "180241": [
    [
      1,
      3
    ]
  ]
}
"#]]
		.assert_eq(&to_string(&a, Format::Json).unwrap());

		expect![[r#"
((RunNumber==180225)&&((lbn>=87&&lbn<=92)|(lbn>=100&&lbn<=100)))|((RunNumber==180241)&&(lbn>=1&&lbn<=3))
"#]]
		.assert_eq(&to_string(&a, Format::Cut).unwrap());

		for format in [Format::Xml, Format::Yaml, Format::Json, Format::Text] {
			let s = to_string(&a, format).unwrap();
			assert_eq!(from_str(&s, format).unwrap(), a, "{format}");
		}
	}

	#[test]
	fn test_path_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let a = corpus_a();
		for format in [Format::Xml, Format::Yaml, Format::Json, Format::Text] {
			let path = dir.path().join(format!("grl.{}", format.extension()));
			write_path(&a, &path).unwrap();
			let back = read_path(&path).unwrap();
			assert_eq!(back, a, "{format}");
			if format == Format::Xml {
				assert_eq!(back.info(), a.info());
			}
		}

		let path = dir.path().join("grl.cut");
		write_path(&a, &path).unwrap();
		assert!(fs::read_to_string(&path)
			.unwrap()
			.starts_with("(((RunNumber==180225)&&"));
		assert!(matches!(read_path(&path), Err(Error::UnsupportedFormat(_))));
	}

	#[test]
	fn test_read_invalid() {
		assert!(matches!(
			from_str("1234:\n- [5, 4]\n", Format::Yaml),
			Err(Error::Yaml(_))
		));
		assert!(matches!(
			from_str("run:\n- [1, 2]\n", Format::Yaml),
			Err(Error::Yaml(_))
		));
		assert!(matches!(
			from_str(r#"{"1": [[1, 2, 3]]}"#, Format::Json),
			Err(Error::Json(_))
		));
		assert!(matches!(
			from_str("---------------\nRUN: 7\nLUMIBLOCKS:\n  9 - 3\n", Format::Text),
			Err(Error::Grl(GrlError::InvalidRange { start: 9, end: 3 }))
		));
		assert!(matches!(
			from_str("<LumiRangeCollection>", Format::Xml),
			Err(Error::Xml(_))
		));
	}
}
