//! The XML good run list schema:
//!
//! ```xml
//! <LumiRangeCollection>
//!    <NamedLumiRange>
//!       <Name>...</Name>
//!       <Version>...</Version>
//!       <Metadata Name="...">...</Metadata>
//!       <LumiBlockCollection>
//!          <Run>180225</Run>
//!          <LBRange Start="87" End="92"/>
//!       </LumiBlockCollection>
//!    </NamedLumiRange>
//! </LumiRangeCollection>
//! ```

use std::io::BufRead;

use goodruns::{Grl, GrlInfo, Lumiblock, Metadata, Run};
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

use crate::Error;

/// XML declaration written before the document
const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "LumiRangeCollection")]
struct LumiRangeCollection {
	#[serde(default, rename = "NamedLumiRange")]
	named: Vec<NamedLumiRange>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct NamedLumiRange {
	#[serde(default, rename = "Name", skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(default, rename = "Version", skip_serializing_if = "Option::is_none")]
	version: Option<String>,
	#[serde(default, rename = "Metadata", skip_serializing_if = "Vec::is_empty")]
	metadata: Vec<XmlMetadata>,
	#[serde(default, rename = "LumiBlockCollection")]
	collections: Vec<LumiBlockCollection>,
}

#[derive(Debug, Deserialize, Serialize)]
struct XmlMetadata {
	#[serde(rename = "@Name")]
	name: String,
	#[serde(default, rename = "$text")]
	value: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct LumiBlockCollection {
	#[serde(rename = "Run")]
	run: Run,
	#[serde(default, rename = "LBRange")]
	ranges: Vec<LbRange>,
}

#[derive(Debug, Deserialize, Serialize)]
struct LbRange {
	#[serde(rename = "@Start")]
	start: Lumiblock,
	#[serde(rename = "@End")]
	end: Lumiblock,
}

impl LumiRangeCollection {
	/// Load every lumiblock range of every named range into a single list.
	fn into_grl(self) -> Result<Grl, Error> {
		let mut named = self.named.into_iter();
		let Some(first) = named.next() else {
			return Ok(Grl::new());
		};
		let info = GrlInfo {
			name: first.name,
			version: first.version,
			metadata: first
				.metadata
				.into_iter()
				.map(|m| Metadata {
					name: m.name,
					value: m.value,
				})
				.collect(),
		};
		let mut grl = Grl::new();
		for col in first
			.collections
			.into_iter()
			.chain(named.flat_map(|n| n.collections))
		{
			for r in col.ranges {
				grl.insert_bounds(col.run, r.start, r.end)?;
			}
		}
		Ok(grl.with_info(info))
	}

	fn from_grl(grl: &Grl) -> Self {
		let info = grl.info();
		let named = NamedLumiRange {
			name: info.name.clone(),
			version: info.version.clone(),
			metadata: info
				.metadata
				.iter()
				.map(|m| XmlMetadata {
					name: m.name.clone(),
					value: m.value.clone(),
				})
				.collect(),
			collections: grl
				.runs()
				.map(|run| LumiBlockCollection {
					run,
					ranges: grl
						.get(run)
						.unwrap_or_default()
						.iter()
						.map(|r| LbRange {
							start: r.start(),
							end: r.end(),
						})
						.collect(),
				})
				.collect(),
		};
		Self { named: vec![named] }
	}
}

/// Read an XML good run list.
pub(crate) fn from_reader<R: BufRead>(reader: R) -> Result<Grl, Error> {
	let doc: LumiRangeCollection = quick_xml::de::from_reader(reader)?;
	doc.into_grl()
}

/// Read an XML good run list from a string.
pub(crate) fn from_str(s: &str) -> Result<Grl, Error> {
	let doc: LumiRangeCollection = quick_xml::de::from_str(s)?;
	doc.into_grl()
}

/// Render `grl` as an indented XML document, including its declaration.
pub(crate) fn to_string(grl: &Grl) -> Result<String, Error> {
	let mut out = String::from(DECLARATION);
	out.push('\n');
	let mut ser = Serializer::new(&mut out);
	let _ = ser.indent(' ', 3);
	LumiRangeCollection::from_grl(grl)
		.serialize(ser)
		.map_err(|e| Error::XmlWrite(e.to_string()))?;
	out.push('\n');
	Ok(out)
}
