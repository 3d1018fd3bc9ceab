//! Attribute-level validation shared by every element of the TMX model.
//!
//! All functions here are pure: they either return the coerced value or an
//! [`Error`] naming the element, the attribute and what was expected. The
//! same rules run on the way in (parsing) and on the way out (serialization).

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::{error::Error, xml};

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{8}T\d{6}Z$").unwrap();
}

/// TMX timestamp pattern, e.g. `20240101T120000Z`. Always UTC.
const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// The kind of segmentation used in a translation unit (`segtype`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Segtype {
    Block,
    #[default]
    Sentence,
    Phrase,
    Paragraph,
}

impl Segtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segtype::Block => "block",
            Segtype::Sentence => "sentence",
            Segtype::Phrase => "phrase",
            Segtype::Paragraph => "paragraph",
        }
    }
}

/// Whether an isolated tag opens or closes its native code pair (`it@pos`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pos {
    Begin,
    End,
}

impl Pos {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Begin => "begin",
            Pos::End => "end",
        }
    }
}

/// Which side of the surrounding text a placeholder belongs to (`ph@assoc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assoc {
    /// Associated with the text preceding the element (`p`).
    Prior,
    /// Associated with the text following the element (`f`).
    Following,
    /// Associated with the text on both sides (`b`).
    Both,
}

impl Assoc {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assoc::Prior => "p",
            Assoc::Following => "f",
            Assoc::Both => "b",
        }
    }
}

/// Looks up a required attribute, failing with [`Error::MissingAttribute`].
pub(crate) fn required<'e>(
    el: &'e xml::Element,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'e str, Error> {
    el.attr(attribute).ok_or(Error::MissingAttribute {
        element,
        attribute,
    })
}

/// Rejects attributes TMX 1.4b does not define for this element.
pub(crate) fn check_attributes(
    el: &xml::Element,
    element: &'static str,
    known: &[&str],
) -> Result<(), Error> {
    for (name, _) in &el.attrs {
        if !known.contains(&name.as_str()) {
            return Err(Error::UnknownAttribute {
                element,
                attribute: name.clone(),
            });
        }
    }
    Ok(())
}

/// Serialization-side guard: a required string attribute must hold a value.
pub(crate) fn require_nonempty(
    element: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::MissingAttribute { element, attribute });
    }
    Ok(())
}

pub(crate) fn parse_segtype(element: &'static str, value: &str) -> Result<Segtype, Error> {
    match value {
        "block" => Ok(Segtype::Block),
        "sentence" => Ok(Segtype::Sentence),
        "phrase" => Ok(Segtype::Phrase),
        "paragraph" => Ok(Segtype::Paragraph),
        _ => Err(Error::InvalidValue {
            element,
            attribute: "segtype",
            value: value.to_string(),
            expected: "one of block, paragraph, sentence or phrase",
        }),
    }
}

pub(crate) fn parse_pos(element: &'static str, value: &str) -> Result<Pos, Error> {
    match value {
        "begin" => Ok(Pos::Begin),
        "end" => Ok(Pos::End),
        _ => Err(Error::InvalidValue {
            element,
            attribute: "pos",
            value: value.to_string(),
            expected: "one of begin or end",
        }),
    }
}

pub(crate) fn parse_assoc(element: &'static str, value: &str) -> Result<Assoc, Error> {
    match value {
        "p" => Ok(Assoc::Prior),
        "f" => Ok(Assoc::Following),
        "b" => Ok(Assoc::Both),
        _ => Err(Error::InvalidValue {
            element,
            attribute: "assoc",
            value: value.to_string(),
            expected: "one of p, f or b",
        }),
    }
}

/// Parses a TMX timestamp. The shape is regex-checked first so that chrono's
/// lenient field parsing cannot accept a malformed string.
pub(crate) fn parse_date(
    element: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, Error> {
    if !DATE_RE.is_match(value) {
        return Err(Error::InvalidValue {
            element,
            attribute,
            value: value.to_string(),
            expected: "a timestamp in YYYYMMDDThhmmssZ format",
        });
    }
    let naive = NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::InvalidValue {
            element,
            attribute,
            value: value.to_string(),
            expected: "a timestamp in YYYYMMDDThhmmssZ format",
        }
    })?;
    Ok(naive.and_utc())
}

/// Renders a timestamp back to the exact TMX wire pattern.
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a non-negative integer attribute (`usagecount`, `i`, `x`).
pub(crate) fn parse_count(
    element: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<u32, Error> {
    u32::from_str(value.trim()).map_err(|_| Error::InvalidValue {
        element,
        attribute,
        value: value.to_string(),
        expected: "a non-negative integer",
    })
}

/// Optional integer attribute.
pub(crate) fn opt_count(
    el: &xml::Element,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<u32>, Error> {
    el.attr(attribute)
        .map(|value| parse_count(element, attribute, value))
        .transpose()
}

/// Optional timestamp attribute.
pub(crate) fn opt_date(
    el: &xml::Element,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<chrono::DateTime<Utc>>, Error> {
    el.attr(attribute)
        .map(|value| parse_date(element, attribute, value))
        .transpose()
}

/// Checks that an `xml:lang` value is a well-formed language tag. The raw
/// string is what gets stored and re-serialized; validation never rewrites it.
pub(crate) fn validate_lang(element: &'static str, value: &str) -> Result<(), Error> {
    if value.parse::<LanguageIdentifier>().is_err() {
        return Err(Error::InvalidValue {
            element,
            attribute: "xml:lang",
            value: value.to_string(),
            expected: "a language tag such as en or en-US",
        });
    }
    Ok(())
}
