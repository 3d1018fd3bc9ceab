//! Capability traits for the TMX object model.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::{error::Error, xml};

/// Builds one element of the object model from one XML element.
///
/// Parsing is strict: the tag must match, attributes go through the
/// validators in [`crate::attr`], and unrecognized children fail instead of
/// being dropped.
pub trait FromElement: Sized {
    /// The XML tag this type corresponds to.
    const TAG: &'static str;

    fn from_element(element: &xml::Element) -> Result<Self, Error>;
}

/// Renders one element of the object model back to an XML element,
/// re-validating every attribute immediately before it is written.
pub trait ToElement {
    fn to_element(&self) -> Result<xml::Element, Error>;
}

pub(crate) fn expect_tag(el: &xml::Element, expected: &'static str) -> Result<(), Error> {
    if el.name != expected {
        return Err(Error::WrongTag {
            expected,
            found: el.name.clone(),
        });
    }
    Ok(())
}

/// A trait for parsing and writing a whole TMX document from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use tmxcodec::traits::Parser;
/// let memory = tmxcodec::Tmx::read_from("memory.tmx")?;
/// memory.write_to("memory_copy.tmx")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path. The document is fully validated in memory first,
    /// so a failed export never leaves a partial file behind.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&out)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
