//! All error types for the tmxcodec crate.
//!
//! These are returned from all fallible operations (parsing, validation,
//! serialization, export). Nothing is retried or recovered internally:
//! a single invalid element aborts the whole parse, and a validation
//! failure aborts the whole export before any output is written.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML syntax error: {0}")]
    XmlSyntax(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML document has no root element")]
    EmptyDocument,

    #[error("expected a <{expected}> element but found <{found}>")]
    WrongTag {
        expected: &'static str,
        found: String,
    },

    #[error("<{element}> is missing the required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> does not allow the attribute `{attribute}`")]
    UnknownAttribute {
        element: &'static str,
        attribute: String,
    },

    #[error("value `{value}` for {element}@{attribute} is invalid, expected {expected}")]
    InvalidValue {
        element: &'static str,
        attribute: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unknown inline tag <{tag}> inside <{parent}>")]
    UnknownTag { parent: &'static str, tag: String },

    #[error("unexpected element <{tag}> inside <{parent}>")]
    UnknownElement { parent: &'static str, tag: String },

    #[error("<{element}> elements are not allowed to contain character data")]
    UnexpectedText { element: &'static str },

    #[error("<tuv> elements may only contain a single <seg>")]
    DuplicateSegment,

    #[error("<{parent}> is missing its <{tag}> child element")]
    MissingElement {
        parent: &'static str,
        tag: &'static str,
    },

    #[error("bpt/ept pairing broken in <tuv xml:lang=\"{lang}\">: {detail}")]
    Pairing { lang: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_names_the_attribute() {
        let error = Error::MissingAttribute {
            element: "header",
            attribute: "srclang",
        };
        assert_eq!(
            error.to_string(),
            "<header> is missing the required attribute `srclang`"
        );
    }

    #[test]
    fn test_invalid_value_lists_expectation() {
        let error = Error::InvalidValue {
            element: "header",
            attribute: "segtype",
            value: "invalid".to_string(),
            expected: "one of block, paragraph, sentence or phrase",
        };
        let display = error.to_string();
        assert!(display.contains("segtype"));
        assert!(display.contains("invalid"));
        assert!(display.contains("block, paragraph, sentence or phrase"));
    }

    #[test]
    fn test_unknown_tag_error() {
        let error = Error::UnknownTag {
            parent: "seg",
            tag: "blink".to_string(),
        };
        assert_eq!(error.to_string(), "unknown inline tag <blink> inside <seg>");
    }

    #[test]
    fn test_pairing_error_names_the_language() {
        let error = Error::Pairing {
            lang: "en-US".to_string(),
            detail: "<bpt i=\"1\"> has no matching <ept>".to_string(),
        };
        assert!(error.to_string().contains("en-US"));
        assert!(error.to_string().contains("no matching <ept>"));
    }

    #[test]
    fn test_io_error_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::WrongTag {
            expected: "tmx",
            found: "xliff".to_string(),
        };
        let debug = format!("{:?}", error);
        assert!(debug.contains("WrongTag"));
        assert!(debug.contains("xliff"));
    }
}
