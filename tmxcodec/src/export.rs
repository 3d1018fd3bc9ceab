//! CSV export of a translation memory.
//!
//! One column per language (in order of first appearance across the file),
//! one row per translation unit, each cell the plain-text rendering of that
//! language's variant. This is a lossy convenience view; inline tags and all
//! metadata are flattened away. The object model is consumed read-only.

use std::{fs::File, io::Write, path::Path};

use csv::WriterBuilder;

use crate::{error::Error, types::Tmx};

/// Languages present in the file, in order of first appearance.
pub fn languages(tmx: &Tmx) -> Vec<String> {
    let mut langs: Vec<String> = Vec::new();
    for tu in &tmx.tus {
        for tuv in &tu.tuvs {
            if !langs.contains(&tuv.lang) {
                langs.push(tuv.lang.clone());
            }
        }
    }
    langs
}

/// Writes the memory as CSV to any writer.
pub fn to_csv_writer<W: Write>(tmx: &Tmx, writer: W) -> Result<(), Error> {
    let langs = languages(tmx);
    if langs.is_empty() {
        return Ok(());
    }
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(&langs)?;
    for tu in &tmx.tus {
        let row: Vec<String> = langs
            .iter()
            .map(|lang| {
                tu.variant(lang)
                    .map(|tuv| tuv.plain_text())
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the memory as CSV to a file path.
pub fn write_csv<P: AsRef<Path>>(tmx: &Tmx, path: P) -> Result<(), Error> {
    let file = File::create(path)?;
    to_csv_writer(tmx, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;
    use indoc::indoc;

    fn sample() -> Tmx {
        Tmx::from_str(indoc! {r#"
            <tmx version="1.4">
              <header creationtool="t" creationtoolversion="1" segtype="sentence"
                      o-tmf="tmx" adminlang="en" srclang="en-US" datatype="plaintext"/>
              <body>
                <tu>
                  <tuv xml:lang="en-US"><seg>Hello</seg></tuv>
                  <tuv xml:lang="fr-FR"><seg>Bonjour</seg></tuv>
                </tu>
                <tu>
                  <tuv xml:lang="en-US"><seg>Goodbye, world</seg></tuv>
                </tu>
              </body>
            </tmx>
        "#})
        .unwrap()
    }

    #[test]
    fn test_languages_in_order_of_first_appearance() {
        assert_eq!(languages(&sample()), vec!["en-US", "fr-FR"]);
    }

    #[test]
    fn test_csv_shape() {
        let mut out = Vec::new();
        to_csv_writer(&sample(), &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("en-US,fr-FR"));
        assert_eq!(lines.next(), Some("Hello,Bonjour"));
        // missing variant leaves an empty cell; the comma forces quoting
        assert_eq!(lines.next(), Some("\"Goodbye, world\","));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_memory_yields_header_only() {
        let tmx = Tmx::from_str(indoc! {r#"
            <tmx version="1.4">
              <header creationtool="t" creationtoolversion="1" segtype="sentence"
                      o-tmf="tmx" adminlang="en" srclang="en" datatype="plaintext"/>
              <body/>
            </tmx>
        "#})
        .unwrap();
        let mut out = Vec::new();
        to_csv_writer(&tmx, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().trim().is_empty());
    }
}
