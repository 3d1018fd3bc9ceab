use indoc::indoc;
use tempfile::TempDir;
use tmxcodec::{Error, Parser, Run, Segtype, Tmx};

const SAMPLE: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <tmx version="1.4">
      <header creationtool="ExampleTool" creationtoolversion="2.1" segtype="sentence"
              o-tmf="ExampleTM" adminlang="en-US" srclang="en-US" datatype="plaintext"
              creationdate="20240101T120000Z" creationid="amira">
        <note>Exported for review.</note>
        <prop type="x-domain">ui</prop>
      </header>
      <body>
        <tu tuid="greeting" usagecount="4" lastusagedate="20240301T090000Z">
          <note xml:lang="en">Shown on the landing page.</note>
          <tuv xml:lang="en-US">
            <seg>Click <bpt i="1">&lt;b&gt;</bpt>here<ept i="1">&lt;/b&gt;</ept> to start.</seg>
          </tuv>
          <tuv xml:lang="fr-FR">
            <seg>Cliquez <bpt i="1">&lt;b&gt;</bpt>ici<ept i="1">&lt;/b&gt;</ept> pour commencer.</seg>
          </tuv>
        </tu>
        <tu tuid="farewell">
          <tuv xml:lang="en-US"><seg>Goodbye</seg></tuv>
          <tuv xml:lang="fr-FR"><seg>Au revoir</seg></tuv>
        </tu>
      </body>
    </tmx>
"#};

#[test]
fn test_parse_full_document() {
    let tmx = Tmx::from_str(SAMPLE).unwrap();
    assert_eq!(tmx.header.creationtool, "ExampleTool");
    assert_eq!(tmx.header.segtype, Segtype::Sentence);
    assert_eq!(tmx.header.notes.len(), 1);
    assert_eq!(tmx.header.props.len(), 1);
    assert_eq!(tmx.tus.len(), 2);

    let greeting = &tmx.tus[0];
    assert_eq!(greeting.usagecount, Some(4));
    assert_eq!(greeting.notes[0].lang.as_deref(), Some("en"));
    assert_eq!(
        greeting.variant("en-US").unwrap().plain_text(),
        "Click <b>here</b> to start."
    );
}

#[test]
fn test_round_trip_reproduces_identical_model() {
    let tmx = Tmx::from_str(SAMPLE).unwrap();
    let exported = tmx.to_xml_string().unwrap();
    let reparsed = Tmx::from_str(&exported).unwrap();
    assert_eq!(tmx, reparsed);
}

#[test]
fn test_date_string_round_trips_exactly() {
    let tmx = Tmx::from_str(SAMPLE).unwrap();
    let exported = tmx.to_xml_string().unwrap();
    assert!(exported.contains(r#"creationdate="20240101T120000Z""#));
    assert!(exported.contains(r#"lastusagedate="20240301T090000Z""#));
}

#[test]
fn test_remove_variant_then_round_trip() {
    let mut tmx = Tmx::from_str(SAMPLE).unwrap();
    for tu in tmx.iter_mut() {
        tu.tuvs.retain(|tuv| tuv.lang != "fr-FR");
    }
    let reparsed = Tmx::from_str(&tmx.to_xml_string().unwrap()).unwrap();
    for tu in reparsed.iter() {
        assert_eq!(tu.tuvs.len(), 1);
        assert_eq!(tu.tuvs[0].lang, "en-US");
    }
}

#[test]
fn test_export_rejects_unpaired_bpt_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.tmx");

    let mut tmx = Tmx::from_str(SAMPLE).unwrap();
    // drop the ept, leaving its bpt dangling
    let tuv = tmx.tus[0].variant_mut("en-US").unwrap();
    tuv.segment.retain(|run| !matches!(run, Run::Ept(_)));

    let err = tmx.write_to(&path).unwrap_err();
    assert!(matches!(err, Error::Pairing { .. }));
    // nothing may be left behind at the destination
    assert!(!path.exists());
}

#[test]
fn test_write_and_read_back_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.tmx");

    let tmx = Tmx::from_str(SAMPLE).unwrap();
    tmx.write_to(&path).unwrap();
    let read_back = Tmx::read_from(&path).unwrap();
    assert_eq!(tmx, read_back);
}

#[test]
fn test_read_utf16_file_with_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("utf16.tmx");

    let mut bytes: Vec<u8> = vec![0xFF, 0xFE];
    for unit in SAMPLE.encode_utf16() {
        bytes.extend(unit.to_le_bytes());
    }
    std::fs::write(&path, bytes).unwrap();

    let tmx = Tmx::read_from(&path).unwrap();
    assert_eq!(tmx.tus.len(), 2);
    assert_eq!(tmx.tus[1].variant("fr-FR").unwrap().plain_text(), "Au revoir");
}

#[test]
fn test_unknown_body_element_aborts_parse() {
    let err = Tmx::from_str(indoc! {r#"
        <tmx version="1.4">
          <header creationtool="t" creationtoolversion="1" segtype="sentence"
                  o-tmf="tmx" adminlang="en" srclang="en" datatype="plaintext"/>
          <body>
            <unit id="nope"/>
          </body>
        </tmx>
    "#})
    .unwrap_err();
    assert!(matches!(err, Error::UnknownElement { parent: "body", tag } if tag == "unit"));
}

#[test]
fn test_unknown_inline_tag_aborts_parse() {
    let err = Tmx::from_str(indoc! {r#"
        <tmx version="1.4">
          <header creationtool="t" creationtoolversion="1" segtype="sentence"
                  o-tmf="tmx" adminlang="en" srclang="en" datatype="plaintext"/>
          <body>
            <tu><tuv xml:lang="en"><seg>a <g id="1">b</g></seg></tuv></tu>
          </body>
        </tmx>
    "#})
    .unwrap_err();
    assert!(matches!(err, Error::UnknownTag { parent: "seg", tag } if tag == "g"));
}

#[test]
fn test_malformed_xml_aborts_parse() {
    let err = Tmx::from_str("<tmx version=\"1.4\"><header></tmx>").unwrap_err();
    assert!(matches!(err, Error::XmlSyntax(_)));
}
