use chrono::TimeZone;
use proptest::prelude::*;
use tmxcodec::{CodeRun, Header, Hi, It, Parser, Ph, Pos, Run, Segtype, Tmx, Tu, Tuv};

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,.!?'-]{1,24}").expect("valid text regex")
}

fn tuid_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("valid tuid regex")
}

fn lang_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en".to_string()),
        Just("en-US".to_string()),
        Just("fr-FR".to_string()),
        Just("de".to_string()),
        Just("pt-BR".to_string()),
    ]
}

fn segtype_strategy() -> impl Strategy<Value = Segtype> {
    prop_oneof![
        Just(Segtype::Block),
        Just(Segtype::Sentence),
        Just(Segtype::Phrase),
        Just(Segtype::Paragraph),
    ]
}

fn tag_run_strategy() -> impl Strategy<Value = Run> {
    prop_oneof![
        text_strategy().prop_map(|code| {
            Run::Ph(Ph {
                x: Some(1),
                kind: Some("x-code".to_string()),
                assoc: None,
                content: vec![CodeRun::Text(code)],
            })
        }),
        text_strategy().prop_map(|inner| {
            Run::Hi(Hi {
                x: None,
                kind: Some("term".to_string()),
                content: vec![Run::Text(inner)],
            })
        }),
        Just(Run::It(It {
            pos: Pos::Begin,
            x: Some(2),
            kind: None,
            content: Vec::new(),
        })),
    ]
}

// Text runs never end up adjacent or empty, so the sequence survives the
// text/tail merging a reparse performs.
fn segment_strategy() -> impl Strategy<Value = Vec<Run>> {
    (
        proptest::option::of(text_strategy()),
        prop::collection::vec((tag_run_strategy(), text_strategy()), 0..3),
    )
        .prop_map(|(lead, pairs)| {
            let mut runs = Vec::new();
            if let Some(lead) = lead {
                runs.push(Run::Text(lead));
            }
            for (tag, text) in pairs {
                runs.push(tag);
                runs.push(Run::Text(text));
            }
            runs
        })
}

fn tuv_strategy() -> impl Strategy<Value = Tuv> {
    (lang_strategy(), segment_strategy()).prop_map(|(lang, segment)| Tuv {
        lang,
        segment,
        ..Tuv::default()
    })
}

fn tu_strategy() -> impl Strategy<Value = Tu> {
    (
        proptest::option::of(tuid_strategy()),
        prop::collection::vec(tuv_strategy(), 0..4),
    )
        .prop_map(|(tuid, tuvs)| Tu {
            tuid,
            tuvs,
            ..Tu::default()
        })
}

fn header_strategy() -> impl Strategy<Value = Header> {
    (segtype_strategy(), lang_strategy(), proptest::bool::ANY).prop_map(
        |(segtype, srclang, dated)| Header {
            creationtool: "tmxcodec-proptest".to_string(),
            creationtoolversion: "1.0".to_string(),
            segtype,
            o_tmf: "tmx".to_string(),
            adminlang: "en-US".to_string(),
            srclang,
            datatype: "plaintext".to_string(),
            creationdate: dated
                .then(|| chrono::Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
            ..Header::default()
        },
    )
}

fn tmx_strategy() -> impl Strategy<Value = Tmx> {
    (header_strategy(), prop::collection::vec(tu_strategy(), 0..5))
        .prop_map(|(header, tus)| Tmx { header, tus })
}

proptest! {
    #[test]
    fn round_trip_reproduces_the_model(tmx in tmx_strategy()) {
        let exported = tmx.to_xml_string().expect("export should succeed");
        let reparsed = Tmx::from_str(&exported).expect("reparse should succeed");
        prop_assert_eq!(tmx, reparsed);
    }

    #[test]
    fn export_starts_with_declaration(tmx in tmx_strategy()) {
        let exported = tmx.to_xml_string().expect("export should succeed");
        prop_assert!(exported.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    }

    #[test]
    fn plain_text_matches_segment_text(segment in segment_strategy()) {
        let tuv = Tuv { lang: "en".to_string(), segment, ..Tuv::default() };
        let mut expected = String::new();
        for run in &tuv.segment {
            match run {
                Run::Text(text) => expected.push_str(text),
                Run::Ph(ph) => {
                    for code in &ph.content {
                        if let CodeRun::Text(text) = code {
                            expected.push_str(text);
                        }
                    }
                }
                Run::Hi(hi) => {
                    for inner in &hi.content {
                        if let Run::Text(text) = inner {
                            expected.push_str(text);
                        }
                    }
                }
                _ => {}
            }
        }
        prop_assert_eq!(tuv.plain_text(), expected);
    }
}

#[test]
fn paired_tags_round_trip() {
    let mut tu = Tu::default();
    tu.tuvs.push(Tuv {
        lang: "en".to_string(),
        segment: vec![
            Run::Text("Press ".to_string()),
            Run::Bpt(tmxcodec::Bpt {
                i: 1,
                x: None,
                kind: Some("bold".to_string()),
                content: vec![CodeRun::Text("<b>".to_string())],
            }),
            Run::Text("Enter".to_string()),
            Run::Ept(tmxcodec::Ept {
                i: 1,
                content: vec![CodeRun::Text("</b>".to_string())],
            }),
        ],
        ..Tuv::default()
    });
    let mut tmx = Tmx::new(Header {
        creationtool: "t".to_string(),
        creationtoolversion: "1".to_string(),
        o_tmf: "tmx".to_string(),
        adminlang: "en".to_string(),
        srclang: "en".to_string(),
        datatype: "plaintext".to_string(),
        ..Header::default()
    });
    tmx.add_tu(tu);

    let exported = tmx.to_xml_string().unwrap();
    let reparsed = Tmx::from_str(&exported).unwrap();
    assert_eq!(tmx, reparsed);
}
