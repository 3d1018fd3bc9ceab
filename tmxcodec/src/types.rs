//! The TMX object model: Tmx, Header, Tu, Tuv, Note, Prop, Ude.
//!
//! Every entity is a plain struct with public fields. Child collections are
//! ordered `Vec`s; the order of tuvs inside a tu is meaningful (the first
//! variant's language is conventionally the source).
//!
//! Each entity can be built three ways: from `Default` plus field
//! assignments, from an XML element (`from_element`), or from an XML element
//! on top of an existing value (`from_element_with`). In the last form the
//! node always wins: attributes present on the element overwrite the
//! defaults field by field, and element children replace the defaults'
//! children wholesale.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesText, Event},
};
use serde::Serialize;

use crate::{
    attr::{self, Segtype},
    error::Error,
    inline::{self, Run},
    traits::{FromElement, Parser, ToElement, expect_tag},
    xml::{Element, Node},
};

/// `<note>` - a free comment attached to a header, tu or tuv.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Note {
    pub text: String,
    pub lang: Option<String>,
    pub o_encoding: Option<String>,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Note {
            text: text.into(),
            ..Note::default()
        }
    }

    pub fn from_element_with(el: &Element, defaults: Note) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["xml:lang", "o-encoding"])?;
        let mut note = defaults;
        if let Some(lang) = el.attr("xml:lang") {
            attr::validate_lang(Self::TAG, lang)?;
            note.lang = Some(lang.to_string());
        }
        if let Some(encoding) = el.attr("o-encoding") {
            note.o_encoding = Some(encoding.to_string());
        }
        for node in &el.children {
            if let Node::Element(child) = node {
                return Err(Error::UnknownElement {
                    parent: Self::TAG,
                    tag: child.name.clone(),
                });
            }
        }
        if el.children.iter().any(|n| matches!(n, Node::Text(_))) {
            note.text = el.text();
        }
        Ok(note)
    }
}

impl FromElement for Note {
    const TAG: &'static str = "note";

    fn from_element(el: &Element) -> Result<Self, Error> {
        Self::from_element_with(el, Note::default())
    }
}

impl ToElement for Note {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("note");
        if let Some(lang) = &self.lang {
            attr::validate_lang("note", lang)?;
            el.set_attr("xml:lang", lang);
        }
        if let Some(encoding) = &self.o_encoding {
            el.set_attr("o-encoding", encoding);
        }
        el.push_text(&self.text);
        Ok(el)
    }
}

/// `<prop>` - a tool-defined property of its parent element. The `type`
/// values are not defined by the TMX standard; tools publish their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prop {
    /// The `type` attribute: what kind of data the property holds.
    pub kind: String,
    pub text: String,
    pub lang: Option<String>,
    pub o_encoding: Option<String>,
}

impl Prop {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Prop {
            kind: kind.into(),
            text: text.into(),
            ..Prop::default()
        }
    }

    pub fn from_element_with(el: &Element, defaults: Prop) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["type", "xml:lang", "o-encoding"])?;
        let mut prop = defaults;
        if let Some(kind) = el.attr("type") {
            prop.kind = kind.to_string();
        }
        if let Some(lang) = el.attr("xml:lang") {
            attr::validate_lang(Self::TAG, lang)?;
            prop.lang = Some(lang.to_string());
        }
        if let Some(encoding) = el.attr("o-encoding") {
            prop.o_encoding = Some(encoding.to_string());
        }
        for node in &el.children {
            if let Node::Element(child) = node {
                return Err(Error::UnknownElement {
                    parent: Self::TAG,
                    tag: child.name.clone(),
                });
            }
        }
        if el.children.iter().any(|n| matches!(n, Node::Text(_))) {
            prop.text = el.text();
        }
        Ok(prop)
    }
}

impl FromElement for Prop {
    const TAG: &'static str = "prop";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::required(el, Self::TAG, "type")?;
        Self::from_element_with(el, Prop::default())
    }
}

impl ToElement for Prop {
    fn to_element(&self) -> Result<Element, Error> {
        attr::require_nonempty("prop", "type", &self.kind)?;
        let mut el = Element::new("prop");
        el.set_attr("type", &self.kind);
        if let Some(lang) = &self.lang {
            attr::validate_lang("prop", lang)?;
            el.set_attr("xml:lang", lang);
        }
        if let Some(encoding) = &self.o_encoding {
            el.set_attr("o-encoding", encoding);
        }
        el.push_text(&self.text);
        Ok(el)
    }
}

/// `<map/>` - one user-defined character mapping inside a [`Ude`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UdeMap {
    pub unicode: String,
    pub code: Option<String>,
    pub ent: Option<String>,
    pub subst: Option<String>,
}

impl FromElement for UdeMap {
    const TAG: &'static str = "map";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["unicode", "code", "ent", "subst"])?;
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => {
                    return Err(Error::UnknownElement {
                        parent: Self::TAG,
                        tag: child.name.clone(),
                    });
                }
            }
        }
        Ok(UdeMap {
            unicode: attr::required(el, Self::TAG, "unicode")?.to_string(),
            code: el.attr("code").map(str::to_string),
            ent: el.attr("ent").map(str::to_string),
            subst: el.attr("subst").map(str::to_string),
        })
    }
}

impl ToElement for UdeMap {
    fn to_element(&self) -> Result<Element, Error> {
        attr::require_nonempty("map", "unicode", &self.unicode)?;
        let mut el = Element::new("map");
        el.set_attr("unicode", &self.unicode);
        if let Some(code) = &self.code {
            el.set_attr("code", code);
        }
        if let Some(ent) = &self.ent {
            el.set_attr("ent", ent);
        }
        if let Some(subst) = &self.subst {
            el.set_attr("subst", subst);
        }
        Ok(el)
    }
}

/// `<ude>` - a set of user-defined characters and their optional mapping
/// from Unicode to a tool-specific encoding. Carried for CAT tools; this
/// crate does not apply the mappings itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ude {
    pub name: String,
    pub base: Option<String>,
    pub maps: Vec<UdeMap>,
}

impl FromElement for Ude {
    const TAG: &'static str = "ude";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["name", "base"])?;
        let mut ude = Ude {
            name: attr::required(el, Self::TAG, "name")?.to_string(),
            base: el.attr("base").map(str::to_string),
            maps: Vec::new(),
        };
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => match child.name.as_str() {
                    "map" => ude.maps.push(UdeMap::from_element(child)?),
                    _ => {
                        return Err(Error::UnknownElement {
                            parent: Self::TAG,
                            tag: child.name.clone(),
                        });
                    }
                },
            }
        }
        Ok(ude)
    }
}

impl ToElement for Ude {
    fn to_element(&self) -> Result<Element, Error> {
        attr::require_nonempty("ude", "name", &self.name)?;
        // base becomes mandatory once any map remaps a code point
        if self.base.is_none() && self.maps.iter().any(|map| map.code.is_some()) {
            return Err(Error::MissingAttribute {
                element: "ude",
                attribute: "base",
            });
        }
        let mut el = Element::new("ude");
        el.set_attr("name", &self.name);
        if let Some(base) = &self.base {
            el.set_attr("base", base);
        }
        for map in &self.maps {
            el.push_child(map.to_element()?);
        }
        Ok(el)
    }
}

const HEADER_ATTRS: &[&str] = &[
    "creationtool",
    "creationtoolversion",
    "segtype",
    "o-tmf",
    "adminlang",
    "srclang",
    "datatype",
    "o-encoding",
    "creationdate",
    "creationid",
    "changedate",
    "changeid",
];

const HEADER_REQUIRED: &[&str] = &[
    "creationtool",
    "creationtoolversion",
    "segtype",
    "o-tmf",
    "adminlang",
    "srclang",
    "datatype",
];

/// `<header>` - information pertaining to the whole document.
///
/// `srclang` may be `*all*` when any language in a tu can serve as the
/// source, so it is not validated as a language tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Header {
    pub creationtool: String,
    pub creationtoolversion: String,
    pub segtype: Segtype,
    pub o_tmf: String,
    pub adminlang: String,
    pub srclang: String,
    pub datatype: String,
    pub o_encoding: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub changeid: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
    pub udes: Vec<Ude>,
}

impl Header {
    pub fn from_element_with(el: &Element, defaults: Header) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, HEADER_ATTRS)?;
        let mut header = defaults;
        if let Some(value) = el.attr("creationtool") {
            header.creationtool = value.to_string();
        }
        if let Some(value) = el.attr("creationtoolversion") {
            header.creationtoolversion = value.to_string();
        }
        if let Some(value) = el.attr("segtype") {
            header.segtype = attr::parse_segtype(Self::TAG, value)?;
        }
        if let Some(value) = el.attr("o-tmf") {
            header.o_tmf = value.to_string();
        }
        if let Some(value) = el.attr("adminlang") {
            header.adminlang = value.to_string();
        }
        if let Some(value) = el.attr("srclang") {
            header.srclang = value.to_string();
        }
        if let Some(value) = el.attr("datatype") {
            header.datatype = value.to_string();
        }
        if let Some(value) = el.attr("o-encoding") {
            header.o_encoding = Some(value.to_string());
        }
        header.creationdate = attr::opt_date(el, Self::TAG, "creationdate")?.or(header.creationdate);
        if let Some(value) = el.attr("creationid") {
            header.creationid = Some(value.to_string());
        }
        header.changedate = attr::opt_date(el, Self::TAG, "changedate")?.or(header.changedate);
        if let Some(value) = el.attr("changeid") {
            header.changeid = Some(value.to_string());
        }

        let mut cleared = false;
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => {
                    if !cleared {
                        header.notes.clear();
                        header.props.clear();
                        header.udes.clear();
                        cleared = true;
                    }
                    match child.name.as_str() {
                        "note" => header.notes.push(Note::from_element(child)?),
                        "prop" => header.props.push(Prop::from_element(child)?),
                        "ude" => header.udes.push(Ude::from_element(child)?),
                        _ => {
                            return Err(Error::UnknownElement {
                                parent: Self::TAG,
                                tag: child.name.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(header)
    }
}

impl FromElement for Header {
    const TAG: &'static str = "header";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        for &attribute in HEADER_REQUIRED {
            if el.attr(attribute).is_none() {
                return Err(Error::MissingAttribute {
                    element: Self::TAG,
                    attribute,
                });
            }
        }
        Self::from_element_with(el, Header::default())
    }
}

impl ToElement for Header {
    fn to_element(&self) -> Result<Element, Error> {
        attr::require_nonempty("header", "creationtool", &self.creationtool)?;
        attr::require_nonempty("header", "creationtoolversion", &self.creationtoolversion)?;
        attr::require_nonempty("header", "o-tmf", &self.o_tmf)?;
        attr::require_nonempty("header", "adminlang", &self.adminlang)?;
        attr::require_nonempty("header", "srclang", &self.srclang)?;
        attr::require_nonempty("header", "datatype", &self.datatype)?;
        let mut el = Element::new("header");
        el.set_attr("creationtool", &self.creationtool);
        el.set_attr("creationtoolversion", &self.creationtoolversion);
        el.set_attr("segtype", self.segtype.as_str());
        el.set_attr("o-tmf", &self.o_tmf);
        el.set_attr("adminlang", &self.adminlang);
        el.set_attr("srclang", &self.srclang);
        el.set_attr("datatype", &self.datatype);
        if let Some(encoding) = &self.o_encoding {
            el.set_attr("o-encoding", encoding);
        }
        if let Some(date) = &self.creationdate {
            el.set_attr("creationdate", attr::format_date(date));
        }
        if let Some(id) = &self.creationid {
            el.set_attr("creationid", id);
        }
        if let Some(date) = &self.changedate {
            el.set_attr("changedate", attr::format_date(date));
        }
        if let Some(id) = &self.changeid {
            el.set_attr("changeid", id);
        }
        for note in &self.notes {
            el.push_child(note.to_element()?);
        }
        for prop in &self.props {
            el.push_child(prop.to_element()?);
        }
        for ude in &self.udes {
            el.push_child(ude.to_element()?);
        }
        Ok(el)
    }
}

const TUV_ATTRS: &[&str] = &[
    "xml:lang",
    "o-encoding",
    "datatype",
    "usagecount",
    "lastusagedate",
    "creationtool",
    "creationtoolversion",
    "creationdate",
    "creationid",
    "changedate",
    "changeid",
    "o-tmf",
];

/// `<tuv>` - one language's rendition of a translation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tuv {
    /// The `xml:lang` attribute. Required; validated as a language tag.
    pub lang: String,
    pub o_encoding: Option<String>,
    pub datatype: Option<String>,
    pub usagecount: Option<u32>,
    pub lastusagedate: Option<DateTime<Utc>>,
    pub creationtool: Option<String>,
    pub creationtoolversion: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub changeid: Option<String>,
    pub o_tmf: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
    /// The `<seg>` content. Empty segments are legal.
    pub segment: Vec<Run>,
}

impl Tuv {
    pub fn new(lang: impl Into<String>) -> Self {
        Tuv {
            lang: lang.into(),
            ..Tuv::default()
        }
    }

    /// Concatenates every piece of text in the segment, in document order,
    /// native-code content included.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        inline::append_plain_text(&self.segment, &mut out);
        out
    }

    pub fn from_element_with(el: &Element, defaults: Tuv) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, TUV_ATTRS)?;
        let mut tuv = defaults;
        if let Some(lang) = el.attr("xml:lang") {
            attr::validate_lang(Self::TAG, lang)?;
            tuv.lang = lang.to_string();
        }
        if let Some(value) = el.attr("o-encoding") {
            tuv.o_encoding = Some(value.to_string());
        }
        if let Some(value) = el.attr("datatype") {
            tuv.datatype = Some(value.to_string());
        }
        tuv.usagecount = attr::opt_count(el, Self::TAG, "usagecount")?.or(tuv.usagecount);
        tuv.lastusagedate = attr::opt_date(el, Self::TAG, "lastusagedate")?.or(tuv.lastusagedate);
        if let Some(value) = el.attr("creationtool") {
            tuv.creationtool = Some(value.to_string());
        }
        if let Some(value) = el.attr("creationtoolversion") {
            tuv.creationtoolversion = Some(value.to_string());
        }
        tuv.creationdate = attr::opt_date(el, Self::TAG, "creationdate")?.or(tuv.creationdate);
        if let Some(value) = el.attr("creationid") {
            tuv.creationid = Some(value.to_string());
        }
        tuv.changedate = attr::opt_date(el, Self::TAG, "changedate")?.or(tuv.changedate);
        if let Some(value) = el.attr("changeid") {
            tuv.changeid = Some(value.to_string());
        }
        if let Some(value) = el.attr("o-tmf") {
            tuv.o_tmf = Some(value.to_string());
        }

        let mut cleared = false;
        let mut seg_seen = false;
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => {
                    if !cleared {
                        tuv.notes.clear();
                        tuv.props.clear();
                        tuv.segment.clear();
                        cleared = true;
                    }
                    match child.name.as_str() {
                        "seg" => {
                            if seg_seen {
                                return Err(Error::DuplicateSegment);
                            }
                            seg_seen = true;
                            tuv.segment = inline::parse_runs(child, "seg")?;
                        }
                        "note" => tuv.notes.push(Note::from_element(child)?),
                        "prop" => tuv.props.push(Prop::from_element(child)?),
                        _ => {
                            return Err(Error::UnknownElement {
                                parent: Self::TAG,
                                tag: child.name.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(tuv)
    }
}

impl FromElement for Tuv {
    const TAG: &'static str = "tuv";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::required(el, Self::TAG, "xml:lang")?;
        Self::from_element_with(el, Tuv::default())
    }
}

impl ToElement for Tuv {
    fn to_element(&self) -> Result<Element, Error> {
        attr::require_nonempty("tuv", "xml:lang", &self.lang)?;
        attr::validate_lang("tuv", &self.lang)?;
        let mut el = Element::new("tuv");
        el.set_attr("xml:lang", &self.lang);
        if let Some(encoding) = &self.o_encoding {
            el.set_attr("o-encoding", encoding);
        }
        if let Some(datatype) = &self.datatype {
            el.set_attr("datatype", datatype);
        }
        if let Some(count) = self.usagecount {
            el.set_attr("usagecount", count.to_string());
        }
        if let Some(date) = &self.lastusagedate {
            el.set_attr("lastusagedate", attr::format_date(date));
        }
        if let Some(tool) = &self.creationtool {
            el.set_attr("creationtool", tool);
        }
        if let Some(version) = &self.creationtoolversion {
            el.set_attr("creationtoolversion", version);
        }
        if let Some(date) = &self.creationdate {
            el.set_attr("creationdate", attr::format_date(date));
        }
        if let Some(id) = &self.creationid {
            el.set_attr("creationid", id);
        }
        if let Some(date) = &self.changedate {
            el.set_attr("changedate", attr::format_date(date));
        }
        if let Some(id) = &self.changeid {
            el.set_attr("changeid", id);
        }
        if let Some(tmf) = &self.o_tmf {
            el.set_attr("o-tmf", tmf);
        }
        for note in &self.notes {
            el.push_child(note.to_element()?);
        }
        for prop in &self.props {
            el.push_child(prop.to_element()?);
        }
        inline::check_pairing(&self.segment, &self.lang)?;
        let mut seg = Element::new("seg");
        inline::runs_into(&mut seg, &self.segment)?;
        el.push_child(seg);
        Ok(el)
    }
}

const TU_ATTRS: &[&str] = &[
    "tuid",
    "o-encoding",
    "datatype",
    "usagecount",
    "lastusagedate",
    "creationtool",
    "creationtoolversion",
    "creationdate",
    "creationid",
    "changedate",
    "segtype",
    "changeid",
    "o-tmf",
    "srclang",
];

/// `<tu>` - one translation unit: the per-language variants of a single
/// translatable segment, plus notes and properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tu {
    pub tuid: Option<String>,
    pub o_encoding: Option<String>,
    pub datatype: Option<String>,
    pub usagecount: Option<u32>,
    pub lastusagedate: Option<DateTime<Utc>>,
    pub creationtool: Option<String>,
    pub creationtoolversion: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub segtype: Option<Segtype>,
    pub changeid: Option<String>,
    pub o_tmf: Option<String>,
    /// Overrides the header's `srclang` for this unit.
    pub srclang: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
    pub tuvs: Vec<Tuv>,
}

impl Tu {
    /// Iterates over the variants in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tuv> {
        self.tuvs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tuv> {
        self.tuvs.iter_mut()
    }

    /// Finds the variant for a language, if present.
    pub fn variant(&self, lang: &str) -> Option<&Tuv> {
        self.tuvs.iter().find(|tuv| tuv.lang == lang)
    }

    pub fn variant_mut(&mut self, lang: &str) -> Option<&mut Tuv> {
        self.tuvs.iter_mut().find(|tuv| tuv.lang == lang)
    }

    pub fn from_element_with(el: &Element, defaults: Tu) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, TU_ATTRS)?;
        let mut tu = defaults;
        if let Some(value) = el.attr("tuid") {
            tu.tuid = Some(value.to_string());
        }
        if let Some(value) = el.attr("o-encoding") {
            tu.o_encoding = Some(value.to_string());
        }
        if let Some(value) = el.attr("datatype") {
            tu.datatype = Some(value.to_string());
        }
        tu.usagecount = attr::opt_count(el, Self::TAG, "usagecount")?.or(tu.usagecount);
        tu.lastusagedate = attr::opt_date(el, Self::TAG, "lastusagedate")?.or(tu.lastusagedate);
        if let Some(value) = el.attr("creationtool") {
            tu.creationtool = Some(value.to_string());
        }
        if let Some(value) = el.attr("creationtoolversion") {
            tu.creationtoolversion = Some(value.to_string());
        }
        tu.creationdate = attr::opt_date(el, Self::TAG, "creationdate")?.or(tu.creationdate);
        if let Some(value) = el.attr("creationid") {
            tu.creationid = Some(value.to_string());
        }
        tu.changedate = attr::opt_date(el, Self::TAG, "changedate")?.or(tu.changedate);
        if let Some(value) = el.attr("segtype") {
            tu.segtype = Some(attr::parse_segtype(Self::TAG, value)?);
        }
        if let Some(value) = el.attr("changeid") {
            tu.changeid = Some(value.to_string());
        }
        if let Some(value) = el.attr("o-tmf") {
            tu.o_tmf = Some(value.to_string());
        }
        if let Some(value) = el.attr("srclang") {
            tu.srclang = Some(value.to_string());
        }

        let mut cleared = false;
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => {
                    if !cleared {
                        tu.notes.clear();
                        tu.props.clear();
                        tu.tuvs.clear();
                        cleared = true;
                    }
                    match child.name.as_str() {
                        "tuv" => tu.tuvs.push(Tuv::from_element(child)?),
                        "note" => tu.notes.push(Note::from_element(child)?),
                        "prop" => tu.props.push(Prop::from_element(child)?),
                        _ => {
                            return Err(Error::UnknownElement {
                                parent: Self::TAG,
                                tag: child.name.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(tu)
    }
}

impl FromElement for Tu {
    const TAG: &'static str = "tu";

    fn from_element(el: &Element) -> Result<Self, Error> {
        Self::from_element_with(el, Tu::default())
    }
}

impl ToElement for Tu {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("tu");
        if let Some(tuid) = &self.tuid {
            el.set_attr("tuid", tuid);
        }
        if let Some(encoding) = &self.o_encoding {
            el.set_attr("o-encoding", encoding);
        }
        if let Some(datatype) = &self.datatype {
            el.set_attr("datatype", datatype);
        }
        if let Some(count) = self.usagecount {
            el.set_attr("usagecount", count.to_string());
        }
        if let Some(date) = &self.lastusagedate {
            el.set_attr("lastusagedate", attr::format_date(date));
        }
        if let Some(tool) = &self.creationtool {
            el.set_attr("creationtool", tool);
        }
        if let Some(version) = &self.creationtoolversion {
            el.set_attr("creationtoolversion", version);
        }
        if let Some(date) = &self.creationdate {
            el.set_attr("creationdate", attr::format_date(date));
        }
        if let Some(id) = &self.creationid {
            el.set_attr("creationid", id);
        }
        if let Some(date) = &self.changedate {
            el.set_attr("changedate", attr::format_date(date));
        }
        if let Some(segtype) = self.segtype {
            el.set_attr("segtype", segtype.as_str());
        }
        if let Some(id) = &self.changeid {
            el.set_attr("changeid", id);
        }
        if let Some(tmf) = &self.o_tmf {
            el.set_attr("o-tmf", tmf);
        }
        if let Some(srclang) = &self.srclang {
            el.set_attr("srclang", srclang);
        }
        for note in &self.notes {
            el.push_child(note.to_element()?);
        }
        for prop in &self.props {
            el.push_child(prop.to_element()?);
        }
        for tuv in &self.tuvs {
            el.push_child(tuv.to_element()?);
        }
        Ok(el)
    }
}

/// `<tmx>` - the document root: one header plus the body's translation
/// units. The TMX version is fixed at 1.4.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tmx {
    pub header: Header,
    pub tus: Vec<Tu>,
}

impl Tmx {
    pub const VERSION: &'static str = "1.4";

    pub fn new(header: Header) -> Self {
        Tmx {
            header,
            tus: Vec::new(),
        }
    }

    /// Iterates over the translation units in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tu> {
        self.tus.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tu> {
        self.tus.iter_mut()
    }

    pub fn add_tu(&mut self, tu: Tu) {
        self.tus.push(tu);
    }

    /// Serializes the whole document to a UTF-8 string, XML declaration
    /// included.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        // to_writer only ever emits UTF-8
        Ok(String::from_utf8(out).map_err(std::io::Error::other)?)
    }
}

impl FromElement for Tmx {
    const TAG: &'static str = "tmx";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["version"])?;
        let version = attr::required(el, Self::TAG, "version")?;
        if version != Self::VERSION {
            return Err(Error::InvalidValue {
                element: Self::TAG,
                attribute: "version",
                value: version.to_string(),
                expected: "1.4",
            });
        }
        let mut header = None;
        let mut tus = Vec::new();
        for node in &el.children {
            match node {
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(Error::UnexpectedText { element: Self::TAG }),
                Node::Element(child) => match child.name.as_str() {
                    "header" => header = Some(Header::from_element(child)?),
                    "body" => {
                        for body_node in &child.children {
                            match body_node {
                                Node::Text(text) if text.trim().is_empty() => {}
                                Node::Text(_) => {
                                    return Err(Error::UnexpectedText { element: "body" });
                                }
                                Node::Element(tu_el) => match tu_el.name.as_str() {
                                    "tu" => tus.push(Tu::from_element(tu_el)?),
                                    _ => {
                                        return Err(Error::UnknownElement {
                                            parent: "body",
                                            tag: tu_el.name.clone(),
                                        });
                                    }
                                },
                            }
                        }
                    }
                    _ => {
                        return Err(Error::UnknownElement {
                            parent: Self::TAG,
                            tag: child.name.clone(),
                        });
                    }
                },
            }
        }
        let header = header.ok_or(Error::MissingElement {
            parent: Self::TAG,
            tag: "header",
        })?;
        Ok(Tmx { header, tus })
    }
}

impl ToElement for Tmx {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("tmx");
        el.set_attr("version", Self::VERSION);
        el.push_child(self.header.to_element()?);
        let mut body = Element::new("body");
        for tu in &self.tus {
            body.push_child(tu.to_element()?);
        }
        el.push_child(body);
        Ok(el)
    }
}

impl Parser for Tmx {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let root = Element::from_reader(reader)?;
        Tmx::from_element(&root)
    }

    /// Write to any writer. The whole element tree is built and validated
    /// before the first byte is emitted.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let root = self.to_element()?;
        let mut xml_writer = Writer::new(&mut writer);
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        root.write_events(&mut xml_writer)?;
        Ok(())
    }

    /// Read from a file path with BOM-aware decoding, since TMX files are
    /// frequently UTF-16.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}
