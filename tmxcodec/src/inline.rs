//! Inline content of a segment: text runs interleaved with native-code tags.
//!
//! A `<seg>` holds an ordered sequence of [`Run`]s. The order is significant
//! and survives a round-trip exactly: text before the first tag, text between
//! tags and text after the last tag each become their own [`Run::Text`].
//!
//! Paired `<bpt>`/`<ept>` tags are only checked at serialization time, so a
//! segment may hold an unpaired tag while it is being edited.

use serde::Serialize;

use crate::{
    attr::{self, Assoc, Pos, opt_count},
    error::Error,
    traits::{FromElement, ToElement, expect_tag},
    xml::{Element, Node},
};

/// One run of segment content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Run {
    /// Plain translatable text.
    Text(String),
    /// Begin paired tag.
    Bpt(Bpt),
    /// End paired tag.
    Ept(Ept),
    /// Standalone placeholder.
    Ph(Ph),
    /// Isolated tag whose partner lies outside the segment.
    It(It),
    /// Highlighted span, recursive.
    Hi(Hi),
    /// Deprecated generic tag, still parsed for compatibility.
    Ut(Ut),
    /// Sub-flow text.
    Sub(Sub),
}

/// Content of a native-code tag: raw code text, possibly with sub-flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CodeRun {
    Text(String),
    Sub(Sub),
}

/// `<bpt>` - delimits the beginning of a paired sequence of native codes.
/// Its `i` value pairs it with exactly one [`Ept`] in the same segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bpt {
    pub i: u32,
    pub x: Option<u32>,
    pub kind: Option<String>,
    pub content: Vec<CodeRun>,
}

/// `<ept>` - delimits the end of a paired sequence of native codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ept {
    pub i: u32,
    pub content: Vec<CodeRun>,
}

/// `<ph>` - a standalone native code in the segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ph {
    pub x: Option<u32>,
    pub kind: Option<String>,
    pub assoc: Option<Assoc>,
    pub content: Vec<CodeRun>,
}

/// `<it>` - a native code whose corresponding begin/end lies outside the
/// segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct It {
    pub pos: Pos,
    pub x: Option<u32>,
    pub kind: Option<String>,
    pub content: Vec<CodeRun>,
}

/// `<hi>` - a highlighted span of segment content, recursive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hi {
    pub x: Option<u32>,
    pub kind: Option<String>,
    pub content: Vec<Run>,
}

/// `<ut>` - deprecated generic native-code tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ut {
    pub x: Option<u32>,
    pub content: Vec<CodeRun>,
}

/// `<sub>` - sub-flow text inside a native code, e.g. the text of a footnote
/// or the title of an HTML anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sub {
    pub kind: Option<String>,
    pub datatype: Option<String>,
    pub content: Vec<Run>,
}

/// Parses the mixed text/tag children of `<seg>`, `<hi>` or `<sub>`,
/// preserving document order. Unknown tags fail instead of being dropped.
pub(crate) fn parse_runs(el: &Element, parent: &'static str) -> Result<Vec<Run>, Error> {
    let mut runs = Vec::new();
    for node in &el.children {
        match node {
            Node::Text(text) => runs.push(Run::Text(text.clone())),
            Node::Element(child) => runs.push(match child.name.as_str() {
                "bpt" => Run::Bpt(Bpt::from_element(child)?),
                "ept" => Run::Ept(Ept::from_element(child)?),
                "ph" => Run::Ph(Ph::from_element(child)?),
                "it" => Run::It(It::from_element(child)?),
                "hi" => Run::Hi(Hi::from_element(child)?),
                "ut" => Run::Ut(Ut::from_element(child)?),
                "sub" => Run::Sub(Sub::from_element(child)?),
                _ => {
                    return Err(Error::UnknownTag {
                        parent,
                        tag: child.name.clone(),
                    });
                }
            }),
        }
    }
    Ok(runs)
}

/// Emits runs back into an element, restoring the original interleaving.
pub(crate) fn runs_into(el: &mut Element, runs: &[Run]) -> Result<(), Error> {
    for run in runs {
        match run {
            Run::Text(text) => el.push_text(text),
            Run::Bpt(bpt) => el.push_child(bpt.to_element()?),
            Run::Ept(ept) => el.push_child(ept.to_element()?),
            Run::Ph(ph) => el.push_child(ph.to_element()?),
            Run::It(it) => el.push_child(it.to_element()?),
            Run::Hi(hi) => el.push_child(hi.to_element()?),
            Run::Ut(ut) => el.push_child(ut.to_element()?),
            Run::Sub(sub) => el.push_child(sub.to_element()?),
        }
    }
    Ok(())
}

fn parse_code_runs(el: &Element, parent: &'static str) -> Result<Vec<CodeRun>, Error> {
    let mut content = Vec::new();
    for node in &el.children {
        match node {
            Node::Text(text) => content.push(CodeRun::Text(text.clone())),
            Node::Element(child) => match child.name.as_str() {
                "sub" => content.push(CodeRun::Sub(Sub::from_element(child)?)),
                _ => {
                    return Err(Error::UnknownTag {
                        parent,
                        tag: child.name.clone(),
                    });
                }
            },
        }
    }
    Ok(content)
}

fn code_runs_into(el: &mut Element, content: &[CodeRun]) -> Result<(), Error> {
    for run in content {
        match run {
            CodeRun::Text(text) => el.push_text(text),
            CodeRun::Sub(sub) => el.push_child(sub.to_element()?),
        }
    }
    Ok(())
}

/// Appends every piece of text in the run sequence, in document order.
pub(crate) fn append_plain_text(runs: &[Run], out: &mut String) {
    for run in runs {
        match run {
            Run::Text(text) => out.push_str(text),
            Run::Bpt(Bpt { content, .. })
            | Run::Ept(Ept { content, .. })
            | Run::Ph(Ph { content, .. })
            | Run::It(It { content, .. })
            | Run::Ut(Ut { content, .. }) => append_code_text(content, out),
            Run::Hi(Hi { content, .. }) | Run::Sub(Sub { content, .. }) => {
                append_plain_text(content, out);
            }
        }
    }
}

fn append_code_text(content: &[CodeRun], out: &mut String) {
    for run in content {
        match run {
            CodeRun::Text(text) => out.push_str(text),
            CodeRun::Sub(sub) => append_plain_text(&sub.content, out),
        }
    }
}

/// Every `<bpt>` must pair with exactly one `<ept>` carrying the same `i`
/// within one `<tuv>`, nested spans included. Runs at serialization time.
pub(crate) fn check_pairing(runs: &[Run], lang: &str) -> Result<(), Error> {
    let mut bpts: Vec<u32> = Vec::new();
    let mut epts: Vec<u32> = Vec::new();
    collect_pair_indices(runs, &mut bpts, &mut epts);

    let pairing = |detail: String| Error::Pairing {
        lang: lang.to_string(),
        detail,
    };

    for (idx, i) in bpts.iter().enumerate() {
        if bpts[..idx].contains(i) {
            return Err(pairing(format!("more than one <bpt> with i=\"{i}\"")));
        }
    }
    for (idx, i) in epts.iter().enumerate() {
        if epts[..idx].contains(i) {
            return Err(pairing(format!("more than one <ept> with i=\"{i}\"")));
        }
    }
    for i in &bpts {
        if !epts.contains(i) {
            return Err(pairing(format!("<bpt i=\"{i}\"> has no matching <ept>")));
        }
    }
    for i in &epts {
        if !bpts.contains(i) {
            return Err(pairing(format!("<ept i=\"{i}\"> has no matching <bpt>")));
        }
    }
    Ok(())
}

fn collect_pair_indices(runs: &[Run], bpts: &mut Vec<u32>, epts: &mut Vec<u32>) {
    for run in runs {
        match run {
            Run::Bpt(bpt) => bpts.push(bpt.i),
            Run::Ept(ept) => epts.push(ept.i),
            Run::Hi(hi) => collect_pair_indices(&hi.content, bpts, epts),
            Run::Sub(sub) => collect_pair_indices(&sub.content, bpts, epts),
            _ => {}
        }
    }
}

impl FromElement for Bpt {
    const TAG: &'static str = "bpt";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["i", "x", "type"])?;
        Ok(Bpt {
            i: attr::parse_count(Self::TAG, "i", attr::required(el, Self::TAG, "i")?)?,
            x: opt_count(el, Self::TAG, "x")?,
            kind: el.attr("type").map(str::to_string),
            content: parse_code_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Bpt {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("bpt");
        el.set_attr("i", self.i.to_string());
        if let Some(x) = self.x {
            el.set_attr("x", x.to_string());
        }
        if let Some(kind) = &self.kind {
            el.set_attr("type", kind);
        }
        code_runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for Ept {
    const TAG: &'static str = "ept";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["i"])?;
        Ok(Ept {
            i: attr::parse_count(Self::TAG, "i", attr::required(el, Self::TAG, "i")?)?,
            content: parse_code_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Ept {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("ept");
        el.set_attr("i", self.i.to_string());
        code_runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for Ph {
    const TAG: &'static str = "ph";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["x", "type", "assoc"])?;
        Ok(Ph {
            x: opt_count(el, Self::TAG, "x")?,
            kind: el.attr("type").map(str::to_string),
            assoc: el
                .attr("assoc")
                .map(|value| attr::parse_assoc(Self::TAG, value))
                .transpose()?,
            content: parse_code_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Ph {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("ph");
        if let Some(x) = self.x {
            el.set_attr("x", x.to_string());
        }
        if let Some(kind) = &self.kind {
            el.set_attr("type", kind);
        }
        if let Some(assoc) = self.assoc {
            el.set_attr("assoc", assoc.as_str());
        }
        code_runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for It {
    const TAG: &'static str = "it";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["pos", "x", "type"])?;
        Ok(It {
            pos: attr::parse_pos(Self::TAG, attr::required(el, Self::TAG, "pos")?)?,
            x: opt_count(el, Self::TAG, "x")?,
            kind: el.attr("type").map(str::to_string),
            content: parse_code_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for It {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("it");
        el.set_attr("pos", self.pos.as_str());
        if let Some(x) = self.x {
            el.set_attr("x", x.to_string());
        }
        if let Some(kind) = &self.kind {
            el.set_attr("type", kind);
        }
        code_runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for Hi {
    const TAG: &'static str = "hi";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["x", "type"])?;
        Ok(Hi {
            x: opt_count(el, Self::TAG, "x")?,
            kind: el.attr("type").map(str::to_string),
            content: parse_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Hi {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("hi");
        if let Some(x) = self.x {
            el.set_attr("x", x.to_string());
        }
        if let Some(kind) = &self.kind {
            el.set_attr("type", kind);
        }
        runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for Ut {
    const TAG: &'static str = "ut";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["x"])?;
        Ok(Ut {
            x: opt_count(el, Self::TAG, "x")?,
            content: parse_code_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Ut {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("ut");
        if let Some(x) = self.x {
            el.set_attr("x", x.to_string());
        }
        code_runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}

impl FromElement for Sub {
    const TAG: &'static str = "sub";

    fn from_element(el: &Element) -> Result<Self, Error> {
        expect_tag(el, Self::TAG)?;
        attr::check_attributes(el, Self::TAG, &["type", "datatype"])?;
        Ok(Sub {
            kind: el.attr("type").map(str::to_string),
            datatype: el.attr("datatype").map(str::to_string),
            content: parse_runs(el, Self::TAG)?,
        })
    }
}

impl ToElement for Sub {
    fn to_element(&self) -> Result<Element, Error> {
        let mut el = Element::new("sub");
        if let Some(kind) = &self.kind {
            el.set_attr("type", kind);
        }
        if let Some(datatype) = &self.datatype {
            el.set_attr("datatype", datatype);
        }
        runs_into(&mut el, &self.content)?;
        Ok(el)
    }
}
