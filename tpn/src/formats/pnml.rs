//! Export to PNML Place/Transition nets.
//!
//! PNML has no timing information, no read arcs and no inhibitor arcs. Time
//! intervals and priorities are dropped, a read arc becomes a pair of input and
//! output arcs with the same weight, and nets with inhibitor arcs are rejected.
//!
//! Places and transitions may share a name in a `.net` file, so the ids of the
//! PNML nodes are the names prefixed by `pl_` or `tr_`.

use std::fmt::Display;
use std::io::Write;

use log::warn;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::net::Net;

const PNML_NAMESPACE: &str = "http://www.pnml.org/version-2009/grammar/pnml";
const PTNET_TYPE: &str = "http://www.pnml.org/version-2009/grammar/ptnet";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PnmlError {
    #[error("cannot export net with inhibitor arcs; see transition {transition}")]
    Inhibitor { transition: String },
    #[error("unable to write PNML: {0}")]
    Write(String),
}

fn write_error(err: impl Display) -> PnmlError {
    PnmlError::Write(err.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    pub name: String,
    pub label: String,
    pub initial: i64,
}

/// A transition with its arcs, as `(place, weight)` pairs sorted by place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub name: String,
    pub label: String,
    pub inputs: Vec<(usize, i64)>,
    pub outputs: Vec<(usize, i64)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub places: Vec<Place>,
    pub transitions: Vec<Transition>,
}

/// Builds the P/T net underlying *net*.
///
/// The inputs of a transition are its `cond` marking and its outputs are
/// `cond + delta`.
pub fn export(net: &Net) -> Result<Document, PnmlError> {
    if let Some(transition) = net.inhib.iter().position(|inhib| !inhib.is_empty()) {
        return Err(PnmlError::Inhibitor {
            transition: net.transitions[transition].clone(),
        });
    }
    let places = net
        .places
        .iter()
        .zip(&net.place_labels)
        .enumerate()
        .map(|(place, (name, label))| Place {
            name: name.clone(),
            label: label.clone(),
            initial: net.initial.get(place),
        })
        .collect();
    let transitions = (0..net.num_transitions())
        .map(|transition| {
            let cond = &net.cond[transition];
            if *cond != -&net.pre[transition] {
                warn!(
                    "Read arcs of transition {} are exported as input and output arcs.",
                    net.transitions[transition]
                );
            }
            let post = cond + &net.delta[transition];
            Transition {
                name: net.transitions[transition].clone(),
                label: net.transition_labels[transition].clone(),
                inputs: cond.iter().map(|atom| (atom.place, atom.mult)).collect(),
                outputs: post.iter().map(|atom| (atom.place, atom.mult)).collect(),
            }
        })
        .collect();
    Ok(Document {
        name: net.name.clone(),
        places,
        transitions,
    })
}

/// Writes *net* as a PNML document.
pub fn write<W: Write>(net: &Net, writer: W) -> Result<(), PnmlError> {
    export(net)?.write(writer)
}

fn display_name(name: &str, label: &str) -> String {
    if label.is_empty() {
        name.to_owned()
    } else {
        format!("{name}: {label}")
    }
}

struct XmlWriter<W: Write>(Writer<W>);

impl<W: Write> XmlWriter<W> {
    fn event(&mut self, event: Event<'_>) -> Result<(), PnmlError> {
        self.0.write_event(event).map_err(write_error)
    }

    fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), PnmlError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.event(Event::Start(element))
    }

    fn end(&mut self, tag: &str) -> Result<(), PnmlError> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    /// Writes `<tag><text>text</text></tag>`.
    fn text(&mut self, tag: &str, text: &str) -> Result<(), PnmlError> {
        self.start(tag, &[])?;
        self.start("text", &[])?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end("text")?;
        self.end(tag)
    }

    fn arc(&mut self, id: &str, source: &str, target: &str, weight: i64) -> Result<(), PnmlError> {
        self.start("arc", &[("id", id), ("source", source), ("target", target)])?;
        if weight != 1 {
            self.text("inscription", &weight.to_string())?;
        }
        self.end("arc")
    }
}

impl Document {
    pub fn write<W: Write>(&self, writer: W) -> Result<(), PnmlError> {
        let mut xml = XmlWriter(Writer::new_with_indent(writer, b' ', 2));
        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.start("pnml", &[("xmlns", PNML_NAMESPACE)])?;
        let id = if self.name.is_empty() { "net" } else { self.name.as_str() };
        xml.start("net", &[("id", id), ("type", PTNET_TYPE)])?;
        xml.text("name", id)?;
        xml.start("page", &[("id", "page")])?;

        for place in &self.places {
            let id = format!("pl_{}", place.name);
            xml.start("place", &[("id", id.as_str())])?;
            xml.text("name", &display_name(&place.name, &place.label))?;
            if place.initial != 0 {
                xml.text("initialMarking", &place.initial.to_string())?;
            }
            xml.end("place")?;
        }
        for transition in &self.transitions {
            let id = format!("tr_{}", transition.name);
            xml.start("transition", &[("id", id.as_str())])?;
            xml.text("name", &display_name(&transition.name, &transition.label))?;
            xml.end("transition")?;
        }
        for transition in &self.transitions {
            let target = format!("tr_{}", transition.name);
            for &(place, weight) in &transition.inputs {
                let name = &self.places[place].name;
                let id = format!("p2t-{name}-{}", transition.name);
                xml.arc(&id, &format!("pl_{name}"), &target, weight)?;
            }
            for &(place, weight) in &transition.outputs {
                let name = &self.places[place].name;
                let id = format!("t2p-{}-{name}", transition.name);
                xml.arc(&id, &target, &format!("pl_{name}"), weight)?;
            }
        }

        xml.end("page")?;
        xml.end("net")?;
        xml.end("pnml")?;
        xml.0.into_inner().flush().map_err(write_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::parse;

    #[test]
    fn rejects_inhibitor_arcs() {
        let net = parse("tr t0 p0 -> p1\ntr t1 p1?-2 -> p0").unwrap();
        assert_eq!(
            export(&net),
            Err(PnmlError::Inhibitor {
                transition: "t1".to_owned()
            })
        );
    }

    #[test]
    fn read_arcs_become_loops() {
        let net = parse("pl p0 : start (3)\ntr t0 : go p0?2 p1*2 -> p2").unwrap();
        let document = export(&net).unwrap();
        assert_eq!(
            document.places[0],
            Place {
                name: "p0".to_owned(),
                label: "start".to_owned(),
                initial: 3
            }
        );
        assert_eq!(document.transitions[0].label, "go");
        assert_eq!(document.transitions[0].inputs, vec![(0, 2), (1, 2)]);
        assert_eq!(document.transitions[0].outputs, vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn xml_output() {
        let net = parse("net demo pl p0 : start (3)\ntr t0 p0*2 -> p1").unwrap();
        let mut bytes = Vec::new();
        write(&net, &mut bytes).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        for expected in [
            r#"<pnml xmlns="http://www.pnml.org/version-2009/grammar/pnml">"#,
            r#"<net id="demo" type="http://www.pnml.org/version-2009/grammar/ptnet">"#,
            r#"<place id="pl_p0">"#,
            "<text>p0: start</text>",
            "<initialMarking>",
            "<text>3</text>",
            r#"<transition id="tr_t0">"#,
            r#"<arc id="p2t-p0-t0" source="pl_p0" target="tr_t0">"#,
            "<text>2</text>",
            r#"<arc id="t2p-t0-p1" source="tr_t0" target="pl_p1">"#,
            "</pnml>",
        ] {
            assert!(xml.contains(expected), "missing {expected} in\n{xml}");
        }
        assert_eq!(xml.matches("<inscription>").count(), 1);
        assert_eq!(xml.matches("<initialMarking>").count(), 1);
    }
}
