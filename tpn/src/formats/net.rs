//! The textual `.net` format of Time Petri nets.
//!
//! ```text
//! net_file   ::= (tr_decl | pl_decl | pr_decl | nt_decl | net_decl)*
//! net_decl   ::= "net" IDENT
//! tr_decl    ::= "tr" IDENT [":" LABEL] [INTERVAL] [ARCS "->" ARCS]
//! pl_decl    ::= "pl" IDENT [":" LABEL] ["(" INT ")"] [ARCS "->" ARCS]
//! pr_decl    ::= "pr" IDENT+ (">"|"<") IDENT+
//! nt_decl    ::= "nt" IDENT INT IDENT
//! ARCS       ::= (IDENT ["?" INT | "?-" INT | "*" INT])*
//! INTERVAL   ::= ("["|"]") INT "," (INT|"w") ("["|"]")
//! ```
//!
//! Declarations of the same place or transition accumulate: arcs and markings add
//! up, intervals are intersected, and the last label wins.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::{self, Read, Write};

use itertools::Itertools;
use log::{debug, trace};

use super::scanner::{Scanner, Token, TokenKind};
use super::{NumberError, ParseError, ParseOptions, parse_number};
use crate::interval::{Bound, TimeInterval};
use crate::net::Net;
use crate::priority::{set_add, set_union};

/// Parses a net with the default [`ParseOptions`].
pub fn parse(input: &str) -> Result<Net, ParseError> {
    parse_with(input, &ParseOptions::default())
}

pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Net, ParseError> {
    let net = Parser::new(input, options.clone()).parse_net()?;
    debug!(
        "Parsed net {:?}: {} places, {} transitions.",
        net.name,
        net.num_places(),
        net.num_transitions()
    );
    Ok(net)
}

/// Reads the whole of *reader* and parses it with the default [`ParseOptions`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Net, ParseError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse(&input)
}

/// Writes *net* in the `.net` format.
pub fn write<W: Write>(net: &Net, mut writer: W) -> io::Result<()> {
    write!(writer, "{net}")
}

/// The decoration of an arc: a weight, and how the arc uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArcKind {
    Normal(i64),
    Read(i64),
    Inhibitor(i64),
}

struct Parser<'i> {
    scanner: Scanner<'i>,
    /// A token given back with [`Parser::unscan`].
    pending: Option<Token>,
    options: ParseOptions,
    net: Net,
    places: HashMap<String, usize>,
    transitions: HashMap<String, usize>,
}

fn syntax_error(message: &'static str, token: &Token) -> ParseError {
    ParseError::Syntax {
        message,
        found: token.text.clone(),
        position: token.position,
    }
}

/// An accumulated weight or marking that no longer fits in 64 bits.
fn overflow_error(token: &Token) -> ParseError {
    ParseError::Number {
        text: token.text.clone(),
        position: token.position,
        source: NumberError::Overflow(token.text.clone()),
    }
}

fn lexical_error(token: &Token) -> ParseError {
    ParseError::Lexical {
        text: token.text.clone(),
        position: token.position,
    }
}

fn weight(token: &Token) -> Result<i64, ParseError> {
    parse_number(&token.text).map_err(|source| ParseError::Number {
        text: token.text.clone(),
        position: token.position,
        source,
    })
}

/// Reads an interval token, normalized by the scanner to `"[ a b ]"`.
fn interval(token: &Token, transition: &str) -> Result<TimeInterval, ParseError> {
    let fields: Vec<&str> = token.text.split_whitespace().collect();
    let [open, left, right, close] = fields.as_slice() else {
        return Err(lexical_error(token));
    };
    let left = left
        .parse::<i64>()
        .map_err(|_| lexical_error(token))
        .map(|value| if *open == "[" { Bound::Closed(value) } else { Bound::Open(value) })?;
    let right = match *right {
        "w" => Bound::Infinite,
        right => {
            let value = right.parse::<i64>().map_err(|_| lexical_error(token))?;
            if *close == "]" {
                Bound::Closed(value)
            } else {
                Bound::Open(value)
            }
        }
    };
    TimeInterval::new(left, right).map_err(|source| ParseError::Interval {
        text: token.text.clone(),
        transition: transition.to_owned(),
        position: token.position,
        source,
    })
}

impl<'i> Parser<'i> {
    fn new(input: &'i str, options: ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(input),
            pending: None,
            options,
            net: Net::new(),
            places: HashMap::new(),
            transitions: HashMap::new(),
        }
    }

    /// Returns the pending token if there is one, otherwise the next token.
    fn scan(&mut self) -> Result<Token, ParseError> {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.scanner.next_token(),
        };
        if token.kind == TokenKind::Illegal {
            return Err(lexical_error(&token));
        }
        Ok(token)
    }

    fn unscan(&mut self, token: Token) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(token);
    }

    fn expect(&mut self, kind: TokenKind, message: &'static str) -> Result<Token, ParseError> {
        let token = self.scan()?;
        if token.kind != kind {
            return Err(syntax_error(message, &token));
        }
        Ok(token)
    }

    fn ensure_place(&mut self, name: &str) -> usize {
        if let Some(&place) = self.places.get(name) {
            return place;
        }
        let place = self.net.push_place(name);
        self.places.insert(name.to_owned(), place);
        place
    }

    fn ensure_transition(&mut self, name: &str) -> usize {
        if let Some(&transition) = self.transitions.get(name) {
            return transition;
        }
        let transition = self.net.push_transition(name);
        self.transitions.insert(name.to_owned(), transition);
        transition
    }

    fn parse_net(mut self) -> Result<Net, ParseError> {
        loop {
            let token = self.scan()?;
            match token.kind {
                TokenKind::Eof => return Ok(self.net),
                TokenKind::Net => {
                    let name = self.expect(TokenKind::Ident, "expected net name")?;
                    trace!("net {}", name.text);
                    self.net.name = name.text;
                }
                TokenKind::Tr => self.parse_transition()?,
                TokenKind::Pl => self.parse_place()?,
                TokenKind::Pr => self.parse_priority()?,
                TokenKind::Nt => self.parse_note()?,
                _ => return Err(syntax_error("expected declaration", &token)),
            }
        }
    }

    /// Scans the optional decoration following a place or transition in an arc list.
    ///
    /// Returns the decoration token, if any, for error reporting.
    fn scan_arc(&mut self) -> Result<(ArcKind, Option<Token>), ParseError> {
        let token = self.scan()?;
        let arc = match token.kind {
            TokenKind::Star => ArcKind::Normal(weight(&token)?),
            TokenKind::Read => ArcKind::Read(weight(&token)?),
            TokenKind::Inhibitor => ArcKind::Inhibitor(weight(&token)?),
            _ => {
                self.unscan(token);
                return Ok((ArcKind::Normal(1), None));
            }
        };
        Ok((arc, Some(token)))
    }

    /// Records an arc between *place* and *transition*, as an input of the
    /// transition if *input* holds. Overflows are reported at *at*.
    fn connect(
        &mut self,
        transition: usize,
        place: usize,
        arc: ArcKind,
        input: bool,
        at: &Token,
    ) -> Result<(), ParseError> {
        let net = &mut self.net;
        let overflow = |_| overflow_error(at);
        match arc {
            ArcKind::Read(weight) => {
                net.cond[transition].set_if_greater(place, weight);
            }
            ArcKind::Inhibitor(weight) => {
                net.inhib[transition].set_if_less(place, weight);
            }
            ArcKind::Normal(weight) if input => {
                net.delta[transition]
                    .checked_add_to_place(place, -weight)
                    .map_err(overflow)?;
                net.pre[transition]
                    .checked_add_to_place(place, -weight)
                    .map_err(overflow)?;
                net.cond[transition]
                    .checked_add_to_place(place, weight)
                    .map_err(overflow)?;
            }
            ArcKind::Normal(weight) => {
                net.delta[transition]
                    .checked_add_to_place(place, weight)
                    .map_err(overflow)?;
            }
        }
        Ok(())
    }

    fn parse_transition(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Ident, "expected transition name")?;
        trace!("tr {}", name.text);
        let transition = self.ensure_transition(&name.text);
        let (mut has_label, mut has_interval, mut has_arcs, mut outputs) =
            (false, false, false, false);
        loop {
            let token = self.scan()?;
            match token.kind {
                TokenKind::Label => {
                    if has_label || has_interval || has_arcs {
                        return Err(syntax_error("misplaced label in transition", &token));
                    }
                    has_label = true;
                    self.net.transition_labels[transition] = token.text;
                }
                TokenKind::Interval => {
                    if has_interval || has_arcs {
                        return Err(syntax_error("misplaced time interval in transition", &token));
                    }
                    has_interval = true;
                    let declared = interval(&token, &name.text)?;
                    self.net.time[transition]
                        .intersect_with(&declared)
                        .map_err(|source| ParseError::Interval {
                            text: token.text.clone(),
                            transition: name.text.clone(),
                            position: token.position,
                            source,
                        })?;
                    // An explicit `[0,w[` is stored like an undeclared interval.
                    if self.net.time[transition].is_trivial() {
                        self.net.time[transition] = TimeInterval::default();
                    }
                }
                TokenKind::Arrow => {
                    if outputs {
                        return Err(syntax_error("duplicate arrow in transition", &token));
                    }
                    has_arcs = true;
                    outputs = true;
                }
                TokenKind::Ident => {
                    has_arcs = true;
                    let place = self.ensure_place(&token.text);
                    let (arc, decoration) = self.scan_arc()?;
                    let at = decoration.as_ref().unwrap_or(&token);
                    if outputs && !matches!(arc, ArcKind::Normal(_)) {
                        return Err(syntax_error(
                            "read or inhibitor arc on output of transition",
                            at,
                        ));
                    }
                    self.connect(transition, place, arc, !outputs, at)?;
                }
                _ => {
                    self.unscan(token);
                    return Ok(());
                }
            }
        }
    }

    fn parse_place(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Ident, "expected place name")?;
        trace!("pl {}", name.text);
        let place = self.ensure_place(&name.text);
        let (mut has_label, mut has_marking, mut has_arcs, mut outputs) =
            (false, false, false, false);
        loop {
            let token = self.scan()?;
            match token.kind {
                TokenKind::Label => {
                    if has_label || has_marking || has_arcs {
                        return Err(syntax_error("misplaced label in place", &token));
                    }
                    has_label = true;
                    self.net.place_labels[place] = token.text;
                }
                TokenKind::Marking => {
                    if has_marking || has_arcs {
                        return Err(syntax_error("misplaced marking in place", &token));
                    }
                    has_marking = true;
                    let tokens = weight(&token)?;
                    self.net
                        .initial
                        .checked_add_to_place(place, tokens)
                        .map_err(|_| overflow_error(&token))?;
                }
                TokenKind::Arrow => {
                    if outputs {
                        return Err(syntax_error("duplicate arrow in place", &token));
                    }
                    has_arcs = true;
                    outputs = true;
                }
                TokenKind::Ident => {
                    has_arcs = true;
                    let transition = self.ensure_transition(&token.text);
                    let (arc, decoration) = self.scan_arc()?;
                    let at = decoration.as_ref().unwrap_or(&token);
                    // Before the arrow, transitions put tokens in the place.
                    if !outputs && !matches!(arc, ArcKind::Normal(_)) {
                        return Err(syntax_error("read or inhibitor arc on input of place", at));
                    }
                    self.connect(transition, place, arc, outputs, at)?;
                }
                _ => {
                    self.unscan(token);
                    return Ok(());
                }
            }
        }
    }

    fn priority_transition(&mut self, token: &Token) -> Result<usize, ParseError> {
        if self.options.require_declared_priorities && !self.transitions.contains_key(&token.text) {
            return Err(ParseError::UndeclaredTransition {
                name: token.text.clone(),
                position: token.position,
            });
        }
        Ok(self.ensure_transition(&token.text))
    }

    fn parse_priority(&mut self) -> Result<(), ParseError> {
        let mut first = Vec::new();
        let operator = loop {
            let token = self.scan()?;
            match token.kind {
                TokenKind::Ident => {
                    let transition = self.priority_transition(&token)?;
                    set_add(&mut first, transition);
                }
                TokenKind::Gt | TokenKind::Lt if !first.is_empty() => break token,
                _ => return Err(syntax_error("expected transition or priority operator", &token)),
            }
        };
        let mut second = Vec::new();
        loop {
            let token = self.scan()?;
            if token.kind != TokenKind::Ident {
                if second.is_empty() {
                    return Err(syntax_error("expected transition after priority operator", &token));
                }
                self.unscan(token);
                break;
            }
            let transition = self.priority_transition(&token)?;
            set_add(&mut second, transition);
        }
        trace!("pr {:?} {} {:?}", first, operator.text, second);
        let (higher, lower) = if operator.kind == TokenKind::Gt {
            (first, second)
        } else {
            (second, first)
        };
        for transition in higher {
            self.net.prio[transition] = set_union(&self.net.prio[transition], &lower);
        }
        Ok(())
    }

    /// Notes carry metadata of the tool that wrote the file; they are checked and
    /// dropped.
    fn parse_note(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Ident, "expected note name")?;
        self.expect(TokenKind::Int, "expected note level")?;
        let note = self.expect(TokenKind::Ident, "expected note text")?;
        trace!("nt {}", note.text);
        Ok(())
    }
}

fn arc(name: &str, weight: i64) -> String {
    match weight {
        1 => name.to_owned(),
        weight => format!("{name}*{weight}"),
    }
}

impl Net {
    /// The input and output arcs of *transition*, rendered as in a `tr` declaration.
    ///
    /// For each place, the inhibitor arc comes first, then the read arc, then the
    /// consumed tokens, so that parsing them back rebuilds the same guards.
    fn arc_lists(&self, transition: usize) -> (Vec<String>, Vec<String>) {
        let (cond, inhib) = (&self.cond[transition], &self.inhib[transition]);
        let (pre, delta) = (&self.pre[transition], &self.delta[transition]);
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        let places = itertools::kmerge([cond.places(), inhib.places(), pre.places(), delta.places()])
            .dedup();
        for place in places {
            let name = &self.places[place];
            let consumed = -pre.get(place);
            let read = cond.get(place) - consumed;
            let produced = delta.get(place) + consumed;
            match inhib.get(place) {
                0 => {}
                cap => inputs.push(format!("{name}?-{cap}")),
            }
            if read != 0 {
                inputs.push(format!("{name}?{read}"));
            }
            if consumed != 0 {
                inputs.push(arc(name, consumed));
            }
            if produced != 0 {
                outputs.push(arc(name, produced));
            }
        }
        (inputs, outputs)
    }
}

impl Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#")?;
        writeln!(f, "# net {}", self.name)?;
        writeln!(
            f,
            "# {} places, {} transitions",
            self.num_places(),
            self.num_transitions()
        )?;
        writeln!(f, "#")?;
        writeln!(f)?;
        if !self.name.is_empty() {
            writeln!(f, "net {}", self.name)?;
        }
        for (place, name) in self.places.iter().enumerate() {
            write!(f, "pl {name}")?;
            if !self.place_labels[place].is_empty() {
                write!(f, " : {}", self.place_labels[place])?;
            }
            match self.initial.get(place) {
                0 => writeln!(f)?,
                tokens => writeln!(f, " ({tokens})")?,
            }
        }
        for (transition, name) in self.transitions.iter().enumerate() {
            write!(f, "tr {name}")?;
            if !self.transition_labels[transition].is_empty() {
                write!(f, " : {}", self.transition_labels[transition])?;
            }
            if !self.time[transition].is_trivial() {
                write!(f, " {}", self.time[transition])?;
            }
            let (inputs, outputs) = self.arc_lists(transition);
            for input in inputs {
                write!(f, " {input}")?;
            }
            write!(f, " ->")?;
            for output in outputs {
                write!(f, " {output}")?;
            }
            writeln!(f)?;
        }
        for (transition, lower) in self.prio.iter().enumerate() {
            if !lower.is_empty() {
                writeln!(
                    f,
                    "pr {} > {}",
                    self.transitions[transition],
                    lower.iter().map(|&other| &self.transitions[other]).join(" ")
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalError;
    use crate::marking::Marking;

    fn marking(pairs: &[(usize, i64)]) -> Marking {
        pairs.iter().copied().collect()
    }

    fn closed(left: i64, right: i64) -> TimeInterval {
        TimeInterval::new(Bound::Closed(left), Bound::Closed(right)).unwrap()
    }

    #[test]
    fn transition_with_arcs() {
        let net = parse("tr t1 [0,1] p0 p1*2 -> p2").unwrap();
        assert_eq!(net.places, vec!["p0", "p1", "p2"]);
        assert_eq!(net.transitions, vec!["t1"]);
        assert_eq!(net.time[0], closed(0, 1));
        assert_eq!(net.cond[0], marking(&[(0, 1), (1, 2)]));
        assert_eq!(net.pre[0], marking(&[(0, -1), (1, -2)]));
        assert_eq!(net.delta[0], marking(&[(0, -1), (1, -2), (2, 1)]));
        assert!(net.inhib[0].is_empty());
    }

    #[test]
    fn read_and_inhibitor_arcs() {
        let net = parse("tr t p?3 q?-4 p?1 q?-2 r?-5 r?-9 ->").unwrap();
        assert_eq!(net.cond[0], marking(&[(0, 3)]));
        assert_eq!(net.inhib[0], marking(&[(1, 2), (2, 5)]));
        assert!(net.pre[0].is_empty());
        assert!(net.delta[0].is_empty());
    }

    #[test]
    fn place_declarations() {
        let net = parse("pl p : lbl (3K) t0 -> t1 t2?2\npl p (1)").unwrap();
        assert_eq!(net.place_labels, vec!["lbl"]);
        assert_eq!(net.initial, marking(&[(0, 3001)]));
        assert_eq!(net.transitions, vec!["t0", "t1", "t2"]);
        assert_eq!(net.delta[0], marking(&[(0, 1)]));
        assert_eq!(net.pre[1], marking(&[(0, -1)]));
        assert_eq!(net.cond[1], marking(&[(0, 1)]));
        assert_eq!(net.cond[2], marking(&[(0, 2)]));
        assert!(net.delta[2].is_empty());
    }

    #[test]
    fn repeated_declarations_accumulate() {
        let net = parse("tr t : a [0,5] p -> q\ntr t : b [2,9] p*2\npl q (2)").unwrap();
        assert_eq!(net.transition_labels, vec!["b"]);
        assert_eq!(net.time[0], closed(2, 5));
        assert_eq!(net.cond[0], marking(&[(0, 3)]));
        assert_eq!(net.delta[0], marking(&[(0, -3), (1, 1)]));
        assert_eq!(net.initial, marking(&[(1, 2)]));
    }

    #[test]
    fn intervals() {
        let err = parse("tr a ]1,w[ tr b [2,3[ tr c [0,w[ tr d ]0,0]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Interval {
                source: IntervalError::Empty { .. },
                ..
            }
        ));
        let net = parse("tr a ]1,w[ tr b [2,3[ tr c [0,w[").unwrap();
        assert_eq!(net.time[0], TimeInterval::new(Bound::Open(1), Bound::Infinite).unwrap());
        assert_eq!(net.time[1], TimeInterval::new(Bound::Closed(2), Bound::Open(3)).unwrap());
        assert!(net.time[2].is_trivial());
        assert!(matches!(
            parse("tr t [3,1]"),
            Err(ParseError::Interval { transition, .. }) if transition == "t"
        ));
        assert!(matches!(
            parse("tr t [w,1]"),
            Err(ParseError::Lexical { .. })
        ));
        assert!(matches!(
            parse("tr t [0,5] -> \ntr t [6,7]"),
            Err(ParseError::Interval { .. })
        ));
    }

    #[test]
    fn priorities() {
        let net = parse("tr t0 tr t1 pr t0 > t1 t2\npr t3 t4 < t0\npr t1 > t2").unwrap();
        assert_eq!(net.transitions, vec!["t0", "t1", "t2", "t3", "t4"]);
        assert_eq!(net.prio[0], vec![1, 2, 3, 4]);
        assert_eq!(net.prio[1], vec![2]);
        assert_eq!(net.prio[3], Vec::<usize>::new());
        let net = parse("tr t0 tr t1 pr t0 > t1 t2 pr t3 < t0").unwrap();
        assert_eq!(net.prio[0], vec![1, 2, 3]);
    }

    #[test]
    fn strict_priorities() {
        let options = ParseOptions {
            require_declared_priorities: true,
        };
        assert!(parse_with("tr a tr b pr a > b", &options).is_ok());
        let err = parse_with("tr a\npr a > c", &options).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UndeclaredTransition { ref name, position }
                if name == "c" && position.line == 2 && position.column == 8
        ));
    }

    #[test]
    fn names_and_notes() {
        let net = parse("net first nt n 0 {ignored note} NET {second net} tr {t 1} {p 2} ->").unwrap();
        assert_eq!(net.name, "{second net}");
        assert_eq!(net.transitions, vec!["{t 1}"]);
        assert_eq!(net.places, vec!["{p 2}"]);
    }

    #[test]
    fn syntax_errors() {
        let cases = [
            ("tr", "EOF", 1, 3),
            ("tr t0 p0 -> p1 -> p2", "->", 1, 16),
            ("tr t0 p0 -> p1?2", "2", 1, 15),
            ("tr t0 p0 -> p1?-2", "2", 1, 15),
            ("tr t0 [0,1] : lbl\n", "lbl", 1, 15),
            ("tr t0 p0 [0,1]", "[ 0 1 ]", 1, 10),
            ("tr t0 [0,1] [0,2]", "[ 0 2 ]", 1, 13),
            ("pl p0 t0?1 ->", "1", 1, 9),
            ("pl p0 (1) : lbl\n", "lbl", 1, 13),
            ("pl p0 (1) (2)", "2", 1, 11),
            ("p0", "p0", 1, 1),
            ("pr t0 t1", "EOF", 1, 9),
            ("pr > t1", ">", 1, 4),
            ("pr t0 > \ntr t1", "tr", 2, 1),
            ("nt n x y", "x", 1, 6),
        ];
        for (input, found, line, column) in cases {
            match parse(input) {
                Err(ParseError::Syntax {
                    found: text,
                    position,
                    ..
                }) => {
                    assert_eq!(text, found, "parsing {input:?}");
                    assert_eq!((position.line, position.column), (line, column), "parsing {input:?}");
                }
                other => panic!("parsing {input:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn lexical_errors() {
        for (input, text) in [("tr t0 p0 - p1", "-"), ("tr {t0", "{t0"), ("pl p (x)", "(x")] {
            assert!(
                matches!(parse(input), Err(ParseError::Lexical { text: ref found, .. }) if found == text),
                "parsing {input:?}"
            );
        }
        assert!(matches!(
            parse("pl p (99999999999999999999)"),
            Err(ParseError::Number { .. })
        ));
    }

    #[test]
    fn accumulated_overflow() {
        for input in [
            "pl p (9E)\npl p (9E)",
            "tr t p*9E p*9E ->",
            "tr t p*9E\ntr t p*9E",
            "tr t -> p*5E p*5E",
            "pl p t*9E t*9E ->",
        ] {
            assert!(
                matches!(
                    parse(input),
                    Err(ParseError::Number {
                        ref text,
                        source: NumberError::Overflow(_),
                        ..
                    }) if text == "9E" || text == "5E"
                ),
                "parsing {input:?}"
            );
        }
        let net = parse("pl p (4E)\npl p (5E)\ntr t p*4E p*5E ->").unwrap();
        assert_eq!(net.initial, marking(&[(0, 9_000_000_000_000_000_000)]));
        assert_eq!(net.cond[0], marking(&[(0, 9_000_000_000_000_000_000)]));
    }

    #[test]
    fn empty_input() {
        let net = parse("# only a comment\n").unwrap();
        assert_eq!(net, Net::default());
    }

    #[test]
    fn reader_input() {
        let net = parse_reader("pl p (1)".as_bytes()).unwrap();
        assert_eq!(net.initial, marking(&[(0, 1)]));
    }

    #[test]
    fn render() {
        let net = parse(
            "net demo\npl p0 : start (2)\npl p1\ntr t0 : go ]1,3] p0?-4 p1?2 p0*2 -> p1 p0\npr t1 > t0",
        )
        .unwrap();
        assert_eq!(
            net.to_string(),
            "#\n# net demo\n# 2 places, 2 transitions\n#\n\n\
             net demo\n\
             pl p0 : start (2)\n\
             pl p1\n\
             tr t0 : go ]1,3] p0?-4 p0*2 p1?2 -> p0 p1\n\
             tr t1 ->\n\
             pr t1 > t0\n"
        );
        let mut bytes = Vec::new();
        write(&net, &mut bytes).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), net.to_string());
    }

    #[test]
    fn render_then_parse() {
        let input = "pl a (1) pl b tr t [0,2[ a*3 b?2 a?1 b?-7 -> b*2 c tr u c b?-1 -> a";
        let net = parse(input).unwrap();
        let again = parse(&net.to_string()).unwrap();
        assert_eq!(again, net);

        let net = parse("tr t [0,w[ p -> q\ntr u [0,3] q ->\ntr u [0,w[").unwrap();
        assert_eq!(net.time[0], TimeInterval::default());
        assert_eq!(net.time[1], closed(0, 3));
        assert_eq!(parse(&net.to_string()).unwrap(), net);
    }
}
