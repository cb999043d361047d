//! Time Petri nets as produced by the `.net` parser.
//!
//! Places and transitions are identified by dense indices assigned in order of first
//! occurrence. All per-transition data lives in parallel vectors indexed by the
//! transition id.

use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::formats::{self, ParseError};
use crate::interval::TimeInterval;
use crate::marking::Marking;
use crate::priority::{self, PriorityError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub places: Vec<String>,
    pub place_labels: Vec<String>,
    pub transitions: Vec<String>,
    pub transition_labels: Vec<String>,
    /// Static firing interval of each transition.
    pub time: Vec<TimeInterval>,
    /// Firing guard: $t$ needs at least `cond[t].get(p)` tokens in every place $p$.
    pub cond: Vec<Marking>,
    /// Inhibition cap: $t$ needs strictly less than `inhib[t].get(p)` tokens in $p$.
    pub inhib: Vec<Marking>,
    /// Tokens consumed by each transition, with negative multiplicities.
    pub pre: Vec<Marking>,
    /// Marking change caused by firing each transition, $Post - Pre$.
    pub delta: Vec<Marking>,
    pub initial: Marking,
    /// For each transition, the sorted ids of the transitions with lower priority.
    pub prio: Vec<Vec<usize>>,
}

impl Net {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_places(&self) -> usize {
        self.places.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn place_index(&self, name: &str) -> Option<usize> {
        self.places.iter().position(|place| place == name)
    }

    pub fn transition_index(&self, name: &str) -> Option<usize> {
        self.transitions.iter().position(|transition| transition == name)
    }

    /// Appends a place with an empty label and returns its id.
    pub(crate) fn push_place(&mut self, name: &str) -> usize {
        self.places.push(name.to_owned());
        self.place_labels.push(String::new());
        self.places.len() - 1
    }

    /// Appends a transition with default interval, markings and priorities, and
    /// returns its id.
    pub(crate) fn push_transition(&mut self, name: &str) -> usize {
        self.transitions.push(name.to_owned());
        self.transition_labels.push(String::new());
        self.time.push(TimeInterval::default());
        self.cond.push(Marking::new());
        self.inhib.push(Marking::new());
        self.pre.push(Marking::new());
        self.delta.push(Marking::new());
        self.prio.push(Vec::new());
        self.transitions.len() - 1
    }

    /// Returns `true` if *transition* may fire at *marking*, ignoring time and
    /// priorities.
    ///
    /// Every place must hold at least its `cond` multiplicity and strictly less than
    /// its `inhib` multiplicity.
    pub fn is_enabled(&self, marking: &Marking, transition: usize) -> bool {
        self.cond[transition]
            .iter()
            .all(|atom| marking.get(atom.place) >= atom.mult)
            && self.inhib[transition]
                .iter()
                .all(|atom| marking.get(atom.place) < atom.mult)
    }

    /// The sorted ids of the transitions enabled at *marking*.
    pub fn enabled(&self, marking: &Marking) -> Vec<usize> {
        (0..self.num_transitions())
            .filter(|&transition| self.is_enabled(marking, transition))
            .collect()
    }

    /// The marking reached by firing *transition* at *marking*.
    pub fn fire(&self, marking: &Marking, transition: usize) -> Marking {
        marking + &self.delta[transition]
    }

    /// Renders a marking with place names, e.g., `p1*7 p3 p4*4`.
    pub fn display_marking(&self, marking: &Marking) -> String {
        marking
            .iter()
            .map(|atom| {
                let name = self.places.get(atom.place).map_or("?", String::as_str);
                match atom.mult {
                    1 => name.to_owned(),
                    mult => format!("{name}*{mult}"),
                }
            })
            .join(" ")
    }

    /// Makes the priority relation transitive, see [`priority::close`].
    pub fn close_priorities(&mut self) -> Result<(), PriorityError> {
        priority::close(&mut self.prio, &self.transitions)
    }
}

impl FromStr for Net {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        formats::parse(input)
    }
}
