//! Sparse multisets over places.
//!
//! A [`Marking`] maps place indices to multiplicities. It is stored as a vector of
//! [`Atom`]s sorted by strictly increasing place index in which no atom has a zero
//! multiplicity. Every operation restores this invariant before returning, hence two
//! markings are equal exactly when their atom vectors are equal.
//!
//! Multiplicities may be negative: the `pre` and `delta` markings of a transition
//! describe changes rather than token counts.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A place index together with its (non-zero) multiplicity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub place: usize,
    pub mult: i64,
}

impl Atom {
    pub fn new(place: usize, mult: i64) -> Self {
        Self { place, mult }
    }
}

impl From<(usize, i64)> for Atom {
    fn from((place, mult): (usize, i64)) -> Self {
        Self::new(place, mult)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkingError {
    #[error("place {place} has a zero multiplicity")]
    Zero { place: usize },
    #[error("place {place} is repeated or out of order")]
    Unsorted { place: usize },
    #[error("multiplicity of place {place} overflows")]
    Overflow { place: usize },
}

/// A sparse, sorted multiset of places.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Atom>", into = "Vec<Atom>")]
pub struct Marking {
    atoms: Vec<Atom>,
}

impl Marking {
    /// The empty marking.
    pub fn new() -> Self {
        Self { atoms: Vec::new() }
    }

    /// Wraps atoms which are already in canonical form.
    pub(crate) fn from_canonical(atoms: Vec<Atom>) -> Self {
        debug_assert!(check_canonical(&atoms).is_ok(), "Atoms are not canonical.");
        Self { atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// The places with a non-zero multiplicity, in increasing order.
    pub fn places(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.iter().map(|atom| atom.place)
    }

    fn position(&self, place: usize) -> Result<usize, usize> {
        self.atoms.binary_search_by_key(&place, |atom| atom.place)
    }

    /// Returns the multiplicity of *place*, which is $0$ for absent places.
    pub fn get(&self, place: usize) -> i64 {
        match self.position(place) {
            Ok(idx) => self.atoms[idx].mult,
            Err(_) => 0,
        }
    }

    /// Adds *delta* tokens to *place*.
    ///
    /// The atom of *place* disappears when its multiplicity drops to exactly zero.
    pub fn add_to_place(&mut self, place: usize, delta: i64) -> &mut Self {
        if delta == 0 {
            return self;
        }
        match self.position(place) {
            Ok(idx) => {
                let mult = self.atoms[idx].mult + delta;
                if mult == 0 {
                    self.atoms.remove(idx);
                } else {
                    self.atoms[idx].mult = mult;
                }
            }
            Err(idx) => self.atoms.insert(idx, Atom::new(place, delta)),
        }
        self
    }

    /// Like [`Marking::add_to_place`], but fails instead of overflowing.
    pub fn checked_add_to_place(
        &mut self,
        place: usize,
        delta: i64,
    ) -> Result<&mut Self, MarkingError> {
        if let Ok(idx) = self.position(place) {
            if self.atoms[idx].mult.checked_add(delta).is_none() {
                return Err(MarkingError::Overflow { place });
            }
        }
        Ok(self.add_to_place(place, delta))
    }

    /// Raises the multiplicity of *place* to *value* unless it is already greater.
    ///
    /// An absent place takes *value*. A zero *value* leaves the marking unchanged.
    pub fn set_if_greater(&mut self, place: usize, value: i64) -> &mut Self {
        self.update(place, value, i64::max)
    }

    /// Lowers the multiplicity of *place* to *value* unless it is already smaller.
    ///
    /// An absent place takes *value*. A zero *value* leaves the marking unchanged.
    pub fn set_if_less(&mut self, place: usize, value: i64) -> &mut Self {
        self.update(place, value, i64::min)
    }

    fn update(&mut self, place: usize, value: i64, pick: fn(i64, i64) -> i64) -> &mut Self {
        if value == 0 {
            return self;
        }
        match self.position(place) {
            Ok(idx) => self.atoms[idx].mult = pick(self.atoms[idx].mult, value),
            Err(idx) => self.atoms.insert(idx, Atom::new(place, value)),
        }
        self
    }

    /// Computes the pointwise sum of two markings.
    pub fn pointwise_add(&self, other: &Marking) -> Marking {
        let atoms = self
            .atoms
            .iter()
            .merge_join_by(other.atoms.iter(), |lhs, rhs| lhs.place.cmp(&rhs.place))
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(lhs, rhs) => {
                    let mult = lhs.mult + rhs.mult;
                    (mult != 0).then(|| Atom::new(lhs.place, mult))
                }
                EitherOrBoth::Left(atom) | EitherOrBoth::Right(atom) => Some(*atom),
            })
            .collect();
        Marking { atoms }
    }

    /// Returns `true` if no multiplicity is negative.
    pub fn is_nonnegative(&self) -> bool {
        self.atoms.iter().all(|atom| atom.mult > 0)
    }
}

fn check_canonical(atoms: &[Atom]) -> Result<(), MarkingError> {
    for (idx, atom) in atoms.iter().enumerate() {
        if atom.mult == 0 {
            return Err(MarkingError::Zero { place: atom.place });
        }
        if idx > 0 && atoms[idx - 1].place >= atom.place {
            return Err(MarkingError::Unsorted { place: atom.place });
        }
    }
    Ok(())
}

impl TryFrom<Vec<Atom>> for Marking {
    type Error = MarkingError;

    fn try_from(atoms: Vec<Atom>) -> Result<Self, Self::Error> {
        check_canonical(&atoms)?;
        Ok(Self { atoms })
    }
}

impl From<Marking> for Vec<Atom> {
    fn from(marking: Marking) -> Self {
        marking.atoms
    }
}

/// Collects `(place, multiplicity)` pairs in any order, summing repeated places.
impl FromIterator<(usize, i64)> for Marking {
    fn from_iter<T: IntoIterator<Item = (usize, i64)>>(iter: T) -> Self {
        let mut marking = Marking::new();
        for (place, mult) in iter {
            marking.add_to_place(place, mult);
        }
        marking
    }
}

impl<'m> IntoIterator for &'m Marking {
    type Item = &'m Atom;
    type IntoIter = std::slice::Iter<'m, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl Add for &Marking {
    type Output = Marking;

    fn add(self, rhs: &Marking) -> Marking {
        self.pointwise_add(rhs)
    }
}

impl Add for Marking {
    type Output = Marking;

    fn add(self, rhs: Marking) -> Marking {
        self.pointwise_add(&rhs)
    }
}

impl Neg for &Marking {
    type Output = Marking;

    fn neg(self) -> Marking {
        let atoms = self
            .atoms
            .iter()
            .map(|atom| Atom::new(atom.place, -atom.mult))
            .collect();
        Marking { atoms }
    }
}

impl Neg for Marking {
    type Output = Marking;

    fn neg(self) -> Marking {
        -&self
    }
}

impl Sub for &Marking {
    type Output = Marking;

    fn sub(self, rhs: &Marking) -> Marking {
        self.pointwise_add(&-rhs)
    }
}

impl Sub for Marking {
    type Output = Marking;

    fn sub(self, rhs: Marking) -> Marking {
        &self - &rhs
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for atom in &self.atoms {
            map.entry(&atom.place, &atom.mult);
        }
        map.finish()
    }
}
