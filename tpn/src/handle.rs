//! Interned markings.
//!
//! A [`Handle`] is a canonical identity for a non-negative marking: two handles
//! obtained from the same [`Interner`] are equal exactly when their markings are
//! equal, and comparing or hashing them never looks at the atoms.
//!
//! The interned value is the encoding of the marking as a sequence of big-endian
//! `u32` pairs, place index then multiplicity, in increasing place order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::trace;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::marking::{Atom, Marking};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("negative multiplicity {mult} for place {place}")]
    NegativeMultiplicity { place: usize, mult: i64 },
    #[error("multiplicity {mult} for place {place} does not fit in 31 bits")]
    MultiplicityOverflow { place: usize, mult: i64 },
    #[error("place index {place} does not fit in 32 bits")]
    PlaceOverflow { place: usize },
}

const ATOM_SIZE: usize = 8;

/// Encodes a marking, failing on negative or oversized multiplicities.
pub fn encode(marking: &Marking) -> Result<Vec<u8>, HandleError> {
    let mut bytes = vec![0; ATOM_SIZE * marking.len()];
    for (chunk, atom) in bytes.chunks_exact_mut(ATOM_SIZE).zip(marking) {
        let place =
            u32::try_from(atom.place).map_err(|_| HandleError::PlaceOverflow { place: atom.place })?;
        if atom.mult < 0 {
            return Err(HandleError::NegativeMultiplicity {
                place: atom.place,
                mult: atom.mult,
            });
        }
        let mult = i32::try_from(atom.mult).map_err(|_| HandleError::MultiplicityOverflow {
            place: atom.place,
            mult: atom.mult,
        })?;
        BigEndian::write_u32(&mut chunk[..4], place);
        BigEndian::write_u32(&mut chunk[4..], mult as u32);
    }
    Ok(bytes)
}

fn decode(bytes: &[u8]) -> Marking {
    let atoms = bytes
        .chunks_exact(ATOM_SIZE)
        .map(|chunk| {
            Atom::new(
                BigEndian::read_u32(&chunk[..4]) as usize,
                i64::from(BigEndian::read_u32(&chunk[4..])),
            )
        })
        .collect();
    Marking::from_canonical(atoms)
}

#[derive(Clone)]
pub struct Handle(Arc<[u8]>);

impl Handle {
    /// The canonical encoding of the marking.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes the marking this handle was made from.
    pub fn marking(&self) -> Marking {
        decode(&self.0)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<u8>().hash(state);
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.marking()).finish()
    }
}

/// An append-only table of encoded markings, safe to share between threads.
#[derive(Default)]
pub struct Interner {
    table: DashMap<Arc<[u8]>, ()>,
}

static GLOBAL: Lazy<Interner> = Lazy::new(Interner::new);

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table used by [`Marking::to_handle`].
    pub fn global() -> &'static Interner {
        &GLOBAL
    }

    /// Number of distinct markings interned so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn handle(&self, marking: &Marking) -> Result<Handle, HandleError> {
        let bytes = encode(marking)?;
        if let Some(entry) = self.table.get(bytes.as_slice()) {
            return Ok(Handle(Arc::clone(entry.key())));
        }
        let entry = match self.table.entry(Arc::from(bytes)) {
            Entry::Occupied(entry) => Arc::clone(entry.key()),
            Entry::Vacant(entry) => {
                trace!("Interning marking {:?}.", marking);
                Arc::clone(entry.insert(()).key())
            }
        };
        Ok(Handle(entry))
    }
}

impl Marking {
    /// Interns the marking in the global table.
    pub fn to_handle(&self) -> Result<Handle, HandleError> {
        Interner::global().handle(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rayon::prelude::*;

    use super::*;

    fn marking(pairs: &[(usize, i64)]) -> Marking {
        pairs.iter().copied().collect()
    }

    #[test]
    fn encoding() {
        let bytes = encode(&marking(&[(1, 2), (258, 65536)])).unwrap();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 1, 2, 0, 1, 0, 0]
        );
        assert!(encode(&Marking::new()).unwrap().is_empty());
    }

    #[test]
    fn round_trip() {
        let interner = Interner::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let size = rng.random_range(0..10);
            let m: Marking = (0..size)
                .map(|_| (rng.random_range(0..50), rng.random_range(0..1000)))
                .collect();
            let handle = interner.handle(&m).unwrap();
            assert_eq!(handle.marking(), m);
            assert_eq!(handle.bytes(), encode(&m).unwrap().as_slice());
        }
    }

    #[test]
    fn equal_markings_share_a_handle() {
        let interner = Interner::new();
        let lhs = interner.handle(&marking(&[(0, 1), (3, 2)])).unwrap();
        let mut built = Marking::new();
        built.add_to_place(3, 2).add_to_place(0, 1);
        let rhs = interner.handle(&built).unwrap();
        let other = interner.handle(&marking(&[(0, 1)])).unwrap();
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, other);
        assert_eq!(interner.len(), 2);

        let set: HashSet<Handle> = [lhs, rhs, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_marking() {
        let interner = Interner::new();
        let handle = interner.handle(&Marking::new()).unwrap();
        assert!(handle.bytes().is_empty());
        assert_eq!(handle.marking(), Marking::new());
        assert_eq!(handle, interner.handle(&Marking::new()).unwrap());
    }

    #[test]
    fn rejected_markings() {
        let interner = Interner::new();
        assert_eq!(
            interner.handle(&marking(&[(0, 1), (2, -1)])),
            Err(HandleError::NegativeMultiplicity { place: 2, mult: -1 })
        );
        assert_eq!(
            interner.handle(&marking(&[(4, 1 << 31)])),
            Err(HandleError::MultiplicityOverflow {
                place: 4,
                mult: 1 << 31
            })
        );
        assert!(interner.handle(&marking(&[(4, (1 << 31) - 1)])).is_ok());
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn global_table() {
        let m = marking(&[(11, 5), (12, 6)]);
        assert_eq!(m.to_handle().unwrap(), m.to_handle().unwrap());
        assert_eq!(m.to_handle().unwrap().marking(), m);
    }

    #[test]
    fn concurrent_interning() {
        let interner = Interner::new();
        let handles: Vec<Handle> = (0..2000usize)
            .into_par_iter()
            .map(|idx| interner.handle(&marking(&[(idx % 16, 1)])).unwrap())
            .collect();
        assert_eq!(interner.len(), 16);
        for (idx, handle) in handles.iter().enumerate() {
            assert_eq!(handle, &handles[idx % 16]);
        }
    }
}
