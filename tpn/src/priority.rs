//! Transitive closure of the priority relation between transitions.
//!
//! Priority lists are kept as sorted vectors without duplicates, the same way
//! markings keep their atoms, so that inclusion and union are linear merges.

use itertools::Itertools;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriorityError {
    #[error("problem with priorities, no minimal elements")]
    NoMinimalElements,
    #[error("cyclic dependencies in priority for {transition}")]
    SelfPriority { transition: String },
    #[error("cyclic dependencies between priorities of {}", .transitions.join(", "))]
    Cycle { transitions: Vec<String> },
}

/// Inserts *value* in the sorted set *set*, if missing.
pub(crate) fn set_add(set: &mut Vec<usize>, value: usize) {
    if let Err(idx) = set.binary_search(&value) {
        set.insert(idx, value);
    }
}

/// The union of two sorted sets.
pub(crate) fn set_union(lhs: &[usize], rhs: &[usize]) -> Vec<usize> {
    lhs.iter().merge(rhs).dedup().copied().collect()
}

fn is_subset(lhs: &[usize], rhs: &[usize]) -> bool {
    lhs.iter().all(|value| rhs.binary_search(value).is_ok())
}

/// Closes the priority relation *prio* in place, where `prio[t]` lists the
/// transitions with lower priority than $t$ and *names* are the transition names
/// used in diagnostics.
///
/// Transitions with an empty list are final. Each pass then completes every
/// transition whose direct successors are all final, with the union of their lists.
/// A pass that completes nothing reveals a cycle. On error the lists of the
/// transitions completed so far are already closed and the others unchanged.
pub fn close(prio: &mut [Vec<usize>], names: &[String]) -> Result<(), PriorityError> {
    let (mut done, mut work): (Vec<usize>, Vec<usize>) =
        (0..prio.len()).partition(|&transition| prio[transition].is_empty());
    if work.is_empty() {
        return Ok(());
    }
    if done.is_empty() {
        return Err(PriorityError::NoMinimalElements);
    }

    let mut passes = 0;
    while !work.is_empty() {
        passes += 1;
        let mut next_done = done.clone();
        let mut next_work = Vec::new();
        for &transition in &work {
            if is_subset(&prio[transition], &done) {
                let closed = prio[transition]
                    .iter()
                    .fold(prio[transition].clone(), |acc, &lower| {
                        set_union(&acc, &prio[lower])
                    });
                prio[transition] = closed;
                set_add(&mut next_done, transition);
            } else {
                next_work.push(transition);
            }
        }
        if next_work.len() == work.len() {
            let name = |transition: usize| {
                names
                    .get(transition)
                    .cloned()
                    .unwrap_or_else(|| transition.to_string())
            };
            if let Some(&transition) = work
                .iter()
                .find(|&&transition| prio[transition].binary_search(&transition).is_ok())
            {
                return Err(PriorityError::SelfPriority {
                    transition: name(transition),
                });
            }
            return Err(PriorityError::Cycle {
                transitions: work.into_iter().map(name).collect(),
            });
        }
        work = next_work;
        done = next_done;
    }
    debug!("Closed priority relation in {passes} passes.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("t{idx}")).collect()
    }

    #[test]
    fn sorted_sets() {
        let mut set = vec![1, 4];
        set_add(&mut set, 3);
        set_add(&mut set, 4);
        set_add(&mut set, 0);
        assert_eq!(set, vec![0, 1, 3, 4]);
        assert_eq!(set_union(&[0, 2, 5], &[1, 2, 6]), vec![0, 1, 2, 5, 6]);
        assert_eq!(set_union(&[], &[3]), vec![3]);
        assert!(is_subset(&[1, 3], &[0, 1, 2, 3]));
        assert!(is_subset(&[], &[]));
        assert!(!is_subset(&[1, 5], &[0, 1, 2, 3]));
    }

    #[test]
    fn chain() {
        let mut prio = vec![vec![1], vec![2], vec![3], vec![]];
        close(&mut prio, &names(4)).unwrap();
        assert_eq!(prio, vec![vec![1, 2, 3], vec![2, 3], vec![3], vec![]]);
    }

    #[test]
    fn diamond() {
        let mut prio = vec![vec![1, 2], vec![3], vec![3], vec![], vec![]];
        close(&mut prio, &names(5)).unwrap();
        assert_eq!(prio[0], vec![1, 2, 3]);
        assert_eq!(prio[4], Vec::<usize>::new());
    }

    #[test]
    fn no_priorities() {
        let mut prio = vec![vec![]; 3];
        close(&mut prio, &names(3)).unwrap();
        assert_eq!(prio, vec![Vec::<usize>::new(); 3]);
        close(&mut [], &[]).unwrap();
    }

    #[test]
    fn no_minimal_elements() {
        let mut prio = vec![vec![1], vec![0]];
        assert_eq!(
            close(&mut prio, &names(2)),
            Err(PriorityError::NoMinimalElements)
        );
    }

    #[test]
    fn cycles() {
        let mut prio = vec![vec![0], vec![]];
        assert_eq!(
            close(&mut prio, &names(2)),
            Err(PriorityError::SelfPriority {
                transition: "t0".to_owned()
            })
        );

        let mut prio = vec![vec![1], vec![0, 2], vec![]];
        assert_eq!(
            close(&mut prio, &names(3)),
            Err(PriorityError::Cycle {
                transitions: vec!["t0".to_owned(), "t1".to_owned()]
            })
        );
    }
}
