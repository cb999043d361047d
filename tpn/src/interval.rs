//! Bounds and static firing intervals of timed transitions.
//!
//! A [`TimeInterval`] is a pair of [`Bound`]s. A left bound of [`Bound::Infinite`]
//! marks an interval that was never constrained, which behaves like the default
//! interval $[0, \infty)$ until it is first intersected with a declared one.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("uninitialized time interval")]
    Uninitialized,
    #[error("empty time interval {interval}")]
    Empty { interval: TimeInterval },
}

/// A bound of a time interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    /// No value: $+\infty$ as a right bound, *uninitialized* as a left bound.
    #[default]
    Infinite,
    Closed(i64),
    Open(i64),
}

impl Bound {
    pub fn value(&self) -> Option<i64> {
        match self {
            Bound::Infinite => None,
            Bound::Closed(value) | Bound::Open(value) => Some(*value),
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Bound::Infinite)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Bound::Open(_))
    }

    /// Compares two bounds.
    ///
    /// An infinite *other* always makes `self` the lesser one, and an infinite `self`
    /// is otherwise the greater one. For equal values an open bound is less than a
    /// closed one, so `]1,..` sorts before `[1,..`.
    pub fn compare(&self, other: &Bound) -> Ordering {
        match (self, other) {
            (_, Bound::Infinite) => Ordering::Less,
            (Bound::Infinite, _) => Ordering::Greater,
            (Bound::Closed(lhs) | Bound::Open(lhs), Bound::Closed(rhs) | Bound::Open(rhs))
                if lhs != rhs =>
            {
                lhs.cmp(rhs)
            }
            (Bound::Open(_), Bound::Closed(_)) => Ordering::Less,
            (Bound::Closed(_), Bound::Open(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    /// The greater of two bounds according to [`Bound::compare`].
    pub fn max(self, other: Bound) -> Bound {
        if self.compare(&other) == Ordering::Greater {
            self
        } else {
            other
        }
    }

    /// The lesser of two bounds according to [`Bound::compare`].
    pub fn min(self, other: Bound) -> Bound {
        if self.compare(&other) == Ordering::Greater {
            other
        } else {
            self
        }
    }

    /// Returns `true` if the bound is greater or equal to $0$.
    pub fn is_positive(&self) -> bool {
        match self {
            Bound::Infinite => true,
            Bound::Closed(value) => *value >= 0,
            Bound::Open(value) => *value > 0,
        }
    }

    /// Renders the bound as a lower constraint, e.g., `4 <` or `5 ≤`.
    pub fn lower_constraint(&self) -> String {
        match self {
            Bound::Infinite => "∞".to_owned(),
            Bound::Closed(value) => format!("{value} ≤"),
            Bound::Open(value) => format!("{value} <"),
        }
    }

    /// Renders the bound as an upper constraint, e.g., `< 4` or `≤ 5`.
    pub fn upper_constraint(&self) -> String {
        match self {
            Bound::Infinite => "< ∞".to_owned(),
            Bound::Closed(value) => format!("≤ {value}"),
            Bound::Open(value) => format!("< {value}"),
        }
    }

    fn combine(self, other: Bound, op: fn(i64, i64) -> i64) -> Bound {
        match (self, other) {
            (Bound::Infinite, _) | (_, Bound::Infinite) => Bound::Infinite,
            (Bound::Closed(lhs), Bound::Closed(rhs)) => Bound::Closed(op(lhs, rhs)),
            (Bound::Closed(lhs) | Bound::Open(lhs), Bound::Closed(rhs) | Bound::Open(rhs)) => {
                Bound::Open(op(lhs, rhs))
            }
        }
    }
}

impl Add for Bound {
    type Output = Bound;

    fn add(self, rhs: Bound) -> Bound {
        self.combine(rhs, |lhs, rhs| lhs + rhs)
    }
}

impl Sub for Bound {
    type Output = Bound;

    fn sub(self, rhs: Bound) -> Bound {
        self.combine(rhs, |lhs, rhs| lhs - rhs)
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Infinite => write!(f, "w"),
            Bound::Closed(value) => write!(f, "={value}"),
            Bound::Open(value) => write!(f, "x{value}"),
        }
    }
}

/// The static firing interval of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub left: Bound,
    pub right: Bound,
}

impl TimeInterval {
    /// Creates an interval, rejecting infinite left bounds and empty intervals.
    pub fn new(left: Bound, right: Bound) -> Result<Self, IntervalError> {
        let interval = Self { left, right };
        if left.is_infinite() {
            return Err(IntervalError::Uninitialized);
        }
        if interval.is_empty() {
            return Err(IntervalError::Empty { interval });
        }
        Ok(interval)
    }

    /// The interval $[0, \infty)$.
    pub fn trivial() -> Self {
        Self {
            left: Bound::Closed(0),
            right: Bound::Infinite,
        }
    }

    pub fn is_uninitialized(&self) -> bool {
        self.left.is_infinite()
    }

    /// Returns `true` for uninitialized intervals and for $[0, \infty)$.
    pub fn is_trivial(&self) -> bool {
        self.is_uninitialized() || (self.left == Bound::Closed(0) && self.right.is_infinite())
    }

    fn is_empty(&self) -> bool {
        match (self.left.value(), self.right.value()) {
            (Some(left), Some(right)) => {
                right < left || (right == left && (self.left.is_open() || self.right.is_open()))
            }
            _ => false,
        }
    }

    /// Restricts the interval to its intersection with *other*.
    ///
    /// An uninitialized interval adopts *other*. On error the interval is unchanged.
    pub fn intersect_with(&mut self, other: &TimeInterval) -> Result<(), IntervalError> {
        *self = self.intersection(other)?;
        Ok(())
    }

    /// Computes the intersection of two intervals.
    pub fn intersection(&self, other: &TimeInterval) -> Result<TimeInterval, IntervalError> {
        if other.is_uninitialized() {
            return Err(IntervalError::Uninitialized);
        }
        let result = if self.is_uninitialized() {
            *other
        } else {
            TimeInterval {
                left: tighter_left(self.left, other.left),
                right: tighter_right(self.right, other.right),
            }
        };
        if result.is_empty() {
            return Err(IntervalError::Empty { interval: result });
        }
        Ok(result)
    }
}

/// Picks the larger left bound; on equal values the open one excludes more.
fn tighter_left(current: Bound, other: Bound) -> Bound {
    match (current.value(), other.value()) {
        (Some(lhs), Some(rhs)) if rhs > lhs || (rhs == lhs && other.is_open()) => other,
        _ => current,
    }
}

/// Picks the smaller right bound; an infinite bound never tightens.
fn tighter_right(current: Bound, other: Bound) -> Bound {
    match (current.value(), other.value()) {
        (_, None) => current,
        (None, Some(_)) => other,
        (Some(lhs), Some(rhs)) if rhs < lhs || (rhs == lhs && other.is_open()) => other,
        _ => current,
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = match self.left {
            Bound::Infinite => return write!(f, "[0,w["),
            Bound::Closed(value) => format!("[{value}"),
            Bound::Open(value) => format!("]{value}"),
        };
        match self.right {
            Bound::Infinite => write!(f, "{left},w["),
            Bound::Closed(value) => write!(f, "{left},{value}]"),
            Bound::Open(value) => write!(f, "{left},{value}["),
        }
    }
}
