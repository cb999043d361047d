//! Time Petri nets in the textual `.net` format of the Tina toolbox.
//!
//! A net is read with [`formats::parse`] (or [`str::parse`]), yielding a [`Net`]:
//!
//! ```
//! use tpn::Net;
//!
//! let net: Net = "pl p0 (1)\ntr t0 [0,2] p0 -> p1".parse().unwrap();
//! assert_eq!(net.enabled(&net.initial), vec![0]);
//! assert_eq!(net.time[0].to_string(), "[0,2]");
//! ```
//!
//! Each transition $t$ of a net carries four [`Marking`]s:
//!
//! - `cond[t]`, the tokens required in each place for $t$ to be enabled;
//! - `inhib[t]`, the number of tokens each place must stay *below*;
//! - `pre[t]`, the tokens consumed by $t$, with negative multiplicities;
//! - `delta[t]`, the change caused by firing $t$.
//!
//! Markings can be interned as [`Handle`]s, which compare and hash in constant time.

pub mod formats;
pub mod handle;
pub mod interval;
pub mod marking;
pub mod net;
pub mod priority;

pub use formats::{ParseError, ParseOptions};
pub use handle::{Handle, HandleError, Interner};
pub use interval::{Bound, IntervalError, TimeInterval};
pub use marking::{Atom, Marking, MarkingError};
pub use net::Net;
pub use priority::PriorityError;
