//! Linkgate: a trust gate for outbound link navigation.
//!
//! Clicking a link to an unfamiliar domain suspends navigation behind a
//! confirmation prompt. Confirming can remember the domain so later visits
//! go straight through. Trust is an opt-in user memory, not a security
//! perimeter: nothing here inspects content or blocks traffic.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod opener;
pub mod settings;
pub mod storage;

pub mod gate;
pub mod registry;
