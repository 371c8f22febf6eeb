//! Power network evaluation for Gridlink.
//!
//! Devices form edges purely from proximity and kind. Each tick, every
//! consumer walks everything it can reach and compares total production to
//! total consumption; the consumer is powered when production covers demand.
//!
//! # Design
//!
//! - [`adjacency`]: kind rule table and range-based direct adjacency. The
//!   candidate's range decides each edge.
//! - [`reachability`]: visited-set-guarded depth-first closure, applying each
//!   expanded device's own rule.
//! - [`balance`]: sums production and consumption over a consumer's network.
//! - [`grid`]: [`PowerGrid::tick`] recomputes everything from current
//!   positions and reports transitions as [`PowerEvent`]s.
//!
//! Nothing is cached between ticks. Within a tick, adjacency may be
//! memoized ([`AdjacencyStrategy::Snapshot`]) with identical results.
//!
//! # Features
//!
//! - `parallel`: assess consumers concurrently with rayon. Flags are still
//!   written in registry order after every consumer is assessed.

pub mod adjacency;
pub mod balance;
pub mod event;
pub mod grid;
pub mod reachability;

pub use adjacency::{AdjacencySnapshot, Neighborhood, ProximityGraph, adjacency_rule, permits};
pub use balance::{BalanceError, NetworkBalance, assess, evaluate};
pub use event::PowerEvent;
pub use grid::{AdjacencyStrategy, PowerGrid, TickReport};
pub use reachability::reachable_from;
