//! Gridlink Core -- device model and registry for proximity power networks.
//!
//! This crate holds the data every power-network evaluation reads: placed
//! devices, their kinds and capacities, and their positions in 3D space. The
//! network logic itself lives in `gridlink-power`.
//!
//! # Key Types
//!
//! - [`registry::DeviceRegistry`] -- Live set of devices. Placement code
//!   spawns, moves, and despawns through it; renderers read `powered` from it.
//! - [`device::DeviceKind`] -- Generator, Consumer, or Transmitter.
//! - [`device::Position`] -- Fixed-point 3D point with exact range checks.
//! - [`device::DeviceSpec`] -- Creation-time kind, range, production, consumption.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`sim::StateHash`] -- FNV-1a hash for comparing tick results.

pub mod device;
pub mod fixed;
pub mod id;
pub mod registry;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
