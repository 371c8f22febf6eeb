//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::device::{DeviceSpec, Position};
use crate::fixed::Fixed64;
use crate::id::DeviceId;
use crate::registry::DeviceRegistry;

// ===========================================================================
// Fixed-point helpers
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

pub fn pos(x: f64, y: f64, z: f64) -> Position {
    Position::from_f64(x, y, z)
}

/// A point on the x axis. Most scenarios only need one dimension.
pub fn at(x: f64) -> Position {
    Position::from_f64(x, 0.0, 0.0)
}

// ===========================================================================
// Spawn helpers
// ===========================================================================

pub fn add_generator(reg: &mut DeviceRegistry, at: Position, range: f64, production: u32) -> DeviceId {
    reg.spawn(DeviceSpec::generator(fixed(range), production), at)
        .expect("generator spawn")
}

pub fn add_consumer(reg: &mut DeviceRegistry, at: Position, range: f64, consumption: u32) -> DeviceId {
    reg.spawn(DeviceSpec::consumer(fixed(range), consumption), at)
        .expect("consumer spawn")
}

pub fn add_transmitter(reg: &mut DeviceRegistry, at: Position, range: f64) -> DeviceId {
    reg.spawn(DeviceSpec::transmitter(fixed(range)), at)
        .expect("transmitter spawn")
}

// ===========================================================================
// Layouts
// ===========================================================================

/// A line of transmitters `spacing` apart with a generator at one end and a
/// consumer at the other. Returns (generator, transmitters, consumer).
pub fn build_transmission_line(
    reg: &mut DeviceRegistry,
    transmitters: usize,
    spacing: f64,
    production: u32,
    consumption: u32,
) -> (DeviceId, Vec<DeviceId>, DeviceId) {
    let range = spacing + 1.0;
    let generator = add_generator(reg, at(0.0), range, production);
    let line: Vec<DeviceId> = (1..=transmitters)
        .map(|i| add_transmitter(reg, at(i as f64 * spacing), range))
        .collect();
    let consumer = add_consumer(
        reg,
        at((transmitters + 1) as f64 * spacing),
        range,
        consumption,
    );
    (generator, line, consumer)
}

/// A `side` x `side` grid of cells on the xz plane, each cell holding a
/// transmitter, and every `stride`-th cell also a generator or consumer
/// alternating. Used to stress the per-tick recomputation.
pub fn build_grid_town(reg: &mut DeviceRegistry, side: usize, stride: usize) -> Vec<DeviceId> {
    let spacing = 10.0;
    let mut ids = Vec::with_capacity(side * side * 2);
    for row in 0..side {
        for col in 0..side {
            let x = col as f64 * spacing;
            let z = row as f64 * spacing;
            ids.push(add_transmitter(reg, pos(x, 0.0, z), spacing + 1.0));

            let cell = row * side + col;
            if stride > 0 && cell % stride == 0 {
                let offset = pos(x + 2.0, 0.0, z + 2.0);
                if (cell / stride) % 2 == 0 {
                    ids.push(add_generator(reg, offset, 5.0, 20));
                } else {
                    ids.push(add_consumer(reg, offset, 5.0, 15));
                }
            }
        }
    }
    ids
}
