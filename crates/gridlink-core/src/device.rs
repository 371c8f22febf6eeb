//! Device data model: kinds, positions, and per-device power specs.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed64, diff_square_bits, square_bits};

// ---------------------------------------------------------------------------
// Device kind
// ---------------------------------------------------------------------------

/// The role a device plays in the power network. Fixed for a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Generator,
    Consumer,
    Transmitter,
}

impl DeviceKind {
    /// All three device kinds.
    pub fn all() -> [DeviceKind; 3] {
        [
            DeviceKind::Generator,
            DeviceKind::Consumer,
            DeviceKind::Transmitter,
        ]
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in continuous 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
        z: Fixed64::ZERO,
    };

    pub fn new(x: Fixed64, y: Fixed64, z: Fixed64) -> Self {
        Self { x, y, z }
    }

    /// Build a position from floats. Use only for initialization.
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Fixed64::from_num(x),
            y: Fixed64::from_num(y),
            z: Fixed64::from_num(z),
        }
    }

    /// Exact squared Euclidean distance in raw fixed-point bits
    /// (2^-64 per unit squared).
    ///
    /// `None` when the sum overflows `u128`; such a distance is farther than
    /// any representable range.
    pub fn distance_squared_bits(&self, other: &Position) -> Option<u128> {
        diff_square_bits(self.x, other.x)
            .checked_add(diff_square_bits(self.y, other.y))?
            .checked_add(diff_square_bits(self.z, other.z))
    }

    /// Whether `other` lies strictly closer than `range`.
    ///
    /// Compares squared values exactly, with no square root and no
    /// saturation. A distance exactly equal to `range` is outside.
    pub fn within(&self, other: &Position, range: Fixed64) -> bool {
        self.distance_squared_bits(other)
            .is_some_and(|d| d < square_bits(range))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

// ---------------------------------------------------------------------------
// Device spec
// ---------------------------------------------------------------------------

/// Creation-time configuration of a device. Immutable once spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub kind: DeviceKind,
    /// Distance within which other devices may connect to this one.
    pub range: Fixed64,
    /// Power output.
    pub production: u32,
    /// Power demand.
    pub consumption: u32,
}

impl DeviceSpec {
    /// Range given to a device when none is configured.
    pub const DEFAULT_RANGE: Fixed64 = Fixed64::const_from_int(10);

    /// A spec with the default range and no production or consumption.
    pub fn new(kind: DeviceKind) -> Self {
        Self {
            kind,
            range: Self::DEFAULT_RANGE,
            production: 0,
            consumption: 0,
        }
    }

    pub fn generator(range: Fixed64, production: u32) -> Self {
        Self::new(DeviceKind::Generator)
            .with_range(range)
            .with_production(production)
    }

    pub fn consumer(range: Fixed64, consumption: u32) -> Self {
        Self::new(DeviceKind::Consumer)
            .with_range(range)
            .with_consumption(consumption)
    }

    pub fn transmitter(range: Fixed64) -> Self {
        Self::new(DeviceKind::Transmitter).with_range(range)
    }

    pub fn with_range(mut self, range: Fixed64) -> Self {
        self.range = range;
        self
    }

    pub fn with_production(mut self, production: u32) -> Self {
        self.production = production;
        self
    }

    pub fn with_consumption(mut self, consumption: u32) -> Self {
        self.consumption = consumption;
        self
    }
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// A placed device. Only `position` and `powered` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    kind: DeviceKind,
    range: Fixed64,
    production: u32,
    consumption: u32,
    pub(crate) position: Position,
    pub(crate) powered: bool,
}

impl Device {
    pub(crate) fn from_spec(spec: DeviceSpec, position: Position) -> Self {
        Self {
            kind: spec.kind,
            range: spec.range,
            production: spec.production,
            consumption: spec.consumption,
            position,
            powered: false,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn range(&self) -> Fixed64 {
        self.range
    }

    pub fn production(&self) -> u32 {
        self.production
    }

    pub fn consumption(&self) -> u32 {
        self.consumption
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the last tick found this consumer's network sufficient.
    /// Always `false` for generators and transmitters.
    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Reconstruct the spec this device was spawned from.
    pub fn spec(&self) -> DeviceSpec {
        DeviceSpec {
            kind: self.kind,
            range: self.range,
            production: self.production,
            consumption: self.consumption,
        }
    }
}
