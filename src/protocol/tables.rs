//! Symbolic value <-> wire byte tables.
//!
//! Every settable domain has one ordered table. The entry at index 0 is the
//! domain's designated default: a lookup that misses in either direction
//! falls back to it instead of failing, so a unit reporting a byte we do not
//! know still decodes to something usable. Callers that care can check
//! membership with [`ValueTable::contains`] first.

use super::{FanSpeed, Mode, Power, Vane, WideVane};

/// An ordered correspondence between a symbolic value and its wire byte.
pub struct ValueTable<T: 'static> {
    entries: &'static [(T, u8)],
}

impl<T: Copy + PartialEq> ValueTable<T> {
    pub const fn new(entries: &'static [(T, u8)]) -> Self {
        Self { entries }
    }

    /// The fallback value, by convention the first entry.
    pub fn default_value(&self) -> T {
        self.entries[0].0
    }

    /// Wire byte for `value`, falling back to the default entry's byte when
    /// the value is not in the table.
    pub fn to_wire(&self, value: T) -> u8 {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .unwrap_or(&self.entries[0])
            .1
    }

    /// Symbolic value for `byte`, falling back to the default entry when the
    /// unit sends a byte we do not recognize.
    pub fn from_wire(&self, byte: u8) -> T {
        self.entries
            .iter()
            .find(|(_, b)| *b == byte)
            .unwrap_or(&self.entries[0])
            .0
    }

    pub fn contains(&self, value: T) -> bool {
        self.entries.iter().any(|(v, _)| *v == value)
    }

    pub fn entries(&self) -> impl Iterator<Item = (T, u8)> + '_ {
        self.entries.iter().copied()
    }
}

pub const POWER: ValueTable<Power> = ValueTable::new(&[(Power::Off, 0x00), (Power::On, 0x01)]);

pub const MODE: ValueTable<Mode> = ValueTable::new(&[
    (Mode::Heat, 0x01),
    (Mode::Dry, 0x02),
    (Mode::Cool, 0x03),
    (Mode::Fan, 0x07),
    (Mode::Auto, 0x08),
]);

// 0x04 skipped on the wire.
pub const FAN: ValueTable<FanSpeed> = ValueTable::new(&[
    (FanSpeed::Auto, 0x00),
    (FanSpeed::Quiet, 0x01),
    (FanSpeed::One, 0x02),
    (FanSpeed::Two, 0x03),
    (FanSpeed::Three, 0x05),
    (FanSpeed::Four, 0x06),
]);

pub const VANE: ValueTable<Vane> = ValueTable::new(&[
    (Vane::Auto, 0x00),
    (Vane::One, 0x01),
    (Vane::Two, 0x02),
    (Vane::Three, 0x03),
    (Vane::Four, 0x04),
    (Vane::Five, 0x05),
    (Vane::Swing, 0x07),
]);

pub const WIDE_VANE: ValueTable<WideVane> = ValueTable::new(&[
    (WideVane::FullLeft, 0x01),
    (WideVane::Left, 0x02),
    (WideVane::Center, 0x03),
    (WideVane::Right, 0x04),
    (WideVane::FullRight, 0x05),
    (WideVane::Split, 0x08),
    (WideVane::Swing, 0x0C),
]);

/// Target temperature in whole degrees Celsius, 31 down to 16. Only used on
/// units that have not announced the extended half-degree encoding.
pub const SET_TEMP: ValueTable<i8> = ValueTable::new(&[
    (31, 0x00),
    (30, 0x01),
    (29, 0x02),
    (28, 0x03),
    (27, 0x04),
    (26, 0x05),
    (25, 0x06),
    (24, 0x07),
    (23, 0x08),
    (22, 0x09),
    (21, 0x0A),
    (20, 0x0B),
    (19, 0x0C),
    (18, 0x0D),
    (17, 0x0E),
    (16, 0x0F),
]);

/// Room temperature report, 10 to 41 degrees Celsius.
pub const ROOM_TEMP: ValueTable<i8> = ValueTable::new(&[
    (10, 0x00),
    (11, 0x01),
    (12, 0x02),
    (13, 0x03),
    (14, 0x04),
    (15, 0x05),
    (16, 0x06),
    (17, 0x07),
    (18, 0x08),
    (19, 0x09),
    (20, 0x0A),
    (21, 0x0B),
    (22, 0x0C),
    (23, 0x0D),
    (24, 0x0E),
    (25, 0x0F),
    (26, 0x10),
    (27, 0x11),
    (28, 0x12),
    (29, 0x13),
    (30, 0x14),
    (31, 0x15),
    (32, 0x16),
    (33, 0x17),
    (34, 0x18),
    (35, 0x19),
    (36, 0x1A),
    (37, 0x1B),
    (38, 0x1C),
    (39, 0x1D),
    (40, 0x1E),
    (41, 0x1F),
]);
