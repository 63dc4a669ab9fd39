//! Key types shared by unit tests and benchmarks.

#![allow(missing_docs)]

use parking_lot::Once;

pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(env_logger::init);
}

/// A dense enumeration with ordinals `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// An enumeration with ordinals `{0, 5, 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
pub enum Sparse {
    Zero = 0,
    Five = 5,
    Ten = 10,
}

/// An enumeration that starts at a high offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
#[repr(u16)]
pub enum Offset {
    First = 1000,
    Second,
}

/// An enumeration with a negative ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
#[repr(i8)]
pub enum Negative {
    Minus = -1,
    Zero,
}

/// An enumeration with an ordinal beyond `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
#[repr(u32)]
pub enum TooLarge {
    Small = 1,
    Large = 2_147_483_648,
}

/// An enumeration without variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, fixmap_codegen::Enumeration)]
#[fixmap(fixmap_as(crate))]
pub enum Empty {}
