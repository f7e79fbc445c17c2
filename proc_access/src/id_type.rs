//! Id Type module
//!
//! Identifier types and the width of the output parameter that returns a
//! generated identifier.

use std::fmt::Display;
use type_mapping::{FromProcValue, IdWidth, ProcValue};

/// Types usable as primary-key identifiers.
///
/// `WIDTH` picks the output parameter width on insert: byte, short and long
/// identifiers declare their own width, everything else uses `IdWidth::Int`.
pub trait Identifier: Into<ProcValue> + FromProcValue + Clone + Display + Send + Sync + 'static {
    const WIDTH: IdWidth = IdWidth::Int;
}

impl Identifier for u8 {
    const WIDTH: IdWidth = IdWidth::TinyInt;
}

impl Identifier for i16 {
    const WIDTH: IdWidth = IdWidth::SmallInt;
}

impl Identifier for i32 {
    const WIDTH: IdWidth = IdWidth::Int;
}

impl Identifier for i64 {
    const WIDTH: IdWidth = IdWidth::BigInt;
}

// Unmapped widths fall back to Int
impl Identifier for i8 {}
impl Identifier for u16 {}
impl Identifier for u32 {}

/// Width of the output parameter for identifier type `TID`
pub fn id_width<TID: Identifier>() -> IdWidth {
    TID::WIDTH
}
