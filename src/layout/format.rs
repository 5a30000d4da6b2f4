//! Display formatters for leaf fields.
//!
//! A [`Formatter`] turns a field's raw bytes into a human-readable string.
//! Formatting is advisory only: it never fails and never influences
//! navigation. The canonical families are unsigned integers ([`UInt`]) and hex
//! strings ([`Hex`]); [`Named`], [`Text`], [`Uuid`] and [`Filler`] cover the
//! remaining shapes found in disk headers. Any `Fn(&[u8]) -> String + Send + Sync`
//! closure is a formatter too.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;

use crate::util::hex::{elide, format_bytes};

/// Byte order of a multi-byte integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// Decode up to 16 bytes as an unsigned integer, zero-extending short input.
    ///
    /// Returns `None` for input wider than 16 bytes. An empty slice decodes to 0.
    pub fn decode(self, raw: &[u8]) -> Option<u128> {
        match raw.len() {
            0 => Some(0),
            n @ 1..=16 => Some(match self {
                Endian::Big => BigEndian::read_uint128(raw, n),
                Endian::Little => LittleEndian::read_uint128(raw, n),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Big => write!(f, "big-endian"),
            Endian::Little => write!(f, "little-endian"),
        }
    }
}

/// Renders raw field bytes for display.
///
/// Implementations must be total: any input no longer than the field's
/// declared length yields a string.
pub trait Formatter: Send + Sync {
    fn format(&self, raw: &[u8]) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&[u8]) -> String + Send + Sync,
{
    fn format(&self, raw: &[u8]) -> String {
        self(raw)
    }
}

/// Unsigned integer in the given byte order, printed in decimal.
///
/// Inputs wider than 128 bits fall back to full hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UInt(pub Endian);

impl UInt {
    pub const BIG: UInt = UInt(Endian::Big);
    pub const LITTLE: UInt = UInt(Endian::Little);
}

impl Formatter for UInt {
    fn format(&self, raw: &[u8]) -> String {
        match self.0.decode(raw) {
            Some(value) => value.to_string(),
            None => format_bytes(raw),
        }
    }
}

/// Default hex length, in characters, above which [`Hex`] elides its output.
pub const HEX_ELIDE_THRESHOLD: usize = 20;

/// Characters kept on each side of the `...` when eliding.
pub const HEX_ELIDE_KEEP: usize = 6;

/// Lowercase hex rendering, optionally elided for long values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hex {
    threshold: Option<usize>,
}

impl Hex {
    /// Full hex, never elided.
    pub const FULL: Hex = Hex { threshold: None };

    /// Hex elided once the text exceeds [`HEX_ELIDE_THRESHOLD`] characters.
    pub const ELIDED: Hex = Hex {
        threshold: Some(HEX_ELIDE_THRESHOLD),
    };

    /// Hex elided once the text exceeds `threshold` characters.
    pub const fn elided_after(threshold: usize) -> Hex {
        Hex {
            threshold: Some(threshold),
        }
    }
}

impl Formatter for Hex {
    fn format(&self, raw: &[u8]) -> String {
        let text = format_bytes(raw);
        match self.threshold {
            Some(limit) => elide(&text, limit, HEX_ELIDE_KEEP).into_owned(),
            None => text,
        }
    }
}

/// Fixed-width text: decoded as lossy UTF-8 with trailing NULs trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text;

impl Formatter for Text {
    fn format(&self, raw: &[u8]) -> String {
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}

/// 16-byte identifier in the canonical 8-4-4-4-12 grouping.
///
/// Any other length renders as plain hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid;

impl Formatter for Uuid {
    fn format(&self, raw: &[u8]) -> String {
        if raw.len() != 16 {
            return format_bytes(raw);
        }
        format!(
            "{}-{}-{}-{}-{}",
            format_bytes(&raw[0..4]),
            format_bytes(&raw[4..6]),
            format_bytes(&raw[6..8]),
            format_bytes(&raw[8..10]),
            format_bytes(&raw[10..16])
        )
    }
}

/// Unsigned integer annotated with a symbolic name, e.g. `1 (clean)`.
///
/// Values missing from the table print as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Named {
    pub endian: Endian,
    pub names: &'static [(u128, &'static str)],
}

impl Formatter for Named {
    fn format(&self, raw: &[u8]) -> String {
        let Some(value) = self.endian.decode(raw) else {
            return format_bytes(raw);
        };
        match self.names.iter().find(|(v, _)| *v == value) {
            Some((_, name)) => format!("{} ({})", value, name),
            None => value.to_string(),
        }
    }
}

/// Padding and reserved regions: renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filler;

impl Formatter for Filler {
    fn format(&self, _raw: &[u8]) -> String {
        String::new()
    }
}
