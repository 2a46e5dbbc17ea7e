//! The four-valued logic domain of Verilog nets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single four-valued logic value: `V0` and `V1` are driven levels,
/// `Vx` is an unknown or conflicting value, and `Vz` is an undriven
/// (high impedance) net.
///
/// The `{0,1,x,z}` character alphabet used by
/// [`from_char`](Logic::from_char) and [`to_char`](Logic::to_char) is
/// part of the IR boundary and must not change.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logic {
    /// Driven low.
    V0,
    /// Driven high.
    V1,
    /// Unknown.
    Vx,
    /// High impedance.
    Vz,
}

impl Logic {
    /// Every value of the domain, in alphabet order.
    pub const ALL: [Logic; 4] = [Logic::V0, Logic::V1, Logic::Vx, Logic::Vz];

    /// The driven boolean level of this value, if it has one.
    ///
    /// `Vx` has no level by definition, and an undriven `Vz` input could
    /// float to either level, so both read back as `None`. The logic
    /// operators below are all derived from this extraction, which is
    /// why `z` inputs degrade to `x` outputs.
    pub fn level(self) -> Option<bool> {
        match self {
            Logic::V0 => Some(false),
            Logic::V1 => Some(true),
            Logic::Vx | Logic::Vz => None,
        }
    }

    /// The driven value for a boolean level.
    pub fn from_bool(level: bool) -> Self {
        if level {
            Logic::V1
        } else {
            Logic::V0
        }
    }

    /// Decodes one character of the `{0,1,x,z}` alphabet (either case).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '0' => Some(Logic::V0),
            '1' => Some(Logic::V1),
            'x' => Some(Logic::Vx),
            'z' => Some(Logic::Vz),
            _ => None,
        }
    }

    /// Encodes this value as its canonical (lowercase) character.
    pub fn to_char(self) -> char {
        match self {
            Logic::V0 => '0',
            Logic::V1 => '1',
            Logic::Vx => 'x',
            Logic::Vz => 'z',
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// AND: a driven 0 on either side settles the result no matter what the
/// other side does; only two driven 1s make a 1; everything else could
/// still go either way and reads back as `x`.
impl BitAnd for Logic {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        match (self.level(), rhs.level()) {
            (Some(false), _) | (_, Some(false)) => Logic::V0,
            (Some(true), Some(true)) => Logic::V1,
            _ => Logic::Vx,
        }
    }
}

/// OR: the dual of AND, with a driven 1 settling the result.
impl BitOr for Logic {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        match (self.level(), rhs.level()) {
            (Some(true), _) | (_, Some(true)) => Logic::V1,
            (Some(false), Some(false)) => Logic::V0,
            _ => Logic::Vx,
        }
    }
}

/// XOR: no single input can settle the result, so both sides must be
/// driven for the output to be.
impl BitXor for Logic {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        match (self.level(), rhs.level()) {
            (Some(a), Some(b)) => Logic::from_bool(a != b),
            _ => Logic::Vx,
        }
    }
}

/// NOT: inverts a driven level; `x` and `z` invert to `x`.
impl Not for Logic {
    type Output = Self;

    fn not(self) -> Self {
        match self.level() {
            Some(level) => Logic::from_bool(!level),
            None => Logic::Vx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logic::{self, *};

    fn all_pairs() -> impl Iterator<Item = (Logic, Logic)> {
        Logic::ALL
            .into_iter()
            .flat_map(|a| Logic::ALL.into_iter().map(move |b| (a, b)))
    }

    #[test]
    fn and_settles_on_driven_zero() {
        for (a, b) in all_pairs() {
            let expect = if a == V0 || b == V0 {
                V0
            } else if a == V1 && b == V1 {
                V1
            } else {
                Vx
            };
            assert_eq!(a & b, expect, "{a} & {b}");
        }
    }

    #[test]
    fn or_settles_on_driven_one() {
        for (a, b) in all_pairs() {
            let expect = if a == V1 || b == V1 {
                V1
            } else if a == V0 && b == V0 {
                V0
            } else {
                Vx
            };
            assert_eq!(a | b, expect, "{a} | {b}");
        }
    }

    #[test]
    fn xor_requires_both_sides_driven() {
        for (a, b) in all_pairs() {
            let expect = match (a.level(), b.level()) {
                (Some(x), Some(y)) => Logic::from_bool(x != y),
                _ => Vx,
            };
            assert_eq!(a ^ b, expect, "{a} ^ {b}");
        }
        assert_eq!(V1 ^ V1, V0);
        assert_eq!(V0 ^ V1, V1);
    }

    #[test]
    fn not_inverts_levels_and_degrades_the_rest() {
        assert_eq!(!V0, V1);
        assert_eq!(!V1, V0);
        assert_eq!(!Vx, Vx);
        assert_eq!(!Vz, Vx);
    }

    #[test]
    fn hiz_never_survives_an_operator() {
        for &v in &Logic::ALL {
            assert_ne!(v & Vz, Vz);
            assert_ne!(v | Vz, Vz);
            assert_ne!(v ^ Vz, Vz);
        }
        assert_ne!(!Vz, Vz);
    }

    #[test]
    fn level_extraction() {
        assert_eq!(V0.level(), Some(false));
        assert_eq!(V1.level(), Some(true));
        assert_eq!(Vx.level(), None);
        assert_eq!(Vz.level(), None);
        assert_eq!(Logic::from_bool(true), V1);
        assert_eq!(Logic::from_bool(false), V0);
    }

    #[test]
    fn alphabet_roundtrip_both_cases() {
        for &v in &Logic::ALL {
            assert_eq!(Logic::from_char(v.to_char()), Some(v));
            assert_eq!(Logic::from_char(v.to_char().to_ascii_uppercase()), Some(v));
        }
        assert_eq!(Logic::from_char('w'), None);
        assert_eq!(Logic::from_char('3'), None);
    }

    #[test]
    fn display_matches_the_wire_alphabet() {
        let rendered: String = Logic::ALL.iter().map(|v| v.to_char()).collect();
        assert_eq!(rendered, "01xz");
        assert_eq!(format!("{V0}{V1}{Vx}{Vz}"), "01xz");
    }
}
