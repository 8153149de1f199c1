//! Grid coordinates.
//!
//! Inside the engine a plot position is always a [`Coord`]. The stringly
//! `"{x},{y}"` encoding only exists at the serialization boundary, where a
//! coordinate is used as a JSON object key; the [`Serialize`] and
//! [`Deserialize`] impls below produce and accept exactly that form so a
//! `BTreeMap<Coord, _>` maps directly onto the save file's `plots` object.

use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A plot position on the farm grid. `x` is the column, `y` the row.
///
/// Ordering is column-major (`x` first, then `y`), which is the scan order
/// used by every grid-wide pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Column, starting at 0.
    pub x: u32,
    /// Row, starting at 0.
    pub y: u32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Errors produced when parsing the `"{x},{y}"` text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordParseError {
    /// The text does not contain exactly one comma.
    #[error("coordinate `{0}` is not of the form `x,y`")]
    Malformed(String),

    /// One of the components is not a non-negative decimal integer.
    #[error("coordinate `{0}` has a non-numeric component")]
    NotANumber(String),
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| CoordParseError::Malformed(s.to_owned()))?;
        if y.contains(',') {
            return Err(CoordParseError::Malformed(s.to_owned()));
        }
        // `u32::from_str` accepts a leading `+`; the save format does not.
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(x) || !digits(y) {
            return Err(CoordParseError::NotANumber(s.to_owned()));
        }
        let x = x
            .parse()
            .map_err(|_err| CoordParseError::NotANumber(s.to_owned()))?;
        let y = y
            .parse()
            .map_err(|_err| CoordParseError::NotANumber(s.to_owned()))?;
        Ok(Self { x, y })
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordVisitor;

        impl Visitor<'_> for CoordVisitor {
            type Value = Coord;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a coordinate string of the form `x,y`")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Coord, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(CoordVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn display_has_no_spaces() {
        assert_eq!(Coord::new(3, 12).to_string(), "3,12");
    }

    #[test]
    fn parse_accepts_plain_pairs() {
        assert_eq!("0,0".parse::<Coord>(), Ok(Coord::new(0, 0)));
        assert_eq!("10,7".parse::<Coord>(), Ok(Coord::new(10, 7)));
    }

    #[test]
    fn parse_rejects_noise() {
        for bad in ["", "1", "1,", ",1", "1,2,3", " 1,2", "1, 2", "+1,2", "-1,2", "a,b"] {
            assert!(bad.parse::<Coord>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn ordering_is_column_major() {
        let mut coords = vec![Coord::new(1, 0), Coord::new(0, 1), Coord::new(0, 0)];
        coords.sort();
        assert_eq!(
            coords,
            vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)]
        );
    }

    #[test]
    fn works_as_json_object_key() {
        let mut plots = BTreeMap::new();
        plots.insert(Coord::new(1, 0), Some(5_u32));
        plots.insert(Coord::new(0, 2), None);
        let json = serde_json::to_string(&plots).unwrap();
        assert_eq!(json, r#"{"0,2":null,"1,0":5}"#);

        let back: BTreeMap<Coord, Option<u32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plots);
    }

    #[test]
    fn bad_json_key_is_rejected() {
        let parsed: Result<BTreeMap<Coord, Option<u32>>, _> = serde_json::from_str(r#"{"0;0":null}"#);
        assert!(parsed.is_err());
    }
}
