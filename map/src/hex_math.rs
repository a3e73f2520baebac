use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Axial hex coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

/// The six adjacency vectors, counter-clockwise starting east
pub const DIRECTIONS: [HexCoord; 6] = [
    HexCoord { q: 1, r: 0 },
    HexCoord { q: 1, r: -1 },
    HexCoord { q: 0, r: -1 },
    HexCoord { q: -1, r: 0 },
    HexCoord { q: -1, r: 1 },
    HexCoord { q: 0, r: 1 },
];

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn offset(self, direction: HexCoord, times: i32) -> HexCoord {
        HexCoord::new(self.q + direction.q * times, self.r + direction.r * times)
    }

    /// The six adjacent coordinates (which may lie outside a finite map)
    pub fn neighbors(self) -> impl Iterator<Item = HexCoord> {
        DIRECTIONS.into_iter().map(move |d| self.offset(d, 1))
    }

    pub fn distance(self, other: HexCoord) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// Coordinates at exactly `radius` steps, walking the ring edge by edge
    pub fn ring(self, radius: i32) -> Vec<HexCoord> {
        if radius <= 0 {
            return vec![self];
        }
        let mut result = Vec::with_capacity(6 * radius as usize);
        let mut current = self.offset(DIRECTIONS[4], radius);
        for direction in DIRECTIONS {
            for _ in 0..radius {
                result.push(current);
                current = current.offset(direction, 1);
            }
        }
        result
    }

    /// Coordinates within `radius` steps, nearest rings first
    pub fn disk(self, radius: i32) -> Vec<HexCoord> {
        (0..=radius.max(0)).flat_map(|d| self.ring(d)).collect()
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseHexCoordError;

impl From<ParseIntError> for ParseHexCoordError {
    fn from(_: ParseIntError) -> Self {
        ParseHexCoordError
    }
}

impl FromStr for HexCoord {
    type Err = ParseHexCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s.split_once(',').ok_or(ParseHexCoordError)?;
        Ok(HexCoord::new(q.trim().parse()?, r.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let origin = HexCoord::new(0, 0);
        assert_eq!(origin.distance(HexCoord::new(2, -1)), 2);
        assert_eq!(origin.distance(HexCoord::new(-3, 3)), 3);
        for n in origin.neighbors() {
            assert_eq!(origin.distance(n), 1);
        }
    }

    #[test]
    fn test_ring_and_disk_sizes() {
        let origin = HexCoord::new(1, -2);
        assert_eq!(origin.ring(0), vec![origin]);
        for radius in 1..5 {
            let ring = origin.ring(radius);
            assert_eq!(ring.len(), 6 * radius as usize);
            assert!(ring.iter().all(|c| c.distance(origin) == radius));
        }
        assert_eq!(origin.disk(2).len(), 19);
    }

    #[test]
    fn test_parse_round_trip() {
        let coord = HexCoord::new(-4, 7);
        assert_eq!(coord.to_string().parse::<HexCoord>(), Ok(coord));
        assert!("7".parse::<HexCoord>().is_err());
    }
}
