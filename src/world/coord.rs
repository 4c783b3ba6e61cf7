//! Room names as world grid coordinates
//!
//! Room names follow the `W3N5` / `E0S2` convention: the horizontal half
//! (`W`/`E`) and vertical half (`N`/`S`) each count outward from the map
//! centre. West and north map to negative grid values, so `W0` sits directly
//! left of `E0` and `N0` directly above `S0`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid room name: {0:?}")]
pub struct ParseRoomError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomCoord {
    pub x: i32,
    pub y: i32,
}

impl RoomCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rooms between two coordinates when diagonal exits are allowed
    pub fn distance(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, hx) = if self.x < 0 { ('W', -self.x - 1) } else { ('E', self.x) };
        let (v, vy) = if self.y < 0 { ('N', -self.y - 1) } else { ('S', self.y) };
        write!(f, "{}{}{}{}", h, hx, v, vy)
    }
}

impl FromStr for RoomCoord {
    type Err = ParseRoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRoomError(s.to_string());

        let h = s.chars().next().ok_or_else(err)?;
        let rest = &s[h.len_utf8()..];
        let split = rest.find(|c: char| c == 'N' || c == 'S').ok_or_else(err)?;

        let hx: i32 = rest[..split].parse().map_err(|_| err())?;
        let v = rest[split..].chars().next().ok_or_else(err)?;
        let vy: i32 = rest[split + 1..].parse().map_err(|_| err())?;
        if hx < 0 || vy < 0 {
            return Err(err());
        }

        let x = match h {
            'W' => -hx - 1,
            'E' => hx,
            _ => return Err(err()),
        };
        let y = match v {
            'N' => -vy - 1,
            'S' => vy,
            _ => return Err(err()),
        };

        Ok(Self { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quadrants() {
        assert_eq!("E0S0".parse::<RoomCoord>().unwrap(), RoomCoord::new(0, 0));
        assert_eq!("W0N0".parse::<RoomCoord>().unwrap(), RoomCoord::new(-1, -1));
        assert_eq!("W3N5".parse::<RoomCoord>().unwrap(), RoomCoord::new(-4, -6));
        assert_eq!("E12S7".parse::<RoomCoord>().unwrap(), RoomCoord::new(12, 7));
    }

    #[test]
    fn test_display_inverts_parse() {
        for name in ["W0N0", "E4S1", "W10S3", "E0N9"] {
            let coord: RoomCoord = name.parse().unwrap();
            assert_eq!(coord.name(), name);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "W", "X1N1", "W1", "W1Q2", "WaNb", "W-1N2"] {
            assert!(bad.parse::<RoomCoord>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_distance_crosses_origin() {
        let a: RoomCoord = "W0N0".parse().unwrap();
        let b: RoomCoord = "E1S0".parse().unwrap();
        assert_eq!(a.distance(&b), 2);
        assert_eq!(b.distance(&a), 2);
        assert_eq!(a.distance(&a), 0);
    }
}
