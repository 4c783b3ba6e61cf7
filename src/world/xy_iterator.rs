//! Endless square-spiral walk over grid coordinates
//!
//! Starting at the centre, the walk visits the ring of distance 1 clockwise
//! from the cell above the centre, then ring 2 from two cells above, and so on:
//!
//! ```text
//!  18 O  9  A  B  C
//!  17 N  8  1  2  D
//!  16 M  7  0  3  E
//!  15 L  6  5  4  F
//!  14 K  J  I  H  G
//! ```
//!
//! The first cell of each ring (`1`, `A`, ...) can be used as a starting point
//! by passing the ring number.

/// One of the eight grid directions, `y` growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    /// Offset of a single step in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, -1),
        }
    }

    /// Step `(x, y)` once in this direction
    pub fn transform(self, (x, y): (i32, i32)) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

#[derive(Debug, Clone)]
pub struct XyIterator {
    x: i32,
    y: i32,
    ring: i32,
    dir: Direction,
    step: i32,
}

impl XyIterator {
    /// Spiral beginning at the centre cell itself
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y: y + 1,
            ring: 0,
            dir: Direction::Top,
            step: 2,
        }
    }

    /// Spiral beginning at the top cell of `ring`
    ///
    /// Rings below 1 start at the centre, the same as [`XyIterator::new`].
    pub fn from_ring(x: i32, y: i32, ring: i32) -> Self {
        if ring < 1 {
            return Self::new(x, y);
        }
        // Positioned one cell left of the ring's top cell, partway along the top edge
        Self {
            x: x - 1,
            y: y - ring,
            ring,
            dir: Direction::Right,
            step: ring + 1,
        }
    }

    /// Ring currently being walked
    ///
    /// Lags by one cell at each ring boundary: the top cell of a new ring is
    /// reported with the previous ring's depth.
    pub fn depth(&self) -> i32 {
        self.ring
    }
}

impl Iterator for XyIterator {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        (self.x, self.y) = self.dir.transform((self.x, self.y));
        self.step -= 1;

        if self.step <= 0 {
            self.step = 2 * self.ring;
            self.dir = match self.dir {
                Direction::Top => {
                    self.ring += 1;
                    self.step += 1;
                    Direction::Right
                }
                Direction::Right => Direction::Bottom,
                Direction::Bottom => Direction::Left,
                Direction::Left => {
                    self.step += 1;
                    Direction::Top
                }
                other => unreachable!("spiral walks only axis directions, got {:?}", other),
            };
        }

        Some((self.x, self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_two_rings() {
        let cells: Vec<_> = XyIterator::new(0, 0).take(10).collect();
        assert_eq!(
            cells,
            vec![
                (0, 0),   // 0
                (0, -1),  // 1
                (1, -1),  // 2
                (1, 0),   // 3
                (1, 1),   // 4
                (0, 1),   // 5
                (-1, 1),  // 6
                (-1, 0),  // 7
                (-1, -1), // 8
                (-1, -2), // 9
            ]
        );
    }

    #[test]
    fn test_ring_start_matches_full_walk() {
        let full: Vec<_> = XyIterator::new(5, 5).take(30).collect();

        let ring1: Vec<_> = XyIterator::from_ring(5, 5, 1).take(8).collect();
        assert_eq!(ring1[..], full[1..9]);

        // Ring 2 starts at `A`, the cell after `9`
        let ring2: Vec<_> = XyIterator::from_ring(5, 5, 2).take(10).collect();
        assert_eq!(ring2[0], (5, 3));
        assert_eq!(ring2[..], full[10..20]);
    }

    #[test]
    fn test_ring_zero_starts_at_centre() {
        let from_zero: Vec<_> = XyIterator::from_ring(2, 3, 0).take(12).collect();
        let full: Vec<_> = XyIterator::new(2, 3).take(12).collect();
        assert_eq!(from_zero, full);
        assert_eq!(XyIterator::from_ring(2, 3, -4).next(), Some((2, 3)));
    }

    #[test]
    fn test_spiral_covers_square_without_repeats() {
        use std::collections::HashSet;
        // Rings 0..=3 form a 7x7 square: 49 cells
        let cells: HashSet<_> = XyIterator::new(0, 0).take(49).collect();
        assert_eq!(cells.len(), 49);
        assert!(cells.iter().all(|(x, y)| x.abs() <= 3 && y.abs() <= 3));
    }

    #[test]
    fn test_depth_tracks_rings() {
        let mut it = XyIterator::new(0, 0);
        it.next();
        assert_eq!(it.depth(), 0);
        it.next();
        assert_eq!(it.depth(), 1);
        for _ in 0..8 {
            it.next();
        }
        assert_eq!(it.depth(), 2);
    }

    #[test]
    fn test_direction_transform() {
        assert_eq!(Direction::TopLeft.transform((0, 0)), (-1, -1));
        assert_eq!(Direction::BottomRight.transform((2, 2)), (3, 3));
    }
}
