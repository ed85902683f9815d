use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::errors::*;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// The coordinate one cell away in the given direction.
    /// Returns None if the result would be negative, i.e. not representable.
    /// Upper bounds are the maze's business, not the coordinate's.
    pub fn offset(self, dir: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let (dx, dy) = dir.offset();
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => Some(Cartesian2DCoordinate::new(x, y)),
            _ => None,
        }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// All directions in wall bit order.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    /// The wall bit of this direction: N=1, E=2, S=4, W=8.
    #[inline]
    pub fn mask(self) -> u8 {
        match self {
            CompassPrimary::North => 0b0001,
            CompassPrimary::East => 0b0010,
            CompassPrimary::South => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// (dx, dy) of one step in this direction. y grows southwards.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::South => (0, 1),
            CompassPrimary::West => (-1, 0),
        }
    }

    /// The direction leading from `a` to `b` when they are orthogonally adjacent.
    pub fn between(a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> Option<CompassPrimary> {
        let dx = i64::from(b.x) - i64::from(a.x);
        let dy = i64::from(b.y) - i64::from(a.y);
        CompassPrimary::ALL.iter().cloned().find(|dir| dir.offset() == (dx, dy))
    }
}

impl FromStr for CompassPrimary {
    type Err = Error;

    fn from_str(s: &str) -> Result<CompassPrimary> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(CompassPrimary::North),
            "E" | "EAST" => Ok(CompassPrimary::East),
            "S" | "SOUTH" => Ok(CompassPrimary::South),
            "W" | "WEST" => Ok(CompassPrimary::West),
            _ => Err(ErrorKind::InvalidDirection(s.to_owned()).into()),
        }
    }
}

impl TryFrom<char> for CompassPrimary {
    type Error = Error;

    fn try_from(c: char) -> Result<CompassPrimary> {
        c.to_string().parse()
    }
}

const HEX_DIGITS: [char; 16] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C',
                                'D', 'E', 'F'];

/// Which of the four walls of a cell are standing, one bit per `CompassPrimary`.
/// Only the low 4 bits are ever set.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct WallMask(u8);

impl WallMask {
    pub const ALL_WALLS: WallMask = WallMask(0b1111);
    pub const NO_WALLS: WallMask = WallMask(0b0000);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, dir: CompassPrimary) -> bool {
        self.0 & dir.mask() != 0
    }

    #[inline]
    pub fn insert(&mut self, dir: CompassPrimary) {
        self.0 |= dir.mask();
    }

    #[inline]
    pub fn remove(&mut self, dir: CompassPrimary) {
        self.0 &= !dir.mask();
    }

    /// Number of walls standing.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The upper case hexadecimal digit for this mask, the unit of the compact maze dump.
    pub fn compact_code(self) -> char {
        HEX_DIGITS[(self.0 & 0b1111) as usize]
    }

    /// Parse a single hexadecimal digit (either case) back into a wall mask.
    pub fn from_compact_code(code: char) -> Result<WallMask> {
        code.to_digit(16)
            .map(|digit| WallMask(digit as u8))
            .ok_or_else(|| ErrorKind::InvalidCompactCode(code).into())
    }
}

/// One position of the maze grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coordinate: Cartesian2DCoordinate,
    walls: WallMask,
    visited: bool,
    on_path: bool,
}

impl Cell {
    /// A fully enclosed, unvisited cell.
    pub fn new(coordinate: Cartesian2DCoordinate) -> Cell {
        Cell {
            coordinate,
            walls: WallMask::ALL_WALLS,
            visited: false,
            on_path: false,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Cartesian2DCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn walls(&self) -> WallMask {
        self.walls
    }

    #[inline]
    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        self.walls.contains(dir)
    }

    #[inline]
    pub fn remove_wall(&mut self, dir: CompassPrimary) {
        self.walls.remove(dir);
    }

    #[inline]
    pub fn add_wall(&mut self, dir: CompassPrimary) {
        self.walls.insert(dir);
    }

    pub(crate) fn set_walls(&mut self, walls: WallMask) {
        self.walls = walls;
    }

    /// All four walls standing.
    pub fn is_closed(&self) -> bool {
        self.walls == WallMask::ALL_WALLS
    }

    /// No walls standing.
    pub fn is_open(&self) -> bool {
        self.walls == WallMask::NO_WALLS
    }

    #[inline]
    pub fn visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    /// Whether a consumer (e.g. a solver) marked this cell as part of a displayed path.
    #[inline]
    pub fn on_path(&self) -> bool {
        self.on_path
    }

    #[inline]
    pub fn set_on_path(&mut self, on_path: bool) {
        self.on_path = on_path;
    }

    pub fn compact_code(&self) -> char {
        self.walls.compact_code()
    }
}
