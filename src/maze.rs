use std::fmt;
use std::slice;

use itertools::{iproduct, Itertools};
use log::debug;

use crate::cells::{Cartesian2DCoordinate, Cell, CompassPrimary, CoordinateSmallVec, WallMask};
use crate::errors::*;
use crate::units::{Height, Width};

/// A rectangular grid of walled cells.
///
/// The maze owns its cells in a flat row-major arena; they are only ever handed out as borrows
/// through the bounds checked accessors. Wall mutations that involve two cells go through
/// `remove_wall_between` so both sides of a wall always agree.
#[derive(Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    entry: Cartesian2DCoordinate,
    exit: Cartesian2DCoordinate,
    perfect: bool,
    seed: u64,
    cells: Vec<Cell>,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Maze :: width: {:?}, height: {:?}, entry: {:?}, exit: {:?}, perfect: {:?}, \
                seed: {:?}",
               self.width,
               self.height,
               self.entry,
               self.exit,
               self.perfect,
               self.seed)
    }
}

/// Collects the construction parameters of a `Maze`.
///
/// Entry defaults to the top-left corner, exit to the bottom-right corner, the maze is perfect
/// and the seed is 1.
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    width: Width,
    height: Height,
    perfect: bool,
    seed: u64,
    entry: Cartesian2DCoordinate,
    exit: Option<Cartesian2DCoordinate>,
}

impl MazeBuilder {
    pub fn new(width: Width, height: Height) -> MazeBuilder {
        MazeBuilder {
            width,
            height,
            perfect: true,
            seed: 1,
            entry: Cartesian2DCoordinate::new(0, 0),
            exit: None,
        }
    }

    pub fn perfect(mut self, perfect: bool) -> MazeBuilder {
        self.perfect = perfect;
        self
    }

    pub fn seed(mut self, seed: u64) -> MazeBuilder {
        self.seed = seed;
        self
    }

    pub fn entry(mut self, entry: Cartesian2DCoordinate) -> MazeBuilder {
        self.entry = entry;
        self
    }

    pub fn exit(mut self, exit: Cartesian2DCoordinate) -> MazeBuilder {
        self.exit = Some(exit);
        self
    }

    /// Allocate the grid with every cell fully walled, then normalize the border.
    ///
    /// Entry and exit are stored as given; bounds checking them is the configuration layer's job.
    pub fn build(self) -> Result<Maze> {
        let (Width(width), Height(height)) = (self.width, self.height);
        let max_side = u32::MAX as usize;
        if width == 0 || height == 0 || width > max_side || height > max_side {
            return Err(ErrorKind::InvalidDimensions(width, height).into());
        }

        let cells = iproduct!(0..height, 0..width)
            .map(|(y, x)| Cell::new(Cartesian2DCoordinate::new(x as u32, y as u32)))
            .collect::<Vec<Cell>>();
        let exit = self.exit.unwrap_or_else(|| {
            Cartesian2DCoordinate::new((width - 1) as u32, (height - 1) as u32)
        });

        let mut maze = Maze {
            width,
            height,
            entry: self.entry,
            exit,
            perfect: self.perfect,
            seed: self.seed,
            cells,
        };
        maze.normalize_border();

        Ok(maze)
    }
}

impl Maze {
    /// A maze with all the `MazeBuilder` defaults.
    pub fn new(width: Width, height: Height) -> Result<Maze> {
        MazeBuilder::new(width, height).build()
    }

    /// Rebuild a maze from the rows of a compact dump (see `dump_compact`).
    ///
    /// The builder supplies everything the dump does not record: entry, exit, seed and the
    /// perfect flag. Its dimensions must match the dump.
    pub fn from_compact<S: AsRef<str>>(rows: &[S], builder: MazeBuilder) -> Result<Maze> {
        let mut maze = builder.build()?;

        let rows: Vec<&str> = rows.iter().map(|row| row.as_ref().trim_end()).collect();
        let dump_width = rows.first().map_or(0, |row| row.chars().count());
        let rectangular = rows.iter().all(|row| row.chars().count() == dump_width);
        if !rectangular || dump_width != maze.width || rows.len() != maze.height {
            return Err(ErrorKind::InvalidDimensions(dump_width, rows.len()).into());
        }

        for (cell, code) in maze.cells.iter_mut().zip(rows.iter().flat_map(|row| row.chars())) {
            cell.set_walls(WallMask::from_compact_code(code)?);
        }

        Ok(maze)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn entry(&self) -> Cartesian2DCoordinate {
        self.entry
    }

    #[inline]
    pub fn exit(&self) -> Cartesian2DCoordinate {
        self.exit
    }

    /// Whether generation should produce a maze without loops.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.perfect
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Is the grid coordinate within `[0, width) x [0, height)`.
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Convert a grid coordinate to its row-major index in the range 0...maze.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Result<&Cell> {
        match self.coordinate_to_index(coord) {
            Some(index) => Ok(&self.cells[index]),
            None => Err(ErrorKind::OutOfBounds(coord).into()),
        }
    }

    pub fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Result<&mut Cell> {
        match self.coordinate_to_index(coord) {
            Some(index) => Ok(&mut self.cells[index]),
            None => Err(ErrorKind::OutOfBounds(coord).into()),
        }
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Grid coordinates row-major: (0, 0), (1, 0) ... (width - 1, height - 1).
    pub fn iter(&self) -> impl Iterator<Item = Cartesian2DCoordinate> + '_ {
        self.cells.iter().map(Cell::coordinate)
    }

    /// The cells one row at a time, north to south.
    pub fn iter_row(&self) -> slice::Chunks<Cell> {
        self.cells.chunks(self.width)
    }

    /// The in-bounds cell one step away in `direction`, passage or not.
    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// In-bounds cells to the North, East, South or West, in that order.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Carve a passage between two orthogonally adjacent cells.
    ///
    /// Clears the wall of `a` facing `b` and the wall of `b` facing `a`. Removing an already
    /// removed wall is fine. Fails, leaving the maze untouched, if either cell is out of bounds
    /// or the cells are not adjacent (diagonal, further apart or the same cell).
    pub fn remove_wall_between(&mut self,
                               a: Cartesian2DCoordinate,
                               b: Cartesian2DCoordinate)
                               -> Result<()> {
        let a_index = self.coordinate_to_index(a)
            .ok_or_else(|| Error::from(ErrorKind::OutOfBounds(a)))?;
        let b_index = self.coordinate_to_index(b)
            .ok_or_else(|| Error::from(ErrorKind::OutOfBounds(b)))?;
        let direction = CompassPrimary::between(a, b)
            .ok_or_else(|| Error::from(ErrorKind::NonAdjacentCells(a, b)))?;

        self.carve(a_index, b_index, direction);
        Ok(())
    }

    /// Is the wall between two adjacent cells cleared on both sides.
    pub fn is_passage(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        match (self.cell(a), self.cell(b), CompassPrimary::between(a, b)) {
            (Ok(cell_a), Ok(cell_b), Some(dir)) => {
                !cell_a.has_wall(dir) && !cell_b.has_wall(dir.opposite())
            }
            _ => false,
        }
    }

    /// Number of adjacent cell pairs joined by a passage.
    pub fn open_passages_count(&self) -> usize {
        self.iter()
            .map(|coord| {
                [CompassPrimary::East, CompassPrimary::South]
                    .iter()
                    .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                    .filter(|neighbour| self.is_passage(coord, *neighbour))
                    .count()
            })
            .sum()
    }

    /// Re-enclose every cell and forget visited and path marks.
    ///
    /// This also undoes the border normalization.
    pub fn reset_walls(&mut self) {
        for cell in &mut self.cells {
            cell.set_walls(WallMask::ALL_WALLS);
            cell.set_visited(false);
            cell.set_on_path(false);
        }
    }

    pub fn clear_visited(&mut self) {
        for cell in &mut self.cells {
            cell.set_visited(false);
        }
    }

    /// The canonical text form of the wall state: one string per row, one hex digit per cell.
    pub fn dump_compact(&self) -> Vec<String> {
        self.iter_row()
            .map(|row| row.iter().map(Cell::compact_code).collect::<String>())
            .collect()
    }

    fn is_on_border(&self, coord: Cartesian2DCoordinate) -> bool {
        let (x, y) = (coord.x as usize, coord.y as usize);
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Open every outer ring cell towards all of its in-bounds neighbours.
    ///
    /// Both sides of each opened wall are cleared, so an interior cell next to the ring loses its
    /// wall facing the ring too. Walls facing outside the grid stay up.
    /// Running it twice changes nothing.
    fn normalize_border(&mut self) {
        let mut ring_cells = 0;
        for index in 0..self.cells.len() {
            let coord = self.cells[index].coordinate();
            if !self.is_on_border(coord) {
                continue;
            }
            ring_cells += 1;

            for dir in &CompassPrimary::ALL {
                if let Some(neighbour) = self.neighbour_at_direction(coord, *dir) {
                    if let Some(neighbour_index) = self.coordinate_to_index(neighbour) {
                        self.carve(index, neighbour_index, *dir);
                    }
                }
            }
        }
        debug!("Opened {} border cells on a {}x{} maze", ring_cells, self.width, self.height);
    }

    #[inline]
    fn carve(&mut self, a_index: usize, b_index: usize, a_to_b: CompassPrimary) {
        self.cells[a_index].remove_wall(a_to_b);
        self.cells[b_index].remove_wall(a_to_b.opposite());
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.dump_compact().iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use quickcheck::{quickcheck, TestResult};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn maze(w: usize, h: usize) -> Maze {
        Maze::new(Width(w), Height(h)).expect("valid maze dimensions")
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(w, h) in &[(0, 5), (5, 0), (0, 0)] {
            let err = Maze::new(Width(w), Height(h)).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidDimensions(..)));
        }
    }

    #[test]
    fn builder_defaults() {
        let m = maze(4, 3);
        assert_eq!(m.width(), 4);
        assert_eq!(m.height(), 3);
        assert_eq!(m.size(), 12);
        assert_eq!(m.entry(), gc(0, 0));
        assert_eq!(m.exit(), gc(3, 2));
        assert!(m.is_perfect());
        assert_eq!(m.seed(), 1);

        let m = MazeBuilder::new(Width(4), Height(3))
            .perfect(false)
            .seed(42)
            .entry(gc(1, 1))
            .exit(gc(2, 0))
            .build()
            .unwrap();
        assert_eq!(m.entry(), gc(1, 1));
        assert_eq!(m.exit(), gc(2, 0));
        assert!(!m.is_perfect());
        assert_eq!(m.seed(), 42);
    }

    #[test]
    fn cells_know_their_position() {
        let m = maze(5, 4);
        for (index, coord) in m.iter().enumerate() {
            assert_eq!(m.coordinate_to_index(coord), Some(index));
            assert_eq!(m.cell(coord).unwrap().coordinate(), coord);
        }
        assert_eq!(m.iter().take(3).collect::<Vec<_>>(), vec![gc(0, 0), gc(1, 0), gc(2, 0)]);
        assert_eq!(m.iter_row().count(), 4);
        assert!(m.iter_row().all(|row| row.len() == 5));
    }

    #[test]
    fn out_of_bounds_access() {
        let mut m = maze(3, 2);
        for &coord in &[gc(3, 0), gc(0, 2), gc(u32::MAX, u32::MAX)] {
            let err = m.cell(coord).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::OutOfBounds(c) if *c == coord));
            assert!(m.cell_mut(coord).is_err());
        }
        assert!(m.cell(gc(2, 1)).is_ok());
    }

    #[test]
    fn neighbour_cells() {
        let m = maze(3, 3);
        assert_eq!(&*m.neighbours(gc(0, 0)), &[gc(1, 0), gc(0, 1)]);
        assert_eq!(&*m.neighbours(gc(1, 1)), &[gc(1, 0), gc(2, 1), gc(1, 2), gc(0, 1)]);
        assert_eq!(&*m.neighbours(gc(2, 2)), &[gc(2, 1), gc(1, 2)]);
        assert_eq!(m.neighbour_at_direction(gc(2, 0), CompassPrimary::East), None);
        assert_eq!(m.neighbour_at_direction(gc(2, 0), CompassPrimary::South), Some(gc(2, 1)));
    }

    #[test]
    fn fresh_two_by_two_dump() {
        // Every cell is a corner: only its two outward walls remain.
        let m = maze(2, 2);
        assert_eq!(m.dump_compact(), vec!["93", "C6"]);
        assert!(m.cells().iter().all(|c| c.walls().count() == 2));
    }

    #[test]
    fn fresh_three_by_three_dump() {
        // Every neighbour of the centre is on the ring, so the centre ends up fully open.
        assert_eq!(maze(3, 3).dump_compact(), vec!["913", "802", "C46"]);
        assert!(maze(3, 3).cell(gc(1, 1)).unwrap().is_open());
    }

    #[test]
    fn ring_cells_open_towards_the_interior() {
        let m = maze(5, 4);
        // Ring to interior, both sides cleared.
        assert!(m.is_passage(gc(0, 1), gc(1, 1)));
        assert!(m.is_passage(gc(2, 0), gc(2, 1)));
        assert!(m.is_passage(gc(3, 3), gc(3, 2)));
        // Interior to interior stays walled.
        assert!(!m.is_passage(gc(1, 1), gc(2, 1)));
        assert!(!m.is_passage(gc(2, 1), gc(2, 2)));
        assert_eq!(m.cell(gc(2, 2)).unwrap().walls().count(), 3);
    }

    #[test]
    fn degenerate_dumps() {
        assert_eq!(maze(1, 1).dump_compact(), vec!["F"]);
        assert_eq!(maze(3, 1).dump_compact(), vec!["D57"]);
        assert_eq!(maze(1, 3).dump_compact(), vec!["B", "A", "E"]);
    }

    #[test]
    fn display_is_the_compact_dump() {
        assert_eq!(format!("{}", maze(2, 2)), "93\nC6");
    }

    #[test]
    fn border_normalization_is_idempotent() {
        let mut m = maze(6, 4);
        let before = m.dump_compact();
        m.normalize_border();
        assert_eq!(m.dump_compact(), before);
    }

    #[test]
    fn border_walls_stay_closed_and_ring_opens_inwards() {

        fn p(w: u8, h: u8) -> TestResult {
            let (w, h) = (w as usize % 16, h as usize % 16);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let m = Maze::new(Width(w), Height(h)).unwrap();
            let again = Maze::new(Width(w), Height(h)).unwrap();

            let outward_walls_set = m.iter().all(|coord| {
                let cell = m.cell(coord).unwrap();
                CompassPrimary::ALL
                    .iter()
                    .filter(|dir| m.neighbour_at_direction(coord, **dir).is_none())
                    .all(|dir| cell.has_wall(*dir))
            });
            let ring_open_inwards = m.iter().filter(|coord| m.is_on_border(*coord)).all(|coord| {
                m.neighbours(coord).iter().all(|neighbour| m.is_passage(coord, *neighbour))
            });

            TestResult::from_bool(outward_walls_set &&
                                  ring_open_inwards &&
                                  m.dump_compact() == again.dump_compact())
        }
        quickcheck(p as fn(u8, u8) -> TestResult)
    }

    #[test]
    fn removing_walls_is_symmetric_and_idempotent() {
        let mut m = maze(4, 4);
        let (a, b) = (gc(1, 1), gc(2, 1));
        assert!(m.cell(a).unwrap().has_wall(CompassPrimary::East));
        assert!(m.cell(b).unwrap().has_wall(CompassPrimary::West));
        assert!(!m.is_passage(a, b));

        m.remove_wall_between(a, b).unwrap();
        assert!(!m.cell(a).unwrap().has_wall(CompassPrimary::East));
        assert!(!m.cell(b).unwrap().has_wall(CompassPrimary::West));
        assert!(m.is_passage(a, b));
        assert!(m.is_passage(b, a));

        let after_first = m.dump_compact();
        m.remove_wall_between(b, a).unwrap();
        m.remove_wall_between(a, b).unwrap();
        assert_eq!(m.dump_compact(), after_first);
    }

    #[test]
    fn removing_walls_in_every_direction() {
        let mut m = maze(3, 3);
        let centre = gc(1, 1);
        for dir in &CompassPrimary::ALL {
            let neighbour = m.neighbour_at_direction(centre, *dir).unwrap();
            m.remove_wall_between(centre, neighbour).unwrap();
            assert!(!m.cell(neighbour).unwrap().has_wall(dir.opposite()));
        }
        assert!(m.cell(centre).unwrap().is_open());
    }

    #[test]
    fn removing_walls_between_non_adjacent_cells_fails() {
        let mut m = maze(4, 4);
        let before = m.dump_compact();
        for &(a, b) in &[(gc(0, 0), gc(2, 2)),
                         (gc(0, 0), gc(1, 1)),
                         (gc(1, 1), gc(1, 3)),
                         (gc(2, 2), gc(2, 2))] {
            let err = m.remove_wall_between(a, b).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::NonAdjacentCells(..)));
        }
        assert_eq!(m.dump_compact(), before);

        let err = m.remove_wall_between(gc(3, 3), gc(4, 3)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OutOfBounds(..)));
        assert_eq!(m.dump_compact(), before);
    }

    #[test]
    fn open_passages_of_a_fresh_maze_touch_the_ring() {
        assert_eq!(maze(1, 1).open_passages_count(), 0);
        assert_eq!(maze(2, 2).open_passages_count(), 4);
        // 40 adjacent pairs, 12 of them between two interior cells.
        assert_eq!(maze(5, 5).open_passages_count(), 28);
    }

    #[test]
    fn reset_walls_encloses_everything() {
        let mut m = maze(4, 4);
        m.cell_mut(gc(1, 1)).unwrap().set_visited(true);
        m.cell_mut(gc(2, 1)).unwrap().set_on_path(true);
        m.reset_walls();
        assert!(m.cells().iter().all(|c| c.is_closed() && !c.visited() && !c.on_path()));
        assert_eq!(m.open_passages_count(), 0);
    }

    #[test]
    fn clear_visited_keeps_walls() {
        let mut m = maze(3, 3);
        m.cell_mut(gc(0, 0)).unwrap().set_visited(true);
        let before = m.dump_compact();
        m.clear_visited();
        assert!(m.cells().iter().all(|c| !c.visited()));
        assert_eq!(m.dump_compact(), before);
    }

    #[test]
    fn from_compact_restores_walls() {
        let rows = ["9C", "36"];
        let m = Maze::from_compact(&rows, MazeBuilder::new(Width(2), Height(2))).unwrap();
        assert_eq!(m.dump_compact(), vec!["9C", "36"]);
        assert_eq!(m.exit(), gc(1, 1));

        let lower = ["93", "c6"];
        let m = Maze::from_compact(&lower, MazeBuilder::new(Width(2), Height(2))).unwrap();
        assert_eq!(m.dump_compact(), vec!["93", "C6"]);
    }

    #[test]
    fn from_compact_rejects_bad_dumps() {
        let builder = || MazeBuilder::new(Width(2), Height(2));

        let err = Maze::from_compact(&["93"], builder()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidDimensions(2, 1)));

        let err = Maze::from_compact(&["93", "C"], builder()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidDimensions(..)));

        let err = Maze::from_compact(&["93", "CZ"], builder()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidCompactCode('Z')));
    }
}
