use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use log::debug;
use petgraph::unionfind::UnionFind;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec};
use crate::errors::*;
use crate::maze::Maze;

/// The passage carving strategies a maze can be generated with.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Algorithm {
    RecursiveBacktracker,
    Prim,
    Kruskal,
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Case-insensitive. "dfs" and "backtracking" both name the recursive backtracker.
    fn from_str(name: &str) -> Result<Algorithm> {
        match name.trim().to_lowercase().as_str() {
            "dfs" | "backtracking" | "recursive-backtracker" => Ok(Algorithm::RecursiveBacktracker),
            "prim" => Ok(Algorithm::Prim),
            "kruskal" => Ok(Algorithm::Kruskal),
            _ => Err(ErrorKind::UnknownAlgorithm(name.to_owned()).into()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Algorithm::RecursiveBacktracker => "dfs",
            Algorithm::Prim => "prim",
            Algorithm::Kruskal => "kruskal",
        };
        write!(f, "{}", name)
    }
}

/// Carve passages into the maze with the algorithm called `algorithm_name`.
///
/// The name is checked before the maze is touched, so an unknown algorithm leaves it as it was.
pub fn generate(maze: &mut Maze, algorithm_name: &str) -> Result<()> {
    let algorithm = algorithm_name.parse::<Algorithm>()?;
    generate_with(maze, algorithm)
}

pub fn generate_with(maze: &mut Maze, algorithm: Algorithm) -> Result<()> {
    let carved = match algorithm {
        Algorithm::RecursiveBacktracker => recursive_backtracker(maze)?,
        Algorithm::Prim => prim(maze)?,
        Algorithm::Kruskal => kruskal(maze)?,
    };
    debug!("{} carved {} passages on a {}x{} maze with seed {}",
           algorithm,
           carved,
           maze.width(),
           maze.height(),
           maze.seed());
    Ok(())
}

/// Apply the recursive backtracker (randomized depth first search) algorithm to a maze.
///
/// Starting from the entry cell we keep a stack of the cells on the current route. The top cell
/// tries its four directions in a freshly shuffled order and carves into the first in-bounds
/// neighbour that has not been visited yet, which then becomes the new top of the stack. When
/// a cell has no unvisited neighbours left we backtrack by popping it.
/// The stack empties once every cell reachable from the entry has been visited, and each of
/// them is joined to the entry by exactly one route. The stack is explicit so large mazes do not
/// overflow the call stack.
///
/// Returns the number of passages carved.
pub fn recursive_backtracker(maze: &mut Maze) -> Result<usize> {
    let entry = prepare(maze)?;
    let mut rng = seeded_rng(maze);
    let mut carved = 0;

    maze.cell_mut(entry)?.set_visited(true);
    let mut stack = vec![entry];

    while let Some(&current) = stack.last() {

        let mut directions = CompassPrimary::ALL;
        directions.shuffle(&mut rng);

        let mut next = None;
        for dir in &directions {
            if let Some(neighbour) = maze.neighbour_at_direction(current, *dir) {
                if !maze.cell(neighbour)?.visited() {
                    next = Some(neighbour);
                    break;
                }
            }
        }

        if let Some(neighbour) = next {
            maze.remove_wall_between(current, neighbour)?;
            maze.cell_mut(neighbour)?.set_visited(true);
            stack.push(neighbour);
            carved += 1;
        } else {
            stack.pop();
        }
    }

    Ok(carved)
}

/// Apply a randomized version of Prim's algorithm to a maze.
///
/// The frontier holds every unvisited cell next to the visited region, which starts as just the
/// entry. Each step takes a random frontier cell, links it to one of its visited neighbours at
/// random, and adds its own unvisited neighbours to the frontier.
/// Compared to the recursive backtracker this gives lots of short dead ends radiating from the
/// entry rather than long winding corridors.
///
/// Returns the number of passages carved.
pub fn prim(maze: &mut Maze) -> Result<usize> {
    let entry = prepare(maze)?;
    let mut rng = seeded_rng(maze);
    let mut carved = 0;

    let mut frontier: Vec<Cartesian2DCoordinate> = Vec::new();
    let mut in_frontier = BitSet::with_capacity(maze.size());

    maze.cell_mut(entry)?.set_visited(true);
    extend_frontier(maze, entry, &mut frontier, &mut in_frontier);

    while !frontier.is_empty() {
        let pick = rng.gen_range(0..frontier.len());
        let cell_coord = frontier.swap_remove(pick);

        let visited_neighbours = maze.neighbours(cell_coord)
            .iter()
            .cloned()
            .filter(|neighbour| maze.cell(*neighbour).map(|c| c.visited()).unwrap_or(false))
            .collect::<CoordinateSmallVec>();

        // Frontier cells always border the visited region.
        if let Some(&link_coord) = visited_neighbours.choose(&mut rng) {
            maze.remove_wall_between(cell_coord, link_coord)?;
            carved += 1;
        }

        maze.cell_mut(cell_coord)?.set_visited(true);
        extend_frontier(maze, cell_coord, &mut frontier, &mut in_frontier);
    }

    Ok(carved)
}

fn extend_frontier(maze: &Maze,
                   coord: Cartesian2DCoordinate,
                   frontier: &mut Vec<Cartesian2DCoordinate>,
                   in_frontier: &mut BitSet) {
    for neighbour in maze.neighbours(coord).iter() {
        if let Some(index) = maze.coordinate_to_index(*neighbour) {
            if !maze.cells()[index].visited() && in_frontier.insert(index) {
                frontier.push(*neighbour);
            }
        }
    }
}

/// Apply a randomized version of Kruskal's algorithm to a maze.
///
/// Every wall between two adjacent cells is a candidate passage. The candidates are shuffled and
/// a passage is carved whenever it joins two cells not yet connected to each other, which a
/// union-find over the cell indices tracks. This joins the whole grid into one tree without
/// needing a starting point; the entry is only used to mark what it can reach as visited.
///
/// Returns the number of passages carved.
pub fn kruskal(maze: &mut Maze) -> Result<usize> {
    let entry = prepare(maze)?;
    let mut rng = seeded_rng(maze);
    let mut carved = 0;

    let mut walls = Vec::with_capacity(2 * maze.size());
    for coord in maze.iter() {
        for dir in &[CompassPrimary::East, CompassPrimary::South] {
            if let Some(neighbour) = maze.neighbour_at_direction(coord, *dir) {
                walls.push((coord, neighbour));
            }
        }
    }
    walls.shuffle(&mut rng);

    let mut connected_sets = UnionFind::<usize>::new(maze.size());
    for (a, b) in walls {
        if connected_sets.union(index_of(maze, a)?, index_of(maze, b)?) {
            maze.remove_wall_between(a, b)?;
            carved += 1;
        }
    }

    let entry_index = index_of(maze, entry)?;
    let coords = maze.iter().collect::<Vec<_>>();
    for (index, coord) in coords.into_iter().enumerate() {
        if connected_sets.equiv(entry_index, index) {
            maze.cell_mut(coord)?.set_visited(true);
        }
    }

    Ok(carved)
}

/// Check the entry and get the maze ready for carving.
///
/// A perfect maze is carved from fully enclosed cells so the passages form a single tree.
/// Otherwise carving builds on the construction-time border, whose opened ring cells add loops.
fn prepare(maze: &mut Maze) -> Result<Cartesian2DCoordinate> {
    let entry = maze.entry();
    maze.cell(entry)?;

    if maze.is_perfect() {
        maze.reset_walls();
    } else {
        maze.clear_visited();
    }

    Ok(entry)
}

fn seeded_rng(maze: &Maze) -> StdRng {
    StdRng::seed_from_u64(maze.seed())
}

fn index_of(maze: &Maze, coord: Cartesian2DCoordinate) -> Result<usize> {
    maze.coordinate_to_index(coord)
        .ok_or_else(|| ErrorKind::OutOfBounds(coord).into())
}
