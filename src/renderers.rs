use std::convert::TryFrom;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::maze::Maze;

/// Something that can draw a finished maze.
///
/// Renderers only read the maze: its dimensions, entry and exit, and each cell's walls and path
/// mark. They run after generation has finished.
pub trait MazeRenderer {
    type Output;

    fn draw_maze(&self, maze: &Maze) -> Self::Output;
}

/// Is the wall on `dir` side of the cell at (x, y) standing. Anything off the grid is solid.
fn has_wall(maze: &Maze, x: usize, y: usize, dir: CompassPrimary) -> bool {
    maze.cell(Cartesian2DCoordinate::new(x as u32, y as u32))
        .map(|cell| cell.has_wall(dir))
        .unwrap_or(true)
}

/// Box drawing text rendering, three characters per cell body.
#[derive(Debug, Default, Copy, Clone)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    // Wall running east from grid point (column, line). Each cell uses the southern wall of the
    // cell above it as its own northern wall, only the first line reads north walls.
    fn horizontal_wall(maze: &Maze, column: usize, line: usize) -> bool {
        if line == 0 {
            has_wall(maze, column, 0, CompassPrimary::North)
        } else {
            has_wall(maze, column, line - 1, CompassPrimary::South)
        }
    }

    // Wall running south from grid point (column, line), same scheme with east walls.
    fn vertical_wall(maze: &Maze, column: usize, line: usize) -> bool {
        if column == 0 {
            has_wall(maze, 0, line, CompassPrimary::West)
        } else {
            has_wall(maze, column - 1, line, CompassPrimary::East)
        }
    }

    fn corner(maze: &Maze, column: usize, line: usize) -> &'static str {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let (width, height) = (maze.width(), maze.height());
        let show_left_section = column > 0 && Self::horizontal_wall(maze, column - 1, line);
        let show_right_section = column < width && Self::horizontal_wall(maze, column, line);
        let show_up_section = line > 0 && Self::vertical_wall(maze, column, line - 1);
        let show_down_section = line < height && Self::vertical_wall(maze, column, line);

        match (show_left_section, show_right_section, show_up_section, show_down_section) {
            (true, true, true, true) => WALL_LRUD,
            (true, true, true, false) => WALL_LRU,
            (true, true, false, true) => WALL_LRD,
            (true, false, true, true) => WALL_LUD,
            (false, true, true, true) => WALL_RUD,
            (true, true, false, false) => WALL_LR,
            (false, false, true, true) => WALL_UD,
            (false, true, true, false) => WALL_RU,
            (true, false, false, true) => WALL_LD,
            (true, false, true, false) => WALL_LU,
            (false, true, false, true) => WALL_RD,
            (true, false, false, false) => WALL_L,
            (false, true, false, false) => WALL_R,
            (false, false, true, false) => WALL_U,
            (false, false, false, true) => WALL_D,
            (false, false, false, false) => " ",
        }
    }

    fn cell_body(maze: &Maze, x: usize, y: usize) -> &'static str {
        let coord = Cartesian2DCoordinate::new(x as u32, y as u32);
        if coord == maze.entry() {
            " S "
        } else if coord == maze.exit() {
            " E "
        } else if maze.cell(coord).map(|cell| cell.on_path()).unwrap_or(false) {
            " . "
        } else {
            "   "
        }
    }
}

impl MazeRenderer for AsciiRenderer {
    type Output = String;

    /// Two text lines per maze row (walls above, then cell bodies) plus the closing south wall.
    fn draw_maze(&self, maze: &Maze) -> String {
        const WALL_LR_3: &str = "───";
        const WALL_UD: &str = "│";
        const OPEN_3: &str = "   ";

        let (width, height) = (maze.width(), maze.height());
        let mut output = String::new();

        for line in 0..=height {
            for column in 0..=width {
                output.push_str(Self::corner(maze, column, line));
                if column < width {
                    let wall = Self::horizontal_wall(maze, column, line);
                    output.push_str(if wall { WALL_LR_3 } else { OPEN_3 });
                }
            }
            output.push('\n');

            if line < height {
                for column in 0..=width {
                    let wall = Self::vertical_wall(maze, column, line);
                    output.push_str(if wall { WALL_UD } else { " " });
                    if column < width {
                        output.push_str(Self::cell_body(maze, column, line));
                    }
                }
                output.push('\n');
            }
        }

        output
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RenderOptions {
    cell_side_pixels_length: u8,
    mark_start_end: bool,
}

#[derive(Debug)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder {
            options: RenderOptions {
                cell_side_pixels_length: 10,
                mark_start_end: true,
            },
        }
    }

    /// Pixel length of one cell side, clamped to at least 2 so a cell has an inside.
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u8) -> Self {
        self.options.cell_side_pixels_length = cell_side_pixels_length.max(2);
        self
    }

    pub fn mark_start_end(mut self, mark_start_end: bool) -> Self {
        self.options.mark_start_end = mark_start_end;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

impl Default for RenderOptionsBuilder {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 0xff, 0]);
const RED: Rgb<u8> = Rgb([0xff, 0, 0]);

/// Pixel rendering: wall lines on a white background, entry filled green and exit red.
#[derive(Debug, Copy, Clone)]
pub struct GraphicRenderer {
    options: RenderOptions,
}

impl GraphicRenderer {
    pub fn new(options: RenderOptions) -> GraphicRenderer {
        GraphicRenderer { options }
    }

    /// Pixel side of the whole image along one axis, None if it does not fit a `u32`.
    fn image_side(&self, cells: usize) -> Option<u32> {
        let cell_size = u32::from(self.options.cell_side_pixels_length);
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(cell_size))
            .and_then(|side| side.checked_add(1))
    }

    // The caller checks `coord` is in the maze, so the pixel maths stays inside the image size.
    fn fill_cell(&self, image: &mut RgbImage, coord: Cartesian2DCoordinate, colour: Rgb<u8>) {
        let cell_size = u32::from(self.options.cell_side_pixels_length);
        let (x1, y1) = (coord.x * cell_size, coord.y * cell_size);
        for x in (x1 + 1)..(x1 + cell_size) {
            for y in (y1 + 1)..(y1 + cell_size) {
                if x < image.width() && y < image.height() {
                    image.put_pixel(x, y, colour);
                }
            }
        }
    }
}

fn draw_horizontal_line(image: &mut RgbImage, y: u32, x1: u32, x2: u32, colour: Rgb<u8>) {
    for x in x1..=x2 {
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, colour);
        }
    }
}

fn draw_vertical_line(image: &mut RgbImage, x: u32, y1: u32, y2: u32, colour: Rgb<u8>) {
    for y in y1..=y2 {
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, colour);
        }
    }
}

impl MazeRenderer for GraphicRenderer {
    type Output = Result<RgbImage>;

    /// Fails with `InvalidDimensions` when the image would be wider or taller than `u32::MAX`
    /// pixels.
    fn draw_maze(&self, maze: &Maze) -> Result<RgbImage> {
        let cell_size = u32::from(self.options.cell_side_pixels_length);
        let (img_width, img_height) =
            match (self.image_side(maze.width()), self.image_side(maze.height())) {
                (Some(w), Some(h)) => (w, h),
                _ => return Err(ErrorKind::InvalidDimensions(maze.width(), maze.height()).into()),
            };
        let mut image = RgbImage::from_pixel(img_width, img_height, WHITE);

        if self.options.mark_start_end {
            for &(coord, colour) in &[(maze.entry(), GREEN), (maze.exit(), RED)] {
                if maze.is_valid_coordinate(coord) {
                    self.fill_cell(&mut image, coord, colour);
                }
            }
        }

        // Both image sides fit a u32, so no cell's pixel offsets can overflow.
        for cell in maze.cells() {
            let coord = cell.coordinate();
            let x1 = coord.x * cell_size;
            let y1 = coord.y * cell_size;
            let x2 = x1 + cell_size;
            let y2 = y1 + cell_size;

            if cell.has_wall(CompassPrimary::North) {
                draw_horizontal_line(&mut image, y1, x1, x2, BLACK);
            }
            if cell.has_wall(CompassPrimary::South) {
                draw_horizontal_line(&mut image, y2, x1, x2, BLACK);
            }
            if cell.has_wall(CompassPrimary::West) {
                draw_vertical_line(&mut image, x1, y1, y2, BLACK);
            }
            if cell.has_wall(CompassPrimary::East) {
                draw_vertical_line(&mut image, x2, y1, y2, BLACK);
            }
        }

        Ok(image)
    }
}

/// Write a rendered maze image out as a PNG, whatever the path's extension.
pub fn save_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
