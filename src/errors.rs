// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules in this crate `use crate::errors::*;` to get access to everything
// `error_chain!` creates.
//
// Every kind in the maze core is a contract violation by the caller (bad coordinate,
// non-adjacent cells, unknown algorithm name). None of them are retried.
use error_chain::error_chain;

use crate::cells::Cartesian2DCoordinate;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ImageFailure(::image::ImageError);
    }

    errors {
        InvalidDirection(direction: String) {
            description("invalid direction")
            display("Invalid direction: '{}', expected one of N, E, S, W", direction)
        }
        OutOfBounds(coord: Cartesian2DCoordinate) {
            description("cell coordinates out of bounds")
            display("Cell coordinates out of bounds: ({}, {})", coord.x, coord.y)
        }
        NonAdjacentCells(a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) {
            description("cells are not adjacent")
            display("Cells ({}, {}) and ({}, {}) are not adjacent", a.x, a.y, b.x, b.y)
        }
        UnknownAlgorithm(name: String) {
            description("unknown maze generation algorithm")
            display("Unknown algorithm: {}", name)
        }
        InvalidDimensions(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("Invalid maze dimensions {}x{}, both must be positive", width, height)
        }
        InvalidCompactCode(code: char) {
            description("invalid compact wall code")
            display("Invalid compact wall code: '{}', expected a hexadecimal digit", code)
        }
        ConfigSyntax(line_number: usize, line: String) {
            description("invalid config line")
            display("Invalid line {}: {}", line_number, line)
        }
        MissingConfigKeys(keys: Vec<String>) {
            description("missing config keys")
            display("Missing config keys: {}", keys.join(", "))
        }
        InvalidConfigValue(key: String, reason: String) {
            description("invalid config value")
            display("Invalid {}: {}", key, reason)
        }
    }
}
