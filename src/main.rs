use docopt::Docopt;
use log::{info, warn};
use serde_derive::Deserialize;
use amazeing::{
    config::{Config, DisplayMode},
    generators::{self, Algorithm},
    renderers::{self, AsciiRenderer, GraphicRenderer, MazeRenderer, RenderOptionsBuilder},
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    path::{Path, PathBuf},
};

const DEFAULT_CONFIG_PATH: &str = "config.txt";

// <config> is the KEY=VALUE maze configuration file, config.txt when not given.
// Built-in defaults are used when the file does not exist.
const USAGE: &str = "A-Maze-Ing

Usage:
    a_maze_ing -h | --help
    a_maze_ing [<config>] [--algorithm=<name>] [--seed=<n>] [--image-out=<path>] [--cell-pixels=<n>]

Options:
    -h --help              Show this screen.
    --algorithm=<name>     Override the configured algorithm: dfs, backtracking, prim or kruskal.
    --seed=<n>             Override the configured random seed.
    --image-out=<path>     Output file path for the graphic display. Always PNG format.
                           Defaults to the output file with a .png extension.
    --cell-pixels=<n>      Pixel count to render one cell wall in the graphic display [default: 10] max 255.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    arg_config: Option<String>,
    flag_algorithm: Option<String>,
    flag_seed: Option<u64>,
    flag_image_out: Option<String>,
    flag_cell_pixels: u8,
}

mod errors {
    // The library's errors are linked in, so `?` works on its results too.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::amazeing::errors::Error, ::amazeing::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let config = load_config(&args)?;

    println!("A-Maze-Ing\n");
    println!("-------Config-------");
    println!("{}\n", config);

    let mut maze = config.maze_builder().build()?;
    generators::generate_with(&mut maze, config.algorithm)?;
    info!("Generated a {}x{} maze with {}", maze.width(), maze.height(), config.algorithm);

    println!("Maze in HEX:");
    println!("{}\n", maze);

    write_text_to_file(&format!("{}\n", maze), &config.output_file)
        .chain_err(|| format!("Failed to write maze to text file {}", config.output_file))?;
    info!("Wrote the maze to {}", config.output_file);

    match config.display {
        DisplayMode::Ascii => {
            print!("{}", AsciiRenderer.draw_maze(&maze));
        }
        DisplayMode::Graphic => {
            let render_options = RenderOptionsBuilder::new()
                .cell_side_pixels_length(args.flag_cell_pixels)
                .mark_start_end(true)
                .build();
            let image = GraphicRenderer::new(render_options).draw_maze(&maze)?;
            let image_path = image_out_path(&args, &config);
            renderers::save_png(&image, &image_path)
                .chain_err(|| format!("Failed to save maze image {}", image_path.display()))?;
            println!("Maze image saved to {}", image_path.display());
        }
    }

    Ok(())
}

/// Read the configuration file, falling back to the defaults when it does not exist, then apply
/// the command line overrides.
fn load_config(args: &MazeArgs) -> Result<Config> {
    let path = args.arg_config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    let mut config = if Path::new(path).exists() {
        Config::from_file(path)?
    } else {
        warn!("Config file {} not found, using the default settings", path);
        Config::default()
    };

    if let Some(ref name) = args.flag_algorithm {
        config.algorithm = name.parse::<Algorithm>()?;
    }
    if let Some(seed) = args.flag_seed {
        config.seed = seed;
    }
    config.validate()?;

    Ok(config)
}

fn image_out_path(args: &MazeArgs, config: &Config) -> PathBuf {
    match args.flag_image_out {
        Some(ref path) => PathBuf::from(path),
        None => Path::new(&config.output_file).with_extension("png"),
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
