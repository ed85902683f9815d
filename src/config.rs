//! Reading and validating the `KEY=VALUE` maze configuration file.
//!
//! ```text
//! # A 20x15 maze
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=0,0
//! EXIT=19,14
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! ALGORITHM=dfs
//! DISPLAY=ascii
//! SEED=42
//! ```
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use fnv::FnvHashMap;
use log::debug;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::generators::Algorithm;
use crate::maze::MazeBuilder;
use crate::units::{Height, Width};

pub const REQUIRED_KEYS: [&str; 9] = ["width",
                                      "height",
                                      "entry",
                                      "exit",
                                      "output_file",
                                      "perfect",
                                      "algorithm",
                                      "display",
                                      "seed"];

/// How the finished maze is shown.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum DisplayMode {
    Ascii,
    Graphic,
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<DisplayMode> {
        match s.trim().to_lowercase().as_str() {
            "ascii" => Ok(DisplayMode::Ascii),
            "graphic" => Ok(DisplayMode::Graphic),
            _ => Err(invalid_value("display", &format!("{}, allowed values: ascii, graphic", s))),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DisplayMode::Ascii => write!(f, "ascii"),
            DisplayMode::Graphic => write!(f, "graphic"),
        }
    }
}

/// A raw value from the file, before it is checked against the key it belongs to.
#[derive(Debug, Clone, PartialEq)]
enum ConfigValue {
    Bool(bool),
    Ints(Vec<i64>),
    Int(i64),
    Text(String),
}

impl ConfigValue {
    /// Tries, in order: a boolean, comma separated integers, an integer, and falls back to text.
    fn convert(value: &str) -> ConfigValue {
        let value = value.trim();

        if value.eq_ignore_ascii_case("true") {
            return ConfigValue::Bool(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return ConfigValue::Bool(false);
        }
        if value.contains(',') {
            let ints = value.split(',')
                .map(|part| part.trim().parse::<i64>())
                .collect::<::std::result::Result<Vec<i64>, _>>();
            if let Ok(ints) = ints {
                return ConfigValue::Ints(ints);
            }
        }
        if let Ok(int) = value.parse::<i64>() {
            return ConfigValue::Int(int);
        }

        ConfigValue::Text(value.to_owned())
    }
}

/// The validated settings a maze is built, generated and displayed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub entry: Cartesian2DCoordinate,
    pub exit: Cartesian2DCoordinate,
    pub output_file: String,
    pub perfect: bool,
    pub algorithm: Algorithm,
    pub display: DisplayMode,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            width: 10,
            height: 10,
            entry: Cartesian2DCoordinate::new(0, 0),
            exit: Cartesian2DCoordinate::new(9, 9),
            output_file: String::from("maze.txt"),
            perfect: true,
            algorithm: Algorithm::RecursiveBacktracker,
            display: DisplayMode::Ascii,
            seed: 1,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .chain_err(|| format!("Failed to read config file {}", path.display()))?;
        debug!("Read config file {}", path.display());
        text.parse()
    }

    /// The builder for a maze with these settings.
    pub fn maze_builder(&self) -> MazeBuilder {
        MazeBuilder::new(Width(self.width), Height(self.height))
            .perfect(self.perfect)
            .seed(self.seed)
            .entry(self.entry)
            .exit(self.exit)
    }

    /// Check the rules that relate several settings to each other.
    ///
    /// Parsing already runs this, call it again after changing fields by hand.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(invalid_value("width", "must be a positive integer"));
        }
        if self.height == 0 {
            return Err(invalid_value("height", "must be a positive integer"));
        }

        let in_bounds = |coord: Cartesian2DCoordinate| {
            (coord.x as usize) < self.width && (coord.y as usize) < self.height
        };
        if !in_bounds(self.entry) {
            return Err(invalid_value("entry",
                                     &format!("{} is outside the {}x{} maze",
                                              self.entry,
                                              self.width,
                                              self.height)));
        }
        if !in_bounds(self.exit) {
            return Err(invalid_value("exit",
                                     &format!("{} is outside the {}x{} maze",
                                              self.exit,
                                              self.width,
                                              self.height)));
        }
        if self.entry == self.exit {
            return Err(invalid_value("exit", "must differ from the entry"));
        }
        if !self.output_file.ends_with(".txt") {
            return Err(invalid_value("output_file", "must end with .txt"));
        }

        Ok(())
    }

    fn from_entries(entries: &FnvHashMap<String, ConfigValue>) -> Result<Config> {
        let mut missing_keys = REQUIRED_KEYS.iter()
            .filter(|key| !entries.contains_key(**key))
            .map(|key| key.to_string())
            .collect::<Vec<String>>();
        if !missing_keys.is_empty() {
            missing_keys.sort();
            return Err(ErrorKind::MissingConfigKeys(missing_keys).into());
        }

        let algorithm_name = text_value(entries, "algorithm")?;
        let algorithm = algorithm_name.parse::<Algorithm>()
            .map_err(|_| {
                invalid_value("algorithm",
                              &format!("{}, allowed values: dfs, backtracking, prim, kruskal",
                                       algorithm_name))
            })?;

        let config = Config {
            width: positive_int_value(entries, "width")?,
            height: positive_int_value(entries, "height")?,
            entry: coordinate_value(entries, "entry")?,
            exit: coordinate_value(entries, "exit")?,
            output_file: text_value(entries, "output_file")?.to_owned(),
            perfect: bool_value(entries, "perfect")?,
            algorithm,
            display: text_value(entries, "display")?.parse()?,
            seed: seed_value(entries, "seed")?,
        };
        config.validate()?;

        Ok(config)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Config> {
        let entries = parse_entries(text)?;
        Config::from_entries(&entries)
    }
}

/// Written back in the file format, so the output parses to the same settings.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "WIDTH={}", self.width)?;
        writeln!(f, "HEIGHT={}", self.height)?;
        writeln!(f, "ENTRY={}", self.entry)?;
        writeln!(f, "EXIT={}", self.exit)?;
        writeln!(f, "OUTPUT_FILE={}", self.output_file)?;
        writeln!(f, "PERFECT={}", self.perfect)?;
        writeln!(f, "ALGORITHM={}", self.algorithm)?;
        writeln!(f, "DISPLAY={}", self.display)?;
        write!(f, "SEED={}", self.seed)
    }
}

/// Split the file into lower-cased keys and converted values.
/// Blank lines and `#` comments are skipped; a later duplicate key wins.
fn parse_entries(text: &str) -> Result<FnvHashMap<String, ConfigValue>> {
    let mut entries =
        FnvHashMap::with_capacity_and_hasher(REQUIRED_KEYS.len(), Default::default());

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                entries.insert(key.trim().to_lowercase(), ConfigValue::convert(value));
            }
            None => return Err(ErrorKind::ConfigSyntax(index + 1, line.to_owned()).into()),
        }
    }

    Ok(entries)
}

fn invalid_value(key: &str, reason: &str) -> Error {
    ErrorKind::InvalidConfigValue(key.to_owned(), reason.to_owned()).into()
}

fn positive_int_value(entries: &FnvHashMap<String, ConfigValue>, key: &str) -> Result<usize> {
    match entries.get(key) {
        Some(ConfigValue::Int(n)) if *n > 0 => Ok(*n as usize),
        _ => Err(invalid_value(key, "must be a positive integer")),
    }
}

fn seed_value(entries: &FnvHashMap<String, ConfigValue>, key: &str) -> Result<u64> {
    match entries.get(key) {
        Some(ConfigValue::Int(n)) if *n >= 0 => Ok(*n as u64),
        _ => Err(invalid_value(key, "must be a non-negative integer")),
    }
}

fn bool_value(entries: &FnvHashMap<String, ConfigValue>, key: &str) -> Result<bool> {
    match entries.get(key) {
        Some(ConfigValue::Bool(b)) => Ok(*b),
        _ => Err(invalid_value(key, "must be a boolean")),
    }
}

fn coordinate_value(entries: &FnvHashMap<String, ConfigValue>,
                    key: &str)
                    -> Result<Cartesian2DCoordinate> {
    let max = i64::from(u32::MAX);
    match entries.get(key) {
        Some(ConfigValue::Ints(ints)) if ints.len() == 2 => {
            let (x, y) = (ints[0], ints[1]);
            if (0..=max).contains(&x) && (0..=max).contains(&y) {
                Ok(Cartesian2DCoordinate::new(x as u32, y as u32))
            } else {
                Err(invalid_value(key, "elements must be non-negative integers"))
            }
        }
        _ => Err(invalid_value(key, "must be a pair of integers, e.g. 0,0")),
    }
}

fn text_value<'a>(entries: &'a FnvHashMap<String, ConfigValue>, key: &str) -> Result<&'a str> {
    match entries.get(key) {
        Some(ConfigValue::Text(s)) => Ok(s.as_str()),
        _ => Err(invalid_value(key, "must be a string")),
    }
}
