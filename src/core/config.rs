//! Simulation configuration with documented constants
//!
//! A config is built once before the world exists and never changes afterwards.
//! Every parameter has a default; a parameter that is missing, non-numeric or
//! out of range falls back to that default and is reported, instead of
//! rejecting the whole file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};
use crate::core::types::{GridSize, Species};

/// Complete, immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for terrain, placement and every random decision
    pub seed: u64,
    pub grid: GridConfig,
    pub display: DisplayConfig,
    pub terrain: TerrainConfig,
    pub food: FoodConfig,
    pub population: PopulationConfig,
    pub herbivore: SpeciesTraits,
    pub predator: SpeciesTraits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
}

/// Values only consumers care about. The engine never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Pixel size of a cell for renderers
    pub tile_size: u32,
    /// Ticks per second when a consumer paces the run
    pub fps: u32,
    /// Maximum number of records kept in the live chart window
    pub chart_window: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Noise value above which a cell becomes rock.
    ///
    /// Smaller = more rock. Must lie in [0, 1].
    pub rock_threshold: f64,
    /// Feature size in cells. Bigger = larger rock blobs.
    pub rock_scale: f64,
    /// Number of noise layers summed
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves
    pub persistence: f64,
    /// Frequency multiplier between successive octaves
    pub lacunarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Ticks (with a food-bearing neighbour) for an eaten cell to regrow
    pub regrow_ticks: u32,
    /// Fraction of open cells holding food at world creation
    pub initial_coverage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub herbivores: u32,
    pub predators: u32,
}

/// Energetics for one species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    /// Energy at spawn, for both founders and newborns
    pub initial_energy: i32,
    /// Metabolic cost for a tick spent active (moved or tried to)
    pub move_cost: i32,
    /// Metabolic cost for a tick spent digesting
    pub basal_cost: i32,
    /// Energy gained per food cell or prey eaten
    pub food_gain: i32,
    /// Ticks of digestion after eating
    pub digest_wait: u32,
    /// Energy lost by the parent on top of the newborn's initial energy
    pub reproduction_cost: i32,
    /// Minimum energy to reproduce
    pub reproduction_threshold: i32,
}

impl SpeciesTraits {
    pub fn herbivore() -> Self {
        Self {
            initial_energy: 10,
            move_cost: 1,
            basal_cost: 0,
            food_gain: 3,
            digest_wait: 1,
            reproduction_cost: 5,
            reproduction_threshold: 25,
        }
    }

    pub fn predator() -> Self {
        Self {
            initial_energy: 30,
            move_cost: 1,
            basal_cost: 0,
            food_gain: 10,
            digest_wait: 2,
            reproduction_cost: 10,
            reproduction_threshold: 70,
        }
    }

    /// Total energy a parent gives up to produce one newborn
    pub fn birth_debit(&self) -> i32 {
        self.reproduction_cost + self.initial_energy
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            grid: GridConfig {
                width: 120,
                height: 60,
            },
            display: DisplayConfig {
                tile_size: 10,
                fps: 8,
                chart_window: 1000,
            },
            terrain: TerrainConfig {
                rock_threshold: 0.15,
                rock_scale: 10.0,
                octaves: 4,
                persistence: 0.5,
                lacunarity: 2.0,
            },
            food: FoodConfig {
                regrow_ticks: 30,
                initial_coverage: 1.0,
            },
            population: PopulationConfig {
                herbivores: 50,
                predators: 10,
            },
            herbivore: SpeciesTraits::herbivore(),
            predator: SpeciesTraits::predator(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.grid.width, self.grid.height)
    }

    pub fn traits(&self, species: Species) -> &SpeciesTraits {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Predator => &self.predator,
        }
    }

    /// List every out-of-range parameter without changing anything
    pub fn validate(&self) -> Vec<EcoError> {
        self.clone().sanitize().1
    }

    /// Replace every out-of-range parameter with its default
    pub fn sanitize(mut self) -> (Self, Vec<EcoError>) {
        let d = Self::default();
        let mut issues = Vec::new();

        repair(
            &mut self.grid.width,
            d.grid.width,
            |v| v >= 1,
            "grid.width",
            ">= 1",
            &mut issues,
        );
        repair(
            &mut self.grid.height,
            d.grid.height,
            |v| v >= 1,
            "grid.height",
            ">= 1",
            &mut issues,
        );

        repair(
            &mut self.display.tile_size,
            d.display.tile_size,
            |v| v >= 1,
            "display.tile_size",
            ">= 1",
            &mut issues,
        );
        repair(
            &mut self.display.fps,
            d.display.fps,
            |v| v >= 1,
            "display.fps",
            ">= 1",
            &mut issues,
        );
        repair(
            &mut self.display.chart_window,
            d.display.chart_window,
            |v| v >= 1,
            "display.chart_window",
            ">= 1",
            &mut issues,
        );

        repair(
            &mut self.terrain.rock_threshold,
            d.terrain.rock_threshold,
            |v| (0.0..=1.0).contains(&v),
            "terrain.rock_threshold",
            "within [0, 1]",
            &mut issues,
        );
        repair(
            &mut self.terrain.rock_scale,
            d.terrain.rock_scale,
            |v| v > 0.0 && v.is_finite(),
            "terrain.rock_scale",
            "> 0",
            &mut issues,
        );
        repair(
            &mut self.terrain.octaves,
            d.terrain.octaves,
            |v| (1..=16).contains(&v),
            "terrain.octaves",
            "within [1, 16]",
            &mut issues,
        );
        repair(
            &mut self.terrain.persistence,
            d.terrain.persistence,
            |v| v > 0.0 && v <= 1.0,
            "terrain.persistence",
            "within (0, 1]",
            &mut issues,
        );
        repair(
            &mut self.terrain.lacunarity,
            d.terrain.lacunarity,
            |v| (1.0..=8.0).contains(&v),
            "terrain.lacunarity",
            "within [1, 8]",
            &mut issues,
        );

        repair(
            &mut self.food.regrow_ticks,
            d.food.regrow_ticks,
            |v| v >= 1,
            "food.regrow_ticks",
            ">= 1",
            &mut issues,
        );
        repair(
            &mut self.food.initial_coverage,
            d.food.initial_coverage,
            |v| (0.0..=1.0).contains(&v),
            "food.initial_coverage",
            "within [0, 1]",
            &mut issues,
        );

        repair_traits(&mut self.herbivore, &d.herbivore, "herbivore", &mut issues);
        repair_traits(&mut self.predator, &d.predator, "predator", &mut issues);

        (self, issues)
    }

    /// Parse TOML text, falling back per parameter.
    ///
    /// Only a syntax error fails the whole load. Every other problem comes back
    /// in the issue list next to a usable config.
    pub fn from_toml_str(text: &str) -> Result<(Self, Vec<EcoError>)> {
        let table: toml::Table = text.parse()?;
        let mut reader = ParamReader {
            root: &table,
            issues: Vec::new(),
            bad_sections: Vec::new(),
        };
        let mut config = Self::default();

        reader.int(None, "seed", &mut config.seed);

        reader.int(Some("grid"), "width", &mut config.grid.width);
        reader.int(Some("grid"), "height", &mut config.grid.height);

        reader.int(Some("display"), "tile_size", &mut config.display.tile_size);
        reader.int(Some("display"), "fps", &mut config.display.fps);
        reader.int(Some("display"), "chart_window", &mut config.display.chart_window);

        reader.float(Some("terrain"), "rock_threshold", &mut config.terrain.rock_threshold);
        reader.float(Some("terrain"), "rock_scale", &mut config.terrain.rock_scale);
        reader.int(Some("terrain"), "octaves", &mut config.terrain.octaves);
        reader.float(Some("terrain"), "persistence", &mut config.terrain.persistence);
        reader.float(Some("terrain"), "lacunarity", &mut config.terrain.lacunarity);

        reader.int(Some("food"), "regrow_ticks", &mut config.food.regrow_ticks);
        reader.float(Some("food"), "initial_coverage", &mut config.food.initial_coverage);

        reader.int(Some("population"), "herbivores", &mut config.population.herbivores);
        reader.int(Some("population"), "predators", &mut config.population.predators);

        reader.traits("herbivore", &mut config.herbivore);
        reader.traits("predator", &mut config.predator);

        let mut issues = reader.issues;
        let (config, range_issues) = config.sanitize();
        issues.extend(range_issues);
        Ok((config, issues))
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<(Self, Vec<EcoError>)> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn repair<T: Copy + std::fmt::Debug>(
    slot: &mut T,
    default: T,
    valid: impl Fn(T) -> bool,
    name: &str,
    rule: &str,
    issues: &mut Vec<EcoError>,
) {
    if !valid(*slot) {
        issues.push(EcoError::invalid(
            name,
            format!("{:?} must be {}, using default {:?}", *slot, rule, default),
        ));
        *slot = default;
    }
}

fn repair_traits(
    traits: &mut SpeciesTraits,
    defaults: &SpeciesTraits,
    species: &str,
    issues: &mut Vec<EcoError>,
) {
    let name = |field: &str| format!("{}.{}", species, field);
    repair(
        &mut traits.initial_energy,
        defaults.initial_energy,
        |v| v >= 1,
        &name("initial_energy"),
        ">= 1",
        issues,
    );
    repair(
        &mut traits.move_cost,
        defaults.move_cost,
        |v| v >= 0,
        &name("move_cost"),
        ">= 0",
        issues,
    );
    repair(
        &mut traits.basal_cost,
        defaults.basal_cost,
        |v| v >= 0,
        &name("basal_cost"),
        ">= 0",
        issues,
    );
    repair(
        &mut traits.food_gain,
        defaults.food_gain,
        |v| v >= 0,
        &name("food_gain"),
        ">= 0",
        issues,
    );
    repair(
        &mut traits.reproduction_cost,
        defaults.reproduction_cost,
        |v| v >= 0,
        &name("reproduction_cost"),
        ">= 0",
        issues,
    );
    repair(
        &mut traits.reproduction_threshold,
        defaults.reproduction_threshold,
        |v| v >= 0,
        &name("reproduction_threshold"),
        ">= 0",
        issues,
    );
}

/// Pulls individual numeric parameters out of a parsed TOML table
struct ParamReader<'a> {
    root: &'a toml::Table,
    issues: Vec<EcoError>,
    bad_sections: Vec<String>,
}

impl ParamReader<'_> {
    fn lookup(&mut self, section: Option<&str>, key: &str) -> Option<(String, toml::Value)> {
        let (name, table) = match section {
            None => (key.to_string(), self.root),
            Some(section) => {
                let name = format!("{}.{}", section, key);
                match self.root.get(section) {
                    None => return None,
                    Some(toml::Value::Table(table)) => (name, table),
                    Some(_) => {
                        if !self.bad_sections.iter().any(|s| s == section) {
                            self.bad_sections.push(section.to_string());
                            self.issues.push(EcoError::invalid(
                                section,
                                "expected a table, using defaults",
                            ));
                        }
                        return None;
                    }
                }
            }
        };
        table.get(key).map(|value| (name, value.clone()))
    }

    fn int<T>(&mut self, section: Option<&str>, key: &str, slot: &mut T)
    where
        T: TryFrom<i64> + Copy + std::fmt::Debug,
    {
        let Some((name, value)) = self.lookup(section, key) else {
            return;
        };
        match value {
            toml::Value::Integer(raw) => match T::try_from(raw) {
                Ok(v) => *slot = v,
                Err(_) => self.issues.push(EcoError::invalid(
                    name,
                    format!("{} is out of range, using default {:?}", raw, *slot),
                )),
            },
            other => self.issues.push(EcoError::invalid(
                name,
                format!("expected an integer, got {}, using default {:?}", other.type_str(), *slot),
            )),
        }
    }

    fn float(&mut self, section: Option<&str>, key: &str, slot: &mut f64) {
        let Some((name, value)) = self.lookup(section, key) else {
            return;
        };
        match value {
            toml::Value::Float(v) => *slot = v,
            toml::Value::Integer(v) => *slot = v as f64,
            other => self.issues.push(EcoError::invalid(
                name,
                format!("expected a number, got {}, using default {}", other.type_str(), *slot),
            )),
        }
    }

    fn traits(&mut self, section: &str, traits: &mut SpeciesTraits) {
        let s = Some(section);
        self.int(s, "initial_energy", &mut traits.initial_energy);
        self.int(s, "move_cost", &mut traits.move_cost);
        self.int(s, "basal_cost", &mut traits.basal_cost);
        self.int(s, "food_gain", &mut traits.food_gain);
        self.int(s, "digest_wait", &mut traits.digest_wait);
        self.int(s, "reproduction_cost", &mut traits.reproduction_cost);
        self.int(s, "reproduction_threshold", &mut traits.reproduction_threshold);
    }
}
