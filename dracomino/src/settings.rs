use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use dracomino_game::{Capacity, Item, ShapeType};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DracominoSettings {
    pub name: Option<String>,
    pub goal: Capacity,
    pub starting_drop_method: StartingDropMethod,
    pub starting_shapes: usize,
    pub extra_shapes: usize,
    pub randomize_orientations: bool,
    pub shape_weights: ShapeWeights,
    pub next_piece_slots: usize,
    pub hold_slots: usize,
    pub max_stacking_height: Capacity,
    #[serde(default)]
    pub line_clear_leniency: Capacity,
    #[serde(default)]
    pub death_link: bool,
    #[serde(default)]
    pub death_on_restart: bool,
    #[serde(default)]
    pub start_inventory: Vec<ItemCount>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ItemCount {
    pub item: Item,
    pub count: usize,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum StartingDropMethod {
    #[default]
    Gravity,
    SoftDrop,
    HardDrop,
}

impl StartingDropMethod {
    pub fn item(self) -> Item {
        match self {
            StartingDropMethod::Gravity => Item::Gravity,
            StartingDropMethod::SoftDrop => Item::SoftDrop,
            StartingDropMethod::HardDrop => Item::HardDrop,
        }
    }
}

/// Relative odds of each shape family when drawing shapes. Zero disables a family.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ShapeWeights {
    pub monomino: usize,
    pub domino: usize,
    pub tromino: usize,
    pub tetromino: usize,
    pub pentomino: usize,
}

impl ShapeWeights {
    pub fn get(&self, shape_type: ShapeType) -> usize {
        match shape_type {
            ShapeType::Monomino => self.monomino,
            ShapeType::Domino => self.domino,
            ShapeType::Tromino => self.tromino,
            ShapeType::Tetromino => self.tetromino,
            ShapeType::Pentomino => self.pentomino,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeType, usize)> + '_ {
        [
            ShapeType::Monomino,
            ShapeType::Domino,
            ShapeType::Tromino,
            ShapeType::Tetromino,
            ShapeType::Pentomino,
        ]
        .into_iter()
        .map(|t| (t, self.get(t)))
    }

    pub fn enabled_shape_types(&self) -> Vec<ShapeType> {
        self.iter().filter(|&(_, w)| w > 0).map(|(t, _)| t).collect()
    }

    pub fn is_only_monomino(&self) -> bool {
        self.enabled_shape_types() == [ShapeType::Monomino]
    }
}

impl Default for ShapeWeights {
    fn default() -> Self {
        ShapeWeights {
            monomino: 0,
            domino: 0,
            tromino: 0,
            tetromino: 7,
            pentomino: 0,
        }
    }
}

impl Default for DracominoSettings {
    fn default() -> Self {
        DracominoSettings {
            name: None,
            goal: 100,
            starting_drop_method: StartingDropMethod::Gravity,
            starting_shapes: 7,
            extra_shapes: 20,
            randomize_orientations: false,
            shape_weights: ShapeWeights::default(),
            next_piece_slots: 5,
            hold_slots: 1,
            max_stacking_height: 20,
            line_clear_leniency: 0,
            death_link: false,
            death_on_restart: false,
            start_inventory: vec![],
        }
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(name: &str, value: T, min: T, max: T) -> Result<()> {
    ensure!(
        value >= min && value <= max,
        "Setting {name} = {value} is out of range ({min} to {max})"
    );
    Ok(())
}

impl DracominoSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("goal", self.goal, 1, 1000)?;
        check_range("starting_shapes", self.starting_shapes, 1, 100)?;
        check_range("extra_shapes", self.extra_shapes, 10, 100)?;
        for (shape_type, weight) in self.shape_weights.iter() {
            let name: &'static str = shape_type.into();
            check_range(&format!("{name}_weight"), weight, 0, 100)?;
        }
        check_range("next_piece_slots", self.next_piece_slots, 0, 10)?;
        check_range("hold_slots", self.hold_slots, 0, 10)?;
        check_range("max_stacking_height", self.max_stacking_height, 0, 100)?;
        check_range("line_clear_leniency", self.line_clear_leniency, 0, 100)?;
        for entry in &self.start_inventory {
            if entry.item == Item::Nothing {
                bail!("Nothing cannot be placed in the start inventory");
            }
        }
        Ok(())
    }

    /// Falls back to tetrominos when no shape family has any weight.
    pub fn normalize(&mut self) {
        if self.shape_weights.enabled_shape_types().is_empty() {
            info!("No shape weights set; defaulting to tetromino weight 1");
            self.shape_weights.tetromino = 1;
        }
    }

    pub fn load(path: &Path) -> Result<DracominoSettings> {
        let settings_str = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings at {}", path.display()))?;
        serde_json::from_str(&settings_str)
            .with_context(|| format!("Unable to parse settings at {}", path.display()))
    }
}

pub fn get_builtin_presets() -> Vec<DracominoSettings> {
    vec![
        DracominoSettings {
            name: Some("Classic Tetrominos".to_string()),
            randomize_orientations: false,
            shape_weights: ShapeWeights {
                monomino: 0,
                domino: 0,
                tromino: 0,
                tetromino: 7,
                pentomino: 0,
            },
            ..DracominoSettings::default()
        },
        DracominoSettings {
            name: Some("All Shape Types".to_string()),
            randomize_orientations: true,
            shape_weights: ShapeWeights {
                monomino: 1,
                domino: 1,
                tromino: 2,
                tetromino: 7,
                pentomino: 18,
            },
            ..DracominoSettings::default()
        },
    ]
}

/// Looks up a preset by name, first in `presets_path` (if given) and then among the built-ins.
pub fn get_preset(name: &str, presets_path: Option<&Path>) -> Result<DracominoSettings> {
    if let Some(dir) = presets_path {
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Unable to read presets in directory {}", dir.display()))?
        {
            let settings = DracominoSettings::load(&entry?.path())?;
            if settings.name.as_deref() == Some(name) {
                return Ok(settings);
            }
        }
    }
    get_builtin_presets()
        .into_iter()
        .find(|x| x.name.as_deref() == Some(name))
        .with_context(|| format!("Unknown preset: {name}"))
}
