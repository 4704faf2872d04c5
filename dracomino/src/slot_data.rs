use anyhow::Result;
use dracomino_game::{BOARD_WIDTH, Capacity, LocationId, LocationKind, MIN_GAME_VERSION, VERSION};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::randomize::{GenerationError, RandomizedLocation};
use crate::settings::DracominoSettings;

/// Data published to the game client for one generated seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    pub generator_version: String,
    pub min_game_version: String,
    pub death_link: bool,
    pub death_on_restart: bool,
    pub goal: Capacity,
    // One entry per coin, ordered by coin id
    pub item_pickup_placements: Vec<Capacity>,
    pub randomize_orientations: bool,
    pub line_clear_leniency: Capacity,
    pub max_stacking_height: Capacity,
}

pub fn get_slot_data(
    settings: &DracominoSettings,
    locations: &[RandomizedLocation],
) -> Result<SlotData> {
    let mut coins: Vec<(LocationId, Capacity)> = locations
        .iter()
        .filter(|x| x.placed.kind == LocationKind::ItemPickup)
        .map(|x| (x.placed.id, x.placed.placement))
        .collect();
    coins.sort();
    let item_pickup_placements: Vec<Capacity> = coins.into_iter().map(|(_, p)| p).collect();

    let mut seen: HashSet<Capacity> = HashSet::new();
    for &p in &item_pickup_placements {
        if !seen.insert(p) {
            return Err(GenerationError::DuplicatePlacement(p).into());
        }
    }

    Ok(SlotData {
        generator_version: VERSION.to_string(),
        min_game_version: MIN_GAME_VERSION.to_string(),
        death_link: settings.death_link,
        death_on_restart: settings.death_on_restart,
        goal: settings.goal,
        item_pickup_placements,
        randomize_orientations: settings.randomize_orientations,
        line_clear_leniency: settings.line_clear_leniency,
        max_stacking_height: settings.max_stacking_height,
    })
}

/// Maps each coin's location id to the line it sits on (`Line 1` is the bottom row).
pub fn get_hint_data(locations: &[RandomizedLocation]) -> HashMap<LocationId, String> {
    locations
        .iter()
        .filter(|x| x.placed.kind == LocationKind::ItemPickup)
        .map(|x| {
            let line_num = x.placed.placement / BOARD_WIDTH + 1;
            (x.placed.id, format!("Line {line_num}"))
        })
        .collect()
}
