use dracomino_game::{BOARD_WIDTH, Capacity, Item, LocationId, LocationKind};
use serde::{Deserialize, Serialize};

use crate::randomize::RandomizedLocation;
use crate::randomize::item_pool::ItemPool;
use crate::settings::DracominoSettings;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpoilerLog {
    pub seed: u64,
    pub settings: DracominoSettings,
    pub summary: SpoilerSummary,
    pub item_pool: Vec<String>,
    pub start_inventory: Vec<String>,
    pub locations: Vec<SpoilerLocation>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpoilerSummary {
    pub num_line_clears: usize,
    pub num_item_pickups: usize,
    pub pool_shape_value: Capacity,
    pub start_shape_value: Capacity,
    pub overflow_shape_value: Capacity,
    pub target_shape_value: Capacity,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpoilerLocation {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
    pub region: usize,
    pub line: Capacity,
    pub placement: Capacity,
    pub cost: Capacity,
    pub requirement: String,
}

fn item_names(items: &[Item]) -> Vec<String> {
    items.iter().map(|x| x.name().to_string()).collect()
}

fn total_shape_value(items: &[Item]) -> Capacity {
    items.iter().map(|x| x.shape_value()).sum()
}

pub fn get_spoiler_log(
    seed: u64,
    settings: &DracominoSettings,
    item_pool: &[Item],
    pool: &ItemPool,
    locations: &[RandomizedLocation],
) -> SpoilerLog {
    let count_kind = |kind: LocationKind| locations.iter().filter(|x| x.placed.kind == kind).count();
    let summary = SpoilerSummary {
        num_line_clears: count_kind(LocationKind::LineClear),
        num_item_pickups: count_kind(LocationKind::ItemPickup),
        pool_shape_value: total_shape_value(item_pool),
        start_shape_value: total_shape_value(&pool.start_inventory),
        overflow_shape_value: pool.overflow_shape_value,
        target_shape_value: settings.goal * BOARD_WIDTH,
    };
    let locations = locations
        .iter()
        .map(|x| SpoilerLocation {
            id: x.placed.id,
            name: x.placed.name.clone(),
            kind: x.placed.kind,
            region: x.placed.region_idx,
            line: x.placed.placement / BOARD_WIDTH + 1,
            placement: x.placed.placement,
            cost: x.placed.cost,
            requirement: x.requirement.to_string(),
        })
        .collect();
    SpoilerLog {
        seed,
        settings: settings.clone(),
        summary,
        item_pool: item_names(item_pool),
        start_inventory: item_names(&pool.start_inventory),
        locations,
    }
}
