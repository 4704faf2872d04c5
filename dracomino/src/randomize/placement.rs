use anyhow::Result;
use dracomino_game::{
    BOARD_HEIGHT, BOARD_WIDTH, Capacity, GameData, LocationId, LocationIdx, LocationKind,
};
use hashbrown::HashSet;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::GenerationError;
use super::item_pool::ItemPool;
use crate::settings::DracominoSettings;

pub const MENU_REGION: &str = "Menu";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLocation {
    pub location_idx: LocationIdx,
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
    pub region_idx: usize,
    // Position along the board, in cells from the bottom-left
    pub placement: Capacity,
    // Shape value needed before this location is worth anything
    pub cost: Capacity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub exits: Vec<String>,
    // Indices into the placed location list
    pub locations: Vec<usize>,
}

pub struct Placement {
    pub regions: Vec<Region>,
    pub locations: Vec<PlacedLocation>,
}

pub struct PlacementEngine<'a> {
    game_data: &'a GameData,
    regions: Vec<Region>,
    locations: Vec<PlacedLocation>,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(game_data: &'a GameData, region_order: &[String]) -> Self {
        let mut names: Vec<String> = vec![MENU_REGION.to_string()];
        names.extend(region_order.iter().cloned());
        let mut regions: Vec<Region> = names
            .iter()
            .map(|name| Region {
                name: name.clone(),
                exits: vec![],
                locations: vec![],
            })
            .collect();
        // Each region leads to the next one.
        for i in 1..names.len() {
            regions[i - 1].exits.push(names[i].clone());
        }
        PlacementEngine {
            game_data,
            regions,
            locations: vec![],
        }
    }

    /// Assigns `total` locations of `kind` (lowest id first) a placement from `placement_fn`,
    /// spreading them evenly across regions. Returns the number actually placed.
    pub fn place_locations(
        &mut self,
        kind: LocationKind,
        total: usize,
        mut placement_fn: impl FnMut(usize) -> Capacity,
    ) -> usize {
        let mut eligible = self.game_data.locations_of_kind(kind);
        eligible.sort_by_key(|&idx| std::cmp::Reverse(self.game_data.location_table[idx].id));
        let num_regions = self.regions.len();
        let mut i = 0;
        while i < total {
            let Some(location_idx) = eligible.pop() else {
                warn!("Ran out of {kind:?} locations after placing {i} of {total}");
                break;
            };
            let region_idx = usize::min(num_regions - 1, num_regions * i / total);
            let placement = placement_fn(i);
            let data = &self.game_data.location_table[location_idx];
            self.regions[region_idx].locations.push(self.locations.len());
            self.locations.push(PlacedLocation {
                location_idx,
                id: data.id,
                name: data.name.clone(),
                kind,
                region_idx,
                placement,
                cost: placement - placement.rem_euclid(BOARD_WIDTH),
            });
            i += 1;
        }
        i
    }

    pub fn finish(self) -> Placement {
        Placement {
            regions: self.regions,
            locations: self.locations,
        }
    }
}

/// Average spacing between item pickups, stretched so that pickups also appear above the
/// goal line.
pub fn item_pickup_interval(
    goal: Capacity,
    num_item_pickups: usize,
    max_stacking_height: Capacity,
) -> Result<f64, GenerationError> {
    let height_extension = Capacity::min(BOARD_HEIGHT >> 1, max_stacking_height);
    let average = (goal * BOARD_WIDTH) as f64 / num_item_pickups as f64;
    let interval = average * (goal + height_extension) as f64 / goal as f64;
    if interval < 1.0 {
        return Err(GenerationError::InsufficientSpace {
            item_pickups: num_item_pickups,
            interval,
        });
    }
    Ok(interval)
}

/// Inclusive range of placements the `i`th item pickup may take.
pub fn item_pickup_window(interval: f64, i: usize) -> (Capacity, Capacity) {
    let start = (interval * i as f64).floor() as Capacity;
    let end = (interval * (i + 1) as f64).floor() as Capacity - 1;
    (start, end)
}

pub fn place_all<R: Rng>(
    game_data: &GameData,
    settings: &DracominoSettings,
    item_pool: &ItemPool,
    rng: &mut R,
) -> Result<Placement> {
    let goal = settings.goal;
    let num_line_clears = (goal - 1) as usize;
    let num_item_pickups = item_pool
        .normal_item_pool
        .len()
        .saturating_sub(num_line_clears);

    // Check spacing before anything is placed.
    let interval = if num_item_pickups > 0 {
        Some(item_pickup_interval(
            goal,
            num_item_pickups,
            settings.max_stacking_height,
        )?)
    } else {
        None
    };

    let mut engine = PlacementEngine::new(game_data, &item_pool.region_order);
    engine.place_locations(LocationKind::LineClear, num_line_clears, |i| {
        (i as Capacity + 1) * BOARD_WIDTH
    });
    if let Some(interval) = interval {
        engine.place_locations(LocationKind::ItemPickup, num_item_pickups, |i| {
            let (start, end) = item_pickup_window(interval, i);
            rng.gen_range(start..=end)
        });
        info!("Placed {num_item_pickups} item pickups with interval {interval:.3}");
    }
    let placement = engine.finish();

    let mut seen: HashSet<Capacity> = HashSet::new();
    for loc in &placement.locations {
        if loc.kind == LocationKind::ItemPickup && !seen.insert(loc.placement) {
            return Err(GenerationError::DuplicatePlacement(loc.placement).into());
        }
    }
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_windows_do_not_overlap() -> Result<()> {
        for (goal, n, height) in [(10, 37, 20), (100, 271, 20), (3, 29, 0), (50, 50, 7)] {
            let interval = item_pickup_interval(goal, n, height)?;
            let mut prev_end = -1;
            for i in 0..n {
                let (start, end) = item_pickup_window(interval, i);
                assert!(start <= end);
                assert!(prev_end < start);
                prev_end = end;
            }
        }
        Ok(())
    }

    #[test]
    fn test_interval_extends_above_goal() -> Result<()> {
        // 100 cells over 10 pickups, stretched by (10 + 10) / 10.
        assert_eq!(item_pickup_interval(10, 10, 20)?, 20.0);
        // Stacking height below half the board limits the stretch.
        assert_eq!(item_pickup_interval(10, 10, 5)?, 15.0);
        assert_eq!(item_pickup_interval(10, 10, 0)?, 10.0);
        Ok(())
    }

    #[test]
    fn test_sub_unit_interval_rejected() {
        let err = item_pickup_interval(1, 111, 0).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InsufficientSpace {
                item_pickups: 111,
                ..
            }
        ));
    }

    #[test]
    fn test_line_clears_at_row_boundaries() -> Result<()> {
        let game_data = GameData::load()?;
        let mut engine = PlacementEngine::new(&game_data, &[]);
        let placed = engine.place_locations(LocationKind::LineClear, 9, |i| {
            (i as Capacity + 1) * BOARD_WIDTH
        });
        assert_eq!(placed, 9);
        let placement = engine.finish();
        assert_eq!(placement.regions.len(), 1);
        assert_eq!(placement.regions[0].locations.len(), 9);
        for (i, loc) in placement.locations.iter().enumerate() {
            assert_eq!(loc.id as usize, i + 1);
            assert_eq!(loc.cost, (i as Capacity + 1) * BOARD_WIDTH);
        }
        Ok(())
    }

    #[test]
    fn test_locations_spread_across_regions() -> Result<()> {
        let game_data = GameData::load()?;
        let region_order = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut engine = PlacementEngine::new(&game_data, &region_order);
        let mut rng = StdRng::seed_from_u64(0);
        engine.place_locations(LocationKind::ItemPickup, 8, |i| {
            i as Capacity * 13 + rng.gen_range(0..13)
        });
        let placement = engine.finish();
        let counts: Vec<usize> = placement.regions.iter().map(|r| r.locations.len()).collect();
        assert_eq!(counts, vec![2, 2, 2, 2]);
        assert_eq!(placement.regions[0].exits, vec!["A".to_string()]);
        assert!(placement.regions[3].exits.is_empty());
        let first = &placement.locations[0];
        assert_eq!(first.name, "Coin 1");
        assert_eq!(first.cost, first.placement - first.placement % BOARD_WIDTH);
        Ok(())
    }
}
