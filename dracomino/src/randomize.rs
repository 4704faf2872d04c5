pub mod item_pool;
pub mod placement;
pub mod rules;
pub mod shape_bag;

use anyhow::{Context, Result};
use dracomino_game::{Capacity, GameData, Item, LocationId, Requirement, ShapeType};
use dracomino_logic::Inventory;
use hashbrown::HashMap;
use log::info;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::DracominoSettings;
use crate::slot_data::{SlotData, get_hint_data, get_slot_data};
use crate::spoiler_log::{SpoilerLog, get_spoiler_log};
use item_pool::ItemPool;
use placement::{PlacedLocation, Region, place_all};
use rules::LogicBuilder;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "Not enough room for {item_pickups} item pickups (interval {interval:.3} < 1). \
         Increase the goal or decrease the number of extra shapes."
    )]
    InsufficientSpace { item_pickups: usize, interval: f64 },
    #[error("No {0:?} shapes are available to draw from")]
    EmptyShapeBag(ShapeType),
    #[error("Duplicate item pickup placement: {0}")]
    DuplicatePlacement(Capacity),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomizedLocation {
    #[serde(flatten)]
    pub placed: PlacedLocation,
    pub requirement: Requirement,
}

pub struct Randomization {
    pub seed: u64,
    pub settings: DracominoSettings,
    pub item_pool: Vec<Item>,
    pub start_inventory: Vec<Item>,
    pub overflow_shape_value: Capacity,
    // Candidate shapes from the enabled families
    pub shapes: Vec<Item>,
    pub regions: Vec<Region>,
    pub locations: Vec<RandomizedLocation>,
    pub completion_requirement: Requirement,
    pub slot_data: SlotData,
    pub hint_data: HashMap<LocationId, String>,
    pub spoiler_log: SpoilerLog,
}

impl Randomization {
    pub fn filler_item<R: Rng>(&self, rng: &mut R) -> Item {
        self.shapes.choose(rng).copied().unwrap_or(Item::Nothing)
    }

    pub fn start_inventory_state(&self) -> Inventory {
        Inventory::from_items(&self.start_inventory)
    }

    /// Region exits, named `A -> B`.
    pub fn region_exits(&self) -> Vec<String> {
        self.regions
            .iter()
            .flat_map(|r| r.exits.iter().map(move |x| format!("{} -> {}", r.name, x)))
            .collect()
    }
}

pub struct Randomizer<'a> {
    pub settings: DracominoSettings,
    pub game_data: &'a GameData,
}

impl<'a> Randomizer<'a> {
    pub fn new(settings: &DracominoSettings, game_data: &'a GameData) -> Result<Randomizer<'a>> {
        let mut settings = settings.clone();
        settings.normalize();
        settings.validate().context("Invalid settings")?;
        Ok(Randomizer {
            settings,
            game_data,
        })
    }

    pub fn randomize(&self, seed: u64) -> Result<Randomization> {
        let mut rng_seed = [0u8; 32];
        rng_seed[..8].copy_from_slice(&seed.to_le_bytes());
        let mut rng = rand::rngs::StdRng::from_seed(rng_seed);
        self.randomize_with_rng(seed, &mut rng)
    }

    pub fn randomize_with_rng<R: Rng>(&self, seed: u64, rng: &mut R) -> Result<Randomization> {
        let settings = &self.settings;
        info!(
            "Generating seed {seed}: goal={}, shape types={:?}",
            settings.goal,
            settings.shape_weights.enabled_shape_types()
        );

        let mut pool = ItemPool::decide(settings, rng)?;
        let placement = place_all(self.game_data, settings, &pool, rng)?;
        let item_pool = pool.create_items(placement.locations.len());

        let logic = LogicBuilder::new(settings, &pool.shapes);
        let locations: Vec<RandomizedLocation> = placement
            .locations
            .into_iter()
            .map(|placed| RandomizedLocation {
                requirement: logic.location_req(&placed),
                placed,
            })
            .collect();
        let completion_requirement = logic.completion_req();

        let slot_data = get_slot_data(settings, &locations)?;
        let hint_data = get_hint_data(&locations);
        let spoiler_log = get_spoiler_log(seed, settings, &item_pool, &pool, &locations);
        info!(
            "Generated {} locations ({} items, {} in start inventory)",
            locations.len(),
            item_pool.len(),
            pool.start_inventory.len()
        );

        Ok(Randomization {
            seed,
            settings: settings.clone(),
            item_pool,
            start_inventory: pool.start_inventory,
            overflow_shape_value: pool.overflow_shape_value,
            shapes: pool.shapes,
            regions: placement.regions,
            locations,
            completion_requirement,
            slot_data,
            hint_data,
            spoiler_log,
        })
    }
}
