use anyhow::{Context, Result};
use dracomino_game::{BOARD_WIDTH, Capacity, ITEM_TABLE, Item, ItemTags, ShapeType};
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::shape_bag::ShapeBag;
use crate::settings::DracominoSettings;

/// Decides which items exist for a seed and how much shape value each item pickup
/// location stands for.
#[derive(Clone, Debug)]
pub struct ItemPool {
    // Every item headed for the pool, abilities and shapes alike, in draw order
    pub normal_item_pool: Vec<Item>,
    // Shapes of the enabled families
    pub shapes: Vec<Item>,
    // Not placed yet; kept so they can be mixed in once traps exist in the client
    pub trap_items: Vec<Item>,
    pub region_order: Vec<String>,
    // Shape value of each fill shape, in draw order
    pub location_costs: Vec<Capacity>,
    pub start_inventory: Vec<Item>,
    // Shape value of items pushed into the start inventory for lack of locations
    pub overflow_shape_value: Capacity,
    pub enabled_shape_types: Vec<ShapeType>,
}

struct ShapeDrawer {
    shape_type_weighted_list: Vec<ShapeType>,
    bags: HashMap<ShapeType, ShapeBag>,
}

impl ShapeDrawer {
    fn new(settings: &DracominoSettings, shapes: &[Item]) -> Result<Self> {
        let mut shape_type_weighted_list: Vec<ShapeType> = vec![];
        let mut bags: HashMap<ShapeType, ShapeBag> = HashMap::new();
        for (shape_type, weight) in settings.shape_weights.iter() {
            if weight == 0 {
                continue;
            }
            for _ in 0..weight {
                shape_type_weighted_list.push(shape_type);
            }
            let source: Vec<Item> = shapes
                .iter()
                .copied()
                .filter(|x| x.data().shape_type == Some(shape_type))
                .collect();
            bags.insert(shape_type, ShapeBag::new(shape_type, source)?);
        }
        Ok(ShapeDrawer {
            shape_type_weighted_list,
            bags,
        })
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> Result<Item> {
        let shape_type = *self
            .shape_type_weighted_list
            .choose(rng)
            .context("No shape types enabled")?;
        let bag = self
            .bags
            .get_mut(&shape_type)
            .with_context(|| format!("No shape bag for {shape_type:?}"))?;
        let item = bag.draw(rng);
        debug!("Drew {} from {shape_type:?} bag", item.name());
        Ok(item)
    }
}

impl ItemPool {
    pub fn decide<R: Rng>(settings: &DracominoSettings, rng: &mut R) -> Result<ItemPool> {
        let enabled_shape_types = settings.shape_weights.enabled_shape_types();

        let mut start_inventory: Vec<Item> = vec![];
        for entry in &settings.start_inventory {
            for _ in 0..entry.count {
                start_inventory.push(entry.item);
            }
        }
        let drop_item = settings.starting_drop_method.item();
        if !start_inventory.contains(&drop_item) {
            start_inventory.push(drop_item);
        }
        let start_inventory_set: HashSet<Item> = start_inventory.iter().copied().collect();

        let mut normal_item_pool: Vec<Item> = vec![];
        let mut shapes: Vec<Item> = vec![];
        let mut trap_items: Vec<Item> = vec![];
        for data in &ITEM_TABLE {
            // Progressive items are added by count further down.
            if data.id.is_none() || data.tags.contains(ItemTags::PROGRESSIVE) {
                continue;
            }
            if data.tags.contains(ItemTags::ABILITY) {
                if !start_inventory_set.contains(&data.item) {
                    normal_item_pool.push(data.item);
                }
            } else if data.tags.contains(ItemTags::SHAPE) {
                if data
                    .shape_type
                    .is_some_and(|t| enabled_shape_types.contains(&t))
                {
                    shapes.push(data.item);
                }
            } else if data.tags.contains(ItemTags::TRAP) {
                trap_items.push(data.item);
            }
        }

        let mut drawer = ShapeDrawer::new(settings, &shapes)?;

        for _ in 0..settings.starting_shapes {
            start_inventory.push(drawer.draw(rng)?);
        }

        let mut num_blocks_to_fill: Capacity = settings.goal * BOARD_WIDTH;
        for item in &start_inventory {
            num_blocks_to_fill -= item.shape_value();
        }

        for _ in 0..settings.next_piece_slots {
            normal_item_pool.push(Item::NextPieceSlot);
        }
        for _ in 0..settings.hold_slots {
            normal_item_pool.push(Item::HoldSlot);
        }

        // Draw shapes until there is enough shape value to reach the goal, then the extra shapes.
        let mut location_costs: Vec<Capacity> = vec![];
        let mut num_extra_shapes = settings.extra_shapes;
        while num_blocks_to_fill > 0 || num_extra_shapes > 0 {
            let item = drawer.draw(rng)?;
            let shape_value = item.shape_value();
            normal_item_pool.push(item);
            if num_blocks_to_fill > 0 {
                num_blocks_to_fill -= shape_value;
            } else {
                num_extra_shapes -= 1;
            }
            location_costs.push(shape_value);
        }
        info!(
            "Item pool: {} items ({} shapes drawn), {} items in start inventory",
            normal_item_pool.len(),
            location_costs.len(),
            start_inventory.len()
        );

        Ok(ItemPool {
            normal_item_pool,
            shapes,
            trap_items,
            region_order: vec![],
            location_costs,
            start_inventory,
            overflow_shape_value: 0,
            enabled_shape_types,
        })
    }

    /// Builds the final pool for `num_locations` locations. Non-shape items always go in;
    /// shapes fill the remaining locations, most recently drawn first, and any shapes left
    /// over are moved to the start inventory.
    pub fn create_items(&mut self, num_locations: usize) -> Vec<Item> {
        let mut item_pool: Vec<Item> = vec![];
        let mut flex_items: Vec<Item> = vec![];
        for &item in &self.normal_item_pool {
            if item.is_shape() {
                flex_items.push(item);
            } else {
                item_pool.push(item);
            }
        }

        let num_to_fill = num_locations.saturating_sub(item_pool.len());
        for _ in 0..num_to_fill {
            match flex_items.pop() {
                Some(item) => item_pool.push(item),
                None => break,
            }
        }

        if !flex_items.is_empty() {
            info!(
                "Pushing {} shapes into start inventory for lack of locations",
                flex_items.len()
            );
        }
        while let Some(item) = flex_items.pop() {
            self.overflow_shape_value += item.shape_value();
            self.start_inventory.push(item);
        }

        if item_pool.len() > num_locations {
            warn!(
                "More items than locations: {} items for {} locations",
                item_pool.len(),
                num_locations
            );
        }
        item_pool
    }

    pub fn get_filler_item<R: Rng>(&self, rng: &mut R) -> Item {
        self.shapes.choose(rng).copied().unwrap_or(Item::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShapeWeights;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tetromino_settings(goal: Capacity) -> DracominoSettings {
        DracominoSettings {
            goal,
            ..DracominoSettings::default()
        }
    }

    #[test]
    fn test_abilities_and_progressive_items() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let settings = DracominoSettings {
            next_piece_slots: 3,
            hold_slots: 2,
            ..tetromino_settings(10)
        };
        let pool = ItemPool::decide(&settings, &mut rng)?;
        // Gravity is the starting drop method, so it stays out of the pool.
        assert!(!pool.normal_item_pool.contains(&Item::Gravity));
        assert!(pool.start_inventory.contains(&Item::Gravity));
        for item in [
            Item::SoftDrop,
            Item::HardDrop,
            Item::RotateClockwise,
            Item::RotateCounterclockwise,
            Item::GhostPiece,
        ] {
            assert!(pool.normal_item_pool.contains(&item));
        }
        let count = |x: Item| pool.normal_item_pool.iter().filter(|&&y| y == x).count();
        assert_eq!(count(Item::NextPieceSlot), 3);
        assert_eq!(count(Item::HoldSlot), 2);
        assert_eq!(count(Item::UnimplementedTrap), 0);
        assert_eq!(pool.trap_items, vec![Item::UnimplementedTrap]);
        Ok(())
    }

    #[test]
    fn test_tetromino_fill_reaches_goal() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1234);
        let settings = tetromino_settings(10);
        let pool = ItemPool::decide(&settings, &mut rng)?;
        let start_value: Capacity = pool.start_inventory.iter().map(|x| x.shape_value()).sum();
        assert_eq!(start_value, 4 * settings.starting_shapes as Capacity);
        let required = 100 - start_value;
        let expected_draws = (required + 3) / 4 + settings.extra_shapes as Capacity;
        assert_eq!(pool.location_costs.len() as Capacity, expected_draws);
        assert!(pool.location_costs.iter().all(|&x| x == 4));
        let fill_value: Capacity = pool.location_costs.iter().sum();
        assert!(start_value + fill_value >= 100);
        Ok(())
    }

    #[test]
    fn test_only_enabled_families_are_drawn() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = DracominoSettings {
            shape_weights: ShapeWeights {
                monomino: 0,
                domino: 2,
                tromino: 0,
                tetromino: 0,
                pentomino: 3,
            },
            ..tetromino_settings(30)
        };
        let pool = ItemPool::decide(&settings, &mut rng)?;
        for item in pool.normal_item_pool.iter().chain(pool.start_inventory.iter()) {
            if let Some(t) = item.data().shape_type {
                assert!(t == ShapeType::Domino || t == ShapeType::Pentomino, "{item:?}");
            }
        }
        assert_eq!(pool.shapes.len(), 19);
        Ok(())
    }

    #[test]
    fn test_create_items_overflows_most_recent_last() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(77);
        let mut pool = ItemPool::decide(&tetromino_settings(10), &mut rng)?;
        let non_shapes: Vec<Item> = pool
            .normal_item_pool
            .iter()
            .copied()
            .filter(|x| !x.is_shape())
            .collect();
        let shapes: Vec<Item> = pool
            .normal_item_pool
            .iter()
            .copied()
            .filter(|x| x.is_shape())
            .collect();
        let start_len = pool.start_inventory.len();

        let num_locations = non_shapes.len() + 3;
        let items = pool.create_items(num_locations);
        assert_eq!(items.len(), num_locations);
        assert_eq!(&items[..non_shapes.len()], non_shapes.as_slice());
        let n = shapes.len();
        assert_eq!(
            &items[non_shapes.len()..],
            &[shapes[n - 1], shapes[n - 2], shapes[n - 3]]
        );
        assert_eq!(pool.start_inventory.len(), start_len + n - 3);
        assert_eq!(pool.overflow_shape_value, 4 * (n as Capacity - 3));
        Ok(())
    }

    #[test]
    fn test_create_items_with_room_to_spare() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(78);
        let mut pool = ItemPool::decide(&tetromino_settings(10), &mut rng)?;
        let total = pool.normal_item_pool.len();
        let items = pool.create_items(total + 10);
        assert_eq!(items.len(), total);
        assert_eq!(pool.overflow_shape_value, 0);
        Ok(())
    }

    #[test]
    fn test_filler_item() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = ItemPool::decide(&tetromino_settings(10), &mut rng)?;
        assert!(pool.get_filler_item(&mut rng).is_shape());
        let empty = ItemPool {
            shapes: vec![],
            ..pool
        };
        assert_eq!(empty.get_filler_item(&mut rng), Item::Nothing);
        Ok(())
    }
}
