use dracomino_game::{
    BOARD_HEIGHT_WITH_UPGRADES, BOARD_WIDTH, Capacity, Item, ItemTags, LocationKind,
    Requirement, Resource,
};

use super::placement::PlacedLocation;
use crate::settings::DracominoSettings;

/// Builds access requirements for line clears, item pickups and completion.
pub struct LogicBuilder {
    goal: Capacity,
    line_clear_leniency: Capacity,
    max_stacking_height: Capacity,
    only_monomino: bool,
    rotate_items: Vec<Item>,
    corner_shapes: Vec<Item>,
    second_tile_shapes: Vec<Item>,
}

impl LogicBuilder {
    /// `shapes` is the candidate set of shapes from the enabled families.
    pub fn new(settings: &DracominoSettings, shapes: &[Item]) -> Self {
        let rotate_items: Vec<Item> = dracomino_game::ITEM_TABLE
            .iter()
            .filter(|x| x.tags.contains(ItemTags::ROTATE))
            .map(|x| x.item)
            .collect();
        let without_tag = |tag: ItemTags| -> Vec<Item> {
            shapes
                .iter()
                .copied()
                .filter(|x| !x.data().tags.contains(tag))
                .collect()
        };
        LogicBuilder {
            goal: settings.goal,
            line_clear_leniency: settings.line_clear_leniency,
            max_stacking_height: settings.max_stacking_height,
            only_monomino: settings.shape_weights.is_only_monomino(),
            rotate_items,
            corner_shapes: without_tag(ItemTags::HAS_CORNER_GAP),
            second_tile_shapes: without_tag(ItemTags::HAS_SECOND_TILE_GAP),
        }
    }

    pub fn can_rotate(&self) -> Requirement {
        if self.only_monomino {
            Requirement::Free
        } else {
            Requirement::make_any_item(self.rotate_items.clone())
        }
    }

    pub fn shape_value_req(&self, amount: Capacity) -> Requirement {
        Requirement::make_resource(Resource::ShapeValue, amount)
    }

    pub fn poor_height_req(&self, amount: Capacity) -> Requirement {
        Requirement::make_resource(Resource::PoorHeight, amount)
    }

    pub fn safe_height_req(&self, amount: Capacity) -> Requirement {
        Requirement::make_resource(Resource::SafeHeight, amount)
    }

    pub fn effective_max_stacking_height(&self) -> Capacity {
        Capacity::min(self.max_stacking_height, self.goal)
    }

    pub fn height_limit(&self) -> Capacity {
        Capacity::min(
            BOARD_HEIGHT_WITH_UPGRADES,
            self.effective_max_stacking_height(),
        )
    }

    pub fn line_clear_req(&self, amount: Capacity) -> Requirement {
        Requirement::make_and(vec![self.can_rotate(), self.shape_value_req(amount)])
    }

    pub fn item_pickup_req(&self, amount: Capacity, placement: Capacity) -> Requirement {
        let location_height = placement / BOARD_WIDTH;
        let reach_height = Capacity::min(self.height_limit(), location_height);
        let reduction_with_rotation = reach_height * (BOARD_WIDTH - 2);
        let reduction_without_rotation = reach_height * (BOARD_WIDTH - 4);

        let with_rotation = Requirement::make_and(vec![
            self.can_rotate(),
            self.shape_value_req(1 + Capacity::max(0, amount - reduction_with_rotation)),
            self.safe_height_req(reach_height),
        ]);

        let without_rotation = if location_height > self.effective_max_stacking_height()
            || self.only_monomino
        {
            Requirement::Never
        } else if placement == 1 || placement == BOARD_WIDTH - 1 {
            Requirement::make_any_item(self.corner_shapes.clone())
        } else if placement == 2 || placement == BOARD_WIDTH - 2 {
            Requirement::make_any_item(self.second_tile_shapes.clone())
        } else {
            Requirement::make_and(vec![
                self.shape_value_req(1 + Capacity::max(0, amount - reduction_without_rotation)),
                self.poor_height_req(reach_height),
            ])
        };

        Requirement::make_or(vec![with_rotation, without_rotation])
    }

    pub fn completion_req(&self) -> Requirement {
        self.line_clear_req((self.goal + self.line_clear_leniency) * BOARD_WIDTH)
    }

    pub fn location_req(&self, loc: &PlacedLocation) -> Requirement {
        match loc.kind {
            LocationKind::LineClear => self.line_clear_req(loc.cost),
            LocationKind::ItemPickup => self.item_pickup_req(loc.cost, loc.placement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShapeWeights;
    use dracomino_logic::Inventory;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn shapes_for(settings: &DracominoSettings) -> Vec<Item> {
        let enabled = settings.shape_weights.enabled_shape_types();
        dracomino_game::ITEM_TABLE
            .iter()
            .filter(|x| x.shape_type.is_some_and(|t| enabled.contains(&t)))
            .map(|x| x.item)
            .collect()
    }

    fn builder(settings: &DracominoSettings) -> LogicBuilder {
        LogicBuilder::new(settings, &shapes_for(settings))
    }

    fn monomino_settings() -> DracominoSettings {
        DracominoSettings {
            shape_weights: ShapeWeights {
                monomino: 1,
                domino: 0,
                tromino: 0,
                tetromino: 0,
                pentomino: 0,
            },
            ..DracominoSettings::default()
        }
    }

    #[test]
    fn test_completion_requires_rotation() {
        let settings = DracominoSettings {
            goal: 5,
            ..DracominoSettings::default()
        };
        let req = builder(&settings).completion_req();
        assert_eq!(
            req,
            Requirement::And(vec![
                Requirement::AnyItem(vec![Item::RotateClockwise, Item::RotateCounterclockwise]),
                Requirement::Resource {
                    resource: Resource::ShapeValue,
                    amount: 50
                },
            ])
        );
    }

    #[test]
    fn test_completion_with_leniency_and_monomino_only() {
        let settings = DracominoSettings {
            goal: 5,
            line_clear_leniency: 2,
            ..monomino_settings()
        };
        let req = builder(&settings).completion_req();
        assert_eq!(
            req,
            Requirement::Resource {
                resource: Resource::ShapeValue,
                amount: 70
            }
        );
    }

    #[test]
    fn test_edge_columns_use_shape_groups() {
        let settings = DracominoSettings::default();
        let logic = builder(&settings);
        let has_group = |req: &Requirement, group: &[Item]| match req {
            Requirement::Or(reqs) => reqs.iter().any(|r| match r {
                Requirement::AnyItem(items) => {
                    let mut expected = group.to_vec();
                    expected.sort();
                    items == &expected
                }
                Requirement::Item(item) => group == [*item],
                _ => false,
            }),
            _ => false,
        };
        for placement in [1, BOARD_WIDTH - 1] {
            let req = logic.item_pickup_req(0, placement);
            assert!(has_group(&req, &logic.corner_shapes), "{req}");
        }
        for placement in [2, BOARD_WIDTH - 2] {
            let req = logic.item_pickup_req(0, placement);
            assert!(has_group(&req, &logic.second_tile_shapes), "{req}");
        }
        assert_eq!(logic.corner_shapes, vec![Item::ITetromino, Item::OTetromino]);
    }

    #[test]
    fn test_monomino_only_has_no_rotation_branch() {
        let settings = monomino_settings();
        let req = builder(&settings).item_pickup_req(30, 35);
        // 3 rows reached, 3 * 8 cells discounted.
        assert_eq!(
            req,
            Requirement::And(vec![
                Requirement::Resource {
                    resource: Resource::ShapeValue,
                    amount: 7
                },
                Requirement::Resource {
                    resource: Resource::SafeHeight,
                    amount: 3
                },
            ])
        );
    }

    #[test]
    fn test_above_stacking_height_needs_rotation() {
        let settings = DracominoSettings {
            goal: 10,
            max_stacking_height: 2,
            ..DracominoSettings::default()
        };
        let logic = builder(&settings);
        let req = logic.item_pickup_req(50, 55);
        let mut inv = Inventory::from_items(&[Item::ITetromino; 30]);
        assert!(!inv.satisfies(&req));
        inv.collect(Item::RotateClockwise);
        assert!(inv.satisfies(&req));
    }

    #[test]
    fn test_rules_are_monotone() {
        let mut rng = StdRng::seed_from_u64(42);
        let settings = DracominoSettings {
            goal: 20,
            shape_weights: ShapeWeights {
                monomino: 1,
                domino: 1,
                tromino: 2,
                tetromino: 7,
                pentomino: 18,
            },
            ..DracominoSettings::default()
        };
        let logic = builder(&settings);
        let mut reqs = vec![logic.completion_req()];
        for placement in 0..260 {
            reqs.push(logic.item_pickup_req(placement - placement % BOARD_WIDTH, placement));
        }
        for cost in (BOARD_WIDTH..200).step_by(BOARD_WIDTH as usize) {
            reqs.push(logic.line_clear_req(cost));
        }
        let all_items: Vec<Item> = dracomino_game::ITEM_TABLE.iter().map(|x| x.item).collect();
        for _ in 0..50 {
            let mut inv = Inventory::new();
            let mut before: Vec<bool> = reqs.iter().map(|r| inv.satisfies(r)).collect();
            for _ in 0..rng.gen_range(1..80) {
                inv.collect(*all_items.choose(&mut rng).unwrap());
                let after: Vec<bool> = reqs.iter().map(|r| inv.satisfies(r)).collect();
                for (b, a) in before.iter().zip(after.iter()) {
                    assert!(!b || *a);
                }
                before = after;
            }
        }
    }
}
