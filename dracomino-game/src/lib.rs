pub mod items;
pub mod locations;

use anyhow::{Context, Result, ensure};
use hashbrown::HashMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter};

pub use items::{ITEM_TABLE, Item, ItemClassification, ItemData, ItemTags, ShapeType};
pub use locations::{LocationData, LocationKind};

pub const VERSION: &str = "0.2.0";
pub const MIN_GAME_VERSION: &str = "0.2.0";

pub const BOARD_WIDTH: Capacity = 10;
pub const BOARD_HEIGHT: Capacity = 20;
// Board height reachable once every height upgrade is collected. There are no height
// upgrades yet, so this is the full board.
pub const BOARD_HEIGHT_WITH_UPGRADES: Capacity = 20;

pub type Capacity = i32; // Data type used to represent quantities of shape value, height, etc.
pub type ItemId = u32; // Item id from the item table (abilities 1-100, progressive 101-200, traps 201-300, shapes 301-)
pub type LocationId = u32; // Location id (line clears 1-1000, item pickups 10001-20000)
pub type LocationIdx = usize; // Index into GameData.location_table

/// Accumulated quantities tracked alongside item counts.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, Serialize, Deserialize,
)]
pub enum Resource {
    ShapeValue,
    PoorHeight,
    SafeHeight,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::ShapeValue => "Shape Value",
            Resource::PoorHeight => "Poor Height",
            Resource::SafeHeight => "Safe Height",
        }
    }

    /// Amount contributed by one copy of `item`.
    pub fn amount_for(self, item: Item) -> Capacity {
        let data = item.data();
        match self {
            Resource::ShapeValue => data.shape_value(),
            Resource::PoorHeight => data.poor_height,
            Resource::SafeHeight => data.safe_height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    Free,
    Never,
    Resource {
        resource: Resource,
        amount: Capacity,
    },
    Item(Item),
    AnyItem(Vec<Item>),
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
}

impl Requirement {
    pub fn make_and(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            match req {
                Requirement::Never => return Requirement::Never,
                Requirement::Free => continue,
                Requirement::And(and_reqs) => out_reqs.extend(and_reqs),
                other => out_reqs.push(other),
            }
        }
        match out_reqs.len() {
            0 => Requirement::Free,
            1 => out_reqs.pop().unwrap_or(Requirement::Free),
            _ => Requirement::And(out_reqs),
        }
    }

    pub fn make_or(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            match req {
                Requirement::Never => continue,
                Requirement::Free => return Requirement::Free,
                Requirement::Or(or_reqs) => out_reqs.extend(or_reqs),
                other => out_reqs.push(other),
            }
        }
        match out_reqs.len() {
            0 => Requirement::Never,
            1 => out_reqs.pop().unwrap_or(Requirement::Never),
            _ => Requirement::Or(out_reqs),
        }
    }

    /// Holding any one of `items`. An empty group can never be satisfied.
    pub fn make_any_item(mut items: Vec<Item>) -> Requirement {
        match items.len() {
            0 => Requirement::Never,
            1 => Requirement::Item(items[0]),
            _ => {
                items.sort();
                items.dedup();
                Requirement::AnyItem(items)
            }
        }
    }

    pub fn make_resource(resource: Resource, amount: Capacity) -> Requirement {
        if amount <= 0 {
            Requirement::Free
        } else {
            Requirement::Resource { resource, amount }
        }
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Free => write!(f, "Free"),
            Requirement::Never => write!(f, "Never"),
            Requirement::Resource { resource, amount } => {
                write!(f, "{} >= {}", resource.name(), amount)
            }
            Requirement::Item(item) => write!(f, "{}", item.name()),
            Requirement::AnyItem(items) => {
                let names: Vec<&str> = items.iter().map(|x| x.name()).collect();
                write!(f, "Any({})", names.join(", "))
            }
            Requirement::And(reqs) | Requirement::Or(reqs) => {
                let op = if let Requirement::And(_) = self {
                    " and "
                } else {
                    " or "
                };
                let parts: Vec<String> = reqs.iter().map(|r| format!("{r}")).collect();
                write!(f, "({})", parts.join(op))
            }
        }
    }
}

#[derive(Clone)]
pub struct GameData {
    pub location_table: Vec<LocationData>,
    pub location_idx_by_name: HashMap<String, LocationIdx>,
    pub location_idx_by_id: HashMap<LocationId, LocationIdx>,
    pub item_by_id: HashMap<ItemId, Item>,
    pub item_name_groups: HashMap<String, Vec<Item>>,
}

fn make_item_group(pred: impl Fn(&ItemData) -> bool) -> Vec<Item> {
    ITEM_TABLE.iter().filter(|x| pred(x)).map(|x| x.item).collect()
}

fn make_item_name_groups() -> HashMap<String, Vec<Item>> {
    let mut groups: HashMap<String, Vec<Item>> = HashMap::new();
    for shape_type in [ShapeType::Tromino, ShapeType::Tetromino, ShapeType::Pentomino] {
        let name: &'static str = shape_type.into();
        let mut group_name = name.to_string();
        group_name[..1].make_ascii_uppercase();
        groups.insert(
            group_name,
            make_item_group(|x| x.shape_type == Some(shape_type)),
        );
    }
    groups.insert(
        "Shape".to_string(),
        make_item_group(|x| x.tags.contains(ItemTags::SHAPE)),
    );
    groups.insert(
        "Rotate".to_string(),
        make_item_group(|x| x.tags.contains(ItemTags::ROTATE)),
    );
    groups.insert(
        "Ability".to_string(),
        make_item_group(|x| x.tags.contains(ItemTags::ABILITY)),
    );
    groups.insert("Triomino".to_string(), groups["Tromino"].clone());
    for alias in ["Piece", "Dracomino", "Mino", "Polyomino"] {
        groups.insert(alias.to_string(), groups["Shape"].clone());
    }
    groups
}

impl GameData {
    pub fn load() -> Result<GameData> {
        for (i, item) in Item::iter().enumerate() {
            ensure!(
                ITEM_TABLE[i].item == item,
                "Item table out of order at index {i}: expected {item:?}, found {:?}",
                ITEM_TABLE[i].item
            );
        }
        let mut item_by_id: HashMap<ItemId, Item> = HashMap::new();
        for data in &ITEM_TABLE {
            if let Some(id) = data.id {
                ensure!(
                    item_by_id.insert(id, data.item).is_none(),
                    "Duplicate item id {id}"
                );
            }
        }

        let location_table = locations::build_location_table();
        let mut location_idx_by_name = HashMap::new();
        let mut location_idx_by_id = HashMap::new();
        for (idx, loc) in location_table.iter().enumerate() {
            location_idx_by_name.insert(loc.name.clone(), idx);
            ensure!(
                location_idx_by_id.insert(loc.id, idx).is_none(),
                "Duplicate location id {}",
                loc.id
            );
        }
        info!(
            "Loaded {} items and {} locations",
            item_by_id.len(),
            location_table.len()
        );

        Ok(GameData {
            location_table,
            location_idx_by_name,
            location_idx_by_id,
            item_by_id,
            item_name_groups: make_item_name_groups(),
        })
    }

    pub fn get_item(&self, name: &str) -> Result<Item> {
        Item::from_str(name).with_context(|| format!("Unknown item name: {name}"))
    }

    pub fn get_item_group(&self, name: &str) -> Result<&[Item]> {
        self.item_name_groups
            .get(name)
            .map(|x| x.as_slice())
            .with_context(|| format!("Unknown item group: {name}"))
    }

    pub fn get_location(&self, name: &str) -> Result<&LocationData> {
        let idx = self
            .location_idx_by_name
            .get(name)
            .with_context(|| format!("Unknown location name: {name}"))?;
        Ok(&self.location_table[*idx])
    }

    pub fn locations_of_kind(&self, kind: LocationKind) -> Vec<LocationIdx> {
        (0..self.location_table.len())
            .filter(|&i| self.location_table[i].kind == kind)
            .collect()
    }
}
