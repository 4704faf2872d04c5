use serde::{Deserialize, Serialize};

use crate::LocationId;

pub const NUM_LINE_CLEAR_LOCATIONS: usize = 1000;
pub const NUM_ITEM_PICKUP_LOCATIONS: usize = 10000;
pub const ITEM_PICKUP_ID_OFFSET: LocationId = 10000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    // Rewarded for clearing a given number of rows
    LineClear,
    // Rewarded for reaching a coin placed on the board
    ItemPickup,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
}

pub fn line_clear_name(line: usize) -> String {
    format!("Line {line} Cleared")
}

pub fn coin_name(coin: usize) -> String {
    format!("Coin {coin}")
}

pub fn build_location_table() -> Vec<LocationData> {
    let mut out = Vec::with_capacity(NUM_LINE_CLEAR_LOCATIONS + NUM_ITEM_PICKUP_LOCATIONS);
    for i in 1..=NUM_LINE_CLEAR_LOCATIONS {
        out.push(LocationData {
            id: i as LocationId,
            name: line_clear_name(i),
            kind: LocationKind::LineClear,
        });
    }
    for i in 1..=NUM_ITEM_PICKUP_LOCATIONS {
        out.push(LocationData {
            id: ITEM_PICKUP_ID_OFFSET + i as LocationId,
            name: coin_name(i),
            kind: LocationKind::ItemPickup,
        });
    }
    out
}
