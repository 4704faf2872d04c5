use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{Capacity, ItemId};

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    IntoStaticStr,
    EnumIter,
    EnumCount,
    VariantNames,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[repr(usize)]
// Note: the ordering of these items is significant; it must correspond to the ordering of ITEM_TABLE:
pub enum Item {
    // Abilities (ids 1-100)
    #[strum(serialize = "Gravity")]
    Gravity,
    #[strum(serialize = "Soft Drop")]
    SoftDrop,
    #[strum(serialize = "Hard Drop")]
    HardDrop,
    #[strum(serialize = "Rotate Clockwise")]
    RotateClockwise,
    #[strum(serialize = "Rotate Counterclockwise")]
    RotateCounterclockwise,
    #[strum(serialize = "Ghost Piece")]
    GhostPiece,
    // Progressive items (ids 101-200)
    #[strum(serialize = "Next Piece Slot")]
    NextPieceSlot,
    #[strum(serialize = "Hold Slot")]
    HoldSlot,
    // Traps (ids 201-300)
    #[strum(serialize = "UNIMPLEMENTED TRAP")]
    UnimplementedTrap,
    // Shapes (ids 301-)
    #[strum(serialize = "Monomino")]
    Monomino,
    #[strum(serialize = "Domino")]
    Domino,
    #[strum(serialize = "I Tromino")]
    ITromino,
    #[strum(serialize = "L Tromino")]
    LTromino,
    #[strum(serialize = "I Tetromino")]
    ITetromino,
    #[strum(serialize = "O Tetromino")]
    OTetromino,
    #[strum(serialize = "T Tetromino")]
    TTetromino,
    #[strum(serialize = "J Tetromino")]
    JTetromino,
    #[strum(serialize = "L Tetromino")]
    LTetromino,
    #[strum(serialize = "S Tetromino")]
    STetromino,
    #[strum(serialize = "Z Tetromino")]
    ZTetromino,
    #[strum(serialize = "I Pentomino")]
    IPentomino,
    #[strum(serialize = "U Pentomino")]
    UPentomino,
    #[strum(serialize = "T Pentomino")]
    TPentomino,
    #[strum(serialize = "X Pentomino")]
    XPentomino,
    #[strum(serialize = "V Pentomino")]
    VPentomino,
    #[strum(serialize = "W Pentomino")]
    WPentomino,
    #[strum(serialize = "L Pentomino")]
    LPentomino,
    #[strum(serialize = "J Pentomino")]
    JPentomino,
    #[strum(serialize = "S Pentomino")]
    SPentomino,
    #[strum(serialize = "Z Pentomino")]
    ZPentomino,
    #[strum(serialize = "F Pentomino")]
    FPentomino,
    #[strum(serialize = "F' Pentomino")]
    FPrimePentomino,
    #[strum(serialize = "N Pentomino")]
    NPentomino,
    #[strum(serialize = "N' Pentomino")]
    NPrimePentomino,
    #[strum(serialize = "P Pentomino")]
    PPentomino,
    #[strum(serialize = "Q Pentomino")]
    QPentomino,
    #[strum(serialize = "Y Pentomino")]
    YPentomino,
    #[strum(serialize = "Y' Pentomino")]
    YPrimePentomino,
    // Neutral filler, has no id and never appears in the item table ids.
    #[strum(serialize = "Nothing")]
    Nothing,
}

impl Item {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn data(self) -> &'static ItemData {
        &ITEM_TABLE[self as usize]
    }

    pub fn is_shape(self) -> bool {
        self.data().tags.contains(ItemTags::SHAPE)
    }

    pub fn shape_value(self) -> Capacity {
        self.data().shape_value()
    }
}

/// Shape families, each worth a fixed number of board cells.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShapeType {
    Monomino,
    Domino,
    Tromino,
    Tetromino,
    Pentomino,
}

impl ShapeType {
    pub fn shape_value(self) -> Capacity {
        match self {
            ShapeType::Monomino => 1,
            ShapeType::Domino => 2,
            ShapeType::Tromino => 3,
            ShapeType::Tetromino => 4,
            ShapeType::Pentomino => 5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemClassification {
    Progression,
    // Needed by logic but skipped by progression balancing.
    ProgressionWeak,
    Useful,
    Trap,
    Filler,
}

bitflags! {
    /// Capability tags carried by an item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ItemTags: u8 {
        const ABILITY             = 1 << 0;
        const PROGRESSIVE         = 1 << 1;
        const ROTATE              = 1 << 2;
        const SHAPE               = 1 << 3;
        const TRAP                = 1 << 4;
        const HAS_CORNER_GAP      = 1 << 5;
        const HAS_SECOND_TILE_GAP = 1 << 6;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemData {
    pub item: Item,
    pub id: Option<ItemId>,
    pub classification: ItemClassification,
    pub tags: ItemTags,
    pub shape_type: Option<ShapeType>,
    // Worst case height a piece is expected to reach when rotation is not available
    pub poor_height: Capacity,
    // Height a piece is expected to reach when rotation is available
    pub safe_height: Capacity,
}

impl ItemData {
    pub fn shape_value(&self) -> Capacity {
        self.shape_type.map(ShapeType::shape_value).unwrap_or(0)
    }
}

const fn ability(
    item: Item,
    id: ItemId,
    classification: ItemClassification,
    tags: ItemTags,
) -> ItemData {
    ItemData {
        item,
        id: Some(id),
        classification,
        tags: ItemTags::ABILITY.union(tags),
        shape_type: None,
        poor_height: 0,
        safe_height: 0,
    }
}

const fn shape(
    item: Item,
    id: ItemId,
    shape_type: ShapeType,
    gaps: ItemTags,
    poor_height: Capacity,
    safe_height: Capacity,
) -> ItemData {
    ItemData {
        item,
        id: Some(id),
        classification: ItemClassification::ProgressionWeak,
        tags: ItemTags::SHAPE.union(gaps),
        shape_type: Some(shape_type),
        poor_height,
        safe_height,
    }
}

const NONE: ItemTags = ItemTags::empty();
const CORNER: ItemTags = ItemTags::HAS_CORNER_GAP;
const SECOND: ItemTags = ItemTags::HAS_SECOND_TILE_GAP;
const BOTH: ItemTags = CORNER.union(SECOND);

use ItemClassification::{Progression, Useful};
use ShapeType::{Domino, Monomino, Pentomino, Tetromino, Tromino};

pub const ITEM_TABLE: [ItemData; 39] = [
    ability(Item::Gravity, 1, Useful, NONE),
    ability(Item::SoftDrop, 2, Useful, NONE),
    ability(Item::HardDrop, 3, Useful, NONE),
    ability(Item::RotateClockwise, 4, Progression, ItemTags::ROTATE),
    ability(Item::RotateCounterclockwise, 5, Progression, ItemTags::ROTATE),
    ability(Item::GhostPiece, 6, Useful, NONE),
    ability(Item::NextPieceSlot, 101, Useful, ItemTags::PROGRESSIVE),
    ability(Item::HoldSlot, 102, Useful, ItemTags::PROGRESSIVE),
    ItemData {
        item: Item::UnimplementedTrap,
        id: Some(201),
        classification: ItemClassification::Trap,
        tags: ItemTags::TRAP,
        shape_type: None,
        poor_height: 0,
        safe_height: 0,
    },
    shape(Item::Monomino, 301, Monomino, NONE, 1, 1),
    shape(Item::Domino, 302, Domino, NONE, 1, 2),
    shape(Item::ITromino, 303, Tromino, NONE, 1, 3),
    shape(Item::LTromino, 304, Tromino, CORNER, 1, 2),
    shape(Item::ITetromino, 305, Tetromino, NONE, 1, 4),
    shape(Item::OTetromino, 306, Tetromino, NONE, 2, 2),
    shape(Item::TTetromino, 307, Tetromino, CORNER, 1, 3),
    shape(Item::JTetromino, 308, Tetromino, BOTH, 1, 3),
    shape(Item::LTetromino, 309, Tetromino, BOTH, 1, 3),
    shape(Item::STetromino, 310, Tetromino, CORNER, 1, 2),
    shape(Item::ZTetromino, 311, Tetromino, CORNER, 1, 2),
    shape(Item::IPentomino, 312, Pentomino, NONE, 1, 5),
    shape(Item::UPentomino, 313, Pentomino, SECOND, 2, 3),
    shape(Item::TPentomino, 314, Pentomino, BOTH, 2, 3),
    shape(Item::XPentomino, 315, Pentomino, CORNER, 2, 2),
    shape(Item::VPentomino, 316, Pentomino, BOTH, 1, 3),
    shape(Item::WPentomino, 317, Pentomino, BOTH, 2, 3),
    shape(Item::LPentomino, 318, Pentomino, BOTH, 1, 4),
    shape(Item::JPentomino, 319, Pentomino, BOTH, 1, 4),
    shape(Item::SPentomino, 320, Pentomino, BOTH, 1, 3),
    shape(Item::ZPentomino, 321, Pentomino, BOTH, 1, 3),
    shape(Item::FPentomino, 322, Pentomino, BOTH, 1, 3),
    shape(Item::FPrimePentomino, 323, Pentomino, BOTH, 1, 3),
    shape(Item::NPentomino, 324, Pentomino, BOTH, 1, 3),
    shape(Item::NPrimePentomino, 325, Pentomino, BOTH, 1, 3),
    shape(Item::PPentomino, 326, Pentomino, CORNER, 2, 3),
    shape(Item::QPentomino, 327, Pentomino, CORNER, 2, 3),
    shape(Item::YPentomino, 328, Pentomino, BOTH, 1, 3),
    shape(Item::YPrimePentomino, 329, Pentomino, BOTH, 1, 3),
    ItemData {
        item: Item::Nothing,
        id: None,
        classification: ItemClassification::Filler,
        tags: NONE,
        shape_type: None,
        poor_height: 0,
        safe_height: 0,
    },
];
