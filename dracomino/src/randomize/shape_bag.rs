use dracomino_game::{Item, ShapeType};
use rand::Rng;

use super::GenerationError;

/// Draws shapes of one family without replacement, refilling once every shape has come out.
#[derive(Clone, Debug)]
pub struct ShapeBag {
    pub shape_type: ShapeType,
    source: Vec<Item>,
    remaining: Vec<Item>,
}

impl ShapeBag {
    pub fn new(shape_type: ShapeType, source: Vec<Item>) -> Result<Self, GenerationError> {
        if source.is_empty() {
            return Err(GenerationError::EmptyShapeBag(shape_type));
        }
        Ok(ShapeBag {
            shape_type,
            remaining: source.clone(),
            source,
        })
    }

    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Item {
        if self.remaining.is_empty() {
            self.remaining.extend_from_slice(&self.source);
        }
        let idx = rng.gen_range(0..self.remaining.len());
        self.remaining.remove(idx)
    }

    pub fn reset(&mut self) {
        self.remaining.clear();
        self.remaining.extend_from_slice(&self.source);
    }

    pub fn source(&self) -> &[Item] {
        &self.source
    }

    pub fn remaining(&self) -> &[Item] {
        &self.remaining
    }
}
