use dracomino_game::{Capacity, Item, Requirement, Resource};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

/// Collected items plus the accumulated resources they contribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Capacity>,
    pub resources: Vec<Capacity>,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory {
            items: vec![0; Item::COUNT],
            resources: vec![0; Resource::COUNT],
        }
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: &[Item]) -> Self {
        let mut inventory = Inventory::new();
        for &item in items {
            inventory.collect(item);
        }
        inventory
    }

    pub fn print_debug(&self) {
        for item in Item::iter() {
            if self.items[item as usize] > 0 {
                println!("{}: {}", item.name(), self.items[item as usize]);
            }
        }
        for resource in Resource::iter() {
            println!("{}: {}", resource.name(), self.resource(resource));
        }
    }

    /// Adds one copy of `item` and its resource contributions.
    pub fn collect(&mut self, item: Item) -> bool {
        self.items[item as usize] += 1;
        for resource in Resource::iter() {
            self.add_resource(resource, resource.amount_for(item));
        }
        true
    }

    /// Removes one copy of `item`. Returns false if none was held.
    pub fn remove(&mut self, item: Item) -> bool {
        if self.items[item as usize] == 0 {
            return false;
        }
        self.items[item as usize] -= 1;
        for resource in Resource::iter() {
            self.remove_resource(resource, resource.amount_for(item));
        }
        true
    }

    pub fn add_resource(&mut self, resource: Resource, amount: Capacity) {
        self.resources[resource as usize] += amount;
    }

    pub fn remove_resource(&mut self, resource: Resource, amount: Capacity) {
        let r = &mut self.resources[resource as usize];
        *r = Capacity::max(0, *r - amount);
    }

    pub fn resource(&self, resource: Resource) -> Capacity {
        self.resources[resource as usize]
    }

    pub fn count(&self, item: Item) -> Capacity {
        self.items[item as usize]
    }

    pub fn has(&self, item: Item) -> bool {
        self.count(item) > 0
    }

    pub fn has_any(&self, items: &[Item]) -> bool {
        items.iter().any(|&x| self.has(x))
    }

    pub fn satisfies(&self, req: &Requirement) -> bool {
        match req {
            Requirement::Free => true,
            Requirement::Never => false,
            &Requirement::Resource { resource, amount } => self.resource(resource) >= amount,
            &Requirement::Item(item) => self.has(item),
            Requirement::AnyItem(items) => self.has_any(items),
            Requirement::And(reqs) => reqs.iter().all(|r| self.satisfies(r)),
            Requirement::Or(reqs) => reqs.iter().any(|r| self.satisfies(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_tracks_resources() {
        let mut inv = Inventory::new();
        inv.collect(Item::ITetromino);
        inv.collect(Item::OTetromino);
        inv.collect(Item::RotateClockwise);
        assert_eq!(inv.resource(Resource::ShapeValue), 8);
        assert_eq!(inv.resource(Resource::PoorHeight), 3);
        assert_eq!(inv.resource(Resource::SafeHeight), 6);
        assert_eq!(inv.count(Item::RotateClockwise), 1);

        assert!(inv.remove(Item::ITetromino));
        assert!(!inv.remove(Item::ITetromino));
        assert_eq!(inv.resource(Resource::ShapeValue), 4);
        assert_eq!(inv.resource(Resource::SafeHeight), 2);
    }

    #[test]
    fn test_satisfies() {
        let inv = Inventory::from_items(&[Item::LTromino, Item::Domino]);
        let rotate = Requirement::make_any_item(vec![
            Item::RotateClockwise,
            Item::RotateCounterclockwise,
        ]);
        let shape_value = Requirement::make_resource(Resource::ShapeValue, 5);
        assert!(inv.satisfies(&shape_value));
        assert!(!inv.satisfies(&rotate));
        assert!(!inv.satisfies(&Requirement::make_and(vec![
            rotate.clone(),
            shape_value.clone()
        ])));
        assert!(inv.satisfies(&Requirement::make_or(vec![rotate, shape_value])));
        assert!(inv.satisfies(&Requirement::Free));
        assert!(!inv.satisfies(&Requirement::Never));
    }
}
