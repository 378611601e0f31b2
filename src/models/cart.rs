use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed number of cart slots per user
pub const CART_SLOTS: usize = 300;

/// Per-user quantity table, slot index → quantity.
///
/// Stored (and returned to clients) as an object keyed by the slot index as a
/// string: `{"0": 0, "1": 2, ...}`. Slots absent from a stored document read as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartData {
    slots: Vec<u32>,
}

impl Default for CartData {
    fn default() -> Self {
        Self::empty()
    }
}

impl CartData {
    pub fn empty() -> Self {
        Self {
            slots: vec![0; CART_SLOTS],
        }
    }

    pub fn is_valid_slot(slot: usize) -> bool {
        slot < CART_SLOTS
    }

    pub fn quantity(&self, slot: usize) -> u32 {
        self.slots.get(slot).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, slot: usize) {
        if let Some(q) = self.slots.get_mut(slot) {
            *q = q.saturating_add(1);
        }
    }

    /// Returns false when the slot was already at 0
    pub fn decrement(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(q) if *q > 0 => {
                *q -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn total_items(&self) -> u64 {
        self.slots.iter().map(|q| u64::from(*q)).sum()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

impl Serialize for CartData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (slot, quantity) in self.slots.iter().enumerate() {
            map.serialize_entry(&slot.to_string(), quantity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CartVisitor;

        impl<'de> Visitor<'de> for CartVisitor {
            type Value = CartData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of cart slot indices to quantities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut cart = CartData::empty();
                // Legacy documents may hold doubles; negative values clamp to 0
                while let Some((key, quantity)) = access.next_entry::<String, f64>()? {
                    if let Ok(slot) = key.parse::<usize>() {
                        if let Some(q) = cart.slots.get_mut(slot) {
                            *q = quantity.max(0.0).min(f64::from(u32::MAX)) as u32;
                        }
                    }
                }
                Ok(cart)
            }
        }

        deserializer.deserialize_map(CartVisitor)
    }
}
