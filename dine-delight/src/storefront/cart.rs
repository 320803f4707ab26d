//! Per-session cart. Lines keep insertion order; the total is always
//! recomputed from them.

use serde::Serialize;

use crate::models::{MenuItem, OrderLine};
use crate::money::Money;

use super::notice::Notice;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Price when the item was added.
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more of `item`: a new line, or the existing line incremented.
    /// Returns the toast confirming the add.
    pub fn add(&mut self, item: &MenuItem) -> Notice {
        self.add_line(&item.id, &item.name, item.price, item.image_url.as_deref(), 1);
        Notice::added_to_cart(&item.name)
    }

    pub fn add_line(
        &mut self,
        item_id: &str,
        name: &str,
        unit_price: Money,
        image_url: Option<&str>,
        quantity: u32,
    ) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.lines.push(CartLine {
            item_id: item_id.to_string(),
            name: name.to_string(),
            unit_price,
            quantity,
            image_url: image_url.map(str::to_string),
        });
    }

    /// Drop the line for `item_id`, if any.
    pub fn remove(&mut self, item_id: &str) -> Option<CartLine> {
        let pos = self.lines.iter().position(|l| l.item_id == item_id)?;
        Some(self.lines.remove(pos))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// `None` when the total does not fit in an amount.
    pub fn total_amount(&self) -> Option<Money> {
        self.lines
            .iter()
            .try_fold(Money::ZERO, |acc, l| acc.checked_add(l.unit_price.times(l.quantity)?))
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Snapshot stored on the order.
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                id: l.item_id.clone(),
                name: l.name.clone(),
                price: l.unit_price,
                quantity: l.quantity,
                image_url: l.image_url.clone(),
            })
            .collect()
    }
}
