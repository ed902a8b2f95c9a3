//! # Order Builder
//!
//! The in-progress order at the counter, with value semantics: every
//! operation takes `&Order` and returns a new `Order`. The caller's value is
//! never touched, so the UI can keep the previous order for undo or compare
//! old and new to decide what to redraw.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI action               Operation                    Result            │
//! │  ─────────               ─────────                    ──────            │
//! │  Tap Tea                 add_item(tea, None, [])      new line / qty+1  │
//! │  Biryani + Raita         add_item(b, Full, [raita])   always new line   │
//! │  Stepper −/+             update_quantity(id, n)       n ≤ 0 removes     │
//! │  Swipe away              remove_line(id)              line gone         │
//! │  Add-on stepper          update_add_on_quantity(..)   clamp at 0        │
//! │  Parcel toggle           set_order_type(Parcel)       totals unchanged  │
//! │  Bill saved              Order::new()                 empty, dine-in    │
//! │                                                                         │
//! │  Unknown line ids are ignored: the same order comes back.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `subtotal` and `total` are private and only written by
//! [`Order::with_items`], which every line-changing operation goes through.
//! They always equal the pricing engine's results for the current lines.

use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::pricing::{order_subtotal, order_total};
use crate::types::{MenuItem, NewBill, OrderLine, OrderLineAddOn, OrderType, Portion};

/// An order being built at the counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Order {
    items: Vec<OrderLine>,
    order_type: OrderType,
    subtotal: Money,
    total: Money,
}

/// Creates an empty dine-in order.
pub fn create_empty_order() -> Order {
    Order::new()
}

impl Order {
    /// Creates an empty dine-in order with zero totals.
    pub fn new() -> Self {
        Order::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.items.iter().find(|line| line.id == line_id)
    }

    /// Sum of line quantities (what the cart badge shows).
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds a menu item to the order.
    ///
    /// ## Behavior
    /// - Price is the half price for a half portion when the item has one,
    ///   otherwise the full price
    /// - An item that cannot take add-ons merges into an existing line with
    ///   the same item and portion (quantity + 1)
    /// - Anything else becomes a new line with quantity 1
    /// - Add-ons with quantity 0 are dropped
    pub fn add_item(
        &self,
        menu_item: &MenuItem,
        portion: Option<Portion>,
        add_ons: Vec<OrderLineAddOn>,
    ) -> Order {
        let mut items = self.items.clone();

        if !menu_item.has_add_ons {
            if let Some(existing) = items
                .iter_mut()
                .find(|line| line.menu_item_id == menu_item.id && line.portion == portion)
            {
                existing.quantity += 1;
                return self.with_items(items);
            }
        }

        items.push(OrderLine {
            id: Uuid::new_v4().to_string(),
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            category: menu_item.category,
            portion,
            quantity: 1,
            base_price: menu_item.price_for(portion),
            add_ons,
        });

        self.with_items(items)
    }

    /// Sets a line's quantity. Zero or below removes the line.
    pub fn update_quantity(&self, line_id: &str, quantity: i64) -> Order {
        if quantity <= 0 {
            return self.remove_line(line_id);
        }
        if self.line(line_id).is_none() {
            return self.clone();
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let items = self
            .items
            .iter()
            .map(|line| {
                if line.id == line_id {
                    OrderLine {
                        quantity,
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect();

        self.with_items(items)
    }

    /// Removes a line.
    pub fn remove_line(&self, line_id: &str) -> Order {
        if self.line(line_id).is_none() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .filter(|line| line.id != line_id)
            .cloned()
            .collect();

        self.with_items(items)
    }

    /// Sets the quantity of an add-on already on a line.
    ///
    /// Negative quantities clamp to 0, and an add-on at 0 is dropped from
    /// the line. Unknown line or add-on ids leave the order unchanged.
    pub fn update_add_on_quantity(&self, line_id: &str, add_on_id: &str, quantity: i64) -> Order {
        let known = self
            .line(line_id)
            .is_some_and(|line| line.add_ons.iter().any(|a| a.id == add_on_id));
        if !known {
            return self.clone();
        }

        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        let items = self
            .items
            .iter()
            .map(|line| {
                if line.id != line_id {
                    return line.clone();
                }
                let add_ons = line
                    .add_ons
                    .iter()
                    .map(|add_on| {
                        if add_on.id == add_on_id {
                            OrderLineAddOn {
                                quantity,
                                ..add_on.clone()
                            }
                        } else {
                            add_on.clone()
                        }
                    })
                    .collect();
                OrderLine {
                    add_ons,
                    ..line.clone()
                }
            })
            .collect();

        self.with_items(items)
    }

    /// Switches between parcel and dine-in. Totals are not affected.
    pub fn set_order_type(&self, order_type: OrderType) -> Order {
        Order {
            order_type,
            ..self.clone()
        }
    }

    /// Returns a fresh empty order (the state after a bill is saved).
    pub fn clear(&self) -> Order {
        Order::new()
    }

    /// What is left to bill once `billed` has been saved.
    ///
    /// Lines still identical to a billed line are dropped. A billed line whose
    /// quantity grew since (same add-ons) keeps only the extra quantity. Lines
    /// added or otherwise edited after `billed` was taken stay as they are.
    /// When nothing is left the result is a fresh empty order.
    pub fn without_billed(&self, billed: &Order) -> Order {
        if self == billed {
            return self.clear();
        }

        let items: Vec<OrderLine> = self
            .items
            .iter()
            .filter_map(|line| match billed.line(&line.id) {
                None => Some(line.clone()),
                Some(sold) if sold == line => None,
                Some(sold) if sold.add_ons == line.add_ons && line.quantity > sold.quantity => {
                    Some(OrderLine {
                        quantity: line.quantity - sold.quantity,
                        ..line.clone()
                    })
                }
                Some(_) => Some(line.clone()),
            })
            .collect();

        if items.is_empty() {
            self.clear()
        } else {
            self.with_items(items)
        }
    }

    // =========================================================================
    // Recompute
    // =========================================================================

    /// The single place totals are written. Also strips zero-quantity
    /// add-ons so they never reach a bill.
    fn with_items(&self, mut items: Vec<OrderLine>) -> Order {
        for line in &mut items {
            line.add_ons.retain(|add_on| add_on.quantity > 0);
        }

        Order {
            subtotal: order_subtotal(&items),
            total: order_total(&items),
            order_type: self.order_type,
            items,
        }
    }
}

/// Deep copy of the order for persistence.
impl From<&Order> for NewBill {
    fn from(order: &Order) -> Self {
        NewBill {
            order_type: order.order_type,
            items: order.items.clone(),
            subtotal: order.subtotal,
            total: order.total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Menu;
    use crate::pricing;

    fn menu() -> Menu {
        Menu::default()
    }

    fn assert_totals_consistent(order: &Order) {
        assert_eq!(order.subtotal(), pricing::order_subtotal(order.items()));
        assert_eq!(order.total(), pricing::order_total(order.items()));
    }

    #[test]
    fn test_empty_order() {
        let order = create_empty_order();
        assert!(order.is_empty());
        assert_eq!(order.order_type(), OrderType::DineIn);
        assert!(order.subtotal().is_zero());
        assert!(order.total().is_zero());
    }

    #[test]
    fn test_simple_items_merge() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();

        let order = Order::new()
            .add_item(tea, None, vec![])
            .add_item(tea, None, vec![])
            .add_item(tea, None, vec![]);

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity, 3);
        assert_eq!(order.total().rupees(), 45);
        assert_totals_consistent(&order);
    }

    #[test]
    fn test_items_with_add_ons_never_merge() {
        let menu = menu();
        let biryani = menu.item("chicken_biryani").unwrap();

        let order = Order::new()
            .add_item(biryani, Some(Portion::Full), vec![])
            .add_item(biryani, Some(Portion::Full), vec![]);

        assert_eq!(order.items().len(), 2);
        assert!(order.items().iter().all(|l| l.quantity == 1));
        assert_ne!(order.items()[0].id, order.items()[1].id);
    }

    #[test]
    fn test_biryani_with_raita_totals_200() {
        let menu = menu();
        let biryani = menu.item("chicken_biryani").unwrap();
        let raita = menu.add_on("raita").unwrap().select(1);

        let order = Order::new().add_item(biryani, Some(Portion::Full), vec![raita]);

        assert_eq!(order.items()[0].line_total().rupees(), 200);
        assert_eq!(order.subtotal().rupees(), 200);
        assert_eq!(order.total().rupees(), 200);
    }

    #[test]
    fn test_half_portion_price() {
        let menu = menu();
        let biryani = menu.item("mutton_biryani").unwrap();

        let order = Order::new().add_item(biryani, Some(Portion::Half), vec![]);
        assert_eq!(order.items()[0].base_price.rupees(), 140);
        assert_eq!(order.items()[0].display_name(), "Mutton Biryani (Half)");
    }

    #[test]
    fn test_add_item_leaves_original_untouched() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();

        let original = Order::new().add_item(tea, None, vec![]);
        let snapshot = original.clone();
        let _next = original.add_item(tea, None, vec![]);

        assert_eq!(original, snapshot);
        assert_eq!(original.items()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity() {
        let menu = menu();
        let samosa = menu.item("samosa").unwrap();
        let order = Order::new().add_item(samosa, None, vec![]);
        let line_id = order.items()[0].id.clone();

        let order = order.update_quantity(&line_id, 4);
        assert_eq!(order.items()[0].quantity, 4);
        assert_eq!(order.total().rupees(), 60);
        assert_totals_consistent(&order);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new().add_item(tea, None, vec![]);
        let line_id = order.items()[0].id.clone();

        assert!(order.update_quantity(&line_id, 0).is_empty());
        assert!(order.update_quantity(&line_id, -2).is_empty());
        assert_eq!(
            order.update_quantity(&line_id, 0),
            order.remove_line(&line_id)
        );
    }

    #[test]
    fn test_unknown_line_is_noop() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new().add_item(tea, None, vec![]);

        assert_eq!(order.update_quantity("nope", 5), order);
        assert_eq!(order.remove_line("nope"), order);
        assert_eq!(order.update_add_on_quantity("nope", "raita", 2), order);
    }

    #[test]
    fn test_update_add_on_quantity_clamps_and_strips() {
        let menu = menu();
        let biryani = menu.item("chicken_biryani").unwrap();
        let raita = menu.add_on("raita").unwrap().select(1);
        let order = Order::new().add_item(biryani, Some(Portion::Full), vec![raita]);
        let line_id = order.items()[0].id.clone();

        let more = order.update_add_on_quantity(&line_id, "raita", 3);
        assert_eq!(more.items()[0].add_ons[0].quantity, 3);
        assert_eq!(more.total().rupees(), 240);

        let gone = order.update_add_on_quantity(&line_id, "raita", -1);
        assert!(gone.items()[0].add_ons.is_empty());
        assert_eq!(gone.total().rupees(), 180);
        assert_totals_consistent(&gone);
    }

    #[test]
    fn test_zero_quantity_add_ons_dropped_on_add() {
        let menu = menu();
        let biryani = menu.item("veg_biryani").unwrap();
        let none = menu.add_on("extra_rice").unwrap().select(0);

        let order = Order::new().add_item(biryani, Some(Portion::Full), vec![none]);
        assert!(order.items()[0].add_ons.is_empty());
    }

    #[test]
    fn test_set_order_type_keeps_totals() {
        let menu = menu();
        let lassi = menu.item("lassi").unwrap();
        let order = Order::new().add_item(lassi, None, vec![]);

        let parcel = order.set_order_type(OrderType::Parcel);
        assert_eq!(parcel.order_type(), OrderType::Parcel);
        assert_eq!(parcel.total(), order.total());
        assert_eq!(parcel.items(), order.items());
    }

    #[test]
    fn test_order_type_survives_line_changes() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new()
            .set_order_type(OrderType::Parcel)
            .add_item(tea, None, vec![]);
        assert_eq!(order.order_type(), OrderType::Parcel);
    }

    #[test]
    fn test_clear() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new()
            .set_order_type(OrderType::Parcel)
            .add_item(tea, None, vec![]);

        let cleared = order.clear();
        assert!(cleared.is_empty());
        assert_eq!(cleared.order_type(), OrderType::DineIn);
    }

    #[test]
    fn test_without_billed_same_order_clears() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new()
            .set_order_type(OrderType::Parcel)
            .add_item(tea, None, vec![]);

        let rest = order.without_billed(&order);
        assert!(rest.is_empty());
        assert_eq!(rest.order_type(), OrderType::DineIn);
    }

    #[test]
    fn test_without_billed_keeps_later_lines() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let coffee = menu.item("coffee").unwrap();
        let billed = Order::new().add_item(tea, None, vec![]);

        let current = billed.add_item(coffee, None, vec![]);
        let rest = current.without_billed(&billed);

        assert_eq!(rest.items().len(), 1);
        assert_eq!(rest.items()[0].name, "Coffee");
        assert_eq!(rest.total().rupees(), 20);
        assert_totals_consistent(&rest);
    }

    #[test]
    fn test_without_billed_keeps_extra_quantity() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let billed = Order::new().add_item(tea, None, vec![]);

        let current = billed.add_item(tea, None, vec![]).add_item(tea, None, vec![]);
        let rest = current.without_billed(&billed);

        assert_eq!(rest.items().len(), 1);
        assert_eq!(rest.items()[0].quantity, 2);
        assert_eq!(rest.total().rupees(), 30);
    }

    #[test]
    fn test_new_bill_is_deep_copy() {
        let menu = menu();
        let tea = menu.item("tea").unwrap();
        let order = Order::new().add_item(tea, None, vec![]);

        let bill = NewBill::from(&order);
        let order = order.update_quantity(&order.items()[0].id.clone(), 5);

        assert_eq!(bill.items[0].quantity, 1);
        assert_eq!(bill.total.rupees(), 15);
        assert_eq!(order.items()[0].quantity, 5);
    }
}
