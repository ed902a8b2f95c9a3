//! # Order Commands
//!
//! Commands for building the order at the counter.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Building │────►│  Saved   │────►│ Printed  │       │
//! │  │  Order   │     │          │     │   Bill   │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                 │                              │
//! │       │           add_item          generate_bill                      │
//! │       │           update_quantity   (bill.rs)                          │
//! │       │           remove_line            │                              │
//! │       │                │                 │                              │
//! │       │                ▼                 │                              │
//! │       └──────────  clear_order ◄─────────┘ (cleared after save)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use annabill_core::menu::Menu;
use annabill_core::order::Order;
use annabill_core::validation::{validate_add_on_quantity, validate_quantity};
use annabill_core::{
    AddOnDefinition, CoreError, MenuItem, Money, OrderLine, OrderType, Portion, MAX_LINE_QUANTITY,
    MAX_ORDER_LINES,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::OrderState;

/// Order as shown in the cart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub items: Vec<OrderLine>,
    pub order_type: OrderType,
    pub subtotal: Money,
    pub total: Money,
    pub item_count: u32,

    /// Total formatted for the "Generate Bill" button, e.g. `₹245`.
    pub total_display: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            items: order.items().to_vec(),
            order_type: order.order_type(),
            subtotal: order.subtotal(),
            total: order.total(),
            item_count: order.item_count(),
            total_display: order.total().to_string(),
        }
    }
}

/// One add-on picked in the add-on sheet.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOnPick {
    pub add_on_id: String,
    pub quantity: u32,
}

/// Tap on a menu tile, with the portion and add-ons chosen for it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub menu_item_id: String,

    /// Only for items with portions. Defaults to full.
    #[serde(default)]
    pub portion: Option<Portion>,

    #[serde(default)]
    pub add_ons: Vec<AddOnPick>,
}

/// Menu grid contents.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub items: Vec<MenuItem>,
    pub add_ons: Vec<AddOnDefinition>,
}

/// Gets the current order.
pub fn get_order(order: &OrderState) -> OrderResponse {
    debug!("get_order command");
    order.with_order(|o| OrderResponse::from(o))
}

/// Lists the menu and add-ons.
pub fn list_menu(menu: &Menu) -> MenuResponse {
    MenuResponse {
        items: menu.items().to_vec(),
        add_ons: menu.add_ons().to_vec(),
    }
}

/// Add-ons offered for one menu item (empty when it takes none).
pub fn add_ons_for_item(menu: &Menu, menu_item_id: &str) -> Result<Vec<AddOnDefinition>, ApiError> {
    menu.require_item(menu_item_id)?;
    Ok(menu.add_ons_for(menu_item_id).into_iter().cloned().collect())
}

/// Adds a menu item to the order.
///
/// ## Behavior
/// - Items without add-ons merge into an existing line of the same portion
/// - Items with add-ons always start a new line
/// - Zero-quantity add-on picks are dropped
///
/// ## Errors
/// - `NOT_FOUND`: unknown menu item or add-on
/// - `VALIDATION_ERROR`: portion on an item without portions, add-on not
///   offered for the item, quantity out of range, order too long
pub fn add_item(
    menu: &Menu,
    order: &OrderState,
    request: AddItemRequest,
) -> Result<OrderResponse, ApiError> {
    debug!(menu_item_id = %request.menu_item_id, "add_item command");

    let item = menu.require_item(&request.menu_item_id)?;
    let portion = match (item.has_portions, request.portion) {
        (true, portion) => Some(portion.unwrap_or(Portion::Full)),
        (false, None) => None,
        (false, Some(_)) => {
            return Err(ApiError::validation(format!(
                "{} is not sold in portions",
                item.name
            )))
        }
    };

    let mut picks = Vec::with_capacity(request.add_ons.len());
    for pick in request.add_ons {
        validate_add_on_quantity(i64::from(pick.quantity))?;
        picks.push((pick.add_on_id, pick.quantity));
    }
    let add_ons = menu.resolve_add_ons(item, &picks)?;

    let updated = order.update(|current| {
        let next = current.add_item(item, portion, add_ons);
        if next.items().len() > MAX_ORDER_LINES {
            return Err(ApiError::from(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            }));
        }
        if next
            .items()
            .iter()
            .any(|line| i64::from(line.quantity) > MAX_LINE_QUANTITY)
        {
            return Err(ApiError::validation(format!(
                "Quantity cannot exceed {}",
                MAX_LINE_QUANTITY
            )));
        }
        Ok(next)
    })?;

    Ok(OrderResponse::from(&updated))
}

/// Sets a line's quantity. Zero or below removes the line.
pub fn update_quantity(
    order: &OrderState,
    line_id: &str,
    quantity: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id, quantity, "update_quantity command");
    if quantity > 0 {
        validate_quantity(quantity)?;
    }
    let updated = order.update::<_, ApiError>(|o| Ok(o.update_quantity(line_id, quantity)))?;
    Ok(OrderResponse::from(&updated))
}

/// Removes a line.
pub fn remove_line(order: &OrderState, line_id: &str) -> OrderResponse {
    debug!(line_id, "remove_line command");
    let updated = apply(order, |o| o.remove_line(line_id));
    OrderResponse::from(&updated)
}

/// Sets the quantity of an add-on on a line. Zero removes the add-on.
pub fn update_add_on_quantity(
    order: &OrderState,
    line_id: &str,
    add_on_id: &str,
    quantity: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id, add_on_id, quantity, "update_add_on_quantity command");
    if quantity > 0 {
        validate_add_on_quantity(quantity)?;
    }
    let updated = apply(order, |o| o.update_add_on_quantity(line_id, add_on_id, quantity));
    Ok(OrderResponse::from(&updated))
}

/// Switches between parcel and dine-in.
pub fn set_order_type(order: &OrderState, order_type: OrderType) -> OrderResponse {
    debug!(order_type = order_type.as_str(), "set_order_type command");
    let updated = apply(order, |o| o.set_order_type(order_type));
    OrderResponse::from(&updated)
}

/// Clears the order.
pub fn clear_order(order: &OrderState) -> OrderResponse {
    debug!("clear_order command");
    OrderResponse::from(&order.reset())
}

fn apply(order: &OrderState, f: impl FnOnce(&Order) -> Order) -> Order {
    match order.update::<_, std::convert::Infallible>(|o| Ok(f(o))) {
        Ok(updated) => updated,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn request(id: &str, portion: Option<Portion>, add_ons: &[(&str, u32)]) -> AddItemRequest {
        AddItemRequest {
            menu_item_id: id.to_string(),
            portion,
            add_ons: add_ons
                .iter()
                .map(|(id, q)| AddOnPick {
                    add_on_id: id.to_string(),
                    quantity: *q,
                })
                .collect(),
        }
    }

    #[test]
    fn test_add_item_with_add_ons() {
        let menu = Menu::default();
        let order = OrderState::new();

        let response = add_item(
            &menu,
            &order,
            request("chicken_biryani", Some(Portion::Full), &[("raita", 1), ("egg", 0)]),
        )
        .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].add_ons.len(), 1);
        assert_eq!(response.total.rupees(), 200);
        assert_eq!(response.total_display, "₹200");
    }

    #[test]
    fn test_add_item_merges_plain_items() {
        let menu = Menu::default();
        let order = OrderState::new();
        add_item(&menu, &order, request("tea", None, &[])).unwrap();
        let response = add_item(&menu, &order, request("tea", None, &[])).unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].quantity, 2);
        assert_eq!(response.item_count, 2);
    }

    #[test]
    fn test_portion_defaults_to_full() {
        let menu = Menu::default();
        let order = OrderState::new();
        let response = add_item(&menu, &order, request("veg_biryani", None, &[])).unwrap();
        assert_eq!(response.items[0].portion, Some(Portion::Full));
    }

    #[test]
    fn test_add_item_rejections_leave_order_unchanged() {
        let menu = Menu::default();
        let order = OrderState::new();
        add_item(&menu, &order, request("tea", None, &[])).unwrap();
        let before = get_order(&order);

        let err = add_item(&menu, &order, request("dosa", None, &[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = add_item(&menu, &order, request("tea", Some(Portion::Half), &[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_item(&menu, &order, request("tea", None, &[("raita", 1)])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(get_order(&order), before);
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let menu = Menu::default();
        let order = OrderState::new();
        let response = add_item(&menu, &order, request("samosa", None, &[])).unwrap();
        let line_id = response.items[0].id.clone();

        let response = update_quantity(&order, &line_id, 4).unwrap();
        assert_eq!(response.total.rupees(), 60);

        let err = update_quantity(&order, &line_id, 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let response = update_quantity(&order, &line_id, 0).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_unknown_line_is_ignored() {
        let order = OrderState::new();
        let response = update_quantity(&order, "missing", 3).unwrap();
        assert!(response.items.is_empty());
        assert!(remove_line(&order, "missing").items.is_empty());
    }

    #[test]
    fn test_add_on_quantity_zero_removes_add_on() {
        let menu = Menu::default();
        let order = OrderState::new();
        let response = add_item(
            &menu,
            &order,
            request("chicken_biryani", Some(Portion::Half), &[("egg", 2)]),
        )
        .unwrap();
        let line_id = response.items[0].id.clone();
        let with_eggs = response.total;

        let response = update_add_on_quantity(&order, &line_id, "egg", 0).unwrap();
        assert!(response.items[0].add_ons.is_empty());
        assert!(response.total < with_eggs);
    }

    #[test]
    fn test_order_type_and_clear() {
        let menu = Menu::default();
        let order = OrderState::new();
        add_item(&menu, &order, request("lassi", None, &[])).unwrap();

        let response = set_order_type(&order, OrderType::Parcel);
        assert_eq!(response.order_type, OrderType::Parcel);
        assert_eq!(response.total.rupees(), 30);

        let response = clear_order(&order);
        assert!(response.items.is_empty());
        assert_eq!(response.order_type, OrderType::DineIn);
    }

    #[test]
    fn test_menu_listing() {
        let menu = Menu::default();
        let response = list_menu(&menu);
        assert_eq!(response.items.len(), menu.items().len());
        assert!(add_ons_for_item(&menu, "tea").unwrap().is_empty());
        assert!(!add_ons_for_item(&menu, "chicken_biryani").unwrap().is_empty());
        assert!(add_ons_for_item(&menu, "dosa").is_err());
    }
}
