//! # Pricing Engine
//!
//! Line totals, order totals and the strings the counter shows for them.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line_total     = base × qty + Σ(add_on.price × add_on.qty)   exact    │
//! │  order_subtotal = Σ line_total                                 exact    │
//! │  order_total    = round_half_up(order_subtotal) to ₹1          ROUNDED  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module can fail.

use crate::money::Money;
use crate::types::{OrderLine, OrderLineAddOn};

/// Total for one line, add-ons included. Not rounded.
///
/// ## Example
/// ```rust
/// use annabill_core::menu::Menu;
/// use annabill_core::order::Order;
/// use annabill_core::pricing::line_total;
/// use annabill_core::types::Portion;
///
/// let menu = Menu::default();
/// let biryani = menu.item("chicken_biryani").unwrap();
/// let raita = menu.add_on("raita").unwrap().select(1);
/// let order = Order::new().add_item(biryani, Some(Portion::Full), vec![raita]);
///
/// assert_eq!(line_total(&order.items()[0]).rupees(), 200);
/// ```
pub fn line_total(line: &OrderLine) -> Money {
    let add_ons: Money = line
        .add_ons
        .iter()
        .map(|add_on| add_on.price * add_on.quantity)
        .sum();
    line.base_price * line.quantity + add_ons
}

/// Sum of line totals. Not rounded.
pub fn order_subtotal(lines: &[OrderLine]) -> Money {
    lines.iter().map(line_total).sum()
}

/// Subtotal rounded half up to whole rupees.
pub fn order_total(lines: &[OrderLine]) -> Money {
    order_subtotal(lines).round_to_rupee()
}

/// Name with portion label: `Chicken Biryani (Half)`, or the bare name.
pub fn display_name(line: &OrderLine) -> String {
    match line.portion {
        Some(portion) => format!("{} ({})", line.name, portion.label()),
        None => line.name.clone(),
    }
}

/// `₹` followed by whole rupees, no decimals.
pub fn format_currency(amount: Money) -> String {
    amount.to_string()
}

/// One `+ Name` line per selected add-on, `×q` shown only above one.
///
/// Returns an empty string when nothing is selected.
pub fn add_ons_summary(add_ons: &[OrderLineAddOn]) -> String {
    add_ons
        .iter()
        .filter(|add_on| add_on.quantity > 0)
        .map(|add_on| {
            if add_on.quantity > 1 {
                format!("+ {} ×{}", add_on.name, add_on.quantity)
            } else {
                format!("+ {}", add_on.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Portion};

    fn line(name: &str, base: i64, qty: u32, add_ons: Vec<OrderLineAddOn>) -> OrderLine {
        OrderLine {
            id: format!("line-{name}"),
            menu_item_id: name.to_lowercase(),
            name: name.to_string(),
            category: Category::Biryani,
            portion: None,
            quantity: qty,
            base_price: Money::from_paise(base),
            add_ons,
        }
    }

    fn add_on(name: &str, price: i64, qty: u32) -> OrderLineAddOn {
        OrderLineAddOn {
            id: name.to_lowercase(),
            name: name.to_string(),
            price: Money::from_paise(price),
            quantity: qty,
        }
    }

    #[test]
    fn test_line_total_with_add_ons() {
        let l = line(
            "Chicken Biryani",
            18000,
            2,
            vec![add_on("Raita", 2000, 1), add_on("Egg", 1500, 2)],
        );
        // 180×2 + 20×1 + 15×2
        assert_eq!(line_total(&l).rupees(), 410);
    }

    #[test]
    fn test_zero_quantity_add_on_contributes_nothing() {
        let l = line("Veg Biryani", 12000, 1, vec![add_on("Raita", 2000, 0)]);
        assert_eq!(line_total(&l).rupees(), 120);
    }

    #[test]
    fn test_empty_order_totals() {
        assert!(order_subtotal(&[]).is_zero());
        assert!(order_total(&[]).is_zero());
    }

    #[test]
    fn test_total_rounds_half_up_only_at_order_level() {
        let lines = vec![line("A", 10025, 1, vec![]), line("B", 10025, 1, vec![])];
        assert_eq!(order_subtotal(&lines).paise(), 20050);
        assert_eq!(order_total(&lines).paise(), 20100);

        let lines = vec![line("A", 10049, 1, vec![])];
        assert_eq!(order_total(&lines).paise(), 10000);
    }

    #[test]
    fn test_display_name() {
        let mut l = line("Chicken Biryani", 10000, 1, vec![]);
        assert_eq!(display_name(&l), "Chicken Biryani");
        l.portion = Some(Portion::Half);
        assert_eq!(display_name(&l), "Chicken Biryani (Half)");
        l.portion = Some(Portion::Full);
        assert_eq!(display_name(&l), "Chicken Biryani (Full)");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_rupees(200)), "₹200");
        assert_eq!(format_currency(Money::zero()), "₹0");
    }

    #[test]
    fn test_add_ons_summary() {
        let add_ons = vec![
            add_on("Raita", 2000, 1),
            add_on("Extra Rice", 3000, 0),
            add_on("Egg", 1500, 2),
        ];
        assert_eq!(add_ons_summary(&add_ons), "+ Raita\n+ Egg ×2");
        assert_eq!(add_ons_summary(&[]), "");
    }
}
