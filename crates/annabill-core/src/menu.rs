//! # Menu Catalog
//!
//! Read-only lookup over the outlet's menu items and add-ons.
//!
//! The catalog is configuration, not a database table: it is loaded once at
//! startup (or taken from [`Menu::default`]) and shared by reference.
//!
//! ## Lookup Flow
//! ```text
//! Menu grid tap "chicken_biryani"
//!      │
//!      ▼
//! menu.item("chicken_biryani") ──► &MenuItem
//!      │
//!      ▼
//! menu.add_ons_for("chicken_biryani") ──► Extra Rice, Extra Chicken, Raita, ...
//!      │
//!      ▼
//! menu.resolve_add_ons(item, &[("raita", 1)]) ──► Vec<OrderLineAddOn>
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{AddOnDefinition, Category, MenuItem, OrderLineAddOn};
use crate::validation::{validate_add_on, validate_menu_item};

/// The outlet's catalog of items and add-ons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    items: Vec<MenuItem>,
    add_ons: Vec<AddOnDefinition>,
}

impl Menu {
    /// Builds a catalog, validating every entry.
    pub fn new(items: Vec<MenuItem>, add_ons: Vec<AddOnDefinition>) -> CoreResult<Self> {
        for item in &items {
            validate_menu_item(item)?;
        }
        for add_on in &add_ons {
            validate_add_on(add_on)?;
        }
        Ok(Self { items, add_ons })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn add_ons(&self) -> &[AddOnDefinition] {
        &self.add_ons
    }

    /// Looks up a menu item by id.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Like [`Menu::item`] but reports a missing id as an error.
    pub fn require_item(&self, id: &str) -> CoreResult<&MenuItem> {
        self.item(id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))
    }

    /// Looks up an add-on by id.
    pub fn add_on(&self, id: &str) -> Option<&AddOnDefinition> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }

    /// Items of one category, in catalog order.
    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }

    /// Add-ons that can be attached to the given item. Empty for items
    /// without add-ons.
    pub fn add_ons_for(&self, menu_item_id: &str) -> Vec<&AddOnDefinition> {
        match self.item(menu_item_id) {
            Some(item) if item.has_add_ons => self
                .add_ons
                .iter()
                .filter(|add_on| add_on.applies_to(menu_item_id))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Turns `(add_on_id, quantity)` picks into priced order-line add-ons.
    ///
    /// Zero-quantity picks are dropped. Unknown or non-applicable add-ons
    /// are errors, so a line can never carry an add-on its item does not
    /// offer.
    pub fn resolve_add_ons(
        &self,
        item: &MenuItem,
        picks: &[(String, u32)],
    ) -> CoreResult<Vec<OrderLineAddOn>> {
        let mut resolved = Vec::with_capacity(picks.len());

        for (add_on_id, quantity) in picks {
            let definition = self
                .add_on(add_on_id)
                .ok_or_else(|| CoreError::AddOnNotFound(add_on_id.clone()))?;

            if !item.has_add_ons || !definition.applies_to(&item.id) {
                return Err(CoreError::AddOnNotApplicable {
                    add_on_id: add_on_id.clone(),
                    menu_item_id: item.id.clone(),
                });
            }

            if *quantity > 0 {
                resolved.push(definition.select(*quantity));
            }
        }

        Ok(resolved)
    }
}

// =============================================================================
// Default Catalog
// =============================================================================

const ALL_BIRYANIS: [&str; 4] = [
    "chicken_biryani",
    "mutton_biryani",
    "veg_biryani",
    "egg_biryani",
];

fn simple(id: &str, name: &str, category: Category, price: i64) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        category,
        full_price: Money::from_rupees(price),
        half_price: None,
        has_portions: false,
        has_add_ons: false,
    }
}

fn biryani(id: &str, name: &str, full: i64, half: i64) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        category: Category::Biryani,
        full_price: Money::from_rupees(full),
        half_price: Some(Money::from_rupees(half)),
        has_portions: true,
        has_add_ons: true,
    }
}

fn add_on(id: &str, name: &str, price: i64, applicable_to: &[&str]) -> AddOnDefinition {
    AddOnDefinition {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_rupees(price),
        applicable_to: applicable_to.iter().map(|s| s.to_string()).collect(),
    }
}

/// The outlet's standard menu.
impl Default for Menu {
    fn default() -> Self {
        let items = vec![
            simple("tea", "Tea", Category::Beverages, 15),
            simple("coffee", "Coffee", Category::Beverages, 20),
            simple("cold_coffee", "Cold Coffee", Category::Beverages, 40),
            simple("lassi", "Lassi", Category::Beverages, 30),
            simple("samosa", "Samosa", Category::Snacks, 15),
            simple("cutlet", "Cutlet", Category::Snacks, 20),
            simple("puff", "Veg Puff", Category::Snacks, 25),
            simple("pakora", "Pakora", Category::Snacks, 30),
            biryani("chicken_biryani", "Chicken Biryani", 180, 100),
            biryani("mutton_biryani", "Mutton Biryani", 250, 140),
            biryani("veg_biryani", "Veg Biryani", 120, 70),
            biryani("egg_biryani", "Egg Biryani", 140, 80),
        ];

        let add_ons = vec![
            add_on("extra_rice", "Extra Rice", 30, &ALL_BIRYANIS),
            add_on("extra_chicken", "Extra Chicken", 50, &["chicken_biryani"]),
            add_on("extra_mutton", "Extra Mutton", 70, &["mutton_biryani"]),
            add_on("raita", "Raita", 20, &ALL_BIRYANIS),
            add_on("gravy", "Extra Gravy", 25, &ALL_BIRYANIS),
            add_on(
                "egg",
                "Egg",
                15,
                &["chicken_biryani", "mutton_biryani", "veg_biryani"],
            ),
        ];

        Self { items, add_ons }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_is_valid() {
        let menu = Menu::default();
        assert!(Menu::new(menu.items().to_vec(), menu.add_ons().to_vec()).is_ok());
        assert_eq!(menu.items().len(), 12);
    }

    #[test]
    fn test_item_lookup() {
        let menu = Menu::default();
        assert_eq!(menu.item("puff").unwrap().name, "Veg Puff");
        assert!(menu.item("pizza").is_none());
        assert!(matches!(
            menu.require_item("pizza"),
            Err(CoreError::MenuItemNotFound(_))
        ));
    }

    #[test]
    fn test_items_in_category() {
        let menu = Menu::default();
        let biryanis: Vec<_> = menu.items_in(Category::Biryani).collect();
        assert_eq!(biryanis.len(), 4);
        assert!(biryanis.iter().all(|item| item.has_portions));
    }

    #[test]
    fn test_add_ons_for_item() {
        let menu = Menu::default();

        let mutton: Vec<_> = menu
            .add_ons_for("mutton_biryani")
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert!(mutton.contains(&"extra_mutton"));
        assert!(!mutton.contains(&"extra_chicken"));

        let egg: Vec<_> = menu
            .add_ons_for("egg_biryani")
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert!(!egg.contains(&"egg"));

        assert!(menu.add_ons_for("tea").is_empty());
    }

    #[test]
    fn test_resolve_add_ons_drops_zero_quantity() {
        let menu = Menu::default();
        let item = menu.item("chicken_biryani").unwrap();
        let picks = vec![("raita".to_string(), 1), ("extra_rice".to_string(), 0)];

        let resolved = menu.resolve_add_ons(item, &picks).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "raita");
        assert_eq!(resolved[0].price.rupees(), 20);
    }

    #[test]
    fn test_resolve_add_ons_rejects_wrong_item() {
        let menu = Menu::default();
        let mutton = menu.item("mutton_biryani").unwrap();
        let err = menu
            .resolve_add_ons(mutton, &[("extra_chicken".to_string(), 1)])
            .unwrap_err();
        assert!(matches!(err, CoreError::AddOnNotApplicable { .. }));

        let tea = menu.item("tea").unwrap();
        assert!(menu.resolve_add_ons(tea, &[("raita".to_string(), 1)]).is_err());
        assert!(matches!(
            menu.resolve_add_ons(mutton, &[("cheese".to_string(), 1)]),
            Err(CoreError::AddOnNotFound(_))
        ));
    }
}
