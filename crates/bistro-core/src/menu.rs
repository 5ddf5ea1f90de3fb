//! # Menu Coordinator
//!
//! Owns one [`ProductConfigurator`] per catalog entry and the single-open
//! accordion state.
//!
//! ## Accordion State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  active: Option<ProductId>                                              │
//! │                                                                         │
//! │  toggle(X) when active == None      → active = X     (X expanded)       │
//! │  toggle(X) when active == X         → active = None  (X collapsed)      │
//! │  toggle(X) when active == Y (Y ≠ X) → active = X     (Y collapsed,      │
//! │                                                       X expanded)       │
//! │                                                                         │
//! │  Invariant: at most one configurator is Expanded, and it is `active`.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::catalog::{Catalog, ProductId};
use crate::config::EngineConfig;
use crate::configurator::{Disclosure, ProductConfigurator};
use crate::error::{CoreError, CoreResult};

/// Result of one accordion toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccordionTransition {
    pub collapsed: Option<ProductId>,
    pub expanded: Option<ProductId>,
}

/// The rendered menu.
#[derive(Debug)]
pub struct MenuCoordinator {
    configurators: Vec<ProductConfigurator>,
    active: Option<ProductId>,
}

impl MenuCoordinator {
    /// Creates one configurator per product, in catalog order.
    pub fn from_catalog(catalog: &Catalog, config: &EngineConfig) -> Self {
        let configurators: Vec<_> = catalog
            .products()
            .iter()
            .cloned()
            .map(|definition| ProductConfigurator::new(definition, config))
            .collect();

        info!(products = configurators.len(), "Menu ready");

        MenuCoordinator {
            configurators,
            active: None,
        }
    }

    pub fn configurators(&self) -> &[ProductConfigurator] {
        &self.configurators
    }

    pub fn configurator(&self, id: &ProductId) -> Option<&ProductConfigurator> {
        self.configurators.iter().find(|c| c.id() == id)
    }

    pub fn configurator_mut(&mut self, id: &ProductId) -> CoreResult<&mut ProductConfigurator> {
        self.configurators
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.clone()))
    }

    /// The currently expanded product, if any.
    pub fn active(&self) -> Option<&ProductId> {
        self.active.as_ref()
    }

    /// Activates (or deactivates) a product's detail view.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::catalog::{Catalog, ProductDefinition};
    /// use bistro_core::config::EngineConfig;
    /// use bistro_core::menu::MenuCoordinator;
    /// use bistro_core::Money;
    ///
    /// let product = |id: &str| ProductDefinition {
    ///     id: id.into(),
    ///     name: id.to_string(),
    ///     price: Money::from_major(9),
    ///     description: None,
    ///     params: Default::default(),
    /// };
    /// let catalog = Catalog::new(vec![product("cake"), product("salad")]).unwrap();
    /// let mut menu = MenuCoordinator::from_catalog(&catalog, &EngineConfig::default());
    ///
    /// menu.toggle(&"cake".into()).unwrap();
    /// let step = menu.toggle(&"salad".into()).unwrap();
    /// assert_eq!(step.collapsed, Some("cake".into()));
    /// assert_eq!(menu.active(), Some(&"salad".into()));
    /// ```
    pub fn toggle(&mut self, id: &ProductId) -> CoreResult<AccordionTransition> {
        if self.configurator(id).is_none() {
            return Err(CoreError::ProductNotFound(id.clone()));
        }

        let transition = match self.active.take() {
            Some(current) if &current == id => AccordionTransition {
                collapsed: Some(current),
                expanded: None,
            },
            previous => AccordionTransition {
                collapsed: previous,
                expanded: Some(id.clone()),
            },
        };

        if let Some(collapsed) = &transition.collapsed {
            self.configurator_mut(collapsed)?
                .set_disclosure(Disclosure::Collapsed);
        }
        if let Some(expanded) = &transition.expanded {
            self.configurator_mut(expanded)?
                .set_disclosure(Disclosure::Expanded);
        }
        self.active = transition.expanded.clone();

        debug!(
            collapsed = ?transition.collapsed,
            expanded = ?transition.expanded,
            "Accordion toggled"
        );
        Ok(transition)
    }

    /// Collapses whatever is open.
    pub fn collapse_all(&mut self) -> Option<ProductId> {
        let current = self.active.take()?;
        if let Ok(configurator) = self.configurator_mut(&current) {
            configurator.set_disclosure(Disclosure::Collapsed);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{pizza, salad};
    use crate::configurator::ConfiguratorEvent;
    use proptest::prelude::*;

    fn menu() -> MenuCoordinator {
        let catalog = Catalog::new(vec![pizza(), salad()]).unwrap();
        MenuCoordinator::from_catalog(&catalog, &EngineConfig::default())
    }

    fn expanded(menu: &MenuCoordinator) -> Vec<&ProductId> {
        menu.configurators()
            .iter()
            .filter(|c| c.is_expanded())
            .map(|c| c.id())
            .collect()
    }

    #[test]
    fn test_starts_collapsed() {
        let menu = menu();
        assert_eq!(menu.configurators().len(), 2);
        assert!(menu.active().is_none());
        assert!(expanded(&menu).is_empty());
    }

    #[test]
    fn test_expanding_b_collapses_a() {
        let mut menu = menu();
        let pizza_id = ProductId::from("pizza");
        let salad_id = ProductId::from("salad");

        menu.toggle(&pizza_id).unwrap();
        assert_eq!(expanded(&menu), vec![&pizza_id]);

        let step = menu.toggle(&salad_id).unwrap();
        assert_eq!(step.collapsed, Some(pizza_id.clone()));
        assert_eq!(step.expanded, Some(salad_id.clone()));
        assert_eq!(expanded(&menu), vec![&salad_id]);
    }

    #[test]
    fn test_toggling_active_collapses_it() {
        let mut menu = menu();
        let pizza_id = ProductId::from("pizza");

        menu.toggle(&pizza_id).unwrap();
        let step = menu.toggle(&pizza_id).unwrap();

        assert_eq!(step.collapsed, Some(pizza_id));
        assert_eq!(step.expanded, None);
        assert!(menu.active().is_none());
        assert!(expanded(&menu).is_empty());
    }

    #[test]
    fn test_both_configurators_are_notified() {
        let mut menu = menu();
        let pizza_id = ProductId::from("pizza");
        let salad_id = ProductId::from("salad");
        menu.toggle(&pizza_id).unwrap();

        let pizza_events = menu.configurator_mut(&pizza_id).unwrap().subscribe();
        let salad_events = menu.configurator_mut(&salad_id).unwrap().subscribe();
        menu.toggle(&salad_id).unwrap();

        assert_eq!(
            pizza_events.drain(),
            vec![ConfiguratorEvent::DisclosureChanged {
                product: pizza_id,
                state: Disclosure::Collapsed
            }]
        );
        assert_eq!(
            salad_events.drain(),
            vec![ConfiguratorEvent::DisclosureChanged {
                product: salad_id,
                state: Disclosure::Expanded
            }]
        );
    }

    #[test]
    fn test_unknown_product() {
        let mut menu = menu();
        menu.toggle(&ProductId::from("pizza")).unwrap();

        assert!(matches!(
            menu.toggle(&ProductId::from("cake")),
            Err(CoreError::ProductNotFound(_))
        ));
        assert_eq!(menu.active(), Some(&ProductId::from("pizza")));
    }

    #[test]
    fn test_collapse_all() {
        let mut menu = menu();
        menu.toggle(&ProductId::from("salad")).unwrap();
        assert_eq!(menu.collapse_all(), Some(ProductId::from("salad")));
        assert!(expanded(&menu).is_empty());
        assert_eq!(menu.collapse_all(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of toggles, at most one configurator
        /// is expanded and it is the active one.
        #[test]
        fn at_most_one_expanded(toggles in prop::collection::vec(0usize..2, 0..20)) {
            let mut menu = menu();
            let ids = [ProductId::from("pizza"), ProductId::from("salad")];

            for index in toggles {
                menu.toggle(&ids[index]).unwrap();

                let open = expanded(&menu);
                prop_assert!(open.len() <= 1);
                prop_assert_eq!(open.first().copied(), menu.active());
            }
        }
    }
}
