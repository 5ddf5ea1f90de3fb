//! # Selection State
//!
//! Which options the user currently has ticked, per parameter.
//!
//! A selection is a plain snapshot of form input: parameter id → set of
//! option ids. It holds no prices and no reference to the product; pricing
//! reads it together with a [`ProductDefinition`] at computation time.
//! Multiple options per parameter are allowed even for `radios`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{OptionId, ParamId, ProductDefinition};

/// Snapshot of selected option ids, grouped by parameter id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    selected: BTreeMap<ParamId, BTreeSet<OptionId>>,
}

impl Selection {
    /// Creates an empty selection (nothing ticked).
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection a freshly rendered form shows: every default option.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::catalog::ProductDefinition;
    /// use bistro_core::selection::Selection;
    ///
    /// let product: ProductDefinition = serde_json::from_str(r#"{
    ///     "id": "cake", "name": "Cake", "price": 900,
    ///     "params": { "size": { "label": "Size", "options": {
    ///         "small": { "label": "Small", "default": true },
    ///         "large": { "label": "Large", "price": 300 } } } }
    /// }"#).unwrap();
    ///
    /// let selection = Selection::defaults_for(&product);
    /// assert!(selection.is_selected(&"size".into(), &"small".into()));
    /// assert!(!selection.is_selected(&"size".into(), &"large".into()));
    /// ```
    pub fn defaults_for(product: &ProductDefinition) -> Self {
        let mut selection = Self::new();
        for (param_id, param) in &product.params {
            for option_id in param.default_options() {
                selection.select(param_id.clone(), option_id.clone());
            }
        }
        selection
    }

    pub fn is_selected(&self, param: &ParamId, option: &OptionId) -> bool {
        self.selected
            .get(param)
            .is_some_and(|options| options.contains(option))
    }

    /// Ticks an option. Returns `false` if it was already ticked.
    pub fn select(&mut self, param: ParamId, option: OptionId) -> bool {
        self.selected.entry(param).or_default().insert(option)
    }

    /// Unticks an option. Returns `false` if it was not ticked.
    pub fn deselect(&mut self, param: &ParamId, option: &OptionId) -> bool {
        let Some(options) = self.selected.get_mut(param) else {
            return false;
        };
        let removed = options.remove(option);
        if options.is_empty() {
            self.selected.remove(param);
        }
        removed
    }

    /// Flips an option. Returns whether it is ticked afterwards.
    pub fn toggle(&mut self, param: ParamId, option: OptionId) -> bool {
        if self.deselect(&param, &option) {
            false
        } else {
            self.select(param, option)
        }
    }

    /// Selected option ids of one parameter.
    pub fn selected(&self, param: &ParamId) -> impl Iterator<Item = &OptionId> {
        self.selected.get(param).into_iter().flatten()
    }

    /// Every `(param, option)` pair in the snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamId, &OptionId)> {
        self.selected
            .iter()
            .flat_map(|(param, options)| options.iter().map(move |option| (param, option)))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl<P, O> FromIterator<(P, O)> for Selection
where
    P: Into<ParamId>,
    O: Into<OptionId>,
{
    fn from_iter<I: IntoIterator<Item = (P, O)>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for (param, option) in iter {
            selection.select(param.into(), option.into());
        }
        selection
    }
}
