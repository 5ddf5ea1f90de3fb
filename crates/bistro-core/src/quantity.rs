//! # Quantity Control
//!
//! A bounded integer stepper: the "− [ 2 ] +" widget next to every product
//! and every cart line.
//!
//! ## Acceptance Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_value(raw)                                                         │
//! │       │                                                                 │
//! │       ├── not numeric?          → Rejected(NotNumeric)     no event     │
//! │       ├── outside [min, max]?   → Rejected(OutOfRange)     no event     │
//! │       ├── equal to current?     → Unchanged                no event     │
//! │       └── otherwise             → Updated { previous, current }         │
//! │                                   + exactly one QuantityUpdated event   │
//! │                                                                         │
//! │  The control never clamps: 12 with max 9 is rejected, not set to 9.    │
//! │  After every call the displayed value is the last accepted value.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::config::QuantityBounds;
use crate::events::{Notifier, Subscription};
use crate::validation::{self, ValidationResult};

/// Notification raised when a new value is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdated {
    pub previous: i64,
    pub current: i64,
}

/// Why an input was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRejection {
    NotNumeric,
    OutOfRange { value: i64, min: i64, max: i64 },
}

/// Result of a quantity update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated(QuantityUpdated),
    Unchanged,
    Rejected(QuantityRejection),
}

impl QuantityOutcome {
    #[inline]
    pub fn is_updated(&self) -> bool {
        matches!(self, QuantityOutcome::Updated(_))
    }
}

/// Parses raw text the way a browser's `parseInt` does.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of ASCII digits; anything after it is ignored. No digits at all means
/// the input is not numeric. Values too large for `i64` saturate, so they
/// are later rejected as out of range rather than as garbage.
///
/// ## Example
/// ```rust
/// use bistro_core::quantity::parse_quantity;
///
/// assert_eq!(parse_quantity(" 3"), Some(3));
/// assert_eq!(parse_quantity("4 pizzas"), Some(4));
/// assert_eq!(parse_quantity("2.9"), Some(2));
/// assert_eq!(parse_quantity("-1"), Some(-1));
/// assert_eq!(parse_quantity("abc"), None);
/// assert_eq!(parse_quantity(""), None);
/// ```
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let run = digits.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in run {
        seen = true;
        let digit = i64::from(digit - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            })
            .unwrap_or(if negative { i64::MIN } else { i64::MAX });
    }

    seen.then_some(value)
}

/// Bounded quantity stepper with change notifications.
///
/// ## Ownership
/// Owned by exactly one component: the product configurator while the
/// user is browsing, then a cart line once the product is in the cart. The
/// owner applies its own reaction (repricing) from the returned
/// [`QuantityOutcome`]; other observers use [`QuantityControl::subscribe`].
#[derive(Debug)]
pub struct QuantityControl {
    value: i64,
    bounds: QuantityBounds,
    updates: Notifier<QuantityUpdated>,
}

impl QuantityControl {
    /// Creates a control at the configured default value.
    ///
    /// `bounds` is expected to have passed [`QuantityBounds::validate`].
    pub fn new(bounds: QuantityBounds) -> Self {
        QuantityControl {
            value: bounds.default_value,
            bounds,
            updates: Notifier::new(),
        }
    }

    /// Creates a control seeded with `value`.
    ///
    /// Fails if `value` is outside the bounds. Seeding raises no event.
    pub fn with_value(bounds: QuantityBounds, value: i64) -> ValidationResult<Self> {
        validation::validate_quantity(value, &bounds)?;
        Ok(QuantityControl {
            value,
            bounds,
            updates: Notifier::new(),
        })
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn bounds(&self) -> QuantityBounds {
        self.bounds
    }

    /// What the input box shows: always the last accepted value.
    pub fn display(&self) -> String {
        self.value.to_string()
    }

    /// Applies a numeric value.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::config::QuantityBounds;
    /// use bistro_core::quantity::{QuantityControl, QuantityOutcome};
    ///
    /// let mut qty = QuantityControl::new(QuantityBounds::default());
    /// assert!(qty.set_value(3).is_updated());
    /// assert_eq!(qty.set_value(3), QuantityOutcome::Unchanged);
    /// assert!(matches!(qty.set_value(10), QuantityOutcome::Rejected(_)));
    /// assert_eq!(qty.value(), 3);
    /// ```
    pub fn set_value(&mut self, value: i64) -> QuantityOutcome {
        if !self.bounds.contains(value) {
            debug!(
                value,
                min = self.bounds.min,
                max = self.bounds.max,
                "Quantity out of range, keeping {}",
                self.value
            );
            return QuantityOutcome::Rejected(QuantityRejection::OutOfRange {
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        if value == self.value {
            return QuantityOutcome::Unchanged;
        }

        let update = QuantityUpdated {
            previous: self.value,
            current: value,
        };
        self.value = value;
        debug!(previous = update.previous, current = value, "Quantity updated");
        self.updates.publish(update);

        QuantityOutcome::Updated(update)
    }

    /// Applies raw text from the input box.
    pub fn set_input(&mut self, raw: &str) -> QuantityOutcome {
        match parse_quantity(raw) {
            Some(value) => self.set_value(value),
            None => {
                debug!(raw, "Quantity input is not numeric, keeping {}", self.value);
                QuantityOutcome::Rejected(QuantityRejection::NotNumeric)
            }
        }
    }

    /// The "+" button.
    pub fn increment(&mut self) -> QuantityOutcome {
        self.set_value(self.value.saturating_add(1))
    }

    /// The "−" button.
    pub fn decrement(&mut self) -> QuantityOutcome {
        self.set_value(self.value.saturating_sub(1))
    }

    /// Observes accepted updates.
    pub fn subscribe(&mut self) -> Subscription<QuantityUpdated> {
        self.updates.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn control() -> QuantityControl {
        QuantityControl::new(QuantityBounds::default())
    }

    #[test]
    fn test_starts_at_default() {
        let qty = control();
        assert_eq!(qty.value(), 1);
        assert_eq!(qty.display(), "1");
    }

    #[test]
    fn test_accepts_value_in_range_and_notifies_once() {
        let mut qty = control();
        let sub = qty.subscribe();

        let outcome = qty.set_value(4);

        assert_eq!(
            outcome,
            QuantityOutcome::Updated(QuantityUpdated {
                previous: 1,
                current: 4
            })
        );
        assert_eq!(qty.value(), 4);
        assert_eq!(
            sub.drain(),
            vec![QuantityUpdated {
                previous: 1,
                current: 4
            }]
        );
    }

    #[test]
    fn test_rejects_out_of_range_without_clamping() {
        let mut qty = control();
        let sub = qty.subscribe();

        assert_eq!(
            qty.set_value(10),
            QuantityOutcome::Rejected(QuantityRejection::OutOfRange {
                value: 10,
                min: 1,
                max: 9
            })
        );
        assert!(matches!(qty.set_value(0), QuantityOutcome::Rejected(_)));
        assert_eq!(qty.value(), 1);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_non_numeric_input_resyncs_display() {
        let mut qty = control();
        qty.set_value(3);
        let sub = qty.subscribe();

        assert_eq!(
            qty.set_input("lots"),
            QuantityOutcome::Rejected(QuantityRejection::NotNumeric)
        );
        assert_eq!(qty.display(), "3");
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_text_input_is_parsed() {
        let mut qty = control();
        assert!(qty.set_input(" 5 ").is_updated());
        assert_eq!(qty.value(), 5);
        assert!(qty.set_input("7.5").is_updated());
        assert_eq!(qty.value(), 7);
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut qty = control();
        let sub = qty.subscribe();
        assert_eq!(qty.set_value(1), QuantityOutcome::Unchanged);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_increment_and_decrement_respect_bounds() {
        let mut qty = control();
        assert!(matches!(qty.decrement(), QuantityOutcome::Rejected(_)));
        assert_eq!(qty.value(), 1);

        for _ in 0..8 {
            assert!(qty.increment().is_updated());
        }
        assert_eq!(qty.value(), 9);
        assert!(matches!(qty.increment(), QuantityOutcome::Rejected(_)));
        assert_eq!(qty.value(), 9);

        assert!(qty.decrement().is_updated());
        assert_eq!(qty.value(), 8);
    }

    #[test]
    fn test_with_value() {
        let bounds = QuantityBounds::default();
        assert_eq!(QuantityControl::with_value(bounds, 6).unwrap().value(), 6);
        assert!(QuantityControl::with_value(bounds, 12).is_err());
    }

    #[test]
    fn test_parse_quantity_saturates() {
        assert_eq!(parse_quantity("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_quantity("-99999999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_quantity("+"), None);
        assert_eq!(parse_quantity("- 3"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a value is applied and announced exactly once iff it is
        /// in range and differs from the current value; otherwise nothing moves.
        #[test]
        fn update_accepted_iff_in_range_and_different(
            start in 1i64..=9,
            next in -20i64..30,
        ) {
            let bounds = QuantityBounds::default();
            let mut qty = QuantityControl::with_value(bounds, start).unwrap();
            let sub = qty.subscribe();

            let outcome = qty.set_value(next);
            let events = sub.drain();

            if bounds.contains(next) && next != start {
                prop_assert!(outcome.is_updated());
                prop_assert_eq!(qty.value(), next);
                prop_assert_eq!(events.len(), 1);
            } else {
                prop_assert!(!outcome.is_updated());
                prop_assert_eq!(qty.value(), start);
                prop_assert!(events.is_empty());
            }
        }
    }
}
