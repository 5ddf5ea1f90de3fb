//! # Notifications
//!
//! In-memory fan-out of component events to observers (the view layer,
//! the kiosk, tests).
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Publisher (&mut self)                                                  │
//! │     1. mutate state                                                     │
//! │     2. recompute derived values                                         │
//! │     3. publish(event) ──┬──► Subscription A  (queue)                    │
//! │                         └──► Subscription B  (queue)                    │
//! │                                                                         │
//! │  Observers drain their queue afterwards, in publish order.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - No I/O, no async, single-threaded use
//! - A subscriber never observes a half-applied mutation: publishing is the
//!   last step of every operation
//! - Dropped subscriptions are pruned on the next publish
//!
//! Reactions that change state inside a component (a cart line repricing
//! when its quantity changes) are not routed through here; the owner reacts
//! to the operation's return value before returning.

use std::sync::mpsc::{self, Receiver, Sender};

/// Fan-out publisher owned by a component.
#[derive(Debug)]
pub struct Notifier<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Notifier {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> Notifier<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer.
    pub fn subscribe(&mut self) -> Subscription<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Delivers `event` to every live subscription.
    pub fn publish(&mut self, event: E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscriptions as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving side of a [`Notifier`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<E> {
    rx: Receiver<E>,
}

impl<E> Subscription<E> {
    /// Takes the next pending event, if any.
    pub fn try_next(&self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }
}
