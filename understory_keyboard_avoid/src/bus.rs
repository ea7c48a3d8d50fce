// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-process notification bus with explicit subscription handles.
//!
//! [`NotificationBus`] is a reference [`EventSource`] for hosts that route platform
//! notifications themselves, and for tests. Posting an event calls the handler once per
//! live subscription of the event's kind, in subscription order, passing the
//! subscription the delivery belongs to. Subscribing twice therefore delivers twice.
//!
//! ```
//! use understory_keyboard_avoid::bus::NotificationBus;
//! use understory_keyboard_avoid::event::{EventKind, HostEvent};
//! use understory_keyboard_avoid::host::EventSource;
//!
//! let mut bus = NotificationBus::new();
//! let sub = bus.subscribe(EventKind::EditingEnded);
//!
//! let mut seen = 0;
//! bus.post(&HostEvent::<u32>::EditingEnded, |id, _| {
//!     assert_eq!(id, sub);
//!     seen += 1;
//! });
//! assert_eq!(seen, 1);
//!
//! bus.unsubscribe(sub);
//! assert_eq!(bus.post(&HostEvent::<u32>::EditingEnded, |_, _| seen += 1), 0);
//! assert_eq!(seen, 1);
//! ```

use alloc::collections::BTreeMap;

use crate::event::{EventKind, HostEvent};
use crate::host::{EventSource, SubscriptionId};

/// Subscription registry keyed by monotonically allocated ids.
#[derive(Clone, Debug, Default)]
pub struct NotificationBus {
    next: u64,
    subscriptions: BTreeMap<SubscriptionId, EventKind>,
}

impl NotificationBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions for `kind`.
    pub fn subscription_count(&self, kind: EventKind) -> usize {
        self.subscriptions.values().filter(|&&k| k == kind).count()
    }

    /// Whether `id` is still subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Whether no subscriptions are live.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver `event` to every subscription of its kind, returning the delivery count.
    ///
    /// The handler receives the subscription each delivery belongs to, so a subscriber
    /// can drop deliveries addressed to someone else.
    pub fn post<K>(
        &self,
        event: &HostEvent<K>,
        mut handler: impl FnMut(SubscriptionId, &HostEvent<K>),
    ) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for (&id, _) in self.subscriptions.iter().filter(|&(_, &k)| k == kind) {
            handler(id, event);
            delivered += 1;
        }
        delivered
    }
}

impl EventSource for NotificationBus {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }
}
