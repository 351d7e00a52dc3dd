//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! In-process publish/subscribe notifications

use enum_kinds::EnumKind;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

///
/// Notifications published by the client.
///
/// [`EventKind`] names the variant without its data and is the subscription key.
///
#[derive(Clone, Debug, PartialEq, Eq, EnumKind)]
#[enum_kind(EventKind, derive(Hash))]
pub enum Event {
    /// A connection was established
    Connected {
        /// Server host as given to `connect`
        host: String,
        /// Server port
        port: u16,
    },
    /// A connection ended or failed to open
    Disconnected {
        /// Why, when the connection ended abnormally
        error: Option<String>,
    },
    /// Decoded display text from the server
    DataReceived {
        /// The text of one read
        text: String,
    },
    /// Text written to the server
    DataSent {
        /// The text as passed to `send`
        text: String,
    },
}

impl Event {
    /// The event's data as a flat key-value map.
    ///
    /// `Connected` yields `host` and `port`, `Disconnected` yields `error` when present, and
    /// the data events yield `data`.
    pub fn payload(&self) -> BTreeMap<&'static str, String> {
        let mut payload = BTreeMap::new();
        match self {
            Event::Connected { host, port } => {
                payload.insert("host", host.clone());
                payload.insert("port", port.to_string());
            }
            Event::Disconnected { error } => {
                if let Some(error) = error {
                    payload.insert("error", error.clone());
                }
            }
            Event::DataReceived { text } | Event::DataSent { text } => {
                payload.insert("data", text.clone());
            }
        }
        payload
    }
}

/// Identifies a subscription for [`EventBus::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A subscribed callback.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct Registry {
    listeners: RwLock<HashMap<EventKind, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

///
/// Synchronous publish/subscribe dispatcher.
///
/// Callbacks run on the publishing thread, in subscription order, before `publish`
/// returns. Cloning the bus yields another handle to the same subscriptions.
///
/// The callback list is copied before dispatch, so a callback may subscribe or
/// unsubscribe without deadlocking; such changes apply from the next `publish`.
///
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for events of `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry
            .listeners
            .write()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(callback)));
        trace!("Subscribed listener {:?} to {:?}", id, kind);
        id
    }

    /// Removes a subscription. Returns false when `id` was not subscribed to `kind`.
    pub fn unsubscribe(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.registry.listeners.write();
        let Some(entries) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(listener, _)| *listener != id);
        before != entries.len()
    }

    /// Invokes every callback subscribed to the event's kind.
    pub fn publish(&self, event: &Event) {
        let kind = EventKind::from(event);
        let callbacks: Vec<Listener> = match self.registry.listeners.read().get(&kind) {
            Some(entries) => entries.iter().map(|(_, callback)| callback.clone()).collect(),
            None => return,
        };
        for callback in callbacks {
            callback(event);
        }
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        self.registry.listeners.write().clear();
    }

    /// Number of callbacks subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry
            .listeners
            .read()
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.registry.listeners.read();
        f.debug_struct("EventBus")
            .field("listeners", &listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
