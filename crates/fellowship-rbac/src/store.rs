//! Session-local "view as" override store.
//!
//! Holds at most one [`ViewRole`] override for one session and notifies
//! subscribers after every change. The override lives in a client-local
//! storage medium under a single well-known key as a plain string.
//!
//! # States
//!
//! ```text
//!              set_active_view(v)
//!   NoOverride ──────────────────► Override(v)
//!        ▲                              │
//!        └──────────────────────────────┘
//!         clear_active_view / end_session
//! ```
//!
//! # Server rendering
//!
//! A store built with [`ViewOverrideStore::server`] has no storage medium:
//! reads return `None` and writes are ignored. [`ViewOverrideStore::server_snapshot`]
//! is always `None`, whatever any client store holds, so the first render is
//! reproducible before hydration. The UI tolerates one transition from "no
//! override" to the real override right after hydration.
//!
//! # Threading
//!
//! The store is built for a single-threaded, event-driven UI runtime and is
//! deliberately `!Send`. Each session constructs its own store and passes it
//! by reference to consumers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use fellowship_config::ViewConfig;

use crate::views::ViewRole;

/// Default key the override is stored under.
pub use fellowship_config::DEFAULT_VIEW_STORAGE_KEY as DEFAULT_STORAGE_KEY;

/// Client-local key/value storage medium.
pub trait OverrideStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage medium.
///
/// Clones share the same entries, like several tabs of one browser profile
/// sharing local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverrideStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`ViewOverrideStore::subscribe`].
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Removes the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Session-local view override with change notification.
pub struct ViewOverrideStore {
    storage: Option<Box<dyn OverrideStorage>>,
    key: String,
    listeners: Rc<RefCell<Listeners>>,
}

impl ViewOverrideStore {
    /// Creates a store backed by client storage.
    pub fn client(storage: impl OverrideStorage + 'static) -> Self {
        Self {
            storage: Some(Box::new(storage)),
            key: DEFAULT_STORAGE_KEY.to_string(),
            listeners: Rc::default(),
        }
    }

    /// Creates a client store keyed by the configured storage key.
    pub fn client_with_config(
        storage: impl OverrideStorage + 'static,
        config: &ViewConfig,
    ) -> Self {
        Self::client(storage).with_storage_key(config.storage_key.clone())
    }

    /// Creates a store with no storage medium (server rendering).
    pub fn server() -> Self {
        Self {
            storage: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            listeners: Rc::default(),
        }
    }

    /// Sets the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Returns whether a client storage medium is available.
    pub fn has_client_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Direct access to the storage medium.
    ///
    /// Writes made through this handle do not notify subscribers; call
    /// [`emit_change`](Self::emit_change) afterwards.
    pub fn storage(&self) -> Option<&dyn OverrideStorage> {
        self.storage.as_deref()
    }

    /// Returns the active override, or `None`.
    ///
    /// `None` without client storage. A stored value that is not a view
    /// name reads as `None`.
    pub fn get_active_view(&self) -> Option<ViewRole> {
        let storage = self.storage.as_deref()?;
        let raw = storage.read(&self.key)?;

        match raw.parse::<ViewRole>() {
            Ok(view) => Some(view),
            Err(err) => {
                warn!(key = %self.key, error = %err, "Ignoring unrecognized stored view");
                None
            }
        }
    }

    /// Stores `view` as the override and notifies subscribers.
    ///
    /// No validation against the view matrix happens here; callers must
    /// check it first (see [`ViewSwitcher`](crate::switcher::ViewSwitcher)).
    pub fn set_active_view(&self, view: ViewRole) {
        let Some(storage) = self.storage.as_deref() else {
            debug!(view = %view, "No client storage; view override not stored");
            return;
        };
        storage.write(&self.key, view.as_str());
        debug!(view = %view, "View override set");
        self.emit_change();
    }

    /// Removes the override and notifies subscribers.
    pub fn clear_active_view(&self) {
        let Some(storage) = self.storage.as_deref() else {
            return;
        };
        storage.remove(&self.key);
        debug!("View override cleared");
        self.emit_change();
    }

    /// Clears the override when the session ends.
    pub fn end_session(&self) {
        self.clear_active_view();
    }

    /// Registers a listener invoked after every change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Notifies every current subscriber.
    ///
    /// Listeners may read the store, subscribe or unsubscribe while being
    /// notified; changes to the listener list apply from the next emit.
    pub fn emit_change(&self) {
        let current: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in current {
            listener();
        }
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Client snapshot: the current override.
    pub fn snapshot(&self) -> Option<ViewRole> {
        self.get_active_view()
    }

    /// Server snapshot: always `None`.
    pub fn server_snapshot(&self) -> Option<ViewRole> {
        None
    }
}

impl fmt::Debug for ViewOverrideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewOverrideStore")
            .field("key", &self.key)
            .field("client_storage", &self.storage.is_some())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
