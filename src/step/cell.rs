//! Observable step state
//!
//! Holds a step's current state and notifies registered listeners whenever it
//! changes. Callbacks run synchronously on the thread that changed the state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use super::state::StepState;

/// A single state transition as seen by observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub old: StepState,
    pub new: StepState,
}

/// Listener ID for removing a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Callback invoked on every state change
pub type StateListener = Arc<dyn Fn(&StateChange) + Send + Sync>;

#[derive(Clone)]
enum Sink {
    Callback(StateListener),
    Channel(Sender<StateChange>),
}

struct Listener {
    id: ListenerId,
    sink: Sink,
}

/// Observable holder for a step's [`StepState`]
pub struct StateCell {
    state: RwLock<StepState>,
    listeners: RwLock<Vec<Listener>>,
    next_id: Mutex<usize>,
}

impl StateCell {
    /// Create a cell holding the given state
    pub fn new(initial: StepState) -> Self {
        Self {
            state: RwLock::new(initial),
            listeners: RwLock::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    /// Current state
    pub fn get(&self) -> StepState {
        self.state.read().clone()
    }

    /// Replace the state and notify listeners.
    ///
    /// Assigning the current value again does not notify. Listeners run after
    /// every lock on the cell has been released, so they may read the cell or
    /// change it again.
    pub fn set(&self, new: StepState) {
        let old = {
            let mut state = self.state.write();
            if *state == new {
                return;
            }
            std::mem::replace(&mut *state, new.clone())
        };

        let change = StateChange { old, new };
        let sinks: Vec<Sink> = self
            .listeners
            .read()
            .iter()
            .map(|listener| listener.sink.clone())
            .collect();

        for sink in sinks {
            match sink {
                Sink::Callback(callback) => callback(&change),
                // Closed receivers are fine, the subscriber went away
                Sink::Channel(sender) => {
                    let _ = sender.try_send(change.clone());
                }
            }
        }
    }

    /// Register a callback for state changes
    pub fn observe<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.register(Sink::Callback(Arc::new(callback)))
    }

    /// Subscribe to state changes through a channel
    pub fn subscribe(&self) -> (Receiver<StateChange>, ListenerId) {
        let (tx, rx) = unbounded();
        let id = self.register(Sink::Channel(tx));
        (rx, id)
    }

    /// Remove a callback or channel subscription
    pub fn unobserve(&self, id: ListenerId) {
        self.listeners.write().retain(|listener| listener.id != id);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn register(&self, sink: Sink) -> ListenerId {
        let mut next_id = self.next_id.lock();
        let id = ListenerId(*next_id);
        *next_id += 1;
        drop(next_id);

        self.listeners.write().push(Listener { id, sink });
        id
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(StepState::Init)
    }
}

impl std::fmt::Debug for StateCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("state", &*self.state.read())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
