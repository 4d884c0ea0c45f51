use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use super::Chat;
use super::state::ChatState;
use crate::advisor::Advisor;
use crate::store::{ConversationStore, StoreEvent};

type Observer = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// [`Chat`] builder.
pub struct ChatBuilder {
    advisor: Arc<dyn Advisor>,
    store: Option<ConversationStore>,
    observers: Vec<Observer>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ChatBuilder {
    /// Creates a new builder with the advisor that answers user turns.
    #[inline]
    pub fn with_advisor<A: Advisor + 'static>(advisor: A) -> Self {
        Self {
            advisor: Arc::new(advisor),
            store: None,
            observers: vec![],
            on_idle: None,
        }
    }

    /// Uses `store` instead of a fresh one. Observers already subscribed
    /// to it stay subscribed.
    #[inline]
    pub fn with_store(mut self, store: ConversationStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Attaches an observer for every change to the conversation.
    #[inline]
    pub fn on_event(
        mut self,
        observer: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Attaches a callback to be invoked whenever a submission has been
    /// fully handled.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Spawns the session task and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> Chat {
        let ChatBuilder {
            advisor,
            store,
            observers,
            on_idle,
        } = self;

        let mut store = store.unwrap_or_default();
        for observer in observers {
            store.subscribe(observer);
        }

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let state = ChatState {
            store,
            advisor,
            on_idle,
            commands: commands_tx.downgrade(),
            generation: 0,
            running: None,
        };
        tokio::spawn(state.run(commands_rx).instrument(info_span!("chat")));

        Chat {
            commands: commands_tx,
        }
    }
}
