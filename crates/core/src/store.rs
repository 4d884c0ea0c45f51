//! The observable conversation store.

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::conversation::{ConversationSnapshot, Message, Role};
use crate::knowledge::KnowledgeBase;
use crate::recommendation::{Recommendation, RecommendationTable};

/// A change applied to a [`ConversationStore`].
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// A message was appended.
    MessageAdded(Message),
    /// The typing indicator was switched.
    TypingChanged(bool),
    /// The current care plan was replaced or cleared.
    RecommendationChanged(Option<Recommendation>),
    /// The conversation was reset to the welcome message.
    Cleared,
}

/// Handle returned by [`ConversationStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Single source of truth for the chat state.
///
/// The store always holds at least the welcome message. Messages are only
/// ever appended, and every mutation is reported to the subscribed
/// observers in the order it happened.
///
/// Adding an assistant message re-derives the current care plan from that
/// message's content alone, so the plan always reflects the latest reply.
pub struct ConversationStore {
    messages: Vec<Message>,
    is_typing: bool,
    current_recommendation: Option<Recommendation>,
    table: RecommendationTable,
    next_message_id: u64,
    observers: BTreeMap<SubscriptionId, Observer>,
    next_subscription_id: u64,
}

impl ConversationStore {
    /// Creates a store that derives care plans from the built-in table.
    #[inline]
    pub fn new() -> Self {
        Self::with_table(KnowledgeBase::builtin().recommendations().clone())
    }

    /// Creates a store that derives care plans from `table`.
    pub fn with_table(table: RecommendationTable) -> Self {
        Self {
            messages: vec![Message::welcome()],
            is_typing: false,
            current_recommendation: None,
            table,
            next_message_id: 1,
            observers: BTreeMap::new(),
            next_subscription_id: 1,
        }
    }

    /// Returns all messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns whether a reply is being prepared.
    #[inline]
    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Returns the current care plan, if the latest reply matched one.
    #[inline]
    pub fn current_recommendation(&self) -> Option<&Recommendation> {
        self.current_recommendation.as_ref()
    }

    /// Returns an owned copy of the state.
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            is_typing: self.is_typing,
            current_recommendation: self.current_recommendation.clone(),
        }
    }

    /// Appends a message with a fresh id and the current time.
    ///
    /// For assistant messages the care plan is re-derived before this
    /// returns.
    pub fn add_message<S: Into<String>>(
        &mut self,
        role: Role,
        content: S,
    ) -> &Message {
        let id = format!("msg-{}", self.next_message_id);
        self.next_message_id += 1;

        let message = Message::new(id, role, content.into());
        trace!(id = message.id(), ?role, "message added");
        self.notify(&StoreEvent::MessageAdded(message.clone()));
        self.messages.push(message);

        if role == Role::Assistant {
            let content = self.messages[self.messages.len() - 1].content();
            let derived = self.table.derive(content).cloned();
            self.set_current_recommendation(derived);
        }

        &self.messages[self.messages.len() - 1]
    }

    /// Switches the typing indicator. Observers hear about actual changes
    /// only.
    pub fn set_is_typing(&mut self, is_typing: bool) {
        if self.is_typing == is_typing {
            return;
        }
        self.is_typing = is_typing;
        self.notify(&StoreEvent::TypingChanged(is_typing));
    }

    /// Resets the conversation to the welcome message and drops the care
    /// plan. Message ids keep counting up.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.messages.push(Message::welcome());
        self.notify(&StoreEvent::Cleared);
        self.set_current_recommendation(None);
    }

    /// Replaces the current care plan.
    pub fn set_current_recommendation(
        &mut self,
        recommendation: Option<Recommendation>,
    ) {
        if self.current_recommendation == recommendation {
            return;
        }
        debug!(
            condition = recommendation.as_ref().map(|r| r.condition.as_str()),
            "recommendation changed"
        );
        self.current_recommendation = recommendation;
        self.notify(&StoreEvent::RecommendationChanged(
            self.current_recommendation.clone(),
        ));
    }

    /// Registers an observer for every subsequent mutation.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.observers.insert(id, Arc::new(observer));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    fn notify(&self, event: &StoreEvent) {
        for observer in self.observers.values() {
            observer(event);
        }
    }
}

impl Default for ConversationStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ConversationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationStore")
            .field("messages", &self.messages.len())
            .field("is_typing", &self.is_typing)
            .field(
                "current_recommendation",
                &self.current_recommendation.as_ref().map(|r| &r.condition),
            )
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::conversation::{WELCOME_MESSAGE, WELCOME_MESSAGE_ID};

    fn recorder(store: &mut ConversationStore) -> Arc<Mutex<Vec<StoreEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        store.subscribe({
            let events = Arc::clone(&events);
            move |event| events.lock().unwrap().push(event.clone())
        });
        events
    }

    #[test]
    fn test_seeded_with_welcome() {
        let store = ConversationStore::new();
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id(), WELCOME_MESSAGE_ID);
        assert_eq!(store.messages()[0].role(), Role::Assistant);
        assert_eq!(store.messages()[0].content(), WELCOME_MESSAGE);
        assert!(!store.is_typing());
        assert_eq!(store.current_recommendation(), None);
    }

    #[test]
    fn test_add_user_message() {
        let mut store = ConversationStore::new();
        for (i, text) in ["I feel dizzy", "a headache too", "  "].iter().enumerate()
        {
            store.add_message(Role::User, *text);
            assert_eq!(store.messages().len(), i + 2);
            let last = store.messages().last().unwrap();
            assert_eq!(last.role(), Role::User);
            assert_eq!(last.content(), *text);
        }
        // User messages never derive a care plan.
        assert_eq!(store.current_recommendation(), None);
    }

    #[test]
    fn test_ids_are_unique_across_clears() {
        let mut store = ConversationStore::new();
        let mut ids = HashSet::new();
        ids.insert(store.add_message(Role::User, "a").id().to_owned());
        store.clear_messages();
        ids.insert(store.add_message(Role::User, "b").id().to_owned());
        ids.insert(store.add_message(Role::System, "c").id().to_owned());
        ids.insert(WELCOME_MESSAGE_ID.to_owned());
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_assistant_message_derives_recommendation() {
        let mut store = ConversationStore::new();
        store.add_message(Role::Assistant, "Sounds like a Headache.");
        assert_eq!(
            store.current_recommendation().unwrap().condition,
            "Headache Relief"
        );

        // Recomputed from the latest reply only.
        store.add_message(Role::Assistant, "Could be the flu.");
        assert_eq!(
            store.current_recommendation().unwrap().condition,
            "Fever & Flu Care"
        );

        store.add_message(Role::Assistant, "My elbow tingles");
        assert_eq!(store.current_recommendation(), None);
    }

    #[test]
    fn test_system_message_keeps_recommendation() {
        let mut store = ConversationStore::new();
        store.add_message(Role::Assistant, "Try this cough syrup.");
        store.add_message(Role::System, "Connected to a doctor.");
        assert_eq!(
            store.current_recommendation().unwrap().condition,
            "Cough Management"
        );
    }

    #[test]
    fn test_clear_messages() {
        let mut store = ConversationStore::new();
        store.add_message(Role::User, "stomach ache");
        store.add_message(Role::Assistant, "Digestive issues are common.");
        assert!(store.current_recommendation().is_some());

        store.clear_messages();
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].content(), WELCOME_MESSAGE);
        assert_eq!(store.current_recommendation(), None);

        store.clear_messages();
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn test_observers() {
        let mut store = ConversationStore::new();
        let events = recorder(&mut store);

        store.set_is_typing(true);
        store.set_is_typing(true);
        store.add_message(Role::Assistant, "A cough can linger.");
        store.set_is_typing(false);
        store.clear_messages();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], StoreEvent::TypingChanged(true));
        assert!(matches!(
            &events[1],
            StoreEvent::MessageAdded(m) if m.content() == "A cough can linger."
        ));
        assert!(matches!(
            &events[2],
            StoreEvent::RecommendationChanged(Some(r))
                if r.condition == "Cough Management"
        ));
        assert_eq!(events[3], StoreEvent::TypingChanged(false));
        assert_eq!(events[4], StoreEvent::Cleared);
        assert_eq!(events[5], StoreEvent::RecommendationChanged(None));
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ConversationStore::new();
        let count = Arc::new(Mutex::new(0));
        let id = store.subscribe({
            let count = Arc::clone(&count);
            move |_| *count.lock().unwrap() += 1
        });
        store.set_is_typing(true);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_is_typing(false);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut store = ConversationStore::new();
        store.set_is_typing(true);
        store.add_message(Role::User, "fever");
        let snapshot = store.snapshot();
        assert!(snapshot.is_typing);
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.last_message().unwrap().content(), "fever");
    }
}
