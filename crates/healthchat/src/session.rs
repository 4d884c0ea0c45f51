use healthchat_core::doctors::{Doctor, DoctorDirectory, MockDoctorDirectory};
use healthchat_core::store::{ConversationStore, StoreEvent};
use healthchat_core::{
    Chat, ChatBuilder, ChatClosed, ConversationSnapshot, KeywordAdvisor,
    ModelAdvisor, SubmitError, SymptomAnalyzer, SymptomRequest,
};
use healthchat_model::ModelProvider;
use healthchat_openai_model::OpenAIProvider;

use crate::config::{Config, ConfigError};

/// Which advisor answers the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvisorKind {
    /// The offline keyword analyzer.
    Keyword,
    /// A generative model.
    Model,
}

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    chat_builder: ChatBuilder,
    advisor_kind: AdvisorKind,
    directory: Box<dyn DoctorDirectory>,
}

impl SessionBuilder {
    /// Creates a session builder from the configuration: the generative
    /// advisor when a credential is configured, the keyword analyzer
    /// otherwise.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let knowledge = config.load_knowledge()?;
        let store =
            ConversationStore::with_table(knowledge.recommendations().clone());

        let builder = if let Some(openai_config) = config.openai_config() {
            Self::with_model_provider(OpenAIProvider::new(openai_config))
        } else {
            let mut analyzer = SymptomAnalyzer::with_knowledge(&knowledge);
            if let Some(latency) = config.latency {
                analyzer = analyzer.with_latency(latency);
            }
            Self::with_analyzer(analyzer)
        };
        debug!(
            advisor = ?builder.advisor_kind,
            knowledge_file = ?config.knowledge_file,
            "session configured"
        );
        Ok(builder.with_store(store))
    }

    /// Creates a session builder answering with the keyword analyzer.
    pub fn with_analyzer(analyzer: SymptomAnalyzer) -> Self {
        Self {
            chat_builder: ChatBuilder::with_advisor(KeywordAdvisor::new(
                analyzer,
            )),
            advisor_kind: AdvisorKind::Keyword,
            directory: Box::new(MockDoctorDirectory::new()),
        }
    }

    /// Creates a session builder answering with a generative model.
    pub fn with_model_provider<P: ModelProvider + 'static>(provider: P) -> Self {
        Self {
            chat_builder: ChatBuilder::with_advisor(ModelAdvisor::new(
                provider,
            )),
            advisor_kind: AdvisorKind::Model,
            directory: Box::new(MockDoctorDirectory::new()),
        }
    }

    /// Uses `store` for the conversation.
    #[inline]
    pub fn with_store(mut self, store: ConversationStore) -> Self {
        self.chat_builder = self.chat_builder.with_store(store);
        self
    }

    /// Replaces the doctor directory.
    #[inline]
    pub fn with_directory<D: DoctorDirectory + 'static>(
        mut self,
        directory: D,
    ) -> Self {
        self.directory = Box::new(directory);
        self
    }

    /// Attaches a callback to be invoked on every conversation change.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_event(on_event);
        self
    }

    /// Attaches a callback to be invoked when a reply has been handled.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            chat: self.chat_builder.build(),
            advisor_kind: self.advisor_kind,
            directory: self.directory,
        }
    }
}

/// A chat session, like a window that shows the conversation next to the
/// doctor sidebar.
///
/// The session is basically a wrapper around [`Chat`] plus a doctor
/// directory.
pub struct Session {
    chat: Chat,
    advisor_kind: AdvisorKind,
    directory: Box<dyn DoctorDirectory>,
}

impl Session {
    /// Returns which advisor answers in this session.
    #[inline]
    pub fn advisor_kind(&self) -> AdvisorKind {
        self.advisor_kind
    }

    /// Sends a message, optionally with how long the symptoms have lasted.
    pub async fn send_message(
        &self,
        message: &str,
        duration: Option<String>,
    ) -> Result<(), SubmitError> {
        let mut request = SymptomRequest::new(message);
        request.duration = duration;
        self.chat.submit_request(request).await
    }

    /// Starts over with the welcome message.
    #[inline]
    pub async fn clear(&self) -> Result<(), ChatClosed> {
        self.chat.clear().await
    }

    /// Returns the current conversation state.
    #[inline]
    pub async fn snapshot(&self) -> Result<ConversationSnapshot, ChatClosed> {
        self.chat.snapshot().await
    }

    /// Lists the doctors available for a consultation.
    #[inline]
    pub async fn doctors(&self) -> Vec<Doctor> {
        self.directory.doctors().await
    }

    /// Asks to be connected with the doctor with the given id. Returns the
    /// doctor, or `None` if the id is unknown.
    pub async fn connect_doctor(
        &self,
        id: &str,
    ) -> Result<Option<Doctor>, ChatClosed> {
        let Some(doctor) = self.directory.find(id).await else {
            return Ok(None);
        };
        self.chat.connect_doctor(&doctor).await?;
        Ok(Some(doctor))
    }
}
