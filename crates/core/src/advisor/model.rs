use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use backoff::future::retry;
use healthchat_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider, ModelRequest,
};

use super::{Advisor, AdvisorError};
use crate::analyzer::SymptomRequest;
use crate::conversation::Message;
use crate::model_client::ModelClient;

const SYSTEM_PROMPT: &str = "You are a health assistant in a symptom \
    checker. You are not a doctor and must not claim a diagnosis. Explain \
    what the described symptoms might mean in plain language, suggest safe \
    self-care steps, and say clearly when the user should see a healthcare \
    provider. Tell the user to seek emergency care for chest pain, trouble \
    breathing or other alarming signs. Keep replies short.";

const DEFAULT_MAX_ATTEMPTS: u32 = 4;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Answers with a generative model.
///
/// The conversation is flattened into a single prompt under a fixed system
/// instruction. Rate-limited requests are retried with exponential backoff,
/// every other failure is reported right away.
#[derive(Clone)]
pub struct ModelAdvisor {
    client: ModelClient,
    system_prompt: String,
    temperature: Option<f32>,
    max_attempts: u32,
    retry_interval: Duration,
}

impl ModelAdvisor {
    /// Creates an advisor backed by `provider`.
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        Self {
            client: ModelClient::new(provider),
            system_prompt: SYSTEM_PROMPT.to_owned(),
            temperature: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Replaces the system instruction.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the sampling temperature sent with every request.
    #[inline]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Caps the number of attempts for rate-limited requests. Values below
    /// one are treated as one.
    #[inline]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the delay before the first retry.
    #[inline]
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    fn build_request(
        &self,
        history: &[Message],
        request: &SymptomRequest,
    ) -> ModelRequest {
        ModelRequest {
            messages: vec![
                ModelMessage::System(self.system_prompt.clone()),
                ModelMessage::User(build_prompt(history, request)),
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl Advisor for ModelAdvisor {
    async fn advise(
        &self,
        history: &[Message],
        request: &SymptomRequest,
    ) -> Result<String, AdvisorError> {
        let model_request = self.build_request(history, request);
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry_interval)
            .with_max_elapsed_time(None)
            .build();

        let mut attempt = 0;
        let resp = retry(policy, || {
            attempt += 1;
            let current = attempt;
            let last_attempt = current >= self.max_attempts;
            let client = self.client.clone();
            let model_request = model_request.clone();
            async move {
                client.send_request(model_request).await.map_err(|err| {
                    let err = AdvisorError::from(err);
                    if err.kind().is_transient() && !last_attempt {
                        warn!(attempt = current, "model request rate limited, retrying");
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        })
        .await?;

        match resp.finish_reason {
            Some(ModelFinishReason::ContentFilter) => {
                return Err(AdvisorError::new(
                    "model reply was withheld by the content filter",
                    ErrorKind::Moderated,
                ));
            }
            Some(ModelFinishReason::Length) => {
                warn!("model reply was cut off by the token limit");
            }
            Some(ModelFinishReason::Stop) | None => {}
        }
        if resp.transcript.trim().is_empty() {
            return Err(AdvisorError::new(
                "model returned an empty reply",
                ErrorKind::Other,
            ));
        }
        Ok(resp.transcript.trim().to_owned())
    }
}

/// Flattens the conversation and the new user turn into one prompt.
fn build_prompt(history: &[Message], request: &SymptomRequest) -> String {
    let mut prompt = String::new();

    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for message in history {
            _ = writeln!(
                prompt,
                "{}: {}",
                message.role().label(),
                message.content()
            );
        }
        prompt.push('\n');
    }

    _ = write!(prompt, "User: {}", request.symptoms);
    let details = [
        ("Duration", &request.duration),
        ("Severity", &request.severity),
        ("Additional information", &request.additional_info),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            _ = write!(prompt, "\n{label}: {value}");
        }
    }

    prompt
}
