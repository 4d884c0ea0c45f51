//! Strategies that turn a symptom description into an assistant reply.

mod model;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use async_trait::async_trait;
use healthchat_model::{ErrorKind, ModelProviderError};

use crate::analyzer::{AnalyzerResult, SymptomAnalyzer, SymptomRequest};
use crate::conversation::Message;
pub use model::ModelAdvisor;

const CONSULT_NOTE: &str = "Based on what you've shared, I'd recommend \
    consulting with a healthcare provider for proper evaluation.";

/// Error returned when an [`Advisor`] could not produce a reply.
#[derive(Debug)]
pub struct AdvisorError {
    message: String,
    kind: ErrorKind,
}

impl AdvisorError {
    /// Creates an error with the given message and kind.
    #[inline]
    pub fn new<S: Into<String>>(message: S, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl StdError for AdvisorError {}

impl From<Box<dyn ModelProviderError>> for AdvisorError {
    fn from(value: Box<dyn ModelProviderError>) -> Self {
        Self {
            message: value.to_string(),
            kind: value.kind(),
        }
    }
}

/// Produces the assistant reply for one user turn.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Answers `request`.
    ///
    /// `history` is the conversation before the user turn that `request`
    /// describes, oldest first.
    async fn advise(
        &self,
        history: &[Message],
        request: &SymptomRequest,
    ) -> Result<String, AdvisorError>;
}

/// Answers with the keyword analyzer. Never fails.
#[derive(Clone, Debug, Default)]
pub struct KeywordAdvisor {
    analyzer: SymptomAnalyzer,
}

impl KeywordAdvisor {
    #[allow(missing_docs)]
    #[inline]
    pub fn new(analyzer: SymptomAnalyzer) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Advisor for KeywordAdvisor {
    async fn advise(
        &self,
        _history: &[Message],
        request: &SymptomRequest,
    ) -> Result<String, AdvisorError> {
        let result = self.analyzer.analyze(request).await;
        Ok(format_analysis(&result))
    }
}

/// Renders an analyzer result as the text of an assistant message.
pub fn format_analysis(result: &AnalyzerResult) -> String {
    let mut content = result.analysis.clone();

    if !result.possible_conditions.is_empty() {
        content.push_str("\n\nPossible conditions to consider:\n");
        push_bullets(&mut content, &result.possible_conditions);
    }
    if !result.recommendations.is_empty() {
        content.push_str("\n\nRecommendations:\n");
        push_bullets(&mut content, &result.recommendations);
    }
    if result.should_consult_doctor {
        content.push_str("\n\n");
        content.push_str(CONSULT_NOTE);
    }

    content
}

fn push_bullets(content: &mut String, items: &[String]) {
    for item in items {
        content.push_str("• ");
        content.push_str(item);
        content.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> AnalyzerResult {
        AnalyzerResult {
            analysis: "Sounds like a cold.".to_owned(),
            possible_conditions: vec!["Cold".to_owned(), "Allergies".to_owned()],
            recommendations: vec!["Rest".to_owned()],
            should_consult_doctor: false,
            medications: None,
            diet: None,
            workout: None,
        }
    }

    #[test]
    fn test_format_analysis() {
        assert_eq!(
            format_analysis(&result()),
            "Sounds like a cold.\n\n\
             Possible conditions to consider:\n• Cold\n• Allergies\n\
             \n\nRecommendations:\n• Rest\n"
        );
    }

    #[test]
    fn test_format_consult_note() {
        let mut result = result();
        result.possible_conditions.clear();
        result.recommendations.clear();
        result.should_consult_doctor = true;
        assert_eq!(
            format_analysis(&result),
            format!("Sounds like a cold.\n\n{CONSULT_NOTE}")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyword_advisor() {
        let advisor = KeywordAdvisor::default();
        let reply = advisor
            .advise(&[], &SymptomRequest::new("my elbow tingles"))
            .await
            .unwrap();
        assert!(reply.starts_with("Based on the symptoms you've described"));
        assert!(!reply.contains("Possible conditions"));
        assert!(reply.contains(
            "Recommendations:\n• Keep track of your symptoms and when they occur\n"
        ));
        assert!(reply.ends_with(CONSULT_NOTE));
    }

    #[test]
    fn test_error_from_provider() {
        #[derive(Debug)]
        struct Limited;

        impl Display for Limited {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("slow down")
            }
        }

        impl StdError for Limited {}

        impl ModelProviderError for Limited {
            fn kind(&self) -> ErrorKind {
                ErrorKind::RateLimitExceeded
            }
        }

        let err = AdvisorError::from(Box::new(Limited) as Box<dyn ModelProviderError>);
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(err.to_string(), "slow down (RateLimitExceeded)");
    }
}
