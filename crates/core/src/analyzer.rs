//! Keyword-based symptom analysis.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::knowledge::KnowledgeBase;
use crate::recommendation::Medication;

/// Latency the analyzer simulates before answering.
pub const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

const LONG_DURATION_NOTE: &str =
    "a significant duration and might require medical attention.";
const SHORT_DURATION_NOTE: &str =
    "relatively recent. Monitor your symptoms for any changes.";

/// Input to [`SymptomAnalyzer::analyze`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRequest {
    /// Free-text description of the symptoms.
    pub symptoms: String,
    /// How long the symptoms have lasted, e.g. "2 weeks".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl SymptomRequest {
    /// Creates a request with only the free-text description.
    #[inline]
    pub fn new<S: Into<String>>(symptoms: S) -> Self {
        Self {
            symptoms: symptoms.into(),
            ..Default::default()
        }
    }

    /// Attaches how long the symptoms have lasted.
    #[inline]
    pub fn with_duration<S: Into<String>>(mut self, duration: S) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Attaches a severity description.
    #[inline]
    pub fn with_severity<S: Into<String>>(mut self, severity: S) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Attaches anything else the user wants to mention.
    #[inline]
    pub fn with_additional_info<S: Into<String>>(mut self, info: S) -> Self {
        self.additional_info = Some(info.into());
        self
    }
}

/// Foods to favor and to avoid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietAdvice {
    /// Foods and drinks that help.
    pub suggestions: Vec<String>,
    /// Foods and drinks to stay away from.
    pub avoid: Vec<String>,
}

/// An activity suggestion attached to an analysis.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub kind: String,
    pub duration: String,
    pub frequency: String,
    pub notes: String,
}

/// The structured outcome of one analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    /// Prose explanation, possibly followed by a duration note.
    pub analysis: String,
    /// Conditions worth considering, most likely first.
    #[serde(default)]
    pub possible_conditions: Vec<String>,
    /// Self-care steps.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Whether the user should see a healthcare provider.
    pub should_consult_doctor: bool,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<Medication>>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<DietAdvice>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<Vec<Exercise>>,
}

/// One row of the analyzer table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerEntry {
    /// Lower-case substring that selects this entry.
    pub keyword: String,
    /// The canned result returned on a match.
    pub response: AnalyzerResult,
}

/// Maps a free-text symptom description to a canned [`AnalyzerResult`].
///
/// Entries are scanned in table order and the first keyword contained in
/// the lower-cased symptoms wins. The analyzer never fails: unmatched
/// input gets the table's fallback response.
#[derive(Clone, Debug)]
pub struct SymptomAnalyzer {
    entries: Vec<AnalyzerEntry>,
    fallback: AnalyzerResult,
    latency: Duration,
}

impl SymptomAnalyzer {
    /// Creates an analyzer over the built-in table.
    #[inline]
    pub fn new() -> Self {
        Self::with_knowledge(&KnowledgeBase::builtin())
    }

    /// Creates an analyzer over the tables of `knowledge`.
    pub fn with_knowledge(knowledge: &KnowledgeBase) -> Self {
        Self {
            entries: knowledge.analyzer_entries().to_vec(),
            fallback: knowledge.fallback().clone(),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Overrides the simulated latency.
    #[inline]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Returns the simulated latency.
    #[inline]
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Analyzes the request after the simulated latency.
    pub async fn analyze(&self, request: &SymptomRequest) -> AnalyzerResult {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        self.analyze_now(request)
    }

    /// The lookup behind [`SymptomAnalyzer::analyze`], without the delay.
    pub fn analyze_now(&self, request: &SymptomRequest) -> AnalyzerResult {
        let symptoms = request.symptoms.to_lowercase();
        let Some(entry) = self
            .entries
            .iter()
            .find(|entry| symptoms.contains(entry.keyword.as_str()))
        else {
            debug!("no analyzer entry matched");
            return self.fallback.clone();
        };
        debug!(keyword = %entry.keyword, "analyzer entry matched");

        let mut result = entry.response.clone();
        if let Some(duration) = &request.duration {
            result.analysis = with_duration_note(&result.analysis, duration);
        }
        result
    }
}

impl Default for SymptomAnalyzer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

fn with_duration_note(analysis: &str, duration: &str) -> String {
    // Matched as written: "2 Weeks" reads as recent.
    let note = if duration.contains("week") || duration.contains("month") {
        LONG_DURATION_NOTE
    } else {
        SHORT_DURATION_NOTE
    };
    format!(
        "{analysis} You've mentioned experiencing this for {duration}, which is {note}"
    )
}
