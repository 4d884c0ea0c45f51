//! The data tables behind the analyzer and the care-plan derivation.
//!
//! Both tables are plain data: adding a condition means adding a row,
//! never touching control flow. The built-in tables can be replaced
//! wholesale by a JSON document of the form:
//!
//! ```json
//! {
//!   "analyzer": [{ "keyword": "rash", "response": { ... } }],
//!   "fallback": { ... },
//!   "recommendations": [{ "triggers": ["rash"], "recommendation": { ... } }]
//! }
//! ```
//!
//! `fallback` may be omitted, in which case the built-in one is used.
//! Array order is match precedence.

mod builtin;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzerEntry, AnalyzerResult};
use crate::recommendation::{ConditionRule, RecommendationTable};

/// Error returned when a knowledge document cannot be used.
#[derive(Debug)]
pub enum KnowledgeError {
    /// The document is not valid JSON of the expected shape.
    Parse(serde_json::Error),
    /// An analyzer keyword or recommendation trigger is blank, which
    /// would match every input.
    BlankKeyword {
        /// The condition or keyword row that holds the blank entry.
        location: String,
    },
}

impl Display for KnowledgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeError::Parse(err) => {
                write!(f, "invalid knowledge document: {err}")
            }
            KnowledgeError::BlankKeyword { location } => {
                write!(f, "blank keyword in {location}")
            }
        }
    }
}

impl StdError for KnowledgeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            KnowledgeError::Parse(err) => Some(err),
            KnowledgeError::BlankKeyword { .. } => None,
        }
    }
}

impl From<serde_json::Error> for KnowledgeError {
    #[inline]
    fn from(value: serde_json::Error) -> Self {
        KnowledgeError::Parse(value)
    }
}

#[derive(Deserialize)]
struct KnowledgeDocument {
    analyzer: Vec<AnalyzerEntry>,
    fallback: Option<AnalyzerResult>,
    recommendations: Vec<ConditionRule>,
}

/// Analyzer entries, the analyzer fallback, and the recommendation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KnowledgeBase {
    analyzer: Vec<AnalyzerEntry>,
    fallback: AnalyzerResult,
    recommendations: RecommendationTable,
}

impl KnowledgeBase {
    /// Returns the tables the application ships with.
    pub fn builtin() -> Self {
        Self {
            analyzer: builtin::analyzer_entries(),
            fallback: builtin::fallback(),
            recommendations: RecommendationTable::new(
                builtin::condition_rules(),
            ),
        }
    }

    /// Loads tables from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let document: KnowledgeDocument = serde_json::from_str(json)?;

        let mut analyzer = document.analyzer;
        for entry in &mut analyzer {
            entry.keyword = entry.keyword.trim().to_lowercase();
            if entry.keyword.is_empty() {
                return Err(KnowledgeError::BlankKeyword {
                    location: "an analyzer entry".to_owned(),
                });
            }
        }
        for rule in &document.recommendations {
            if rule.triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(KnowledgeError::BlankKeyword {
                    location: rule.recommendation.condition.clone(),
                });
            }
        }

        Ok(Self {
            analyzer,
            fallback: document.fallback.unwrap_or_else(builtin::fallback),
            recommendations: RecommendationTable::new(document.recommendations),
        })
    }

    /// Serializes the tables into the document format read by
    /// [`KnowledgeBase::from_json`].
    pub fn to_json(&self) -> Result<String, KnowledgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the analyzer entries in match order.
    #[inline]
    pub fn analyzer_entries(&self) -> &[AnalyzerEntry] {
        &self.analyzer
    }

    /// Returns the response for input no entry matches.
    #[inline]
    pub fn fallback(&self) -> &AnalyzerResult {
        &self.fallback
    }

    /// Returns the care-plan table.
    #[inline]
    pub fn recommendations(&self) -> &RecommendationTable {
        &self.recommendations
    }
}

impl Default for KnowledgeBase {
    #[inline]
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let knowledge = KnowledgeBase::builtin();
        let keywords: Vec<_> = knowledge
            .analyzer_entries()
            .iter()
            .map(|e| e.keyword.as_str())
            .collect();
        assert_eq!(
            keywords,
            ["headache", "fever", "cough", "chest pain", "stomach pain"]
        );
        let conditions: Vec<_> = knowledge
            .recommendations()
            .rules()
            .iter()
            .map(|r| r.recommendation.condition.as_str())
            .collect();
        assert_eq!(
            conditions,
            [
                "Headache Relief",
                "Fever & Flu Care",
                "Cough Management",
                "Digestive Health"
            ]
        );
    }

    #[test]
    fn test_json_keeps_order() {
        let builtin = KnowledgeBase::builtin();
        let json = builtin.to_json().unwrap();
        let loaded = KnowledgeBase::from_json(&json).unwrap();
        assert_eq!(loaded, builtin);
    }

    #[test]
    fn test_custom_document() {
        let json = r#"{
            "analyzer": [{
                "keyword": "  Rash ",
                "response": {
                    "analysis": "Rashes are often harmless.",
                    "should_consult_doctor": false
                }
            }],
            "recommendations": [{
                "triggers": ["RASH"],
                "recommendation": { "condition": "Skin Care" }
            }]
        }"#;
        let knowledge = KnowledgeBase::from_json(json).unwrap();
        assert_eq!(knowledge.analyzer_entries()[0].keyword, "rash");
        assert_eq!(knowledge.fallback(), &builtin::fallback());
        let plan = knowledge.recommendations().derive("A rash").unwrap();
        assert_eq!(plan.condition, "Skin Care");
        assert!(plan.medications.is_empty());
    }

    #[test]
    fn test_blank_keyword() {
        let json = r#"{
            "analyzer": [],
            "recommendations": [{
                "triggers": [" "],
                "recommendation": { "condition": "Everything" }
            }]
        }"#;
        let err = KnowledgeBase::from_json(json).unwrap_err();
        assert!(matches!(err, KnowledgeError::BlankKeyword { .. }));
        assert_eq!(err.to_string(), "blank keyword in Everything");
    }

    #[test]
    fn test_parse_error() {
        let err = KnowledgeBase::from_json("{ not json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(_)));
        assert!(err.source().is_some());
    }
}
