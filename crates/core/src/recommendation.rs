//! Care plans and their derivation from assistant replies.

use serde::{Deserialize, Serialize};

/// A medication suggestion.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A diet suggestion for one meal or food group.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DietItem {
    pub meal: String,
    pub description: String,
}

/// A suggested exercise.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkoutItem {
    pub name: String,
    pub duration: String,
    pub frequency: String,
    pub description: String,
}

/// The care plan shown next to the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recommendation {
    /// Label of the matched condition, e.g. "Headache Relief".
    pub condition: String,
    /// Content of the "Medications" tab.
    #[serde(default)]
    pub medications: Vec<Medication>,
    /// Content of the "Diet" tab.
    #[serde(default)]
    pub diet: Vec<DietItem>,
    /// Content of the "Workout" tab.
    #[serde(default)]
    pub workout: Vec<WorkoutItem>,
}

impl Recommendation {
    /// The plan shown before any reply matched a condition.
    pub fn general_health() -> Self {
        let medication = |name: &str, dosage: &str, notes: &str| Medication {
            name: name.to_owned(),
            dosage: dosage.to_owned(),
            frequency: "Daily".to_owned(),
            notes: Some(notes.to_owned()),
        };
        let meal = |meal: &str, description: &str| DietItem {
            meal: meal.to_owned(),
            description: description.to_owned(),
        };
        let workout =
            |name: &str, duration: &str, frequency: &str, description: &str| {
                WorkoutItem {
                    name: name.to_owned(),
                    duration: duration.to_owned(),
                    frequency: frequency.to_owned(),
                    description: description.to_owned(),
                }
            };

        Self {
            condition: "General Health".to_owned(),
            medications: vec![
                medication("Vitamin D", "1000 IU", "With food for better absorption"),
                medication("Multivitamin", "1 tablet", "Morning after breakfast"),
            ],
            diet: vec![
                meal(
                    "Breakfast",
                    "Whole grain cereal with low-fat milk and fresh fruit",
                ),
                meal(
                    "Lunch",
                    "Lean protein (chicken or fish) with vegetables and whole grains",
                ),
                meal(
                    "Dinner",
                    "Vegetable soup with a side salad and whole grain bread",
                ),
                meal("Snacks", "Nuts, yogurt, or fresh fruit"),
            ],
            workout: vec![
                workout(
                    "Walking",
                    "30 minutes",
                    "Daily",
                    "Moderate pace, preferably outdoors",
                ),
                workout(
                    "Strength Training",
                    "20-30 minutes",
                    "2-3 times per week",
                    "Focus on major muscle groups with light weights",
                ),
                workout(
                    "Stretching",
                    "10 minutes",
                    "Daily",
                    "Gentle stretches for flexibility and stress relief",
                ),
            ],
        }
    }
}

/// One row of a [`RecommendationTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    /// Lower-case substrings, any of which selects this rule.
    pub triggers: Vec<String>,
    /// The plan installed when this rule is selected.
    pub recommendation: Recommendation,
}

impl ConditionRule {
    fn matches(&self, content_lower: &str) -> bool {
        self.triggers
            .iter()
            .any(|trigger| content_lower.contains(trigger.as_str()))
    }
}

/// Ordered rules mapping reply text to a care plan.
///
/// Rules are evaluated in declaration order and the first rule with any
/// matching trigger wins, even when a later rule would also match. A
/// reply mentioning both "fever" and "headache" therefore resolves to
/// whichever of the two was declared first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationTable {
    rules: Vec<ConditionRule>,
}

impl RecommendationTable {
    /// Creates a table from rules in precedence order. Triggers are
    /// lower-cased so matching stays case-insensitive.
    pub fn new(rules: impl IntoIterator<Item = ConditionRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                for trigger in &mut rule.triggers {
                    *trigger = trigger.to_lowercase();
                }
                rule
            })
            .collect();
        Self { rules }
    }

    /// Returns the rules in precedence order.
    #[inline]
    pub fn rules(&self) -> &[ConditionRule] {
        &self.rules
    }

    /// Picks the care plan for a reply, or `None` when nothing matches.
    pub fn derive(&self, content: &str) -> Option<&Recommendation> {
        let content_lower = content.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&content_lower))
            .map(|rule| &rule.recommendation)
    }
}
