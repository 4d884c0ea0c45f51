//! Plain-text rendering of the panels a terminal front end shows.

use std::fmt::{self, Display, Write as _};
use std::str::FromStr;

use healthchat_core::doctors::Doctor;
use healthchat_core::recommendation::Recommendation;

/// Shown once before the first prompt.
pub const PRIVACY_NOTICE: &str = "\
Important Health Notice

This AI health assistant is for informational purposes only and is not a \
substitute for professional medical advice, diagnosis, or treatment.

Always seek the advice of your physician or other qualified health provider \
with any questions you may have regarding a medical condition.

For medical emergencies, please call your local emergency services \
immediately.";

/// Lists the commands understood by the prompt.
pub const HELP: &str = "\
Describe your symptoms, or use one of these commands:
  /plan [medications|diet|workout]  show the recommended care plan
  /duration <text>                  attach how long it has lasted to the next message
  /doctors                          list doctors available for a consultation
  /connect <id>                     ask to consult a doctor
  /voice                            dictate instead of typing
  /export                           print the conversation as JSON
  /clear                            start over
  /help                             show this help
  /quit                             leave";

/// One tab of the care-plan panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlanTab {
    #[allow(missing_docs)]
    #[default]
    Medications,
    #[allow(missing_docs)]
    Diet,
    #[allow(missing_docs)]
    Workout,
}

impl PlanTab {
    /// All tabs in display order.
    pub const ALL: [PlanTab; 3] =
        [PlanTab::Medications, PlanTab::Diet, PlanTab::Workout];

    #[inline]
    fn title(self) -> &'static str {
        match self {
            PlanTab::Medications => "Medications",
            PlanTab::Diet => "Diet",
            PlanTab::Workout => "Exercise",
        }
    }
}

/// Error returned when parsing an unknown tab name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTab(String);

impl Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tab {:?}, expected medications, diet or workout",
            self.0
        )
    }
}

impl std::error::Error for UnknownTab {}

impl FromStr for PlanTab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "medications" | "meds" => Ok(PlanTab::Medications),
            "diet" => Ok(PlanTab::Diet),
            "workout" | "exercise" => Ok(PlanTab::Workout),
            _ => Err(UnknownTab(s.trim().to_owned())),
        }
    }
}

/// Renders one tab of the care-plan panel, with the tab bar on top.
pub fn render_plan(plan: &Recommendation, tab: PlanTab) -> String {
    let mut out = format!(
        "{} Recommendations\nSuggested care plan based on your symptoms\n\n",
        plan.condition
    );

    let tabs: Vec<_> = PlanTab::ALL
        .iter()
        .map(|t| {
            if *t == tab {
                format!("[{}]", t.title())
            } else {
                format!(" {} ", t.title())
            }
        })
        .collect();
    out.push_str(&tabs.join(" "));
    out.push('\n');

    let before = out.len();
    match tab {
        PlanTab::Medications => {
            for med in &plan.medications {
                _ = write!(
                    out,
                    "\n{}\n  Dosage: {}\n  Frequency: {}\n",
                    med.name, med.dosage, med.frequency
                );
                if let Some(notes) = &med.notes {
                    _ = writeln!(out, "  Notes: {notes}");
                }
            }
        }
        PlanTab::Diet => {
            for item in &plan.diet {
                _ = write!(out, "\n{}\n  {}\n", item.meal, item.description);
            }
        }
        PlanTab::Workout => {
            for item in &plan.workout {
                _ = write!(
                    out,
                    "\n{}\n  {} · {}\n  {}\n",
                    item.name, item.duration, item.frequency, item.description
                );
            }
        }
    }
    if out.len() == before {
        out.push_str("\nNothing to show here yet.\n");
    }

    out
}

/// Renders the doctor sidebar.
pub fn render_doctors(doctors: &[Doctor]) -> String {
    let mut out = String::from("Recommended Doctors\n");
    for doctor in doctors {
        _ = write!(
            out,
            "\n[{}] {}\n    {} · {}\n    Available: {}\n",
            doctor.id,
            doctor.name,
            doctor.specialty,
            doctor.location,
            doctor.availability
        );
    }
    out.push_str("\nUse /connect <id> to request a consultation.\n");
    out
}
