//! The directory of doctors a user can ask to be connected with.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

/// Latency the mock directory simulates before answering.
pub const DEFAULT_DIRECTORY_LATENCY: Duration = Duration::from_secs(1);

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A doctor listed in the sidebar.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
    /// Free text such as "Today" or "Next Week".
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Source of the doctors shown to the user.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Lists every available doctor.
    async fn doctors(&self) -> Vec<Doctor>;

    /// Looks up a doctor by id.
    async fn find(&self, id: &str) -> Option<Doctor> {
        self.doctors().await.into_iter().find(|d| d.id == id)
    }
}

/// A fixed list of four doctors.
#[derive(Clone, Debug)]
pub struct MockDoctorDirectory {
    latency: Duration,
}

impl MockDoctorDirectory {
    #[allow(missing_docs)]
    #[inline]
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_DIRECTORY_LATENCY,
        }
    }

    /// Overrides the simulated latency.
    #[inline]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockDoctorDirectory {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorDirectory for MockDoctorDirectory {
    async fn doctors(&self) -> Vec<Doctor> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        [
            ("1", "Dr. Sarah Johnson", "General Practice", "City Medical Center", "Today"),
            ("2", "Dr. Michael Chen", "Internal Medicine", "Westside Health Clinic", "Tomorrow"),
            ("3", "Dr. Emily Rodriguez", "Pediatrics", "Children's Health Center", "Today"),
            ("4", "Dr. James Wilson", "Cardiology", "Heart & Vascular Institute", "Next Week"),
        ]
        .into_iter()
        .map(|(id, name, specialty, location, availability)| Doctor {
            id: id.to_owned(),
            name: name.to_owned(),
            specialty: specialty.to_owned(),
            location: location.to_owned(),
            availability: availability.to_owned(),
            image: Some(PLACEHOLDER_IMAGE.to_owned()),
        })
        .collect()
    }
}
