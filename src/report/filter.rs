//! # Health Filter
//!
//! Decides which applications make it into the report based on the health
//! status the controller reports for them.

use crate::argocd::Application;
use crate::constants::ADMITTED_HEALTH_STATUSES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthFilter {
    /// Report every application regardless of health
    All,
    /// Report only applications that are `Healthy` or `Progressing`
    #[default]
    HealthyOrProgressing,
}

impl HealthFilter {
    #[must_use]
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            HealthFilter::HealthyOrProgressing
        } else {
            HealthFilter::All
        }
    }

    /// Whether `application` should be reported
    #[must_use]
    pub fn admits(&self, application: &Application) -> bool {
        match self {
            HealthFilter::All => true,
            HealthFilter::HealthyOrProgressing => {
                ADMITTED_HEALTH_STATUSES.contains(&application.health_status())
            }
        }
    }
}
