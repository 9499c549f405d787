//! Resource type tags and limit-kind vocabulary.
//!
//! These are the small closed sets the comparison is keyed on: which kind of
//! Kubernetes object a record describes, and which constraint category
//! (limits or requests) a dimension map belongs to.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// Sentinel used for every value that is absent from a record or baseline.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Kind tag used for PVC entries in the not-in-baseline map.
pub const PVC_KIND: &str = "PersistentVolumeClaim";

/// Kubernetes resource types that can be collected and compared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// `apps/v1` Deployments.
    Deployments,
    /// `apps/v1` StatefulSets.
    StatefulSets,
    /// `batch/v1` CronJobs.
    CronJobs,
    /// `apps/v1` DaemonSets.
    DaemonSets,
    /// PersistentVolumeClaims.
    Pvc,
}

impl ResourceType {
    /// All supported resource types, in collection order.
    pub const ALL: [Self; 5] = [
        Self::Deployments,
        Self::StatefulSets,
        Self::CronJobs,
        Self::DaemonSets,
        Self::Pvc,
    ];

    /// Returns the category name used in baselines and snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployments => "deployments",
            Self::StatefulSets => "statefulsets",
            Self::CronJobs => "cronjobs",
            Self::DaemonSets => "daemonsets",
            Self::Pvc => "pvc",
        }
    }

    /// Returns true if records of this type are compared by capacity.
    #[must_use]
    pub const fn is_pvc(self) -> bool {
        matches!(self, Self::Pvc)
    }

    /// Tag recorded in the `type` field of a not-in-baseline entry.
    #[must_use]
    pub const fn not_in_baseline_tag(self) -> &'static str {
        match self {
            Self::Pvc => PVC_KIND,
            other => other.as_str(),
        }
    }
}

impl FromStr for ResourceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownResourceType {
                resource_type: s.to_string(),
            })
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint category tracked per container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// Resource limits.
    Limits,
    /// Resource requests.
    Requests,
}

impl LimitKind {
    /// Both limit kinds, in comparison order.
    pub const ALL: [Self; 2] = [Self::Limits, Self::Requests];

    /// Lowercase name as used in baselines (`limits`, `requests`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limits => "limits",
            Self::Requests => "requests",
        }
    }

    /// Capitalized suffix as used in record field names (`Limits`, `Requests`).
    #[must_use]
    pub const fn field_suffix(self) -> &'static str {
        match self {
            Self::Limits => "Limits",
            Self::Requests => "Requests",
        }
    }
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
