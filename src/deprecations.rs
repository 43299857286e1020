//! # Kubernetes API Changes
//!
//! Static reference table of Kubernetes API deprecations, removals and
//! additions, keyed by the minor release that introduced them.
//!
//! The report itself never depends on this table. When a target cluster version
//! is configured, the reporter uses `changes_for` to warn about reported
//! resources whose group/version/kind is deprecated or gone by that release.

use std::fmt;
use std::str::FromStr;

/// Kubernetes `MAJOR.MINOR` release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KubeVersion {
    pub major: u32,
    pub minor: u32,
}

impl KubeVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for KubeVersion {
    type Err = String;

    /// Accepts `1.22`, `v1.22` and `1.22.3` (patch ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');
        let (Some(major), Some(minor)) = (parts.next(), parts.next()) else {
            return Err(format!("'{s}' is not a MAJOR.MINOR version"));
        };
        let major = major
            .parse()
            .map_err(|e| format!("'{s}' has an invalid major version: {e}"))?;
        let minor = minor
            .parse()
            .map_err(|e| format!("'{s}' has an invalid minor version: {e}"))?;
        Ok(Self { major, minor })
    }
}

/// API group, version and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gvk {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
}

impl Gvk {
    const fn new(group: &'static str, version: &'static str, kind: &'static str) -> Self {
        Self {
            group,
            version,
            kind,
        }
    }

    #[must_use]
    pub fn matches(&self, group: &str, version: &str, kind: &str) -> bool {
        self.group == group && self.version == version && self.kind == kind
    }
}

impl fmt::Display for Gvk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.kind)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.kind)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Deprecation,
    Removal,
    Addition,
}

impl ChangeKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Deprecation => "deprecated",
            ChangeKind::Removal => "removed",
            ChangeKind::Addition => "added",
        }
    }
}

/// One API change introduced by a release
#[derive(Debug, Clone, Copy)]
pub struct ApiChange {
    pub kind: ChangeKind,
    pub resource: Gvk,
    pub replaced_by: Option<Gvk>,
    pub notable_changes: &'static [&'static str],
}

/// Changes introduced by one release
#[derive(Debug, Clone, Copy)]
pub struct Release {
    pub version: KubeVersion,
    pub changes: &'static [ApiChange],
}

const EXTENSIONS: &str = "extensions";
const NETWORKING: &str = "networking.k8s.io";
const APPS: &str = "apps";
const POLICY: &str = "policy";

const DAEMONSET_NOTES: &[&str] = &[
    "spec.templateGeneration is removed",
    "spec.selector is now required and immutable after creation; use the existing template labels as the selector for seamless upgrades",
    "spec.updateStrategy.type now defaults to RollingUpdate (the default in extensions/v1beta1 was OnDelete)",
];

const DEPLOYMENT_NOTES: &[&str] = &[
    "spec.rollbackTo is removed",
    "spec.selector is now required and immutable after creation; use the existing template labels as the selector for seamless upgrades",
    "spec.progressDeadlineSeconds now defaults to 600 seconds (the default in extensions/v1beta1 was no deadline)",
    "spec.revisionHistoryLimit now defaults to 10 (the default in apps/v1beta1 was 2, the default in extensions/v1beta1 was to retain all)",
    "maxSurge and maxUnavailable now default to 25% (the default in extensions/v1beta1 was 1)",
];

const STATEFULSET_NOTES: &[&str] = &[
    "spec.selector is now required and immutable after creation; use the existing template labels as the selector for seamless upgrades",
    "spec.updateStrategy.type now defaults to RollingUpdate (the default in apps/v1beta1 was OnDelete)",
];

const REPLICASET_NOTES: &[&str] = &[
    "spec.selector is now required and immutable after creation; use the existing template labels as the selector for seamless upgrades",
];

const fn removal(
    resource: Gvk,
    replaced_by: Gvk,
    notable_changes: &'static [&'static str],
) -> ApiChange {
    ApiChange {
        kind: ChangeKind::Removal,
        resource,
        replaced_by: Some(replaced_by),
        notable_changes,
    }
}

const V1_16: &[ApiChange] = &[
    removal(
        Gvk::new(EXTENSIONS, "v1beta1", "NetworkPolicy"),
        Gvk::new(NETWORKING, "v1", "NetworkPolicy"),
        &[],
    ),
    removal(
        Gvk::new(EXTENSIONS, "v1beta1", "DaemonSet"),
        Gvk::new(APPS, "v1", "DaemonSet"),
        DAEMONSET_NOTES,
    ),
    removal(
        Gvk::new(EXTENSIONS, "v1beta2", "DaemonSet"),
        Gvk::new(APPS, "v1", "DaemonSet"),
        DAEMONSET_NOTES,
    ),
    removal(
        Gvk::new(EXTENSIONS, "v1beta1", "Deployment"),
        Gvk::new(APPS, "v1", "Deployment"),
        DEPLOYMENT_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta1", "Deployment"),
        Gvk::new(APPS, "v1", "Deployment"),
        DEPLOYMENT_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta2", "Deployment"),
        Gvk::new(APPS, "v1", "Deployment"),
        DEPLOYMENT_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta1", "StatefulSet"),
        Gvk::new(APPS, "v1", "StatefulSet"),
        STATEFULSET_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta2", "StatefulSet"),
        Gvk::new(APPS, "v1", "StatefulSet"),
        STATEFULSET_NOTES,
    ),
    removal(
        Gvk::new(EXTENSIONS, "v1beta1", "ReplicaSet"),
        Gvk::new(APPS, "v1", "ReplicaSet"),
        REPLICASET_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta1", "ReplicaSet"),
        Gvk::new(APPS, "v1", "ReplicaSet"),
        REPLICASET_NOTES,
    ),
    removal(
        Gvk::new(APPS, "v1beta2", "ReplicaSet"),
        Gvk::new(APPS, "v1", "ReplicaSet"),
        REPLICASET_NOTES,
    ),
    removal(
        Gvk::new(EXTENSIONS, "v1beta1", "PodSecurityPolicy"),
        Gvk::new(POLICY, "v1beta1", "PodSecurityPolicy"),
        &[],
    ),
];

const V1_19: &[ApiChange] = &[
    ApiChange {
        kind: ChangeKind::Deprecation,
        resource: Gvk::new(EXTENSIONS, "v1beta1", "Ingress"),
        replaced_by: Some(Gvk::new(NETWORKING, "v1", "Ingress")),
        notable_changes: &[],
    },
    ApiChange {
        kind: ChangeKind::Addition,
        resource: Gvk::new(NETWORKING, "v1", "IngressClass"),
        replaced_by: None,
        notable_changes: &[],
    },
];

/// Known releases in ascending order; releases without API changes are listed
/// so the covered range is explicit
pub static RELEASES: &[Release] = &[
    Release {
        version: KubeVersion::new(1, 16),
        changes: V1_16,
    },
    Release {
        version: KubeVersion::new(1, 17),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 18),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 19),
        changes: V1_19,
    },
    Release {
        version: KubeVersion::new(1, 20),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 21),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 22),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 23),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 24),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 25),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 26),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 27),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 28),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 29),
        changes: &[],
    },
    Release {
        version: KubeVersion::new(1, 30),
        changes: &[],
    },
];

/// Deprecations and removals of `group/version/kind` introduced at or before `target`
pub fn changes_for<'a>(
    group: &'a str,
    version: &'a str,
    kind: &'a str,
    target: KubeVersion,
) -> impl Iterator<Item = (KubeVersion, &'static ApiChange)> + 'a {
    RELEASES
        .iter()
        .take_while(move |release| release.version <= target)
        .flat_map(|release| {
            release
                .changes
                .iter()
                .map(move |change| (release.version, change))
        })
        .filter(move |(_, change)| {
            change.kind != ChangeKind::Addition && change.resource.matches(group, version, kind)
        })
}
