//! # Report Rows
//!
//! One row per managed resource: owning application, group, version, kind and
//! the resource name in the configured format.

use crate::argocd::ResourceNode;
use crate::constants::{HEADER_NAME_BARE, HEADER_NAME_NAMESPACED, HEADER_PREFIX};

/// How the last column renders a resource name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFormat {
    /// `namespace/name`, or `name` alone for cluster-scoped resources
    #[default]
    Namespaced,
    /// `name` only
    Bare,
}

impl NameFormat {
    /// Header row for this format
    #[must_use]
    pub fn header(&self) -> [&'static str; 5] {
        let [application, group, version, kind] = HEADER_PREFIX;
        let name = match self {
            NameFormat::Namespaced => HEADER_NAME_NAMESPACED,
            NameFormat::Bare => HEADER_NAME_BARE,
        };
        [application, group, version, kind, name]
    }

    #[must_use]
    pub fn render(&self, namespace: &str, name: &str) -> String {
        match self {
            NameFormat::Namespaced if !namespace.is_empty() => format!("{namespace}/{name}"),
            NameFormat::Namespaced | NameFormat::Bare => name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub application: String,
    pub group: String,
    pub version: String,
    pub kind: String,
    pub name: String,
}

impl ReportRow {
    #[must_use]
    pub fn from_node(application: &str, node: &ResourceNode, format: NameFormat) -> Self {
        Self {
            application: application.to_string(),
            group: node.group.clone(),
            version: node.version.clone(),
            kind: node.kind.clone(),
            name: format.render(&node.namespace, &node.name),
        }
    }

    /// Fields in column order
    #[must_use]
    pub fn fields(&self) -> [&str; 5] {
        [
            self.application.as_str(),
            self.group.as_str(),
            self.version.as_str(),
            self.kind.as_str(),
            self.name.as_str(),
        ]
    }
}
