//! Component naming.
//!
//! Component names in the registry are optionally prefixed with an
//! environment namespace (`blog_post` = namespace `blog` + local `post`).
//! A [`Namespace`] is constructed once at the boundary and every name that
//! crosses it is turned into a [`QualifiedName`]; comparisons then happen on
//! the local part instead of through repeated string prefix checks.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local name of the section synthesized for a template root without a marker.
pub const ROOT_SECTION_LOCAL: &str = "section";

/// An environment namespace that qualifies component names.
///
/// The empty namespace is valid and leaves names unprefixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from a raw prefix. The prefix is normalized the
    /// same way local names are.
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self(normalize(prefix.as_ref()))
    }

    /// The empty namespace.
    #[must_use]
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Returns the normalized prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty namespace.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a raw component name into this namespace.
    ///
    /// A leading `{namespace}_` is stripped; names without the prefix are
    /// adopted into the namespace as-is. A name that is the bare namespace
    /// has no local part and is rejected.
    pub fn qualify(&self, raw: &str) -> Result<QualifiedName> {
        let normalized = normalize(raw);
        if normalized.is_empty() || (!self.is_empty() && normalized == self.0) {
            return Err(Error::InvalidName(raw.to_string()));
        }

        let local = if self.is_empty() {
            normalized
        } else {
            match normalized
                .strip_prefix(self.0.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
            {
                Some(rest) if !rest.is_empty() => rest.to_string(),
                _ => normalized,
            }
        };

        Ok(QualifiedName {
            namespace: self.0.clone(),
            local,
        })
    }

    /// The name synthesized for a root section: `{namespace}_section`.
    pub fn root_section(&self) -> QualifiedName {
        QualifiedName {
            namespace: self.0.clone(),
            local: ROOT_SECTION_LOCAL.to_string(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A component name split into its namespace and local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: String,
    local: String,
}

impl QualifiedName {
    /// Returns the namespace part (empty when unprefixed).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the local part.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Returns the registry name: `{namespace}_{local}`, or `local` alone.
    pub fn canonical(&self) -> String {
        if self.namespace.is_empty() {
            self.local.clone()
        } else {
            format!("{}_{}", self.namespace, self.local)
        }
    }

    /// Two names match when their local parts are equal, regardless of the
    /// namespace they were seen under.
    pub fn matches(&self, other: &QualifiedName) -> bool {
        self.local == other.local
    }

    /// Returns true for the synthesized root section name.
    pub fn is_root_section(&self) -> bool {
        self.local == ROOT_SECTION_LOCAL
    }

    /// Human-readable display name: `blog_post` -> `Blog Post`.
    pub fn display_name(&self) -> String {
        self.canonical()
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single underscore.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
