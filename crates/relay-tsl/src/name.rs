//! Hierarchical identifiers of the emitted transition system.
//!
//! Identifiers are built only through typed constructors, so the
//! dot-to-bang re-spelling of elaborator names happens in exactly one
//! place and never leaks a dot into an emitted identifier. The only
//! dots the renderer ever prints are the `state.` / `next.` namespace
//! accessors introduced by [`Name::access`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identifier in the transition-system name space.
///
/// Equality, ordering, and hashing coincide with the rendered text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    text: String,
}

impl Name {
    /// A single segment. Every `.` in the input is re-spelled as `!`;
    /// applying this twice is the same as applying it once.
    pub fn segment(segment: impl AsRef<str>) -> Self {
        Name {
            text: segment.as_ref().replace('.', "!"),
        }
    }

    /// Scope nesting: `parent!child`.
    pub fn scope(&self, child: &Name) -> Name {
        Name {
            text: format!("{}!{}", self.text, child.text),
        }
    }

    /// Artifact suffixing: `base_tag`. Used to derive declaration names.
    pub fn suffix(&self, tag: impl AsRef<str>) -> Name {
        Name {
            text: format!("{}_{}", self.text, tag.as_ref().replace('.', "!")),
        }
    }

    /// A namespace accessor such as `state.x` or `next.x`. The dot is
    /// the accessor syntax of the checker, not part of the identifier.
    pub fn access(namespace: &str, name: &Name) -> Name {
        Name {
            text: format!("{}.{}", namespace, name.text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
