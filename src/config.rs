//! Parser configuration data.

use arrayvec::ArrayVec;
use phf::Set;

/// The default recursion depth cap.
///
/// This matches MediaWiki's `$wgMaxTemplateDepth` expansion limit. Constructs
/// opened beyond this depth are treated as plain text instead of recursing.
pub const MAX_DEPTH: usize = 40;

/// The longest recognized escape tag name, in bytes.
const MAX_TAG_LEN: usize = 16;

/// Tag names whose interior is never parsed, lowercased.
pub static ESCAPE_TAGS: Set<&str> = phf::phf_set! {
    "nowiki",
    "pre",
};

/// Configuration for a [`Parser`](crate::Parser).
#[derive(Clone, Copy, Debug)]
pub struct Configuration {
    /// Tag names whose interior is treated as literal text, lowercased.
    pub escape_tags: &'static Set<&'static str>,

    /// The maximum construct nesting depth before the parser degrades to
    /// plain text.
    pub max_depth: usize,
}

impl Configuration {
    /// The stock configuration.
    pub const DEFAULT: Self = Self {
        escape_tags: &ESCAPE_TAGS,
        max_depth: MAX_DEPTH,
    };

    /// Returns true if `name` is a registered escape tag. Matching is ASCII
    /// case-insensitive.
    pub(crate) fn is_escape_tag(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > MAX_TAG_LEN {
            return false;
        }

        let mut lower = ArrayVec::<u8, MAX_TAG_LEN>::new_const();
        for byte in name.bytes() {
            if !byte.is_ascii_alphanumeric() {
                return false;
            }
            lower.push(byte.to_ascii_lowercase());
        }

        core::str::from_utf8(&lower).is_ok_and(|name| self.escape_tags.contains(name))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
