//! The fixed tag vocabulary and its keyword lists.
//!
//! Tags form a closed set; the declaration order here is the column order of
//! every rendered table, CSV header, and NDJSON `tags` object. Keyword lists
//! are part of the output contract: changing them changes every derived
//! classification.

/// Semantic category assigned to a permission via keyword matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Tag {
    DataPlane,
    ControlPlane,
    Mutating,
    Read,
    SideEffect,
}

impl Tag {
    /// Every tag, in the fixed column order.
    pub const ALL: [Tag; 5] = [
        Tag::DataPlane,
        Tag::ControlPlane,
        Tag::Mutating,
        Tag::Read,
        Tag::SideEffect,
    ];

    /// Column/header name for the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::DataPlane => "DATA_PLANE",
            Tag::ControlPlane => "CONTROL_PLANE",
            Tag::Mutating => "MUTATING",
            Tag::Read => "READ",
            Tag::SideEffect => "SIDE_EFFECT",
        }
    }

    /// Lowercase keywords whose presence in a permission name assigns the tag.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Tag::DataPlane => &["object", "bucket"],
            Tag::ControlPlane => &["policy", "attribute", "permission"],
            Tag::Mutating => &[
                "create", "delete", "modify", "add", "remove", "set", "update", "put",
            ],
            Tag::Read => &["get", "view", "list", "describe"],
            Tag::SideEffect => &[
                "start", "stop", "export", "request", "resend", "cancel", "continue", "estimate",
                "execute", "preview",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_tag_once_in_column_order() {
        let names: Vec<_> = Tag::ALL.iter().map(|tag| tag.as_str()).collect();
        assert_eq!(
            names,
            ["DATA_PLANE", "CONTROL_PLANE", "MUTATING", "READ", "SIDE_EFFECT"]
        );
    }

    #[test]
    fn ord_matches_column_order() {
        let mut sorted = Tag::ALL;
        sorted.sort();
        assert_eq!(sorted, Tag::ALL);
    }

    #[test]
    fn keywords_are_lowercase_and_nonempty() {
        for tag in Tag::ALL {
            assert!(!tag.keywords().is_empty(), "{} has no keywords", tag.as_str());
            for keyword in tag.keywords() {
                assert!(!keyword.is_empty());
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
