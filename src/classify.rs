//! Keyword classification of permission names.
//!
//! Matching policy: a tag applies when any of its keywords occurs anywhere in
//! the lowercased permission name. Substring matching is total over arbitrary
//! input and picks up inflected keyword forms (`ListObjects` matches keyword
//! `object`); the flip side is that a keyword embedded in an unrelated longer
//! word also matches (`VerifyEmailAddress` matches `add`). That trade-off is
//! deliberate and covered by tests.
//!
//! A `Classification` is computed once from a validated catalog and passed
//! explicitly to the renderers; nothing here holds process-wide state.

use crate::catalog::{CatalogIndex, CatalogKey, PermissionName, ServiceName};
use crate::tags::Tag;
use std::collections::{BTreeMap, BTreeSet};

/// Tags matched by a single permission name.
pub fn classify_name(name: &str) -> BTreeSet<Tag> {
    let lowered = name.to_lowercase();
    let mut tags = BTreeSet::new();
    for tag in Tag::ALL {
        if tag.keywords().iter().any(|keyword| lowered.contains(keyword)) {
            tags.insert(tag);
        }
    }
    tags
}

#[derive(Debug)]
/// Immutable (service, permission) → tag-set mapping derived from a catalog.
pub struct Classification {
    catalog_key: CatalogKey,
    by_service: BTreeMap<ServiceName, BTreeMap<PermissionName, BTreeSet<Tag>>>,
}

impl Classification {
    /// Classify every permission in the index.
    ///
    /// The result iterates in stable order: services by prefix, permissions
    /// lexicographically within a service.
    pub fn classify(index: &CatalogIndex) -> Self {
        let by_service = index
            .entries()
            .map(|(service, actions)| {
                let tagged = actions
                    .iter()
                    .map(|action| (action.clone(), classify_name(action.as_str())))
                    .collect();
                (service.clone(), tagged)
            })
            .collect();

        Self {
            catalog_key: index.key().clone(),
            by_service,
        }
    }

    /// Key of the catalog this classification was computed from.
    pub fn catalog_key(&self) -> &CatalogKey {
        &self.catalog_key
    }

    /// Iterates every (service, permission, tags) triple in stable order.
    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (&ServiceName, &PermissionName, &BTreeSet<Tag>)> {
        self.by_service.iter().flat_map(|(service, actions)| {
            actions
                .iter()
                .map(move |(action, tags)| (service, action, tags))
        })
    }

    /// Resolve the tag set for one (service, permission) pair.
    pub fn tags(&self, service: &ServiceName, permission: &PermissionName) -> Option<&BTreeSet<Tag>> {
        self.by_service.get(service)?.get(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_set(tags: &[Tag]) -> BTreeSet<Tag> {
        tags.iter().copied().collect()
    }

    #[test]
    fn create_bucket_is_mutating_data_plane() {
        assert_eq!(
            classify_name("CreateBucket"),
            tag_set(&[Tag::Mutating, Tag::DataPlane])
        );
    }

    #[test]
    fn list_objects_is_read_data_plane() {
        // `object` matches the plural form via the substring policy.
        assert_eq!(
            classify_name("ListObjects"),
            tag_set(&[Tag::Read, Tag::DataPlane])
        );
    }

    #[test]
    fn get_policy_is_read_control_plane() {
        assert_eq!(
            classify_name("GetPolicy"),
            tag_set(&[Tag::Read, Tag::ControlPlane])
        );
    }

    #[test]
    fn substring_matches_inside_words() {
        // `add` inside `Address` counts as a match under the substring policy.
        let tags = classify_name("VerifyEmailAddress");
        assert!(tags.contains(&Tag::Mutating));
    }

    #[test]
    fn unmatched_names_yield_empty_sets() {
        assert!(classify_name("Subscribe").is_empty());
        assert!(classify_name("").is_empty());
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify_name("CREATEBUCKET"), classify_name("createbucket"));
        assert_eq!(classify_name("CreateBucket"), classify_name("createBucket"));
    }

    #[test]
    fn classification_iterates_in_stable_order_and_resolves_lookups() {
        use serde_json::json;
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().expect("allocate catalog file");
        let doc = json!({
            "schema_version": "permission_catalog_v1",
            "description": "fixture",
            "services": {
                "Amazon S3": {"prefix": "s3", "actions": ["ListObjects", "CreateBucket"]},
                "AWS IAM": {"prefix": "iam", "actions": ["GetPolicy"]}
            }
        });
        write!(file, "{doc}").expect("write catalog fixture");
        let index = CatalogIndex::load(file.path()).expect("load fixture catalog");

        let classification = Classification::classify(&index);
        assert_eq!(classification.catalog_key().0, "permission_catalog_v1");

        let order: Vec<_> = classification
            .entries()
            .map(|(service, permission, _)| (service.as_str(), permission.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                ("iam", "GetPolicy"),
                ("s3", "CreateBucket"),
                ("s3", "ListObjects")
            ]
        );

        let tags = classification
            .tags(
                &ServiceName("s3".to_string()),
                &PermissionName("CreateBucket".to_string()),
            )
            .expect("lookup succeeds");
        assert_eq!(tags, &tag_set(&[Tag::Mutating, Tag::DataPlane]));
        assert!(
            classification
                .tags(
                    &ServiceName("s3".to_string()),
                    &PermissionName("Missing".to_string())
                )
                .is_none()
        );
    }
}
