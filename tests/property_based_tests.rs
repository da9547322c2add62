mod common;

use common::strategies::*;
use object_mother::entity::merge_attributes;
use object_mother::kinds::classify;
use object_mother::test_helpers::RecordingStore;
use object_mother::{KindRegistry, ObjectMother};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    /// Property: every override key wins, every other base key survives
    #[test]
    fn merged_attributes_prefer_overrides(
        base in attributes_strategy(),
        overrides in attributes_strategy(),
    ) {
        let merged = merge_attributes(&base, Some(&overrides));

        for (key, value) in &overrides {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in &base {
            if !overrides.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        prop_assert!(merged.keys().all(|key| base.contains_key(key) || overrides.contains_key(key)));
    }

    /// Property: merging without overrides is the identity
    #[test]
    fn merge_without_overrides_is_identity(base in attributes_strategy()) {
        prop_assert_eq!(merge_attributes(&base, None), base);
    }

    /// Property: classified kinds are underscore-free and start upper-case
    #[test]
    fn classified_kinds_are_type_names(identifier in kind_identifier_strategy()) {
        let canonical = classify(&identifier);

        prop_assert!(!canonical.contains('_'));
        prop_assert!(canonical.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(canonical.to_lowercase(), identifier.replace('_', ""));
    }

    /// Property: classify is idempotent
    #[test]
    fn classify_is_idempotent(identifier in kind_identifier_strategy()) {
        let once = classify(&identifier);
        prop_assert_eq!(classify(&once), once);
    }

    /// Property: a plain factory call creates with exactly the layered attributes
    #[test]
    fn plain_factory_creates_layered_attributes(
        defaults in attributes_strategy(),
        base in attributes_strategy(),
        overrides in attributes_strategy(),
    ) {
        let users = Arc::new(RecordingStore::new("User"));
        let kinds = Arc::new(KindRegistry::new().with_kind("user", Arc::clone(&users)));
        let provided = defaults.clone();
        let mother = ObjectMother::new(kinds).with_defaults("user", move || provided.clone());
        mother.declare("fixture", "user", base.clone()).unwrap();

        mother.produce("fixture", Some(&overrides)).unwrap();

        let expected = merge_attributes(&merge_attributes(&defaults, Some(&base)), Some(&overrides));
        prop_assert_eq!(users.create_calls(), vec![expected]);
    }
}
