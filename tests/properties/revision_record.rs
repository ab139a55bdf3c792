//! Property tests for revision record serialization.

use proptest::prelude::*;

use deltaship::domain::entities::{Tree, TreeEntry};
use deltaship::infrastructure::JsonRevisionRepository;
use deltaship::{Fingerprint, Revision};

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._ -]{1,12}").unwrap()
}

fn tree() -> impl Strategy<Value = Tree> {
    let digest = proptest::string::string_regex("[0-9a-f]{8}").unwrap();
    let leaf = digest.prop_map(TreeEntry::File);
    let entry = leaf.prop_recursive(3, 24, 4, |inner| {
        proptest::collection::btree_map(name(), inner, 0..4).prop_map(TreeEntry::Directory)
    });
    proptest::collection::btree_map(name(), entry, 0..6)
}

fn fingerprint() -> impl Strategy<Value = Fingerprint> {
    prop_oneof![
        proptest::string::string_regex("[0-9a-f]{40}")
            .unwrap()
            .prop_map(Fingerprint::Revision),
        tree().prop_map(Fingerprint::Tree),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse(serialize(r)) == r` for any record.
    #[test]
    fn property_revision_round_trips(
        entries in proptest::collection::btree_map(name(), fingerprint(), 0..4)
    ) {
        let mut revision = Revision::new();
        for (location, fingerprint) in entries {
            revision.set(location, fingerprint);
        }

        let repo = JsonRevisionRepository::new();
        let parsed = repo.parse(&repo.serialize(&revision).unwrap()).unwrap();
        prop_assert_eq!(parsed, revision);
    }
}
