//! Property tests for the content-hash source.

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;

use deltaship::domain::entities::HashOptions;
use deltaship::infrastructure::HashSource;
use deltaship::{Action, Source};

/// Relative file paths mapped to content. Directory segments never contain
/// a dot and file names always do, so no path is both a file and a directory.
fn tree() -> impl Strategy<Value = BTreeMap<String, String>> {
    let path = proptest::string::string_regex("([a-c]{1,2}/){0,2}[a-d]\\.txt").unwrap();
    let content = proptest::string::string_regex("[a-z]{0,8}").unwrap();
    proptest::collection::btree_map(path, content, 0..12)
}

fn materialize(root: &Path, files: &BTreeMap<String, String>) {
    for (path, content) in files {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A fingerprint diffed against itself yields no action.
    #[test]
    fn property_self_diff_is_empty(files in tree()) {
        let base = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        materialize(base.path(), &files);

        let source = HashSource::new(HashOptions::default());
        let fingerprint = source.current(base.path()).unwrap();
        let actions = source
            .diff(base.path(), work.path(), Some(&fingerprint), &fingerprint)
            .unwrap();

        prop_assert!(actions.is_empty());
    }

    /// PROPERTY: A first deploy adds every file and deletes nothing.
    #[test]
    fn property_first_diff_adds_every_file(files in tree()) {
        let base = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        materialize(base.path(), &files);

        let source = HashSource::new(HashOptions::default());
        let fingerprint = source.current(base.path()).unwrap();
        let mut actions = source.diff(base.path(), work.path(), None, &fingerprint).unwrap();
        actions.sort();

        let expected: Vec<Action> = files.keys().map(|p| Action::add(p.as_str())).collect();
        prop_assert_eq!(actions, expected);
    }

    /// PROPERTY: Changing one file yields exactly one ADD for it.
    #[test]
    fn property_one_change_one_add(files in tree(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!files.is_empty());
        let base = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        materialize(base.path(), &files);

        let source = HashSource::new(HashOptions::default());
        let from = source.current(base.path()).unwrap();

        let changed = files.keys().nth(pick.index(files.len())).unwrap();
        let previous = &files[changed];
        std::fs::write(base.path().join(changed), format!("{}!", previous)).unwrap();

        let to = source.current(base.path()).unwrap();
        let actions = source.diff(base.path(), work.path(), Some(&from), &to).unwrap();

        prop_assert_eq!(actions, vec![Action::add(changed.as_str())]);
    }
}
