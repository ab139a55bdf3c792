//! Property tests for action ordering.

use std::cmp::Ordering;

use proptest::prelude::*;

use deltaship::Action;

fn action() -> impl Strategy<Value = Action> {
    let path = proptest::string::string_regex("[a-c]{1,2}(/[a-c]{1,2}){0,2}").unwrap();
    (path, any::<bool>()).prop_map(|(path, add)| {
        if add {
            Action::add(path)
        } else {
            Action::del(path)
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Sorting puts every DEL before every ADD and is deterministic.
    #[test]
    fn property_sort_is_deterministic_dels_first(
        actions in proptest::collection::vec(action(), 0..24)
    ) {
        let mut sorted = actions.clone();
        sorted.sort();

        let mut reversed = actions.clone();
        reversed.reverse();
        reversed.sort();
        prop_assert_eq!(&sorted, &reversed);

        let first_add = sorted.iter().position(|a| a.is_add()).unwrap_or(sorted.len());
        prop_assert!(sorted[first_add..].iter().all(|a| a.is_add()));
    }

    /// PROPERTY: Ordering is total and consistent with equality.
    #[test]
    fn property_ordering_is_total(a in action(), b in action()) {
        match a.cmp(&b) {
            Ordering::Equal => prop_assert_eq!(&a, &b),
            ordering => {
                prop_assert_ne!(&a, &b);
                prop_assert_eq!(b.cmp(&a), ordering.reverse());
            }
        }
    }
}
