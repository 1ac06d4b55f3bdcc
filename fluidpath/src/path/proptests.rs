//! Property-based tests for semantic paths.
//!
//! The smaller per-module property tests stay next to their code; this module
//! checks properties that span construction, rendering and relationships.

use super::relationship::PathRelationship;
use super::{SemanticPath, SemanticType};
use proptest::prelude::*;
use std::path::{PathBuf, MAIN_SEPARATOR};

fn component_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}(\\.[a-z0-9]{1,4}){0,3}"
}

fn relative_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(component_strategy(), 1..6).prop_map(|parts| parts.join("/"))
}

fn absolute_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(component_strategy(), 1..8).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // The rendered form ends with a separator exactly for directories.
    #[test]
    fn rendering_marks_directories(s in relative_strategy(), dir in any::<bool>()) {
        let spelled = if dir { format!("{s}/") } else { s };
        let p = SemanticPath::new(spelled.as_str());
        let rendered = p.to_string();
        prop_assert_eq!(
            rendered.ends_with(MAIN_SEPARATOR),
            p.semantic_type() == SemanticType::Directory
        );
    }

    // Parsing the rendered form reproduces the value.
    #[test]
    fn render_round_trip(s in relative_strategy(), dir in any::<bool>()) {
        let spelled = if dir { format!("{s}/") } else { s };
        let p = SemanticPath::new(spelled.as_str());
        prop_assert_eq!(SemanticPath::new(p.to_string()), p);
    }

    // Replacing a suffix with itself changes nothing.
    #[test]
    fn with_own_suffix_is_noop(s in relative_strategy()) {
        let p = SemanticPath::new(s.as_str());
        let same = p.with_suffix(&p.suffix()).unwrap();
        prop_assert_eq!(same, p);
    }

    // Every parent is a directory containing the original path.
    #[test]
    fn parents_contain_path(path in absolute_path_strategy()) {
        let p = SemanticPath::new(path.as_path());
        for parent in p.parents() {
            prop_assert_eq!(parent.semantic_type(), SemanticType::Directory);
            prop_assert!(parent.contains(&p));
        }
    }

    // relative_to inverts join.
    #[test]
    fn relative_to_inverts_join(base in absolute_path_strategy(), rest in relative_strategy()) {
        let base = SemanticPath::new(base.as_path()).with_semantic_type(SemanticType::Directory);
        let joined = base.join([rest.as_str()]);
        let relative = joined.relative_to(&base, false).unwrap();
        prop_assert_eq!(base.join([&relative]), joined);
    }

    // Depth below an ancestor matches the number of joined components.
    #[test]
    fn relative_depth_counts_components(base in absolute_path_strategy(), rest in relative_strategy()) {
        let base = SemanticPath::new(base.as_path());
        let joined = base.join([rest.as_str()]);
        let expected = rest.split('/').count();
        prop_assert_eq!(base.relative_depth(&joined).unwrap(), expected);
        prop_assert_eq!(
            PathRelationship::between(base.as_path(), joined.as_path()),
            PathRelationship::Ancestor
        );
    }
}
