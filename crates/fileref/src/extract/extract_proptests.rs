//! Property-based tests for extraction invariants
//!
//! Descriptions are assembled from generated file names so the in-memory
//! filesystem always knows which references should resolve.

use super::*;
use crate::fs::MemoryFileSystem;
use crate::glob::GlobMatcher;
use crate::observer::NullObserver;
use crate::paths::normalize;
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Component;

// File names without whitespace, quotes, stars or trailing punctuation
fn file_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}\\.(csv|json|txt)".prop_map(|s| s.to_string())
}

// A mention of one file in one of the supported forms
fn mention_strategy() -> impl Strategy<Value = (String, u8)> {
    (file_name_strategy(), 0u8..3)
}

fn render(name: &str, form: u8) -> String {
    match form {
        0 => format!("file: ./{}", name),
        1 => format!("\"./{}\"", name),
        _ => format!("output: ./{}", name),
    }
}

fn extractor_with(names: &[String]) -> ReferenceExtractor {
    let fs = names.iter().fold(MemoryFileSystem::new(), |fs, name| {
        fs.with_file(format!("/work/{}", name))
    });
    ReferenceExtractor::default()
        .with_base_dir("/work")
        .with_file_system(fs)
        .with_observer(NullObserver)
}

// Property 1: a glob without stars matches exactly its own text
proptest! {
    #[test]
    fn prop_literal_glob_matches_itself(name in "[^*]{1,20}") {
        let matcher = GlobMatcher::new(&name).unwrap();
        prop_assert!(matcher.is_match(&name));
    }
}

// Property 2: `prefix*suffix` matches anything spliced between them
proptest! {
    #[test]
    fn prop_star_matches_any_infix(
        prefix in "[^*]{0,8}",
        middle in ".{0,12}",
        suffix in "[^*]{0,8}"
    ) {
        let matcher = GlobMatcher::new(&format!("{}*{}", prefix, suffix)).unwrap();
        let candidate = format!("{}{}{}", prefix, middle, suffix);
        prop_assert!(matcher.is_match(&candidate));
    }
}

// Property 3: normalization is idempotent and leaves no `.` or `..` in absolute paths
proptest! {
    #[test]
    fn prop_normalize_idempotent(parts in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,4})", 0..10)) {
        let raw = format!("/{}", parts.join("/"));
        let once = normalize(Path::new(&raw));
        let twice = normalize(&once);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.is_absolute());
        prop_assert!(once
            .components()
            .all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
    }
}

// Property 4: each local path appears at most once per kind
proptest! {
    #[test]
    fn prop_references_unique_per_kind(mentions in prop::collection::vec(mention_strategy(), 0..12)) {
        let names: Vec<String> = mentions.iter().map(|(name, _)| name.clone()).collect();
        let description = mentions
            .iter()
            .map(|(name, form)| render(name, *form))
            .collect::<Vec<_>>()
            .join(" and ");

        let result = extractor_with(&names).parse(&description, None);

        let mut seen = HashSet::new();
        for reference in &result.references {
            prop_assert!(seen.insert((reference.kind, reference.local_path.clone())));
        }
    }
}

// Property 5: reparsing rewritten text finds no new inputs
proptest! {
    #[test]
    fn prop_rewrite_stable_under_reparse(mentions in prop::collection::vec(mention_strategy(), 0..12)) {
        let names: Vec<String> = mentions.iter().map(|(name, _)| name.clone()).collect();
        let description = mentions
            .iter()
            .map(|(name, form)| render(name, *form))
            .collect::<Vec<_>>()
            .join(", ");

        let extractor = extractor_with(&names);
        let first = extractor.parse(&description, None);
        let second = extractor.parse(&first.updated_description, None);

        prop_assert_eq!(second.inputs().count(), 0);
        prop_assert!(!first.updated_description.contains("./"));
    }
}

// Property 6: text without any keyword or quote is returned unchanged
proptest! {
    #[test]
    fn prop_plain_text_untouched(text in "[a-zA-Z0-9 ,.!?\n]{0,80}") {
        let result = extractor_with(&[]).parse(&text, None);

        prop_assert!(result.references.is_empty());
        prop_assert_eq!(result.updated_description, text);
    }
}
