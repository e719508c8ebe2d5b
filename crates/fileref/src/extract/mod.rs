//! Reference extraction and description rewriting.
//!
//! [`ReferenceExtractor::parse`] runs four passes over a description, always
//! matching against the original text:
//!
//! 1. `file: <path>`: existing files become inputs
//! 2. `"<path.ext>"` / `'<path.ext>'`: drag-and-drop paths, same treatment
//! 3. `files: <dir>/<glob>`: every matching file in `dir` becomes an input
//! 4. `output: <path>`: outputs, also scanned in the optional context text
//!
//! Rewrites are queued against the original byte offsets and applied once at
//! the end, so later passes never see earlier substitutions.

mod patterns;
mod state;

use crate::domain::{MatchRule, ParseResult, ReferenceKind};
use crate::fs::{FileSystem, HostFileSystem};
use crate::glob::{is_wildcard, GlobMatcher};
use crate::observer::{ParseEvent, ParseObserver, TracingObserver};
use crate::paths::{base_name, resolve_path, root_dir};
use crate::sandbox::SandboxLayout;
use patterns::{KeywordMatch, QuotedMatch};
use state::ParseState;
use std::path::{Path, PathBuf};

/// Extracts file references from task descriptions
///
/// # Example
///
/// ```
/// use fileref::fs::MemoryFileSystem;
/// use fileref::observer::NullObserver;
/// use fileref::ReferenceExtractor;
///
/// let extractor = ReferenceExtractor::default()
///     .with_base_dir("/work")
///     .with_file_system(MemoryFileSystem::new().with_file("/work/data.csv"))
///     .with_observer(NullObserver);
///
/// let result = extractor.parse("Process file: ./data.csv and output: ./out.json", None);
///
/// assert_eq!(result.references.len(), 2);
/// assert_eq!(
///     result.updated_description,
///     "Process file: /home/user/input/data.csv and output: /home/user/output/out.json"
/// );
/// ```
pub struct ReferenceExtractor {
    layout: SandboxLayout,
    base_dir: PathBuf,
    fs: Box<dyn FileSystem>,
    observer: Box<dyn ParseObserver>,
}

impl ReferenceExtractor {
    /// Create an extractor resolving relative paths against the working directory.
    ///
    /// Falls back to `.` when the working directory cannot be determined.
    pub fn new(layout: SandboxLayout) -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            layout,
            base_dir,
            fs: Box::new(HostFileSystem),
            observer: Box::new(TracingObserver),
        }
    }

    /// Resolve relative paths against `dir` instead of the working directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn layout(&self) -> &SandboxLayout {
        &self.layout
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Scan `description` (and `context` for outputs) and rewrite local paths.
    ///
    /// Never fails: missing files, unreadable directories and odd tokens are
    /// reported to the observer and otherwise skipped.
    ///
    /// Two rewrite rules callers may not expect:
    ///
    /// - A path mentioned more than once is rewritten at every mention, but
    ///   only the first mention adds a [`FileReference`](crate::FileReference).
    /// - Sentence punctuation (`.,;:!?`) trailing a bare path is not part of
    ///   the path and stays in the text after the rewritten path, so
    ///   `file: ./a.csv.` becomes `file: /home/user/input/a.csv.`.
    pub fn parse(&self, description: &str, context: Option<&str>) -> ParseResult {
        let mut state = ParseState::new(&self.layout, self.observer.as_ref());

        self.scan_single_files(description, &mut state);
        self.scan_quoted_paths(description, &mut state);
        self.scan_wildcards(description, &mut state);
        self.scan_outputs(description, context, &mut state);

        let (references, updated_description) = state.finish(description);
        ParseResult {
            references,
            updated_description,
        }
    }

    fn scan_single_files(&self, description: &str, state: &mut ParseState<'_>) {
        let matches: Vec<_> = patterns::file_rule()
            .captures_iter(description)
            .filter_map(|caps| KeywordMatch::from_captures(&caps))
            .collect();
        report_count(state, MatchRule::SingleFile, matches.len());

        for found in matches {
            let resolved = resolve_path(&self.base_dir, found.path);
            if let Some(sandbox_path) =
                self.accept_input(state, MatchRule::SingleFile, found.path, &resolved)
            {
                state.rewrite(
                    MatchRule::SingleFile,
                    found.span,
                    format!("file: {}", sandbox_path),
                );
            }
        }
    }

    fn scan_quoted_paths(&self, description: &str, state: &mut ParseState<'_>) {
        let matches: Vec<_> = patterns::quoted_rule()
            .captures_iter(description)
            .filter_map(|caps| QuotedMatch::from_captures(&caps))
            .collect();
        report_count(state, MatchRule::QuotedPath, matches.len());

        for found in matches {
            // a quoted keyword token belongs to that keyword's pass
            if patterns::ends_with_keyword(&description[..found.span.start]) {
                continue;
            }

            let resolved = resolve_path(&self.base_dir, found.path);
            if let Some(sandbox_path) =
                self.accept_input(state, MatchRule::QuotedPath, found.path, &resolved)
            {
                state.rewrite(
                    MatchRule::QuotedPath,
                    found.span,
                    format!("file: {}", sandbox_path),
                );
            }
        }
    }

    fn scan_wildcards(&self, description: &str, state: &mut ParseState<'_>) {
        let matches: Vec<_> = patterns::files_rule()
            .captures_iter(description)
            .filter_map(|caps| KeywordMatch::from_captures(&caps))
            .collect();
        report_count(state, MatchRule::Wildcard, matches.len());

        for found in matches {
            if !is_wildcard(found.path) {
                state.emit(ParseEvent::NotAWildcard {
                    raw: found.path.to_string(),
                });
                continue;
            }

            let resolved = resolve_path(&self.base_dir, found.path);
            if self.expand_wildcard(state, found.path, &resolved) {
                state.rewrite(
                    MatchRule::Wildcard,
                    found.span,
                    format!("files: {}", root_dir(self.layout.input_root())),
                );
            }
        }
    }

    /// Register every regular file matching `resolved`.
    ///
    /// Returns false when the pattern could not be evaluated at all, in which
    /// case the span is left as written.
    fn expand_wildcard(&self, state: &mut ParseState<'_>, raw: &str, resolved: &Path) -> bool {
        let (Some(dir), Some(glob)) = (resolved.parent(), base_name(resolved)) else {
            state.emit(ParseEvent::NoFileName {
                rule: MatchRule::Wildcard,
                raw: raw.to_string(),
            });
            return false;
        };

        let matcher = match GlobMatcher::new(&glob) {
            Ok(matcher) => matcher,
            Err(e) => {
                state.emit(ParseEvent::InvalidGlob {
                    pattern: raw.to_string(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let mut names = match self.fs.list_dir(dir) {
            Ok(names) => names,
            Err(e) => {
                state.emit(ParseEvent::DirectoryUnreadable {
                    dir: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                return false;
            }
        };
        names.sort();

        let mut matched = 0;
        for name in names.iter().filter(|name| matcher.is_match(name)) {
            let candidate = dir.join(name);
            if !state.first_sight_of_input(&candidate) {
                continue;
            }
            if !self.fs.is_file(&candidate) {
                continue;
            }
            if state
                .register(ReferenceKind::Input, MatchRule::Wildcard, name, &candidate)
                .is_some()
            {
                matched += 1;
            }
        }

        state.emit(ParseEvent::GlobMatched {
            pattern: raw.to_string(),
            dir: dir.to_path_buf(),
            count: matched,
        });
        true
    }

    fn scan_outputs(&self, description: &str, context: Option<&str>, state: &mut ParseState<'_>) {
        let texts = std::iter::once((description, true)).chain(context.map(|text| (text, false)));

        for (text, is_description) in texts {
            let matches: Vec<_> = patterns::output_rule()
                .captures_iter(text)
                .filter_map(|caps| KeywordMatch::from_captures(&caps))
                .collect();
            report_count(state, MatchRule::Output, matches.len());

            for found in matches {
                let resolved = resolve_path(&self.base_dir, found.path);

                let sandbox_path = if state.first_sight_of_output(&resolved) {
                    let placed = state.register(
                        ReferenceKind::Output,
                        MatchRule::Output,
                        found.path,
                        &resolved,
                    );
                    if placed.is_some() && !is_description {
                        state.emit(ParseEvent::ContextOnlyOutput {
                            raw: found.path.to_string(),
                            resolved: resolved.clone(),
                        });
                    }
                    placed
                } else {
                    state.registered_output(&resolved)
                };

                if let (Some(sandbox_path), true) = (sandbox_path, is_description) {
                    state.rewrite(
                        MatchRule::Output,
                        found.span,
                        format!("output: {}", sandbox_path),
                    );
                }
            }
        }
    }

    /// Decide whether a single-file or quoted candidate becomes an input.
    ///
    /// Returns the sandbox path to rewrite to: freshly registered, or the one
    /// given to the same path earlier in this call.
    fn accept_input(
        &self,
        state: &mut ParseState<'_>,
        rule: MatchRule,
        raw: &str,
        resolved: &Path,
    ) -> Option<String> {
        if let Some(existing) = state.registered_input(resolved) {
            return Some(existing);
        }
        if !state.first_sight_of_input(resolved) {
            return None;
        }

        let exists = self.fs.is_file(resolved);
        state.emit(ParseEvent::PathChecked {
            rule,
            raw: raw.to_string(),
            resolved: resolved.to_path_buf(),
            exists,
        });

        if !exists {
            state.emit(ParseEvent::InputMissing {
                rule,
                raw: raw.to_string(),
                resolved: resolved.to_path_buf(),
            });
            return None;
        }

        state.register(ReferenceKind::Input, rule, raw, resolved)
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new(SandboxLayout::default())
    }
}

fn report_count(state: &ParseState<'_>, rule: MatchRule, count: usize) {
    if count > 0 {
        state.emit(ParseEvent::PatternsFound { rule, count });
    }
}

/// Parse with the default layout, the host filesystem and `tracing` diagnostics
pub fn parse_file_references(description: &str, context: Option<&str>) -> ParseResult {
    ReferenceExtractor::default().parse(description, context)
}

#[cfg(test)]
#[path = "extract_proptests.rs"]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileReference;
    use crate::fs::MemoryFileSystem;
    use crate::observer::RecordingObserver;
    use crate::sandbox::CollisionPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn extractor(fs: MemoryFileSystem) -> (ReferenceExtractor, RecordingObserver) {
        let recorder = RecordingObserver::new();
        let extractor = ReferenceExtractor::default()
            .with_base_dir("/work")
            .with_file_system(fs)
            .with_observer(recorder.clone());
        (extractor, recorder)
    }

    #[test]
    fn test_single_file_and_output_example() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/work/data.csv"));

        let result = extractor.parse("Process file: ./data.csv and output: ./out.json", None);

        assert_eq!(
            result.references,
            vec![
                FileReference::input("/work/data.csv", "/home/user/input/data.csv"),
                FileReference::output("/work/out.json", "/home/user/output/out.json"),
            ]
        );
        assert_eq!(
            result.updated_description,
            "Process file: /home/user/input/data.csv and output: /home/user/output/out.json"
        );
    }

    #[test]
    fn test_missing_file_left_untouched() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new());

        let text = "Analyze file: ./missing.csv now";
        let result = extractor.parse(text, None);

        assert!(result.references.is_empty());
        assert_eq!(result.updated_description, text);
        assert!(recorder.events().iter().any(|event| matches!(
            event,
            ParseEvent::InputMissing { resolved, .. } if resolved == Path::new("/work/missing.csv")
        )));
    }

    #[test]
    fn test_directory_is_not_an_input() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_dir("/work/data"));

        let result = extractor.parse("file: ./data", None);
        assert!(result.references.is_empty());
    }

    #[test]
    fn test_trailing_punctuation_preserved() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/work/a.csv"));

        let result = extractor.parse("Read file: ./a.csv.", None);
        assert_eq!(
            result.updated_description,
            "Read file: /home/user/input/a.csv."
        );
    }

    #[test]
    fn test_quoted_file_value_registered_once() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/tmp/a.csv"));

        let result = extractor.parse(r#"Use file: "/tmp/a.csv" for this"#, None);

        assert_eq!(
            result.references,
            vec![FileReference::input("/tmp/a.csv", "/home/user/input/a.csv")]
        );
        assert_eq!(
            result.updated_description,
            "Use file: /home/user/input/a.csv for this"
        );
    }

    #[test]
    fn test_drag_and_drop_quoted_path() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new().with_file("/Users/me/Downloads/sales 2024.xlsx"),
        );

        let result = extractor.parse(
            "Summarize '/Users/me/Downloads/sales 2024.xlsx' by region",
            None,
        );

        assert_eq!(result.references.len(), 1);
        assert_eq!(
            result.references[0].sandbox_path,
            "/home/user/input/sales 2024.xlsx"
        );
        assert_eq!(
            result.updated_description,
            "Summarize file: /home/user/input/sales 2024.xlsx by region"
        );
    }

    #[test]
    fn test_quoted_duplicate_of_single_file_rewritten_without_new_reference() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/work/a.csv"));

        let result = extractor.parse(r#"file: ./a.csv, compare with "./a.csv""#, None);

        assert_eq!(result.references.len(), 1);
        assert_eq!(
            result.updated_description,
            "file: /home/user/input/a.csv, compare with file: /home/user/input/a.csv"
        );
    }

    #[test]
    fn test_quoted_output_value_is_only_an_output() {
        let (extractor, recorder) =
            extractor(MemoryFileSystem::new().with_file("/work/report.json"));

        let result = extractor.parse(r#"Regenerate output: "./report.json""#, None);

        assert_eq!(
            result.references,
            vec![FileReference::output(
                "/work/report.json",
                "/home/user/output/report.json"
            )]
        );
        assert_eq!(
            result.updated_description,
            "Regenerate output: /home/user/output/report.json"
        );
        assert!(!recorder
            .events()
            .iter()
            .any(|event| matches!(event, ParseEvent::RewriteConflict { .. })));
    }

    #[test]
    fn test_quoted_wildcard_value_is_not_a_quoted_path() {
        let (extractor, recorder) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/in/a.csv")
                .with_file("/work/in/b.csv"),
        );

        let result = extractor.parse(r#"Merge files: "./in/*.csv""#, None);

        assert_eq!(result.inputs().count(), 2);
        assert_eq!(result.updated_description, "Merge files: /home/user/input/");
        assert_eq!(recorder.unresolved_inputs(), 0);
    }

    #[test]
    fn test_unmatched_quoted_text_is_not_unresolved() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new());

        let text = r#"Summarize and say "done.ok" at the end"#;
        let result = extractor.parse(text, None);

        assert!(result.is_empty());
        assert_eq!(result.updated_description, text);
        assert!(recorder.events().iter().any(|event| matches!(
            event,
            ParseEvent::InputMissing {
                rule: MatchRule::QuotedPath,
                ..
            }
        )));
        assert_eq!(recorder.unresolved_inputs(), 0);
    }

    #[test]
    fn test_missing_single_file_is_unresolved() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new());

        extractor.parse("file: ./gone.csv", None);
        assert_eq!(recorder.unresolved_inputs(), 1);
    }

    #[test]
    fn test_repeated_single_file_rewritten_everywhere() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new().with_file("/work/a.csv"));

        let result = extractor.parse("file: ./a.csv then again file: a.csv", None);

        assert_eq!(result.references.len(), 1);
        assert_eq!(
            result.updated_description,
            "file: /home/user/input/a.csv then again file: /home/user/input/a.csv"
        );
        let checks = recorder
            .events()
            .iter()
            .filter(|event| matches!(event, ParseEvent::PathChecked { .. }))
            .count();
        assert_eq!(checks, 1);
    }

    #[test]
    fn test_wildcard_example() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/in/a.csv")
                .with_file("/work/in/b.csv")
                .with_file("/work/in/note.txt"),
        );

        let result = extractor.parse("Merge files: ./in/*.csv into one table", None);

        assert_eq!(
            result.references,
            vec![
                FileReference::input("/work/in/a.csv", "/home/user/input/a.csv"),
                FileReference::input("/work/in/b.csv", "/home/user/input/b.csv"),
            ]
        );
        assert_eq!(
            result.updated_description,
            "Merge files: /home/user/input/ into one table"
        );
    }

    #[test]
    fn test_wildcard_skips_subdirectories() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/in/a.csv")
                .with_file("/work/in/nested.csv/inner.csv"),
        );

        let result = extractor.parse("files: ./in/*.csv", None);

        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].local_path, Path::new("/work/in/a.csv"));
    }

    #[test]
    fn test_wildcard_does_not_duplicate_single_file() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/in/a.csv")
                .with_file("/work/in/b.csv"),
        );

        let result = extractor.parse("file: ./in/a.csv and files: ./in/*.csv", None);

        let locals: Vec<_> = result.references.iter().map(|r| &r.local_path).collect();
        assert_eq!(
            locals,
            vec![Path::new("/work/in/a.csv"), Path::new("/work/in/b.csv")]
        );
    }

    #[test]
    fn test_unreadable_wildcard_directory() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new().with_unreadable_dir("/work/locked"));

        let text = "Use files: ./locked/*.csv then output: out.json";
        let result = extractor.parse(text, None);

        assert_eq!(
            result.references,
            vec![FileReference::output("/work/out.json", "/home/user/output/out.json")]
        );
        assert_eq!(
            result.updated_description,
            "Use files: ./locked/*.csv then output: /home/user/output/out.json"
        );
        assert!(recorder
            .events()
            .iter()
            .any(|event| matches!(event, ParseEvent::DirectoryUnreadable { .. })));
    }

    #[test]
    fn test_wildcard_with_no_matches_still_rewritten() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/work/in/a.txt"));

        let result = extractor.parse("files: ./in/*.csv", None);

        assert!(result.references.is_empty());
        assert_eq!(result.updated_description, "files: /home/user/input/");
    }

    #[test]
    fn test_files_token_without_star_ignored() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new().with_file("/work/in/a.csv"));

        let text = "files: ./in/a.csv";
        let result = extractor.parse(text, None);

        assert!(result.references.is_empty());
        assert_eq!(result.updated_description, text);
        assert!(recorder
            .events()
            .contains(&ParseEvent::NotAWildcard { raw: "./in/a.csv".into() }));
    }

    #[test]
    fn test_outputs_need_not_exist() {
        let (extractor, _) = extractor(MemoryFileSystem::new());

        let result = extractor.parse("Write output: results/summary.json;", None);

        assert_eq!(
            result.references,
            vec![FileReference::output(
                "/work/results/summary.json",
                "/home/user/output/summary.json"
            )]
        );
        assert_eq!(
            result.updated_description,
            "Write output: /home/user/output/summary.json;"
        );
    }

    #[test]
    fn test_context_outputs_registered_but_not_rewritten() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new());

        let result = extractor.parse(
            "Build the report",
            Some("Previous run used output: ./report.html"),
        );

        assert_eq!(
            result.references,
            vec![FileReference::output("/work/report.html", "/home/user/output/report.html")]
        );
        assert_eq!(result.updated_description, "Build the report");
        assert!(recorder
            .events()
            .iter()
            .any(|event| matches!(event, ParseEvent::ContextOnlyOutput { .. })));
    }

    #[test]
    fn test_output_dedup_shared_across_description_and_context() {
        let (extractor, _) = extractor(MemoryFileSystem::new());

        let result = extractor.parse("output: ./out.json", Some("output: out.json"));

        assert_eq!(result.references.len(), 1);
        assert_eq!(result.updated_description, "output: /home/user/output/out.json");
    }

    #[test]
    fn test_same_path_as_input_and_output() {
        let (extractor, _) = extractor(MemoryFileSystem::new().with_file("/work/a.csv"));

        let result = extractor.parse("Clean file: a.csv and save output: a.csv", None);

        assert_eq!(
            result.references,
            vec![
                FileReference::input("/work/a.csv", "/home/user/input/a.csv"),
                FileReference::output("/work/a.csv", "/home/user/output/a.csv"),
            ]
        );
    }

    #[test]
    fn test_reference_order_follows_passes() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/q.csv")
                .with_file("/work/f.csv")
                .with_file("/work/in/w.csv"),
        );

        let result = extractor.parse(
            r#"output: o.json "./q.csv" files: ./in/*.csv file: f.csv"#,
            None,
        );

        let kinds: Vec<_> = result
            .references
            .iter()
            .map(|r| r.sandbox_path.as_str())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "/home/user/input/f.csv",
                "/home/user/input/q.csv",
                "/home/user/input/w.csv",
                "/home/user/output/o.json",
            ]
        );
    }

    #[test]
    fn test_name_collision_gets_suffix() {
        let (extractor, recorder) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/a/data.csv")
                .with_file("/work/b/data.csv"),
        );

        let result = extractor.parse("file: a/data.csv and file: b/data.csv", None);

        assert_eq!(
            result.updated_description,
            "file: /home/user/input/data.csv and file: /home/user/input/data-2.csv"
        );
        assert!(recorder
            .events()
            .iter()
            .any(|event| matches!(event, ParseEvent::NameCollision { .. })));
    }

    #[test]
    fn test_name_collision_overwrite_policy() {
        let layout =
            SandboxLayout::new("/sandbox/in", "/sandbox/out", CollisionPolicy::Overwrite).unwrap();
        let extractor = ReferenceExtractor::new(layout)
            .with_base_dir("/work")
            .with_file_system(
                MemoryFileSystem::new()
                    .with_file("/work/a/data.csv")
                    .with_file("/work/b/data.csv"),
            )
            .with_observer(RecordingObserver::new());

        let result = extractor.parse("file: a/data.csv and file: b/data.csv", None);

        assert_eq!(result.references.len(), 2);
        assert!(result
            .references
            .iter()
            .all(|r| r.sandbox_path == "/sandbox/in/data.csv"));
    }

    #[test]
    fn test_custom_roots_used_in_rewrite() {
        let layout =
            SandboxLayout::new("/mnt/in/", "/mnt/out", CollisionPolicy::Suffix).unwrap();
        let extractor = ReferenceExtractor::new(layout)
            .with_base_dir("/work")
            .with_file_system(MemoryFileSystem::new().with_file("/work/in/a.csv"))
            .with_observer(RecordingObserver::new());

        let result = extractor.parse("files: in/*.csv output: r.txt", None);

        assert_eq!(
            result.updated_description,
            "files: /mnt/in/ output: /mnt/out/r.txt"
        );
        assert_eq!(result.references[0].sandbox_path, "/mnt/in/a.csv");
    }

    #[test]
    fn test_reparse_of_rewritten_text_adds_no_inputs() {
        let (extractor, _) = extractor(
            MemoryFileSystem::new()
                .with_file("/work/data.csv")
                .with_file("/work/in/x.csv"),
        );

        let first = extractor.parse(
            "file: ./data.csv files: ./in/*.csv output: ./out.json",
            None,
        );
        let second = extractor.parse(&first.updated_description, None);

        assert_eq!(second.inputs().count(), 0);
        assert_eq!(second.outputs().count(), 1);
    }

    #[test]
    fn test_host_file_system_end_to_end() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.csv"), "a,b\n").unwrap();
        fs::create_dir(temp.path().join("in")).unwrap();
        fs::write(temp.path().join("in/one.csv"), "").unwrap();
        fs::write(temp.path().join("in/two.csv"), "").unwrap();
        fs::write(temp.path().join("in/skip.txt"), "").unwrap();

        let extractor = ReferenceExtractor::default()
            .with_base_dir(temp.path())
            .with_observer(RecordingObserver::new());

        let result = extractor.parse(
            "file: data.csv, files: in/*.csv, file: gone.csv",
            None,
        );

        let names: Vec<_> = result
            .references
            .iter()
            .map(|r| r.sandbox_path.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "/home/user/input/data.csv",
                "/home/user/input/one.csv",
                "/home/user/input/two.csv",
            ]
        );
        assert_eq!(
            result.updated_description,
            "file: /home/user/input/data.csv, files: /home/user/input/, file: gone.csv"
        );
    }

    #[test]
    fn test_missing_wildcard_directory_on_host() {
        let temp = TempDir::new().unwrap();
        let extractor = ReferenceExtractor::default()
            .with_base_dir(temp.path())
            .with_observer(RecordingObserver::new());

        let text = "files: ./nowhere/*.csv";
        let result = extractor.parse(text, None);

        assert!(result.references.is_empty());
        assert_eq!(result.updated_description, text);
    }

    #[test]
    fn test_empty_description() {
        let (extractor, recorder) = extractor(MemoryFileSystem::new());

        let result = extractor.parse("", None);

        assert!(result.is_empty());
        assert_eq!(result.updated_description, "");
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_parse_file_references_uses_host_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        fs::write(&path, "# notes").unwrap();

        let description = format!(
            "Read file: {} then output: {}/out.md",
            path.display(),
            temp.path().display()
        );
        let result = parse_file_references(&description, None);

        assert_eq!(
            result.updated_description,
            "Read file: /home/user/input/notes.md then output: /home/user/output/out.md"
        );
        assert_eq!(result.inputs().count(), 1);
    }
}
