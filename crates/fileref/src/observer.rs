//! Diagnostics emitted while scanning a description.
//!
//! Events are observational only and never change the parse result. The
//! default sink forwards them to `tracing`; tests record them instead.

use crate::domain::{FileReference, MatchRule, ReferenceKind};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// One diagnostic from a parse call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// A rule matched `count` times in one text
    PatternsFound { rule: MatchRule, count: usize },

    /// An input candidate was checked against the filesystem
    PathChecked {
        rule: MatchRule,
        raw: String,
        resolved: PathBuf,
        exists: bool,
    },

    /// An input candidate does not exist or is not a regular file
    InputMissing {
        rule: MatchRule,
        raw: String,
        resolved: PathBuf,
    },

    /// The resolved path has no file name to place in the sandbox
    NoFileName { rule: MatchRule, raw: String },

    /// A `files:` token without `*`
    NotAWildcard { raw: String },

    /// A `files:` glob that could not be compiled
    InvalidGlob { pattern: String, reason: String },

    /// A wildcard directory could not be listed
    DirectoryUnreadable { dir: PathBuf, reason: String },

    /// A wildcard pattern was expanded
    GlobMatched {
        pattern: String,
        dir: PathBuf,
        count: usize,
    },

    /// A reference was added to the result
    Registered(FileReference),

    /// Two local paths wanted the same sandbox name
    NameCollision {
        kind: ReferenceKind,
        local_path: PathBuf,
        existing: PathBuf,
        sandbox_path: String,
    },

    /// An output found only in the context text; registered but not rewritten
    ContextOnlyOutput { raw: String, resolved: PathBuf },

    /// A rewrite overlapped an earlier one and was dropped
    RewriteConflict { rule: MatchRule, span: Range<usize> },
}

impl ParseEvent {
    /// Whether this event means a referenced input was not picked up
    ///
    /// A quoted run that names no file is ordinary prose, not a missing
    /// input, so only `file:` and `files:` failures count.
    pub fn is_unresolved_input(&self) -> bool {
        matches!(
            self,
            ParseEvent::InputMissing {
                rule: MatchRule::SingleFile,
                ..
            } | ParseEvent::DirectoryUnreadable { .. }
                | ParseEvent::InvalidGlob { .. }
        )
    }
}

/// Sink for [`ParseEvent`]s
pub trait ParseObserver: Send + Sync {
    fn observe(&self, event: &ParseEvent);
}

/// Forwards events to `tracing` under the `fileref::extract` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn observe(&self, event: &ParseEvent) {
        match event {
            ParseEvent::PatternsFound { rule, count } => {
                info!(target: "fileref::extract", %rule, count, "found {} {} pattern(s)", count, rule);
            }
            ParseEvent::PathChecked {
                rule,
                raw,
                resolved,
                exists,
            } => {
                info!(
                    target: "fileref::extract",
                    %rule,
                    exists,
                    "checking {} -> {}",
                    raw,
                    resolved.display()
                );
            }
            ParseEvent::InputMissing {
                rule: MatchRule::QuotedPath,
                raw,
                resolved,
            } => {
                debug!(
                    target: "fileref::extract",
                    "quoted text {} is not a local file ({})",
                    raw,
                    resolved.display()
                );
            }
            ParseEvent::InputMissing { rule, raw, resolved } => {
                warn!(
                    target: "fileref::extract",
                    %rule,
                    "file not found: {} ({})",
                    raw,
                    resolved.display()
                );
            }
            ParseEvent::NoFileName { rule, raw } => {
                warn!(target: "fileref::extract", %rule, "path has no file name: {}", raw);
            }
            ParseEvent::NotAWildcard { raw } => {
                debug!(target: "fileref::extract", "files: token without '*' ignored: {}", raw);
            }
            ParseEvent::InvalidGlob { pattern, reason } => {
                warn!(target: "fileref::extract", "invalid glob {}: {}", pattern, reason);
            }
            ParseEvent::DirectoryUnreadable { dir, reason } => {
                warn!(
                    target: "fileref::extract",
                    "could not read directory {}: {}",
                    dir.display(),
                    reason
                );
            }
            ParseEvent::GlobMatched {
                pattern,
                dir,
                count,
            } => {
                info!(
                    target: "fileref::extract",
                    count,
                    "{} matched {} file(s) in {}",
                    pattern,
                    count,
                    dir.display()
                );
            }
            ParseEvent::Registered(reference) => {
                debug!(
                    target: "fileref::extract",
                    kind = %reference.kind,
                    "{} -> {}",
                    reference.local_path.display(),
                    reference.sandbox_path
                );
            }
            ParseEvent::NameCollision {
                kind,
                local_path,
                existing,
                sandbox_path,
            } => {
                warn!(
                    target: "fileref::extract",
                    %kind,
                    "{} shares its name with {}; placed at {}",
                    local_path.display(),
                    existing.display(),
                    sandbox_path
                );
            }
            ParseEvent::ContextOnlyOutput { raw, resolved } => {
                debug!(
                    target: "fileref::extract",
                    "output {} ({}) found in context only",
                    raw,
                    resolved.display()
                );
            }
            ParseEvent::RewriteConflict { rule, span } => {
                debug!(
                    target: "fileref::extract",
                    %rule,
                    "rewrite of bytes {}..{} overlaps an earlier rewrite",
                    span.start,
                    span.end
                );
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ParseObserver for NullObserver {
    fn observe(&self, _event: &ParseEvent) {}
}

/// Keeps every event in memory
///
/// Clones share the same buffer, so a clone can be handed to the extractor
/// and read back afterwards.
///
/// # Example
///
/// ```
/// use fileref::observer::{ParseEvent, ParseObserver, RecordingObserver};
///
/// let recorder = RecordingObserver::new();
/// let sink = recorder.clone();
/// sink.observe(&ParseEvent::NotAWildcard { raw: "./a.csv".into() });
/// assert_eq!(recorder.events().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ParseEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first
    pub fn events(&self) -> Vec<ParseEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events that mean an input was not picked up
    pub fn unresolved_inputs(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| event.is_unresolved_input())
            .count()
    }
}

impl ParseObserver for RecordingObserver {
    fn observe(&self, event: &ParseEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Sends every event to two observers
#[derive(Debug, Clone, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: ParseObserver, B: ParseObserver> ParseObserver for Tee<A, B> {
    fn observe(&self, event: &ParseEvent) {
        self.0.observe(event);
        self.1.observe(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clones_share_buffer() {
        let recorder = RecordingObserver::new();
        let clone = recorder.clone();

        clone.observe(&ParseEvent::PatternsFound {
            rule: MatchRule::SingleFile,
            count: 2,
        });

        assert_eq!(
            recorder.events(),
            vec![ParseEvent::PatternsFound {
                rule: MatchRule::SingleFile,
                count: 2
            }]
        );
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let left = RecordingObserver::new();
        let right = RecordingObserver::new();
        let tee = Tee(left.clone(), right.clone());

        tee.observe(&ParseEvent::NotAWildcard { raw: "x".into() });

        assert_eq!(left.events().len(), 1);
        assert_eq!(right.events().len(), 1);
    }

    #[test]
    fn test_unresolved_input_count() {
        let recorder = RecordingObserver::new();
        recorder.observe(&ParseEvent::InputMissing {
            rule: MatchRule::SingleFile,
            raw: "a.csv".into(),
            resolved: PathBuf::from("/a.csv"),
        });
        recorder.observe(&ParseEvent::InputMissing {
            rule: MatchRule::QuotedPath,
            raw: "done.ok".into(),
            resolved: PathBuf::from("/done.ok"),
        });
        recorder.observe(&ParseEvent::DirectoryUnreadable {
            dir: PathBuf::from("/locked"),
            reason: "denied".into(),
        });
        recorder.observe(&ParseEvent::NotAWildcard { raw: "b".into() });

        assert_eq!(recorder.unresolved_inputs(), 2);
    }

    #[test]
    fn test_null_and_tracing_observers_accept_events() {
        let event = ParseEvent::Registered(FileReference::input("/a.csv", "/in/a.csv"));
        NullObserver.observe(&event);
        TracingObserver.observe(&event);
    }
}
