//! Call-scoped bookkeeping for one parse.

use crate::domain::{FileReference, MatchRule, ReferenceKind};
use crate::observer::{ParseEvent, ParseObserver};
use crate::sandbox::{SandboxAllocator, SandboxLayout};
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A pending replacement in the description, in original byte offsets
#[derive(Debug, Clone)]
struct Edit {
    span: Range<usize>,
    replacement: String,
}

/// Everything one `parse` call accumulates
///
/// Dropped when the call returns; nothing is shared between calls.
pub(crate) struct ParseState<'a> {
    observer: &'a dyn ParseObserver,
    inputs: SandboxAllocator,
    outputs: SandboxAllocator,
    seen_inputs: HashSet<PathBuf>,
    seen_outputs: HashSet<PathBuf>,
    references: Vec<FileReference>,
    edits: Vec<Edit>,
}

impl<'a> ParseState<'a> {
    pub fn new(layout: &SandboxLayout, observer: &'a dyn ParseObserver) -> Self {
        Self {
            observer,
            inputs: layout.input_allocator(),
            outputs: layout.output_allocator(),
            seen_inputs: HashSet::new(),
            seen_outputs: HashSet::new(),
            references: Vec::new(),
            edits: Vec::new(),
        }
    }

    pub fn emit(&self, event: ParseEvent) {
        self.observer.observe(&event);
    }

    /// Mark an input path as seen. Returns false if it was already seen.
    pub fn first_sight_of_input(&mut self, path: &Path) -> bool {
        self.seen_inputs.insert(path.to_path_buf())
    }

    /// Mark an output path as seen. Returns false if it was already seen.
    pub fn first_sight_of_output(&mut self, path: &Path) -> bool {
        self.seen_outputs.insert(path.to_path_buf())
    }

    /// Sandbox path of an input registered earlier in this call
    pub fn registered_input(&self, path: &Path) -> Option<String> {
        self.inputs.lookup(path).map(str::to_string)
    }

    /// Sandbox path of an output registered earlier in this call
    pub fn registered_output(&self, path: &Path) -> Option<String> {
        self.outputs.lookup(path).map(str::to_string)
    }

    /// Place `local` under the root for `kind` and record the reference.
    ///
    /// Returns the sandbox path, or `None` if the path has no file name.
    pub fn register(
        &mut self,
        kind: ReferenceKind,
        rule: MatchRule,
        raw: &str,
        local: &Path,
    ) -> Option<String> {
        let allocator = match kind {
            ReferenceKind::Input => &mut self.inputs,
            ReferenceKind::Output => &mut self.outputs,
        };

        let Some(allocation) = allocator.allocate(local) else {
            self.emit(ParseEvent::NoFileName {
                rule,
                raw: raw.to_string(),
            });
            return None;
        };

        if let Some(existing) = allocation.collided_with {
            self.emit(ParseEvent::NameCollision {
                kind,
                local_path: local.to_path_buf(),
                existing,
                sandbox_path: allocation.sandbox_path.clone(),
            });
        }

        let reference = FileReference {
            local_path: local.to_path_buf(),
            sandbox_path: allocation.sandbox_path.clone(),
            kind,
        };
        self.emit(ParseEvent::Registered(reference.clone()));
        self.references.push(reference);

        Some(allocation.sandbox_path)
    }

    /// Queue a replacement of `span` in the description.
    ///
    /// A span overlapping an earlier queued one is dropped.
    pub fn rewrite(&mut self, rule: MatchRule, span: Range<usize>, replacement: String) {
        let overlaps = self
            .edits
            .iter()
            .any(|edit| span.start < edit.span.end && edit.span.start < span.end);
        if overlaps {
            self.emit(ParseEvent::RewriteConflict { rule, span });
            return;
        }
        self.edits.push(Edit { span, replacement });
    }

    /// Apply queued rewrites to `description` and hand back the references
    pub fn finish(mut self, description: &str) -> (Vec<FileReference>, String) {
        self.edits.sort_by_key(|edit| edit.span.start);

        let mut updated = String::with_capacity(description.len());
        let mut cursor = 0;
        for edit in &self.edits {
            updated.push_str(&description[cursor..edit.span.start]);
            updated.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        updated.push_str(&description[cursor..]);

        (self.references, updated)
    }
}
