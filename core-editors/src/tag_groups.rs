//! Tag Group Editor
//!
//! Accumulates tag additions and removals across named groups and, on
//! [`apply`](TagGroupEditor::apply), emits the smallest equivalent batch.
//!
//! ## Compaction
//!
//! Per group, every tag keeps only the last intent recorded for it (add or
//! remove). The batch then carries at most one `add` and one `remove` per
//! group, empty sets are dropped, and groups appear in first-seen order.
//! Applying the compacted batch has the same effect as applying the raw log
//! in call order.
//!
//! ```text
//! add_tags("vip", [a, b])      ┐
//! remove_tags("vip", [b])      ├──> [{add, vip, [a, c]}, {remove, vip, [b]}]
//! add_tags("vip", [c])         ┘
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use bridge_traits::operations::{TagGroupOperation, TagOperationType};
use tracing::{debug, warn};

use crate::error::{EditorError, Result};
use crate::sink::OperationSink;

/// A tag group mutation as recorded, before compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTagOperation {
    pub kind: TagOperationType,
    pub group: String,
    /// Deduplicated, in the order given by the caller.
    pub tags: Vec<String>,
}

/// Editor for channel or named user tag groups.
///
/// Single-use: [`apply`](Self::apply) consumes the editor, so a batch can
/// never be sent twice.
pub struct TagGroupEditor {
    pending: Vec<PendingTagOperation>,
    sink: Box<dyn OperationSink<TagGroupOperation>>,
}

impl TagGroupEditor {
    pub fn new(sink: impl OperationSink<TagGroupOperation> + 'static) -> Self {
        Self {
            pending: Vec::new(),
            sink: Box::new(sink),
        }
    }

    /// Records tags to add to `group`.
    ///
    /// Rejects an empty group name, an empty tag set or an empty tag; a
    /// rejected call leaves the editor untouched.
    pub fn add_tags<I, S>(&mut self, group: impl Into<String>, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record(TagOperationType::Add, group.into(), tags)
    }

    /// Records tags to remove from `group`. Same validation as
    /// [`add_tags`](Self::add_tags).
    pub fn remove_tags<I, S>(&mut self, group: impl Into<String>, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record(TagOperationType::Remove, group.into(), tags)
    }

    fn record<I, S>(&mut self, kind: TagOperationType, group: String, tags: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = match validate(&group, tags) {
            Ok(tags) => tags,
            Err(err) => {
                warn!(?kind, group = %group, error = %err, "Rejected tag group edit");
                return Err(err);
            }
        };

        debug!(?kind, group = %group, tag_count = tags.len(), "Recorded tag group edit");
        self.pending.push(PendingTagOperation { kind, group, tags });
        Ok(self)
    }

    /// Operations recorded so far, in call order.
    pub fn pending_operations(&self) -> &[PendingTagOperation] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The batch [`apply`](Self::apply) would send, without sending it.
    pub fn compacted(&self) -> Vec<TagGroupOperation> {
        compact_tag_operations(&self.pending)
    }

    /// Compacts the log and hands the batch to the sink.
    ///
    /// When nothing was recorded, or everything compacted away, the sink is
    /// not invoked.
    pub fn apply(self) {
        let operations = self.compacted();
        if operations.is_empty() {
            debug!(
                recorded = self.pending.len(),
                "Tag group edit produced no operations; nothing to apply"
            );
            return;
        }

        debug!(
            recorded = self.pending.len(),
            emitted = operations.len(),
            "Applying tag group edits"
        );
        self.sink.submit(operations);
    }
}

impl fmt::Debug for TagGroupEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagGroupEditor")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn validate<I, S>(group: &str, tags: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    if group.trim().is_empty() {
        return Err(EditorError::InvalidInput(
            "tag group name must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(EditorError::InvalidInput(format!(
                "tag group '{}' received an empty tag",
                group
            )));
        }
        if seen.insert(tag.clone()) {
            unique.push(tag);
        }
    }

    if unique.is_empty() {
        return Err(EditorError::InvalidInput(format!(
            "tag group '{}' received no tags",
            group
        )));
    }

    Ok(unique)
}

#[derive(Default)]
struct GroupIntents {
    /// Tags in first-seen order.
    order: Vec<String>,
    last_intent: HashMap<String, TagOperationType>,
}

impl GroupIntents {
    fn tags_with(&self, kind: TagOperationType) -> Vec<String> {
        self.order
            .iter()
            .filter(|tag| self.last_intent.get(*tag) == Some(&kind))
            .cloned()
            .collect()
    }
}

/// Compacts recorded tag operations into the minimal batch.
///
/// Pure and deterministic: the same log always yields the same batch.
pub fn compact_tag_operations(pending: &[PendingTagOperation]) -> Vec<TagGroupOperation> {
    let mut groups: Vec<(String, GroupIntents)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for operation in pending {
        let slot = *index.entry(operation.group.clone()).or_insert_with(|| {
            groups.push((operation.group.clone(), GroupIntents::default()));
            groups.len() - 1
        });
        let intents = &mut groups[slot].1;

        for tag in &operation.tags {
            if intents
                .last_intent
                .insert(tag.clone(), operation.kind)
                .is_none()
            {
                intents.order.push(tag.clone());
            }
        }
    }

    let mut operations = Vec::new();
    for (group, intents) in groups {
        let adds = intents.tags_with(TagOperationType::Add);
        let removes = intents.tags_with(TagOperationType::Remove);

        if !adds.is_empty() {
            operations.push(TagGroupOperation::add(group.clone(), adds));
        }
        if !removes.is_empty() {
            operations.push(TagGroupOperation::remove(group, removes));
        }
    }
    operations
}
