//! Pure nested-path editing
//!
//! Every edit to a nested entity (a vehicle inside a schedule, a
//! destination inside a vehicle) is expressed as a transform of the whole
//! top-level document: clone, splice the change in, hand the fresh copy to
//! the mutation gateway. The input document is never mutated, so
//! identity-based change detection upstream stays sound and no failure can
//! leave a document half-applied.
//!
//! Paths address children inside arrays **by child id**, not by position:
//! concurrent structural edits reorder arrays, and a positional path would
//! silently hit the wrong child. A path through an id that no longer
//! exists makes the edit a no-op returning the document unchanged.

use crate::document::{Document, Fields};
use crate::types::DocId;
use serde_json::Value;

/// One descent step: into the object with the given id inside an array field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Name of the array field holding the children.
    pub array: String,
    /// Id of the child object to descend into.
    pub id: DocId,
}

/// Path from a document root into its containment tree.
///
/// ```
/// use fleetsync_core::{DocId, NodePath};
///
/// let path = NodePath::root()
///     .child("vehicles", DocId::from("v1"))
///     .child("destinations", DocId::from("d3"));
/// assert_eq!(path.steps().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    /// Path addressing the document root itself.
    pub fn root() -> Self {
        NodePath::default()
    }

    /// Extend the path one level down.
    pub fn child(mut self, array: impl Into<String>, id: DocId) -> Self {
        self.steps.push(Step {
            array: array.into(),
            id,
        });
        self
    }

    /// The descent steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True for the empty path.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Field-level operation applied at the node a [`NodePath`] addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Set (or add) one field.
    Set {
        /// Field name.
        field: String,
        /// New value.
        value: Value,
    },
    /// Append a child object to an array field, creating the array if absent.
    Append {
        /// Name of the array field.
        array: String,
        /// Child object to append (should carry an `id` field).
        child: Value,
    },
    /// Remove the child with the given id from an array field.
    RemoveChild {
        /// Name of the array field.
        array: String,
        /// Id of the child to remove.
        id: DocId,
    },
    /// Flip a boolean field. An absent field toggles to `true`.
    Toggle {
        /// Field name.
        field: String,
    },
}

/// Apply `op` at `path` inside `doc`, returning a fresh document.
///
/// The input is untouched. If the path crosses a child id that no longer
/// exists, or the operation does not apply (toggling a non-boolean,
/// appending into a non-array), the returned document is deep-equal to the
/// input.
pub fn edit(doc: &Document, path: &NodePath, op: &EditOp) -> Document {
    let mut body = doc.body().clone();
    let applied = match target_mut(&mut body, path.steps()) {
        Some(target) => apply_op(target, op),
        None => false,
    };
    if applied {
        Document::new(doc.id().clone(), body)
    } else {
        doc.clone()
    }
}

/// Apply an arbitrary updater closure at `path`, returning a fresh document.
///
/// Missing-path behavior matches [`edit`]: the updater is simply not run
/// and the document comes back unchanged.
pub fn edit_with<F>(doc: &Document, path: &NodePath, updater: F) -> Document
where
    F: FnOnce(&mut Fields),
{
    let mut body = doc.body().clone();
    match target_mut(&mut body, path.steps()) {
        Some(target) => {
            updater(target);
            Document::new(doc.id().clone(), body)
        }
        None => doc.clone(),
    }
}

/// Walk the steps down the containment tree, yielding the addressed node.
fn target_mut<'a>(fields: &'a mut Fields, steps: &[Step]) -> Option<&'a mut Fields> {
    match steps.split_first() {
        None => Some(fields),
        Some((step, rest)) => {
            let child = fields
                .get_mut(&step.array)?
                .as_array_mut()?
                .iter_mut()
                .find(|v| v.get("id").and_then(Value::as_str) == Some(step.id.as_str()))?
                .as_object_mut()?;
            target_mut(child, rest)
        }
    }
}

fn apply_op(target: &mut Fields, op: &EditOp) -> bool {
    match op {
        EditOp::Set { field, value } => {
            target.insert(field.clone(), value.clone());
            true
        }
        EditOp::Append { array, child } => match target.get_mut(array) {
            Some(Value::Array(items)) => {
                items.push(child.clone());
                true
            }
            Some(_) => false,
            None => {
                target.insert(array.clone(), Value::Array(vec![child.clone()]));
                true
            }
        },
        EditOp::RemoveChild { array, id } => match target.get_mut(array) {
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|v| v.get("id").and_then(Value::as_str) != Some(id.as_str()));
                items.len() != before
            }
            _ => false,
        },
        EditOp::Toggle { field } => match target.get(field).map(Value::as_bool) {
            Some(Some(current)) => {
                target.insert(field.clone(), Value::Bool(!current));
                true
            }
            None => {
                target.insert(field.clone(), Value::Bool(true));
                true
            }
            Some(None) => false,
        },
    }
}
