//! Structural mutation records.

use crate::ElementId;

/// One entry in the document's mutation journal.
///
/// Records are appended in the order the mutations happened.  Consumers
/// that replicate `MutationObserver` semantics must handle every
/// `Removed` in a drained batch before any `Added` from the same batch.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mutation {
    /// `node` (with its whole subtree) was appended under a connected
    /// parent.
    Added(ElementId),

    /// `node` (with its whole subtree) was detached from the connected
    /// tree.  The subtree is still present in the arena and walkable.
    Removed(ElementId),
}
