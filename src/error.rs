use crate::{NodeRef, Side};

/// A broken structural invariant. These signal a logic defect in the tree,
/// not bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A node selected as pivot had a balance of zero.
    ZeroBalancePivot(NodeRef),
    /// A rotation was selected but the child it lifts is absent.
    MissingRotationChild { pivot: NodeRef, side: Side },
    /// A walk from the root never reached the node it was looking for.
    Unreachable(NodeRef),
    /// In-order traversal produced a key smaller than its predecessor.
    OrderViolation { position: usize },
    /// A node is not reachable from the root, or is reachable twice.
    DetachedNode(NodeRef),
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::ZeroBalancePivot(node) => {
                write!(f, "pivot {} has a zero balance", node)
            }
            InvariantViolation::MissingRotationChild { pivot, side } => {
                write!(f, "pivot {} has no {:?} child to rotate up", pivot, side)
            }
            InvariantViolation::Unreachable(node) => {
                write!(f, "node {} is not reachable from the root", node)
            }
            InvariantViolation::OrderViolation { position } => {
                write!(f, "in-order key at position {} is out of order", position)
            }
            InvariantViolation::DetachedNode(node) => {
                write!(f, "node {} is detached or linked more than once", node)
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
