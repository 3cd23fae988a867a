use serde::{Deserialize, Serialize};

/// Direction of a child link or of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// What an insertion did to the shape of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertOutcome {
    /// The tree was empty, the key is now the root.
    RootEstablished,
    /// No ancestor of the new node had a nonzero balance.
    NoPivot,
    /// The new node landed under the pivot's shorter side.
    ShorterSubtree,
    /// The new node landed beyond the pivot's taller child, a single rotation
    /// in the given direction was applied at the pivot.
    OutsideRotation(Side),
    /// The new node landed in the inner subtree of the pivot's taller child.
    /// Fixing this needs a double rotation, which is not implemented; the
    /// tree is left as is with stale balances.
    UnsupportedCase,
}

impl InsertOutcome {
    pub fn is_rotation(&self) -> bool {
        matches!(self, InsertOutcome::OutsideRotation(_))
    }
}

impl std::fmt::Display for InsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertOutcome::RootEstablished => write!(f, "root established"),
            InsertOutcome::NoPivot => write!(f, "pivot not detected"),
            InsertOutcome::ShorterSubtree => write!(f, "node added to the shorter subtree"),
            InsertOutcome::OutsideRotation(side) => {
                write!(f, "node added to an outside subtree, rotated {side:?}")
            }
            InsertOutcome::UnsupportedCase => write!(f, "inside subtree insertion not supported"),
        }
    }
}
