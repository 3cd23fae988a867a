use serde::{Deserialize, Serialize};

/// Knobs for [`BalancedTree`](crate::BalancedTree).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Recompute every stored balance after an outside rotation. Off by
    /// default: rotations leave the pre-rotation balances in place until the
    /// next insertion that recomputes them.
    pub recompute_after_rotation: bool,
}
