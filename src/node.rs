/// Handle to a node inside a [`BalancedTree`](crate::BalancedTree).
///
/// Nodes are never removed, so a handle stays valid for the lifetime of the
/// tree that produced it. Two handles are equal only if they name the same
/// node, even when the keys are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef(pub(crate) usize);

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Option<usize>,  // Index into nodes vec
    pub(crate) right: Option<usize>, // Index into nodes vec
    /// height(right) - height(left), as of the last recomputation
    pub(crate) balance: i64,
}

impl<K> Node<K> {
    #[inline]
    pub(crate) fn new(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
            balance: 0,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: crate::Side) -> Option<usize> {
        match side {
            crate::Side::Left => self.left,
            crate::Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: crate::Side) -> &mut Option<usize> {
        match side {
            crate::Side::Left => &mut self.left,
            crate::Side::Right => &mut self.right,
        }
    }
}
