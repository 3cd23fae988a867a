use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::node::Node;
use crate::{InsertOutcome, InvariantViolation, NodeRef, Side, TreeConfig};

/// Binary search tree that tracks per-node balance factors and corrects
/// outside insertions with a single rotation around the pivot.
///
/// Balance factors use a height of `0` for a missing child and `1` for a
/// leaf, so a node's balance is `height(right) - height(left)`.
///
/// Keys that compare equal go to the left on insertion.
#[derive(Debug, Clone)]
pub struct BalancedTree<K> {
    nodes: Vec<Node<K>>,
    root: Option<usize>, // Index of root node
    config: TreeConfig,
}

impl<K> Default for BalancedTree<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            config: TreeConfig::default(),
        }
    }
}

/// Which child an insertion of `key` descends into at a node holding `at`.
#[inline]
fn descent_side<K: Ord>(key: &K, at: &K) -> Side {
    if key <= at { Side::Left } else { Side::Right }
}

impl<K: Ord> BalancedTree<K> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tree using `config`.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root.map(NodeRef)
    }

    /// Key stored at `node`, `None` if the handle is out of range for this
    /// tree.
    pub fn key(&self, node: NodeRef) -> Option<&K> {
        self.nodes.get(node.0).map(|n| &n.key)
    }

    /// Balance stored at `node` by the last recomputation. This can be stale
    /// after a rotation or an unsupported insertion.
    pub fn stored_balance(&self, node: NodeRef) -> Option<i64> {
        self.nodes.get(node.0).map(|n| n.balance)
    }

    /// Inserts `key`, panicking if a structural invariant turns out to be
    /// broken. See [`BalancedTree::try_insert`].
    pub fn insert(&mut self, key: K) -> InsertOutcome {
        match self.try_insert(key) {
            Ok(outcome) => outcome,
            Err(violation) => panic!("tree invariant violated: {violation}"),
        }
    }

    /// Inserts `key` like [`BalancedTree::insert`], but returns a broken
    /// structural invariant as an error instead of panicking.
    pub fn try_insert(&mut self, key: K) -> Result<InsertOutcome, InvariantViolation> {
        let new_idx = self.nodes.len();

        let Some(root_idx) = self.root else {
            self.nodes.push(Node::new(key));
            self.root = Some(new_idx);
            self.recompute();
            debug!("node {} established as root", NodeRef(new_idx));
            return Ok(InsertOutcome::RootEstablished);
        };

        let mut parent = root_idx;
        let side = loop {
            let side = descent_side(&key, &self.nodes[parent].key);
            match self.nodes[parent].child(side) {
                Some(child) => parent = child,
                None => break side,
            }
        };
        self.nodes.push(Node::new(key));
        *self.nodes[parent].child_mut(side) = Some(new_idx);
        trace!(
            "attached node {} as {:?} child of {}",
            NodeRef(new_idx),
            side,
            NodeRef(parent)
        );

        let new_node = NodeRef(new_idx);
        let Some(pivot) = self.find_pivot(new_node)? else {
            self.recompute();
            debug!("no pivot above node {}", new_node);
            return Ok(InsertOutcome::NoPivot);
        };

        let p = pivot.0;
        let taller = match self.nodes[p].balance.cmp(&0) {
            Ordering::Greater => Side::Right,
            Ordering::Less => Side::Left,
            Ordering::Equal => return Err(InvariantViolation::ZeroBalancePivot(pivot)),
        };
        debug!(
            "pivot {} above node {} is {:?} heavy (balance {})",
            pivot, new_node, taller, self.nodes[p].balance
        );

        if descent_side(&self.nodes[new_idx].key, &self.nodes[p].key) != taller {
            self.recompute();
            return Ok(InsertOutcome::ShorterSubtree);
        }

        let son = self.nodes[p]
            .child(taller)
            .ok_or(InvariantViolation::MissingRotationChild {
                pivot,
                side: taller,
            })?;
        // a stale pivot balance can make the new leaf the taller child; it is
        // then not beyond that child, so a single rotation does not apply
        if son == new_idx
            || descent_side(&self.nodes[new_idx].key, &self.nodes[son].key) != taller
        {
            warn!(
                "node {} landed inside the {:?} subtree of pivot {}, double rotation not supported",
                new_node, taller, pivot
            );
            return Ok(InsertOutcome::UnsupportedCase);
        }

        let direction = taller.opposite();
        self.rotate(p, direction)?;
        if self.config.recompute_after_rotation {
            self.recompute();
        }
        Ok(InsertOutcome::OutsideRotation(direction))
    }

    /// Whether a node holding `key` is reachable by ordinary descent.
    pub fn search(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// First node holding `key` along the search path.
    pub fn locate(&self, key: &K) -> Option<NodeRef> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if *key == node.key {
                return Some(NodeRef(idx));
            }
            current = if *key < node.key { node.left } else { node.right };
        }
        None
    }

    /// Nearest strict ancestor of `node` whose stored balance is nonzero.
    pub fn find_pivot(&self, node: NodeRef) -> Result<Option<NodeRef>, InvariantViolation> {
        let path = self.path_to(node.0)?;
        let ancestors = &path[..path.len() - 1];
        Ok(ancestors
            .iter()
            .rev()
            .find(|&&idx| self.nodes[idx].balance != 0)
            .map(|&idx| NodeRef(idx)))
    }

    /// Parent of `node`, `None` when `node` is the root.
    pub fn find_ancestor(&self, node: NodeRef) -> Result<Option<NodeRef>, InvariantViolation> {
        let path = self.path_to(node.0)?;
        Ok(path
            .len()
            .checked_sub(2)
            .map(|parent| NodeRef(path[parent])))
    }

    /// Root-to-`target` path, inclusive of both ends.
    ///
    /// The walk compares keys and stops on identity. Equal keys can sit on
    /// either side of each other (ties go left on insertion, a right rotation
    /// can lift an equal key above its twin), so on a tie both children are
    /// searched, left first.
    fn path_to(&self, target: usize) -> Result<Vec<usize>, InvariantViolation> {
        let unreachable = InvariantViolation::Unreachable(NodeRef(target));
        let root = self.root.ok_or_else(|| unreachable.clone())?;
        let target_key = &self.nodes.get(target).ok_or_else(|| unreachable.clone())?.key;

        let mut path = Vec::new();
        let mut stack = vec![(root, 0)];
        while let Some((idx, depth)) = stack.pop() {
            path.truncate(depth);
            path.push(idx);
            if idx == target {
                return Ok(path);
            }

            let node = &self.nodes[idx];
            match target_key.cmp(&node.key) {
                Ordering::Less => stack.extend(node.left.map(|c| (c, depth + 1))),
                Ordering::Greater => stack.extend(node.right.map(|c| (c, depth + 1))),
                Ordering::Equal => {
                    stack.extend(node.right.map(|c| (c, depth + 1)));
                    stack.extend(node.left.map(|c| (c, depth + 1)));
                }
            }
        }
        Err(unreachable)
    }

    /// Single rotation at `pivot`. A `Left` rotation lifts the pivot's right
    /// child into its place, `Right` lifts the left child.
    fn rotate(&mut self, pivot: usize, direction: Side) -> Result<(), InvariantViolation> {
        let lifted = direction.opposite();
        let son = self.nodes[pivot]
            .child(lifted)
            .ok_or(InvariantViolation::MissingRotationChild {
                pivot: NodeRef(pivot),
                side: lifted,
            })?;

        match self.find_ancestor(NodeRef(pivot))? {
            Some(NodeRef(ancestor)) => {
                // rewire whichever link held the pivot
                let held = if self.nodes[ancestor].left == Some(pivot) {
                    Side::Left
                } else {
                    Side::Right
                };
                *self.nodes[ancestor].child_mut(held) = Some(son);
            }
            None => self.root = Some(son),
        }

        let inner = self.nodes[son].child(direction);
        *self.nodes[pivot].child_mut(lifted) = inner;
        *self.nodes[son].child_mut(direction) = Some(pivot);

        trace!(
            "rotated {:?} at {}, {} lifted",
            direction,
            NodeRef(pivot),
            NodeRef(son)
        );
        Ok(())
    }

    /// Post-order `(node, balance)` pairs for the current shape, plus the
    /// height of the root.
    fn measure(&self) -> (Vec<(usize, i64)>, usize) {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root else {
            return (order, 0);
        };

        let mut heights = vec![0usize; self.nodes.len()];
        let mut stack = vec![(root, false)];
        while let Some((idx, children_done)) = stack.pop() {
            let node = &self.nodes[idx];
            if children_done {
                let left_height = node.left.map_or(0, |c| heights[c]);
                let right_height = node.right.map_or(0, |c| heights[c]);
                heights[idx] = left_height.max(right_height) + 1;
                order.push((idx, right_height as i64 - left_height as i64));
            } else {
                stack.push((idx, true));
                stack.extend(node.right.map(|c| (c, false)));
                stack.extend(node.left.map(|c| (c, false)));
            }
        }

        (order, heights[root])
    }

    fn recompute(&mut self) {
        let (order, _) = self.measure();
        for (idx, balance) in order {
            self.nodes[idx].balance = balance;
        }
    }

    /// Height of the tree, `0` when empty.
    pub fn height(&self) -> usize {
        self.measure().1
    }

    /// Largest absolute balance factor in the current shape.
    pub fn max_abs_balance(&self) -> i64 {
        self.measure()
            .0
            .into_iter()
            .map(|(_, balance)| balance.abs())
            .max()
            .unwrap_or(0)
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            stack: Vec::new(),
            current: self.root,
        }
    }

    /// Checks that in-order keys never decrease and that every node is
    /// linked into the tree exactly once.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut seen = vec![false; self.nodes.len()];
        let mut previous: Option<&K> = None;
        let mut position = 0;

        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(idx) = current {
                if std::mem::replace(&mut seen[idx], true) {
                    return Err(InvariantViolation::DetachedNode(NodeRef(idx)));
                }
                stack.push(idx);
                current = self.nodes[idx].left;
            }

            let Some(idx) = stack.pop() else {
                break;
            };
            let key = &self.nodes[idx].key;
            if previous.is_some_and(|prev| key < prev) {
                return Err(InvariantViolation::OrderViolation { position });
            }
            previous = Some(key);
            position += 1;
            current = self.nodes[idx].right;
        }

        match seen.iter().position(|reached| !reached) {
            Some(idx) => Err(InvariantViolation::DetachedNode(NodeRef(idx))),
            None => Ok(()),
        }
    }
}

impl<K: Ord + Clone> BalancedTree<K> {
    /// Recomputes every node's balance, stores it on the node, and returns
    /// them keyed by node key. With duplicate keys the last node in
    /// post-order wins.
    pub fn calculate_balance(&mut self) -> BTreeMap<K, i64> {
        self.recompute();
        self.balances()
    }

    /// Balance of every node in the current shape, keyed by node key, without
    /// touching the stored balances. With duplicate keys the last node in
    /// post-order wins.
    pub fn balances(&self) -> BTreeMap<K, i64> {
        let (order, _) = self.measure();
        order
            .into_iter()
            .map(|(idx, balance)| (self.nodes[idx].key.clone(), balance))
            .collect()
    }
}

pub struct Iter<'a, K> {
    tree: &'a BalancedTree<K>,
    stack: Vec<usize>,
    current: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.tree.nodes[idx].left;
        }
        let idx = self.stack.pop()?;
        let node = &self.tree.nodes[idx];
        self.current = node.right;
        Some(&node.key)
    }
}

impl<'a, K: Ord> IntoIterator for &'a BalancedTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Ord> Extend<K> for BalancedTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for BalancedTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
