use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{BalancedTree, InsertOutcome, TreeConfig};

/// A [`BalancedTree`] behind a reader/writer lock.
///
/// Insertions are exclusive; searches and balance reads share the lock and
/// only run while no insertion is in flight.
#[derive(Debug)]
pub struct SharedTree<K> {
    tree: RwLock<BalancedTree<K>>,
}

impl<K> Default for SharedTree<K> {
    fn default() -> Self {
        Self {
            tree: RwLock::new(BalancedTree::default()),
        }
    }
}

impl<K: Ord> SharedTree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            tree: RwLock::new(BalancedTree::with_config(config)),
        }
    }

    pub fn insert(&self, key: K) -> InsertOutcome {
        self.tree.write().insert(key)
    }

    pub fn search(&self, key: &K) -> bool {
        self.tree.read().search(key)
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    pub fn max_abs_balance(&self) -> i64 {
        self.tree.read().max_abs_balance()
    }

    pub fn into_inner(self) -> BalancedTree<K> {
        self.tree.into_inner()
    }
}

impl<K: Ord + Clone> SharedTree<K> {
    pub fn balances(&self) -> BTreeMap<K, i64> {
        self.tree.read().balances()
    }
}

impl<K> From<BalancedTree<K>> for SharedTree<K> {
    fn from(tree: BalancedTree<K>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }
}
