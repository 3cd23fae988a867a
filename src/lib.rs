pub mod config;
pub mod error;
pub mod node;
pub mod outcome;
pub mod shared;
pub mod tree;

pub use self::config::TreeConfig;
pub use self::error::InvariantViolation;
pub use self::node::NodeRef;
pub use self::outcome::{InsertOutcome, Side};
pub use self::shared::SharedTree;
pub use self::tree::{BalancedTree, Iter};
