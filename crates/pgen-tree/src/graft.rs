//! Grafting engine: splice an externally built subtree into a host tree at the
//! placeholder leaf carrying the subtree's root hash.

use crate::node::{combine, Hash256, TreeNode};

/// Outcome of a single recursive search step
enum Graft {
    /// The replacement was installed and ancestor hashes on this path updated
    Done,
    /// No match in this subtree; ownership of the replacement is handed back
    Miss(TreeNode),
    /// The first match was a branch node; the graft is refused to avoid
    /// silently discarding a real subtree
    Refused,
}

/// Find the first descendant of `host` whose value equals `target_value` and
/// replace it with `replacement`, recomputing ancestor values bottom-up along
/// the search path.
///
/// The search order is fixed and behaviorally observable when duplicate values
/// exist: immediate left child, immediate right child, then the left subtree
/// in full, then the right subtree. The host root itself is never a candidate.
/// The matched node must be a leaf; matching a branch fails the graft.
///
/// Returns `true` if a leaf was found and replaced. On `false` the host tree
/// is left untouched; the caller decides whether that is fatal.
///
/// When `replacement.value() == target_value` (the expected calling
/// convention) the host root hash is unchanged by a successful graft; callers
/// must check this and treat a difference as a data-integrity failure.
pub fn graft(host: &mut TreeNode, target_value: &Hash256, replacement: TreeNode) -> bool {
    matches!(graft_at(host, target_value, replacement), Graft::Done)
}

fn graft_at(node: &mut TreeNode, target: &Hash256, replacement: TreeNode) -> Graft {
    let TreeNode::Branch { value, left, right } = node else {
        return Graft::Miss(replacement);
    };
    let outcome = if left.value() == target {
        if left.is_leaf() {
            **left = replacement;
            Graft::Done
        } else {
            Graft::Refused
        }
    } else if right.value() == target {
        if right.is_leaf() {
            **right = replacement;
            Graft::Done
        } else {
            Graft::Refused
        }
    } else {
        match graft_at(left, target, replacement) {
            Graft::Miss(replacement) => graft_at(right, target, replacement),
            outcome => outcome,
        }
    };
    if let Graft::Done = outcome {
        *value = combine(left.value(), right.value());
    }
    outcome
}
