//=========================================================================
// Branch Diff
//=========================================================================
//
// Minimal load/unload sets for a change of current scene.
//
// Algorithm:
//   do   = [T, T.parent, ..., root]      (stack, top = root)
//   undo = [P, P.parent, ..., root]
//   while top(do) == top(undo): pop both
//   load   = remaining do,   ancestor → leaf
//   unload = remaining undo, ancestor → leaf
//
// The stage itself is the implicit shared bottom of both stacks and is
// always eliminated, so it never appears in either set.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::ids::SceneId;

//=== BranchDiff ==========================================================

/// Scenes to load and unload, each ordered ancestor to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchDiff {
    pub load: Vec<SceneId>,
    pub unload: Vec<SceneId>,
}

impl BranchDiff {
    /// Diff for switching from `previous` to `target`.
    ///
    /// `parent_of` resolves a scene's parent; `None` ends a path.
    pub fn between<F>(target: Option<SceneId>, previous: Option<SceneId>, parent_of: F) -> Self
    where
        F: Fn(SceneId) -> Option<SceneId>,
    {
        let mut do_stack = target.map(|id| branch_path(id, &parent_of)).unwrap_or_default();
        let mut undo_stack = previous.map(|id| branch_path(id, &parent_of)).unwrap_or_default();

        while let (Some(a), Some(b)) = (do_stack.last(), undo_stack.last()) {
            if a != b {
                break;
            }
            do_stack.pop();
            undo_stack.pop();
        }

        do_stack.reverse();
        undo_stack.reverse();

        Self {
            load: do_stack,
            unload: undo_stack,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.unload.is_empty()
    }
}

//=== Paths ===============================================================

/// Path from `leaf` up to its stage-level root, leaf first.
pub fn branch_path<F>(leaf: SceneId, parent_of: F) -> Vec<SceneId>
where
    F: Fn(SceneId) -> Option<SceneId>,
{
    let mut path = vec![leaf];
    let mut cursor = leaf;
    while let Some(parent) = parent_of(cursor) {
        path.push(parent);
        cursor = parent;
    }
    path
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    //  1 ─┬─ 2 ─┬─ 4
    //     │     └─ 5
    //     └─ 3
    //  6
    fn tree() -> HashMap<SceneId, SceneId> {
        [(2, 1), (3, 1), (4, 2), (5, 2)]
            .into_iter()
            .map(|(child, parent)| (SceneId(child), SceneId(parent)))
            .collect()
    }

    fn diff(target: u32, previous: Option<u32>) -> BranchDiff {
        let parents = tree();
        BranchDiff::between(Some(SceneId(target)), previous.map(SceneId), |id| {
            parents.get(&id).copied()
        })
    }

    fn ids(raw: &[u32]) -> Vec<SceneId> {
        raw.iter().copied().map(SceneId).collect()
    }

    #[test]
    fn path_walks_to_root() {
        let parents = tree();
        let path = branch_path(SceneId(4), |id| parents.get(&id).copied());
        assert_eq!(path, ids(&[4, 2, 1]));
    }

    #[test]
    fn first_switch_loads_whole_branch_root_first() {
        let d = diff(4, None);
        assert_eq!(d.load, ids(&[1, 2, 4]));
        assert!(d.unload.is_empty());
    }

    #[test]
    fn siblings_share_ancestors() {
        let d = diff(5, Some(4));
        assert_eq!(d.load, ids(&[5]));
        assert_eq!(d.unload, ids(&[4]));
    }

    #[test]
    fn cousins_diverge_below_root() {
        let d = diff(3, Some(4));
        assert_eq!(d.load, ids(&[3]));
        assert_eq!(d.unload, ids(&[2, 4]));
    }

    #[test]
    fn separate_roots_share_nothing() {
        let d = diff(6, Some(5));
        assert_eq!(d.load, ids(&[6]));
        assert_eq!(d.unload, ids(&[1, 2, 5]));
    }

    #[test]
    fn switching_to_ancestor_only_unloads() {
        let d = diff(2, Some(4));
        assert!(d.load.is_empty());
        assert_eq!(d.unload, ids(&[4]));
    }

    #[test]
    fn same_scene_is_empty() {
        assert!(diff(4, Some(4)).is_empty());
    }

    #[test]
    fn diff_is_symmetric() {
        let all = [1, 2, 3, 4, 5, 6];
        for &x in &all {
            for &y in &all {
                let forward = diff(x, Some(y));
                let backward = diff(y, Some(x));
                assert_eq!(forward.load, backward.unload, "{} -> {}", y, x);
                assert_eq!(forward.unload, backward.load, "{} -> {}", y, x);
            }
        }
    }
}
