//=========================================================================
// Transition Queue
//=========================================================================
//
// Switch requests queued by scene logic during a frame.
//
// Scene logic never holds its stage, so it asks for switches here. The
// stage drains the queue after PostUpdate: scene switches are applied
// in place, stage switches and exit requests are handed to the manager,
// which applies them at the tick boundary.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::ids::{SceneId, StageId};

//=== Transition ==========================================================

/// A requested change of current scene or stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Switch the owning stage's current scene.
    Scene {
        id: SceneId,
        unload_previous: bool,
        deinit_previous: bool,
    },

    /// Switch the manager's current stage.
    Stage {
        id: StageId,
        unload_previous: bool,
        deinit_previous: bool,
    },

    /// Clear the manager's continue-running flag.
    Exit,
}

impl Transition {
    /// Scene switch that unloads the previous branch but keeps it
    /// initialized.
    pub fn scene(id: SceneId) -> Self {
        Transition::Scene {
            id,
            unload_previous: true,
            deinit_previous: false,
        }
    }

    /// Stage switch that unloads the previous stage but keeps it
    /// initialized.
    pub fn stage(id: StageId) -> Self {
        Transition::Stage {
            id,
            unload_previous: true,
            deinit_previous: false,
        }
    }
}

//=== TransitionQueue =====================================================

/// Queue for switch requests.
///
/// Requests are applied in the order they were pushed.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<Transition>,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a request for the end of the current frame.
    pub fn push(&mut self, transition: Transition) {
        self.queue.push(transition);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all requests, leaving the queue empty.
    pub fn take(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.queue)
    }

    /// Moves every request of `other` to the end of this queue.
    pub fn append(&mut self, other: &mut TransitionQueue) {
        self.queue.append(&mut other.queue);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_empties() {
        let mut queue = TransitionQueue::new();
        queue.push(Transition::scene(SceneId(2)));
        queue.push(Transition::Exit);

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.take(),
            vec![Transition::scene(SceneId(2)), Transition::Exit]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn default_switch_unloads_but_keeps_init() {
        assert_eq!(
            Transition::stage(StageId(1)),
            Transition::Stage {
                id: StageId(1),
                unload_previous: true,
                deinit_previous: false,
            }
        );
    }

    #[test]
    fn append_moves_requests() {
        let mut a = TransitionQueue::new();
        let mut b = TransitionQueue::new();
        b.push(Transition::Exit);

        a.append(&mut b);

        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
