//=========================================================================
// Object Node
//=========================================================================
//
// Lifecycle flags, toggles and child grouping around a GameObject.
//
// Lifecycle calls cascade to children and aggregate with AND; every child
// is attempted even after a failure. Children run and draw after their
// parent, inside the parent's lock.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::GameObject;
use crate::core::error::SceneError;
use crate::core::ids::ObjectId;
use crate::core::lifecycle::Lifecycle;
use crate::core::render::DrawContext;
use crate::core::time::FrameTime;

//=== Types ===============================================================

/// An object as stored by its scene: the per-object update/draw lock.
pub type SharedObject = Arc<Mutex<ObjectNode>>;

//=== ObjectNode ==========================================================

/// A game object plus the state the scene schedules it by.
pub struct ObjectNode {
    behavior: Box<dyn GameObject>,
    lifecycle: Lifecycle,
    active: bool,
    visible: bool,
    draw_order: i32,
    children: BTreeMap<ObjectId, ObjectNode>,
}

impl ObjectNode {
    //--- Construction -----------------------------------------------------

    /// Wraps `behavior`; starts active, visible, draw order 0.
    pub fn new(behavior: impl GameObject + 'static) -> Self {
        Self::from_box(Box::new(behavior))
    }

    pub fn from_box(behavior: Box<dyn GameObject>) -> Self {
        Self {
            behavior,
            lifecycle: Lifecycle::new(),
            active: true,
            visible: true,
            draw_order: 0,
            children: BTreeMap::new(),
        }
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Wraps the node for storage in a scene.
    pub fn into_shared(self) -> SharedObject {
        Arc::new(Mutex::new(self))
    }

    //--- Children ---------------------------------------------------------

    /// Groups `child` under this node.
    pub fn add_child(&mut self, id: ObjectId, child: ObjectNode) -> Result<(), SceneError> {
        if self.children.contains_key(&id) {
            return Err(SceneError::DuplicateObject(id));
        }
        self.children.insert(id, child);
        Ok(())
    }

    /// Removes and returns a child without running its teardown.
    pub fn remove_child(&mut self, id: ObjectId) -> Option<ObjectNode> {
        self.children.remove(&id)
    }

    pub fn child(&self, id: ObjectId) -> Option<&ObjectNode> {
        self.children.get(&id)
    }

    pub fn child_mut(&mut self, id: ObjectId) -> Option<&mut ObjectNode> {
        self.children.get_mut(&id)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn init(&mut self) -> bool {
        let behavior = &mut self.behavior;
        let children = &mut self.children;
        self.lifecycle.init_with(|| {
            let mut ok = behavior.init();
            for child in children.values_mut() {
                ok &= child.init();
            }
            ok
        })
    }

    /// Reruns initialization regardless of the current flag.
    pub fn reinit(&mut self) -> bool {
        let behavior = &mut self.behavior;
        let children = &mut self.children;
        self.lifecycle.reinit_with(|| {
            let mut ok = behavior.init();
            for child in children.values_mut() {
                ok &= child.reinit();
            }
            ok
        })
    }

    pub fn load(&mut self) -> bool {
        let behavior = &mut self.behavior;
        let children = &mut self.children;
        self.lifecycle.load_with(|| {
            let mut ok = behavior.load();
            for child in children.values_mut() {
                ok &= child.load();
            }
            ok
        })
    }

    pub fn unload(&mut self) -> bool {
        let behavior = &mut self.behavior;
        let children = &mut self.children;
        self.lifecycle.unload_with(|| {
            let mut ok = true;
            for child in children.values_mut() {
                ok &= child.unload();
            }
            ok & behavior.unload()
        })
    }

    pub fn deinit(&mut self) -> bool {
        let behavior = &mut self.behavior;
        let children = &mut self.children;
        self.lifecycle.deinit_with(|| {
            let mut ok = true;
            for child in children.values_mut() {
                ok &= child.deinit();
            }
            ok & behavior.deinit()
        })
    }

    //--- Frame ------------------------------------------------------------

    /// Update then animate, then the same for active children.
    /// Inactive nodes do nothing.
    pub fn run_frame(&mut self, time: &FrameTime) {
        if !self.active {
            return;
        }

        self.behavior.update(time);
        self.behavior.animate(time);

        for child in self.children.values_mut() {
            child.run_frame(time);
        }
    }

    /// Draws this node, then visible children by draw order.
    pub fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        if !self.visible {
            return;
        }

        self.behavior.draw(ctx);

        let mut ordered: Vec<&mut ObjectNode> = self.children.values_mut().collect();
        ordered.sort_by_key(|child| child.draw_order);
        for child in ordered {
            child.draw(ctx);
        }
    }

    //--- State ------------------------------------------------------------

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    pub fn set_draw_order(&mut self, draw_order: i32) {
        self.draw_order = draw_order;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::FixedCamera;
    use crate::core::testing::{Journal, TracedObject};

    fn draw_node(node: &mut ObjectNode) {
        let mut target = ();
        let camera = FixedCamera::default();
        let mut ctx = DrawContext::new(&mut target, &camera, FrameTime::default());
        node.draw(&mut ctx);
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn init_and_load_are_guarded() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("ship", &journal));

        assert!(node.init());
        assert!(node.init());
        assert!(node.load());
        assert!(node.load());

        assert_eq!(journal.entries(), vec!["ship.init", "ship.load"]);
        assert!(node.lifecycle().is_loaded());
    }

    #[test]
    fn reinit_reruns_initialization() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("ship", &journal));

        node.init();
        node.reinit();

        assert_eq!(journal.count("ship.init"), 2);
    }

    #[test]
    fn failing_child_keeps_parent_unloaded_but_all_attempted() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("parent", &journal));
        let bad = ObjectNode::new(TracedObject::new("bad", &journal).failing_load());
        node.add_child(ObjectId(1), bad).unwrap();
        node.add_child(ObjectId(2), ObjectNode::new(TracedObject::new("good", &journal)))
            .unwrap();

        assert!(!node.load());
        assert!(!node.lifecycle().is_loaded());
        assert_eq!(journal.count("good.load"), 1);
        assert_eq!(journal.count("bad.load"), 1);
    }

    #[test]
    fn unload_runs_children_before_parent() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("parent", &journal));
        node.add_child(ObjectId(1), ObjectNode::new(TracedObject::new("child", &journal)))
            .unwrap();

        node.load();
        journal.clear();
        node.unload();

        assert_eq!(journal.entries(), vec!["child.unload", "parent.unload"]);
    }

    #[test]
    fn duplicate_child_rejected() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("p", &journal));
        node.add_child(ObjectId(1), ObjectNode::new(TracedObject::new("a", &journal)))
            .unwrap();

        let result = node.add_child(ObjectId(1), ObjectNode::new(TracedObject::new("b", &journal)));
        assert_eq!(result, Err(SceneError::DuplicateObject(ObjectId(1))));
    }

    //=====================================================================
    // Frame
    //=====================================================================

    #[test]
    fn update_then_animate_for_active() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("ship", &journal));

        node.run_frame(&FrameTime::default());

        assert_eq!(journal.entries(), vec!["ship.update", "ship.animate"]);
    }

    #[test]
    fn inactive_node_skips_update_and_children() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("ship", &journal)).with_active(false);
        node.add_child(ObjectId(1), ObjectNode::new(TracedObject::new("gun", &journal)))
            .unwrap();

        node.run_frame(&FrameTime::default());

        assert!(journal.entries().is_empty());
    }

    #[test]
    fn children_drawn_by_draw_order() {
        let journal = Journal::new();
        let mut node = ObjectNode::new(TracedObject::new("root", &journal));
        node.add_child(
            ObjectId(1),
            ObjectNode::new(TracedObject::new("top", &journal)).with_draw_order(10),
        )
        .unwrap();
        node.add_child(
            ObjectId(2),
            ObjectNode::new(TracedObject::new("bottom", &journal)).with_draw_order(-1),
        )
        .unwrap();
        node.add_child(
            ObjectId(3),
            ObjectNode::new(TracedObject::new("hidden", &journal)).with_visible(false),
        )
        .unwrap();

        draw_node(&mut node);

        assert_eq!(journal.entries(), vec!["root.draw", "bottom.draw", "top.draw"]);
    }
}
