//=========================================================================
// Input Snapshot & State
//=========================================================================
//
// InputSnapshot: what is held right now (keys, buttons, pad, pointer).
// InputState:    current + previous snapshot, answering edge queries.
//
// Frame lifecycle (per scene):
//   advance(polled) → is_*_pressed / is_*_released / is_*_down
//   sync(polled)    → previous == current, so no edge is observed
//
// `sync` runs when a scene becomes current, so a key that was already
// held during the switch is never reported as "just pressed".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton, PadButton};

//=== InputSnapshot =======================================================

/// Device state at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    keys: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    pad_buttons: HashSet<PadButton>,
    pointer: (f32, f32),
    modifiers: Modifiers,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Builders ---------------------------------------------------------

    /// Snapshot with `key` held (builder form).
    pub fn with_key(mut self, key: KeyCode) -> Self {
        self.keys.insert(key);
        self
    }

    /// Snapshot with `button` held (builder form).
    pub fn with_mouse(mut self, button: MouseButton) -> Self {
        self.mouse_buttons.insert(button);
        self
    }

    /// Snapshot with pad `button` held (builder form).
    pub fn with_pad(mut self, button: PadButton) -> Self {
        self.pad_buttons.insert(button);
        self
    }

    /// Snapshot with the pointer at `(x, y)` (builder form).
    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = (x, y);
        self
    }

    //--- Event Application ------------------------------------------------

    /// Folds one event into the held state.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.keys.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.keys.remove(&key);
            }
            InputEvent::MouseDown(button) => {
                self.mouse_buttons.insert(button);
            }
            InputEvent::MouseUp(button) => {
                self.mouse_buttons.remove(&button);
            }
            InputEvent::PointerMoved { x, y } => self.pointer = (x, y),
            InputEvent::PadDown(button) => {
                self.pad_buttons.insert(button);
            }
            InputEvent::PadUp(button) => {
                self.pad_buttons.remove(&button);
            }
            InputEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers,
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    pub fn is_pad_down(&self, button: PadButton) -> bool {
        self.pad_buttons.contains(&button)
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// `true` when nothing is held.
    pub fn is_idle(&self) -> bool {
        self.keys.is_empty() && self.mouse_buttons.is_empty() && self.pad_buttons.is_empty()
    }
}

//=== InputState ==========================================================

/// Current and previous snapshot of one scene's view of the devices.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: InputSnapshot,
    previous: InputSnapshot,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Shifts current into previous and takes `next` as current.
    pub fn advance(&mut self, next: &InputSnapshot) {
        self.previous = std::mem::replace(&mut self.current, next.clone());
    }

    /// Makes both snapshots equal to `snapshot`, cancelling all edges.
    pub fn sync(&mut self, snapshot: &InputSnapshot) {
        self.current = snapshot.clone();
        self.previous = snapshot.clone();
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }

    pub fn previous(&self) -> &InputSnapshot {
        &self.previous
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.current.is_key_down(key)
    }

    /// `true` only on the frame the key went UP → DOWN.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.current.is_key_down(key) && !self.previous.is_key_down(key)
    }

    /// `true` only on the frame the key went DOWN → UP.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        !self.current.is_key_down(key) && self.previous.is_key_down(key)
    }

    //=====================================================================
    // Query API - Mouse & Pad
    //=====================================================================

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.current.is_mouse_down(button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.current.is_mouse_down(button) && !self.previous.is_mouse_down(button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        !self.current.is_mouse_down(button) && self.previous.is_mouse_down(button)
    }

    pub fn is_pad_down(&self, button: PadButton) -> bool {
        self.current.is_pad_down(button)
    }

    pub fn is_pad_pressed(&self, button: PadButton) -> bool {
        self.current.is_pad_down(button) && !self.previous.is_pad_down(button)
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.current.pointer()
    }

    pub fn pointer_delta(&self) -> (f32, f32) {
        let (x, y) = self.current.pointer();
        let (px, py) = self.previous.pointer();
        (x - px, y - py)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
