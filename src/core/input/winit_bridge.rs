//=========================================================================
// Winit Bridge
//=========================================================================
//
// Translates winit window events into InputEvent batches for a
// ChannelInput provider.
//
// Architecture:
//   WindowEvent ─▶ WinitInputSink::handle_window_event()
//                    └─ pending: Vec<InputEvent>
//   RedrawRequested ─▶ flush() ─▶ Sender<Vec<InputEvent>>
//
// Key repeats are dropped (held state already covers them). Keys the
// engine does not name are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{trace, warn};
use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== WinitInputSink ======================================================

/// Buffers translated winit events until the frame boundary.
pub struct WinitInputSink {
    sender: Sender<Vec<InputEvent>>,
    pending: Vec<InputEvent>,
}

impl WinitInputSink {
    pub fn new(sender: Sender<Vec<InputEvent>>) -> Self {
        Self {
            sender,
            pending: Vec::new(),
        }
    }

    /// Translates one window event. Flushes on `RedrawRequested`.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.push(InputEvent::ModifiersChanged(modifiers.state().into()));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(translated) = translate_key(event) {
                    self.push(translated);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.push(translate_mouse(*button, *state));
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.push(InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::RedrawRequested => self.flush(),

            _ => {}
        }
    }

    /// Queues an already translated event.
    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Number of events waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Sends buffered events as one batch. Empty buffers are not sent.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.pending);
        let count = batch.len();
        trace!(target: "input", "Flushing {} input events", count);

        if self.sender.try_send(batch).is_err() {
            warn!(target: "input", "Input channel full or closed, dropping {} events", count);
        }
    }
}

//=== Translation =========================================================

fn translate_key(event: &KeyEvent) -> Option<InputEvent> {
    if event.repeat {
        return None;
    }

    let key = match event.physical_key {
        PhysicalKey::Code(code) => KeyCode::from(code),
        PhysicalKey::Unidentified(_) => return None,
    };

    if key == KeyCode::Unidentified {
        return None;
    }

    Some(match event.state {
        ElementState::Pressed => InputEvent::KeyDown(key),
        ElementState::Released => InputEvent::KeyUp(key),
    })
}

fn translate_mouse(button: WinitMouseButton, state: ElementState) -> InputEvent {
    let button = MouseButton::from(button);
    match state {
        ElementState::Pressed => InputEvent::MouseDown(button),
        ElementState::Released => InputEvent::MouseUp(button),
    }
}

//=== Winit Conversions ===================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 => KeyCode::Digit0,
            W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2,
            W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4,
            W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6,
            W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8,
            W::Digit9 => KeyCode::Digit9,

            W::KeyA => KeyCode::KeyA,
            W::KeyB => KeyCode::KeyB,
            W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD,
            W::KeyE => KeyCode::KeyE,
            W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG,
            W::KeyH => KeyCode::KeyH,
            W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ,
            W::KeyK => KeyCode::KeyK,
            W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM,
            W::KeyN => KeyCode::KeyN,
            W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP,
            W::KeyQ => KeyCode::KeyQ,
            W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS,
            W::KeyT => KeyCode::KeyT,
            W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV,
            W::KeyW => KeyCode::KeyW,
            W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY,
            W::KeyZ => KeyCode::KeyZ,

            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,

            W::Space => KeyCode::Space,
            W::Enter | W::NumpadEnter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
