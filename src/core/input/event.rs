//=========================================================================
// Input Events
//=========================================================================
//
// Portable vocabulary for device input.
//
// Platform layers (winit today) translate their native events into
// `InputEvent`; everything downstream only sees these types.
//
//=========================================================================

//=== MouseButton =========================================================

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side, thumb and other extra buttons.
    Other,
}

//=== PadButton ===========================================================

/// Gamepad button, in the usual face/shoulder/d-pad layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    LeftShoulder,
    RightShoulder,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

//=== KeyCode =============================================================

/// Physical keyboard key (location, not produced character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    /// Keys the platform reports but this enum does not name.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Held modifier keys. Left/right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== InputEvent ==========================================================

/// One device state change, as delivered by a platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Pointer position in window pixels, top-left origin.
    PointerMoved { x: f32, y: f32 },
    PadDown(PadButton),
    PadUp(PadButton),
    ModifiersChanged(Modifiers),
}

impl InputEvent {
    /// `true` for press/release events (order significant within a frame).
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::PointerMoved { .. } | Self::ModifiersChanged(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
