//=========================================================================
// Overlays
//=========================================================================
//
// Modal dialogs, the dim layer and the primary menu seam.
//
// Architecture:
//   Overlays
//     ├─ skin: Box<dyn OverlaySkin>   (drawing, hit-testing, assets)
//     ├─ dim: DimLayer                (fades in under modals / pause)
//     ├─ message: Dialog              (ShowMessage)
//     └─ prompt: Dialog               (ShowPrompt)
//
// Overlays draw with the stage's fallback camera, above scene content.
// Dialog button callbacks may queue transitions; their response decides
// whether the dialog closes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::{Transition, TransitionQueue};
use crate::core::input::{InputState, KeyCode, MouseButton, PadButton};
use crate::core::lifecycle::Lifecycle;
use crate::core::render::{Color, DrawContext};
use crate::core::time::FrameTime;

//=== Widget Trait ========================================================

/// A primary menu or other input-consuming UI element.
///
/// Rendering and layout are the widget's own business; the scene only
/// routes input, ticks it while active and draws it above the world.
pub trait Widget: Send {
    fn init(&mut self) -> bool {
        true
    }

    fn load(&mut self) -> bool {
        true
    }

    fn unload(&mut self) -> bool {
        true
    }

    fn deinit(&mut self) -> bool {
        true
    }

    /// Whether the widget currently takes input and ticks.
    fn is_active(&self) -> bool;

    fn input(&mut self, input: &InputState, requests: &mut TransitionQueue);

    fn update(&mut self, _time: &FrameTime) {}

    fn animate(&mut self, _time: &FrameTime) {}

    fn draw(&mut self, ctx: &mut DrawContext<'_>);
}

/// A widget that can be bound to several scenes.
pub type SharedWidget = Arc<Mutex<dyn Widget>>;

/// How a scene holds its primary menu.
pub(crate) struct MenuBinding {
    pub(crate) widget: SharedWidget,

    /// Owned menus follow the scene's lifecycle; inherited ones belong
    /// to an ancestor and are left alone.
    pub(crate) owned: bool,
}

//=== OverlaySkin Trait ===================================================

/// Draws dialogs and the dim layer, and maps pointer positions to
/// dialog buttons.
///
/// Lifecycle calls follow the owning scene, so a skin may hold
/// resource handles for fonts or textures.
pub trait OverlaySkin: Send {
    fn init(&mut self) -> bool {
        true
    }

    fn load(&mut self) -> bool {
        true
    }

    fn unload(&mut self) -> bool {
        true
    }

    fn deinit(&mut self) -> bool {
        true
    }

    fn draw_dim(&mut self, _color: Color, _ctx: &mut DrawContext<'_>) {}

    fn draw_dialog(&mut self, _dialog: &Dialog, _ctx: &mut DrawContext<'_>) {}

    /// Index of the button under `pointer`, if any.
    fn hit_test(&self, _dialog: &Dialog, _pointer: (f32, f32)) -> Option<usize> {
        None
    }
}

/// Skin that draws nothing and hits nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankSkin;

impl OverlaySkin for BlankSkin {}

//=== Dialog ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Message,
    Prompt,
}

/// What a button callback wants done with its dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Dismiss,
    Keep,
}

type ButtonCallback = Box<dyn FnMut(&mut TransitionQueue) -> DialogResponse + Send>;

struct DialogButton {
    caption: String,
    callback: ButtonCallback,
}

/// Modal box with a label and a row of buttons.
///
/// While active it consumes all of its scene's input. The last button
/// is the cancel button: `Escape` (or pad `B`) activates it. A dialog
/// left with no buttons is closed by `Escape` instead.
pub struct Dialog {
    kind: DialogKind,
    lifecycle: Lifecycle,
    label: String,
    buttons: Vec<DialogButton>,
    focus: usize,
    active: bool,
    shown_for: Duration,
}

impl Dialog {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            lifecycle: Lifecycle::new(),
            label: String::new(),
            buttons: Vec::new(),
            focus: 0,
            active: false,
            shown_for: Duration::ZERO,
        }
    }

    //--- Content ----------------------------------------------------------

    /// Clears old buttons, binds a dismiss button captioned `dismiss`,
    /// sets the label and activates the dialog.
    pub fn show(&mut self, label: impl Into<String>, dismiss: &str) -> &mut Self {
        self.clear_buttons();
        self.buttons.push(DialogButton {
            caption: dismiss.to_owned(),
            callback: Box::new(|_| DialogResponse::Dismiss),
        });
        self.label = label.into();
        self.focus = 0;
        self.shown_for = Duration::ZERO;
        self.active = true;
        self
    }

    /// Adds a button in front of the cancel button.
    pub fn add_button<F>(&mut self, caption: impl Into<String>, callback: F) -> &mut Self
    where
        F: FnMut(&mut TransitionQueue) -> DialogResponse + Send + 'static,
    {
        let button = DialogButton {
            caption: caption.into(),
            callback: Box::new(callback),
        };
        let at = self.buttons.len().saturating_sub(1);
        self.buttons.insert(at, button);
        self
    }

    /// Adds a button that queues `transition` and closes the dialog.
    pub fn add_transition_button(
        &mut self,
        caption: impl Into<String>,
        transition: Transition,
    ) -> &mut Self {
        self.add_button(caption, move |requests| {
            requests.push(transition);
            DialogResponse::Dismiss
        })
    }

    pub fn clear_buttons(&mut self) {
        self.buttons.clear();
        self.focus = 0;
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    //--- Queries ----------------------------------------------------------

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn captions(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|button| button.caption.as_str())
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time since the dialog was last shown, for skin transitions.
    pub fn shown_for(&self) -> Duration {
        self.shown_for
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn init(&mut self) -> bool {
        self.lifecycle.init_with(|| true)
    }

    pub fn load(&mut self) -> bool {
        self.lifecycle.load_with(|| true)
    }

    /// Closes the dialog; an unloaded scene shows nothing.
    pub fn unload(&mut self) -> bool {
        let active = &mut self.active;
        self.lifecycle.unload_with(|| {
            *active = false;
            true
        })
    }

    pub fn deinit(&mut self) -> bool {
        let buttons = &mut self.buttons;
        self.lifecycle.deinit_with(|| {
            buttons.clear();
            true
        })
    }

    //--- Frame ------------------------------------------------------------

    /// Keyboard, pad and pointer handling while active.
    pub fn input(
        &mut self,
        input: &InputState,
        skin: &dyn OverlaySkin,
        requests: &mut TransitionQueue,
    ) {
        if !self.active {
            return;
        }

        let cancel = input.is_key_pressed(KeyCode::Escape) || input.is_pad_pressed(PadButton::B);
        let Some(last) = self.buttons.len().checked_sub(1) else {
            if cancel {
                self.active = false;
            }
            return;
        };

        if input.is_key_pressed(KeyCode::ArrowLeft) || input.is_pad_pressed(PadButton::DPadLeft) {
            self.focus = self.focus.saturating_sub(1);
        }
        if input.is_key_pressed(KeyCode::ArrowRight) || input.is_pad_pressed(PadButton::DPadRight) {
            self.focus = (self.focus + 1).min(last);
        }

        if input.is_mouse_pressed(MouseButton::Left) {
            if let Some(index) = skin.hit_test(self, input.pointer()) {
                self.focus = index.min(last);
                self.activate(self.focus, requests);
                return;
            }
        }

        if cancel {
            self.activate(last, requests);
        } else if input.is_key_pressed(KeyCode::Enter)
            || input.is_key_pressed(KeyCode::Space)
            || input.is_pad_pressed(PadButton::A)
        {
            self.activate(self.focus, requests);
        }
    }

    pub fn update(&mut self, time: &FrameTime) {
        if self.active {
            self.shown_for += time.elapsed;
        }
    }

    /// Runs the callback of button `index`.
    pub fn activate(&mut self, index: usize, requests: &mut TransitionQueue) {
        let response = match self.buttons.get_mut(index) {
            Some(button) => (button.callback)(requests),
            None => return,
        };
        if response == DialogResponse::Dismiss {
            self.active = false;
        }
    }
}

//=== DimLayer ============================================================

/// Translucent layer drawn between the world and modal overlays.
///
/// Fades toward its colour's alpha while active and back to clear when
/// not.
pub struct DimLayer {
    lifecycle: Lifecycle,
    color: Color,
    alpha: f32,
    fade_per_second: f32,
    active: bool,
}

impl DimLayer {
    pub const DEFAULT_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.6);

    pub fn new(color: Color) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            color,
            alpha: 0.0,
            fade_per_second: 4.0,
            active: false,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Current alpha, between 0 and the colour's alpha.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn init(&mut self) -> bool {
        self.lifecycle.init_with(|| true)
    }

    pub fn load(&mut self) -> bool {
        self.lifecycle.load_with(|| true)
    }

    pub fn unload(&mut self) -> bool {
        let alpha = &mut self.alpha;
        let active = &mut self.active;
        self.lifecycle.unload_with(|| {
            *alpha = 0.0;
            *active = false;
            true
        })
    }

    pub fn deinit(&mut self) -> bool {
        self.lifecycle.deinit_with(|| true)
    }

    pub fn update(&mut self, time: &FrameTime) {
        let step = self.fade_per_second * self.color.a * time.delta_seconds();
        self.alpha = if self.active {
            (self.alpha + step).min(self.color.a)
        } else {
            (self.alpha - step).max(0.0)
        };
    }

    /// Draws when any part of the fade is visible.
    pub fn draw(&self, skin: &mut dyn OverlaySkin, ctx: &mut DrawContext<'_>) {
        if self.alpha > 0.0 {
            skin.draw_dim(self.color.with_alpha(self.alpha), ctx);
        }
    }
}

impl Default for DimLayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLOR)
    }
}

//=== Overlays ============================================================

/// The overlay set every scene carries.
pub struct Overlays {
    pub(crate) skin: Box<dyn OverlaySkin>,
    pub(crate) dim: DimLayer,
    pub(crate) message: Dialog,
    pub(crate) prompt: Dialog,
}

impl Overlays {
    pub fn new(skin: Box<dyn OverlaySkin>) -> Self {
        Self {
            skin,
            dim: DimLayer::default(),
            message: Dialog::new(DialogKind::Message),
            prompt: Dialog::new(DialogKind::Prompt),
        }
    }

    /// Whether either dialog is up.
    pub fn is_modal(&self) -> bool {
        self.message.is_active() || self.prompt.is_active()
    }

    pub fn init(&mut self) -> bool {
        self.skin.init() & self.dim.init() & self.message.init() & self.prompt.init()
    }

    pub fn load(&mut self) -> bool {
        self.skin.load() & self.dim.load() & self.message.load() & self.prompt.load()
    }

    pub fn unload(&mut self) -> bool {
        self.prompt.unload() & self.message.unload() & self.dim.unload() & self.skin.unload()
    }

    pub fn deinit(&mut self) -> bool {
        self.prompt.deinit() & self.message.deinit() & self.dim.deinit() & self.skin.deinit()
    }

    /// Routes input to the topmost active dialog. Returns `false` when
    /// neither dialog is up.
    pub fn input(&mut self, input: &InputState, requests: &mut TransitionQueue) -> bool {
        if self.prompt.is_active() {
            self.prompt.input(input, &*self.skin, requests);
            true
        } else if self.message.is_active() {
            self.message.input(input, &*self.skin, requests);
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, paused: bool, time: &FrameTime) {
        self.dim.set_active(paused || self.is_modal());
        self.dim.update(time);
        self.message.update(time);
        self.prompt.update(time);
    }

    pub fn draw_dim(&mut self, ctx: &mut DrawContext<'_>) {
        self.dim.draw(&mut *self.skin, ctx);
    }

    /// Message first, prompt on top.
    pub fn draw_dialogs(&mut self, ctx: &mut DrawContext<'_>) {
        if self.message.is_active() {
            self.skin.draw_dialog(&self.message, ctx);
        }
        if self.prompt.is_active() {
            self.skin.draw_dialog(&self.prompt, ctx);
        }
    }
}

impl Default for Overlays {
    fn default() -> Self {
        Self::new(Box::new(BlankSkin))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
