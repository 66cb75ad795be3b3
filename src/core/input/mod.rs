//=========================================================================
// Input
//=========================================================================
//
// Device-state snapshots consumed by stages and scenes.
//
// Flow:
//   platform events ─▶ InputEvent batches ─▶ InputProvider::poll()
//        ─▶ InputSnapshot (once per frame, by the stage)
//        ─▶ InputState (per scene: current + previous → edges)
//
// The core never polls hardware itself; a provider is injected.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod provider;
mod snapshot;
mod winit_bridge;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, PadButton};
pub use provider::{ChannelInput, IdleInput, InputProvider};
pub use snapshot::{InputSnapshot, InputState};
pub use winit_bridge::WinitInputSink;
