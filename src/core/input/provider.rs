//=========================================================================
// Input Providers
//=========================================================================
//
// Sources of per-frame device snapshots.
//
// Architecture:
//   platform thread ── Sender<Vec<InputEvent>> ──▶ ChannelInput::poll()
//                                                    └─ bounded drain
//                                                    └─ InputSnapshot
//
// Bounded draining keeps a flood of events from starving a frame; the
// remainder is picked up on the next poll.
//
// A release whose press arrived in the same poll is held back until the
// next poll, so a tap shorter than a frame still reads as one press edge
// followed by one release edge.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{InputEvent, InputSnapshot};

//=== InputProvider Trait =================================================

/// Polled once per frame by the active stage.
pub trait InputProvider: Send {
    /// Returns the device state for this frame.
    fn poll(&mut self) -> InputSnapshot;
}

//=== IdleInput ===========================================================

/// Provider that never reports any input.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn poll(&mut self) -> InputSnapshot {
        InputSnapshot::default()
    }
}

//=== ChannelInput ========================================================

/// Builds snapshots from event batches sent by a platform thread.
pub struct ChannelInput {
    receiver: Receiver<Vec<InputEvent>>,
    snapshot: InputSnapshot,
    deferred: Vec<InputEvent>,
    disconnected: bool,
}

impl ChannelInput {
    /// Maximum batches folded into a single poll.
    pub const MAX_BATCHES_PER_POLL: usize = 64;

    /// Creates a provider and the sender a platform layer feeds.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn channel(capacity: usize) -> (Sender<Vec<InputEvent>>, Self) {
        assert!(capacity > 0, "Channel capacity must be positive");
        let (sender, receiver) = bounded(capacity);
        (
            sender,
            Self {
                receiver,
                snapshot: InputSnapshot::default(),
                deferred: Vec::new(),
                disconnected: false,
            },
        )
    }

    /// `true` once every sender has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Applies one batch, deferring releases of buttons pressed this poll.
    fn fold(&mut self, batch: &[InputEvent], pressed: &mut Vec<InputEvent>) {
        for event in batch {
            if pressed.iter().any(|down| is_release_of(event, down)) {
                self.deferred.push(*event);
                continue;
            }
            if is_press(event) {
                // Pressed again before the deferred release took effect
                self.deferred.retain(|up| !is_release_of(up, event));
                pressed.push(*event);
            }
            self.snapshot.apply(event);
        }
    }
}

fn is_press(event: &InputEvent) -> bool {
    matches!(
        event,
        InputEvent::KeyDown(_) | InputEvent::MouseDown(_) | InputEvent::PadDown(_)
    )
}

fn is_release_of(up: &InputEvent, down: &InputEvent) -> bool {
    match (up, down) {
        (InputEvent::KeyUp(a), InputEvent::KeyDown(b)) => a == b,
        (InputEvent::MouseUp(a), InputEvent::MouseDown(b)) => a == b,
        (InputEvent::PadUp(a), InputEvent::PadDown(b)) => a == b,
        _ => false,
    }
}

impl InputProvider for ChannelInput {
    fn poll(&mut self) -> InputSnapshot {
        let deferred = std::mem::take(&mut self.deferred);
        self.snapshot.apply_all(&deferred);

        let mut pressed = Vec::new();
        let mut drained = 0;

        while drained < Self::MAX_BATCHES_PER_POLL {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    self.fold(&batch, &mut pressed);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!(target: "input", "Input channel disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        if drained >= Self::MAX_BATCHES_PER_POLL {
            warn!(target: "input", "Input backlog: drained {} batches this frame", drained);
        }

        self.snapshot.clone()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
