//=========================================================================
// Render Boundary
//=========================================================================
//
// Opaque drawing context, camera seam and clear colour.
//
// The core never inspects the render target: it forwards a
// `&mut dyn Any` to leaf draw calls, which downcast to whatever their
// renderer provides.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::time::FrameTime;

//=== Color ===============================================================

/// Linear RGBA colour, used for scene clear colour and dim overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha replaced.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

//=== Camera Trait ========================================================

/// View used to draw a scene or the overlays above it.
///
/// Lifecycle hooks default to success so simple cameras only implement
/// `as_any`.
pub trait Camera: Send {
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

    /// Called once per unpaused frame before object updates.
    fn update(&mut self, _time: &FrameTime) {}

    /// Gives renderers access to the concrete camera.
    fn as_any(&self) -> &dyn Any;
}

//=== FixedCamera =========================================================

/// Stationary 2D camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCamera {
    pub position: (f32, f32),
    pub zoom: f32,
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl Camera for FixedCamera {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

//=== DrawContext =========================================================

/// Everything a leaf draw call receives.
pub struct DrawContext<'a> {
    target: &'a mut dyn Any,
    camera: &'a dyn Camera,
    time: FrameTime,
}

impl<'a> DrawContext<'a> {
    pub fn new(target: &'a mut dyn Any, camera: &'a dyn Camera, time: FrameTime) -> Self {
        Self {
            target,
            camera,
            time,
        }
    }

    /// The render target, if it is a `T`.
    pub fn target<T: Any>(&mut self) -> Option<&mut T> {
        self.target.downcast_mut::<T>()
    }

    pub fn camera(&self) -> &dyn Camera {
        self.camera
    }

    /// The camera, if it is a `C`.
    pub fn camera_as<C: Any>(&self) -> Option<&C> {
        self.camera.as_any().downcast_ref::<C>()
    }

    pub fn time(&self) -> &FrameTime {
        &self.time
    }

    /// Reborrows the same target under a different camera.
    pub fn with_camera<'b>(&'b mut self, camera: &'b dyn Camera) -> DrawContext<'b> {
        DrawContext {
            target: &mut *self.target,
            camera,
            time: self.time,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_downcasts_to_concrete_type() {
        let mut frame: Vec<&'static str> = Vec::new();
        let camera = FixedCamera::default();
        let mut ctx = DrawContext::new(&mut frame, &camera, FrameTime::default());

        ctx.target::<Vec<&'static str>>().unwrap().push("sprite");
        assert!(ctx.target::<String>().is_none());

        drop(ctx);
        assert_eq!(frame, vec!["sprite"]);
    }

    #[test]
    fn camera_downcast() {
        let mut target = ();
        let camera = FixedCamera {
            position: (4.0, 2.0),
            zoom: 2.0,
        };
        let ctx = DrawContext::new(&mut target, &camera, FrameTime::default());

        assert_eq!(ctx.camera_as::<FixedCamera>().unwrap().zoom, 2.0);
    }

    #[test]
    fn with_camera_swaps_view_only() {
        let mut count = 0u32;
        let scene_cam = FixedCamera::default();
        let overlay_cam = FixedCamera {
            position: (0.0, 0.0),
            zoom: 3.0,
        };
        let mut ctx = DrawContext::new(&mut count, &scene_cam, FrameTime::default());

        {
            let mut overlay = ctx.with_camera(&overlay_cam);
            *overlay.target::<u32>().unwrap() += 1;
            assert_eq!(overlay.camera_as::<FixedCamera>().unwrap().zoom, 3.0);
        }

        assert_eq!(ctx.camera_as::<FixedCamera>().unwrap().zoom, 1.0);
        drop(ctx);
        assert_eq!(count, 1);
    }

    #[test]
    fn color_alpha() {
        assert_eq!(Color::BLACK.with_alpha(0.5).a, 0.5);
    }
}
