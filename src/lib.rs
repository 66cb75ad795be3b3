//=========================================================================
// Stagecraft — Library Root
//
// Scene/stage lifecycle and scheduling engine.
//
// Responsibilities:
// - Organize updatable/drawable objects into scene trees under stages
// - Load and unload shared resources as the current scene changes
// - Fan per-frame object updates out to a worker pool and join before
//   drawing
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// struct Title;
//
// impl SceneLogic for Title {
//     fn input(&mut self, _scene: &mut SceneContext) {}
//     fn update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}
//     fn post_update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}
// }
//
// let mut engine = EngineBuilder::new().build().init(|stages| {
//     let stage = stages.add_stage(StageId(0)).unwrap();
//     stage.add_scene(SceneId(0), None, Title).unwrap();
//     stage.set_entry_scene(SceneId(0));
//     stages.set_entry_stage(StageId(0)).unwrap();
// });
// engine.run(&mut ());
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every subsystem (resources, objects, scenes, input...).
// It is public so applications can implement the extension traits, but
// the prelude covers the common surface.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the builder and the frame loop.
//
mod engine;

//--- Public Exports ------------------------------------------------------
//
// `use stagecraft::{Engine, EngineBuilder};` without knowing the layout.
//
pub use engine::{Engine, EngineBuilder, TickControl};
