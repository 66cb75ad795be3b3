//=========================================================================
// Identifiers
//=========================================================================
//
// Numeric ids for stages, scenes and game objects.
//
// Stage ids are unique within the manager, scene ids within their stage,
// object ids within their owning scene (or parent object).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Id Types ============================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id! {
    /// Identifies a [`Stage`](crate::core::scene::Stage) inside the manager.
    StageId
}

numeric_id! {
    /// Identifies a [`Scene`](crate::core::scene::Scene) inside its stage.
    SceneId
}

numeric_id! {
    /// Identifies a game object inside its owning scene or parent object.
    ObjectId
}

//=========================================================================
// Unit Tests
//=========================================================================
