//! Building dimensions, animation timing and camera defaults.
//!
//! All lengths are meters, all angles radians unless the name says
//! otherwise. Every doorway in the building uses [`layout::DOOR_WIDTH`]
//! by [`layout::DOOR_HEIGHT`]; they are not per-wall parameters.

pub mod layout {
    pub const WALL_THICKNESS: f32 = 0.2;
    pub const BUILDING_HEIGHT: f32 = 4.0;
    pub const CORRIDOR_WIDTH: f32 = 4.0;
    pub const CORRIDOR_LENGTH: f32 = 25.0;
    pub const DOOR_HEIGHT: f32 = 2.5;
    pub const DOOR_WIDTH: f32 = 1.5;
    /// Room floors sit this far above the corridor slab to avoid z-fighting.
    pub const ROOM_FLOOR_LIFT: f32 = 0.01;
    /// Labels float this far outside the corridor half-width.
    pub const LABEL_OUTSET: f32 = 0.5;
    /// Labels hang this far below the ceiling.
    pub const LABEL_DROP: f32 = 0.5;
}

pub mod camera {
    pub const FOV_DEGREES: f32 = 60.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;
    pub const EYE_HEIGHT: f32 = 1.7;
}

pub mod controls {
    pub const DAMPING_FACTOR: f32 = 0.05;
    /// Radians of orbit per pixel of drag.
    pub const ROTATE_SPEED: f32 = 0.005;
}

pub mod transition {
    pub const DURATION_MS: f32 = 1000.0;
}

/// Hex colors used across the palette and furniture.
pub mod colors {
    use crate::math::Color;

    pub const BACKGROUND: Color = Color(0xcccccc);
    pub const WALL_FALLBACK: Color = Color(0xeaeaea);
    pub const CORRIDOR_FLOOR_FALLBACK: Color = Color(0xaaaaaa);
    pub const WOOD_FALLBACK: Color = Color(0x8b4513);
    pub const METAL: Color = Color(0xcccccc);
    pub const PERSON: Color = Color(0x0000ff);
    pub const COMPUTER: Color = Color(0x000000);

    /// Book spines: saddle brown, indigo, dark green, dark red, dark blue.
    pub const BOOKS: [Color; 5] = [
        Color(0x8b4513),
        Color(0x4b0082),
        Color(0x006400),
        Color(0x8b0000),
        Color(0x00008b),
    ];
}

/// Reference room names. Furniture, floors and lights are registered
/// against these in [`crate::catalog`].
pub mod room_names {
    pub const RECEPTION: &str = "Reception";
    pub const CLASSROOM: &str = "Classroom";
    pub const LIBRARY: &str = "Library";
    pub const CAFETERIA: &str = "Cafeteria";
}
