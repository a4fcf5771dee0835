//! Light fixtures for the building.
//!
//! Two global lights (ambient fill plus a shadow-casting sun) and one rig
//! per room, looked up by room name in the [`RoomCatalog`]. Positions are
//! world-space; room rigs are derived from the room's center and depth.

use serde::Serialize;
use std::f32::consts::PI;

use crate::catalog::RoomCatalog;
use crate::math::{Color, Vec3};
use crate::rooms::RoomDefinition;

/// Engine-agnostic light description. Intensities are relative (1.0 is a
/// full-strength fixture); hosts scale them into their own units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LightSpec {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
        cast_shadow: bool,
        shadow_map_size: u32,
    },
    Point {
        color: Color,
        intensity: f32,
        range: f32,
        position: Vec3,
    },
    Spot {
        color: Color,
        intensity: f32,
        range: f32,
        /// Half-angle of the cone in radians.
        angle: f32,
        /// Fraction of the cone that fades out, `0..=1`.
        penumbra: f32,
        position: Vec3,
        target: Vec3,
    },
}

impl LightSpec {
    pub fn position(&self) -> Option<Vec3> {
        match self {
            LightSpec::Ambient { .. } => None,
            LightSpec::Directional { position, .. }
            | LightSpec::Point { position, .. }
            | LightSpec::Spot { position, .. } => Some(*position),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            LightSpec::Ambient { color, .. }
            | LightSpec::Directional { color, .. }
            | LightSpec::Point { color, .. }
            | LightSpec::Spot { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            LightSpec::Ambient { intensity, .. }
            | LightSpec::Directional { intensity, .. }
            | LightSpec::Point { intensity, .. }
            | LightSpec::Spot { intensity, .. } => *intensity,
        }
    }
}

/// Ceiling fixture height for room point lights.
pub const CEILING_LIGHT_HEIGHT: f32 = 3.5;
/// Range of the main room fixture.
pub const ROOM_LIGHT_RANGE: f32 = 15.0;
pub const SHADOW_MAP_SIZE: u32 = 1024;

fn point(color: Color, intensity: f32, range: f32, position: Vec3) -> LightSpec {
    LightSpec::Point {
        color,
        intensity,
        range,
        position,
    }
}

fn ceiling_light(def: &RoomDefinition, color: Color, intensity: f32) -> LightSpec {
    point(
        color,
        intensity,
        ROOM_LIGHT_RANGE,
        Vec3::new(def.x, CEILING_LIGHT_HEIGHT, def.z),
    )
}

/// Ambient fill plus the shadow-casting sun.
pub fn global_lights() -> Vec<LightSpec> {
    vec![
        LightSpec::Ambient {
            color: Color::WHITE,
            intensity: 0.4,
        },
        LightSpec::Directional {
            color: Color::WHITE,
            intensity: 0.4,
            position: Vec3::new(10.0, 20.0, 5.0),
            cast_shadow: true,
            shadow_map_size: SHADOW_MAP_SIZE,
        },
    ]
}

pub fn reception_lights(def: &RoomDefinition) -> Vec<LightSpec> {
    vec![ceiling_light(def, Color::WHITE, 0.8)]
}

/// Ceiling light plus a spot washing the front (whiteboard) wall.
pub fn classroom_lights(def: &RoomDefinition) -> Vec<LightSpec> {
    let front = def.z - def.depth / 2.0;
    vec![
        ceiling_light(def, Color::WHITE, 1.0),
        LightSpec::Spot {
            color: Color::WHITE,
            intensity: 0.8,
            range: 10.0,
            angle: PI / 6.0,
            penumbra: 0.5,
            position: Vec3::new(def.x, 4.0, front + 1.0),
            target: Vec3::new(def.x, 1.5, front + 0.1),
        },
    ]
}

/// Warm ceiling light plus two reading lamps either side of the table.
pub fn library_lights(def: &RoomDefinition) -> Vec<LightSpec> {
    let mut lights = vec![ceiling_light(def, Color::GOLD, 0.6)];
    for side in [-2.0, 2.0] {
        lights.push(point(
            Color::GOLD,
            0.4,
            5.0,
            Vec3::new(def.x + side, 2.0, def.z),
        ));
    }
    lights
}

pub fn cafeteria_lights(def: &RoomDefinition) -> Vec<LightSpec> {
    vec![
        ceiling_light(def, Color::GOLD, 0.7),
        point(
            Color::WHITE,
            0.5,
            5.0,
            Vec3::new(def.x, 3.0, def.z - def.depth / 2.0 + 1.0),
        ),
    ]
}

/// Rig for rooms with no registered type.
pub fn default_lights(def: &RoomDefinition) -> Vec<LightSpec> {
    vec![ceiling_light(def, Color::WHITE, 0.5)]
}

/// Global lights followed by every room's rig, in room order.
pub fn install_lighting(rooms: &[RoomDefinition], catalog: &RoomCatalog) -> Vec<LightSpec> {
    let mut lights = global_lights();
    for def in rooms {
        let rig = match catalog.lookup(&def.name) {
            Some(kind) => (kind.lights)(def),
            None => {
                log::debug!("No light rig for room '{}', using default", def.name);
                default_lights(def)
            }
        };
        lights.extend(rig);
    }
    lights
}
