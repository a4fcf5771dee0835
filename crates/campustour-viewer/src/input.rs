//! Input handling for the CampusTour viewer.
//!
//! Mouse drag orbits, the wheel zooms (when enabled in config), number
//! keys jump between viewpoints and window resizes reach the viewer.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::state::TourViewer;

const ROOM_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Zoom scale per wheel line.
const ZOOM_STEP: f32 = 0.95;

pub fn orbit_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_events: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut viewer: ResMut<TourViewer>,
) {
    let Some(ctx) = viewer.0.context_mut() else {
        motion_events.clear();
        scroll_events.clear();
        return;
    };

    if mouse_buttons.pressed(MouseButton::Left) {
        for ev in motion_events.read() {
            ctx.controls.rotate(ev.delta.x, ev.delta.y);
        }
    } else {
        motion_events.clear();
    }

    for ev in scroll_events.read() {
        if ev.y != 0.0 {
            ctx.controls.zoom(ZOOM_STEP.powf(ev.y));
        }
    }
}

/// `0`/`Escape` return to the corridor, `1`..`9` visit rooms in config
/// order.
pub fn navigation_keys(keyboard: Res<ButtonInput<KeyCode>>, mut viewer: ResMut<TourViewer>) {
    if keyboard.just_pressed(KeyCode::Digit0) || keyboard.just_pressed(KeyCode::Escape) {
        viewer.0.go_to_corridor();
        return;
    }
    let Some(index) = ROOM_KEYS.iter().position(|k| keyboard.just_pressed(*k)) else {
        return;
    };
    let Some(name) = viewer.0.config().rooms.get(index).map(|r| r.name.clone()) else {
        return;
    };
    viewer.0.go_to_room(&name);
}

pub fn handle_resize(
    mut resize_events: EventReader<WindowResized>,
    mut viewer: ResMut<TourViewer>,
) {
    for ev in resize_events.read() {
        viewer.0.resize(ev.width.round() as u32, ev.height.round() as u32);
    }
}
