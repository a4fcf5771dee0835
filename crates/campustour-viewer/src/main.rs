//! CampusTour Viewer - Bevy 3D walkthrough of a procedurally built school
//!
//! Loads the floor/wall/wood textures, builds the building once every
//! texture has loaded or failed, then tours between room viewpoints with
//! eased camera transitions. All scene and tour logic lives in
//! `campustour-logic`; this crate only draws it and forwards input.
//!
//! Usage: `campustour-viewer [--config tour.json] [--seed N]`

use bevy::prelude::*;
use campustour_logic::driver::Viewer;

mod camera;
mod input;
mod rendering;
mod state;
mod textures;
mod ui;

use camera::{drive_viewer, setup_camera, sync_camera};
use input::{handle_resize, navigation_keys, orbit_input};
use rendering::spawn_scene;
use state::{PendingTextures, SceneSpawned, StartupWarnings, TourViewer, ViewerArgs};
use textures::{poll_texture_loads, start_texture_loads};
use ui::{
    nav_buttons, setup_ui, spawn_room_labels, update_info_overlay, update_loading_text,
    update_room_labels,
};

fn main() {
    let args = ViewerArgs::from_args();
    let (config, warnings) = args.load_config();
    let title = config.title.clone();
    let resolution = (config.window_width as f32, config.window_height as f32);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title,
                resolution: resolution.into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(rendering::to_color(config.background)))
        .insert_resource(TourViewer(Viewer::new(config)))
        .insert_resource(PendingTextures::default())
        .insert_resource(SceneSpawned::default())
        .insert_resource(StartupWarnings(warnings))
        .add_systems(
            Startup,
            (report_startup, setup_camera, setup_ui, start_texture_loads),
        )
        .add_systems(
            Update,
            (
                poll_texture_loads,
                spawn_scene,
                spawn_room_labels,
                handle_resize,
                orbit_input,
                navigation_keys,
                nav_buttons,
                drive_viewer,
                sync_camera,
                update_room_labels,
                update_info_overlay,
                update_loading_text,
            )
                .chain(),
        )
        .run();
}

fn report_startup(warnings: Res<StartupWarnings>, viewer: Res<TourViewer>) {
    for message in &warnings.0 {
        warn!("{}", message);
    }
    let config = viewer.0.config();
    info!(
        "CampusTour: {} rooms, {} textures requested",
        config.rooms.len(),
        viewer.0.barrier().expected()
    );
}
