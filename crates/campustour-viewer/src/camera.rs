//! Camera setup and per-frame driving for the CampusTour viewer.
//!
//! The viewer's own camera (pose, projection, tween) is the source of
//! truth; the Bevy camera entity copies its pose every frame.

use bevy::prelude::*;
use campustour_logic::navigator::NavEvent;

use crate::state::{TourCamera, TourViewer};

pub fn setup_camera(mut commands: Commands, viewer: Res<TourViewer>) {
    let config = viewer.0.config();
    let start = config.corridor_viewpoint;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        Transform::from_translation(start.position).looking_at(start.look_at, Vec3::Y),
        TourCamera,
    ));
}

/// Run one viewer frame: transition, then controls, then label layout.
pub fn drive_viewer(time: Res<Time>, mut viewer: ResMut<TourViewer>) {
    let dt_ms = time.delta_secs() * 1000.0;
    let Some(report) = viewer.0.frame(dt_ms) else {
        return;
    };
    if let NavEvent::Arrived { room } = &report.nav {
        match room {
            Some(name) => info!("Arrived at {}", name),
            None => info!("Arrived at corridor"),
        }
    }
}

pub fn sync_camera(
    viewer: Res<TourViewer>,
    mut camera_q: Query<&mut Transform, With<TourCamera>>,
) {
    let Some(ctx) = viewer.0.context() else {
        return;
    };
    let Ok(mut cam_tf) = camera_q.get_single_mut() else {
        return;
    };
    *cam_tf = Transform::from_translation(ctx.camera.position)
        .looking_to(ctx.camera.forward(), Vec3::Y);
}
