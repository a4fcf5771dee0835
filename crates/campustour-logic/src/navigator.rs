//! Animated camera moves between viewpoints.
//!
//! The navigator is either idle (orbit controls active) or running one
//! transition (controls disabled). A new request while a transition runs
//! cancels it and starts from the current, possibly mid-flight, pose.
//! Requests are never queued.
//!
//! Starting a move discards any drag the controls were still coasting on.
//! On arrival the camera snaps exactly to the requested pose, the
//! controls are re-enabled, and the info overlay is shown for a named
//! room or hidden for an unnamed viewpoint. The host runs the next
//! controls update.

use std::collections::BTreeMap;

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::math::Vec3;
use crate::overlay::InfoOverlay;
use crate::rooms::{RoomDefinition, Viewpoint};
use crate::tween::{Tween, TweenStep};

/// Camera position (x, y, z) followed by controls target (x, y, z).
const CHANNELS: usize = 6;

fn channels(position: Vec3, target: Vec3) -> [f32; CHANNELS] {
    [
        position.x, position.y, position.z, target.x, target.y, target.z,
    ]
}

fn split(values: [f32; CHANNELS]) -> (Vec3, Vec3) {
    (
        Vec3::new(values[0], values[1], values[2]),
        Vec3::new(values[3], values[4], values[5]),
    )
}

/// The in-flight transition. Owned by the [`Navigator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionHandle {
    tween: Tween<CHANNELS>,
    end: Viewpoint,
    room: Option<String>,
}

impl TransitionHandle {
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn progress(&self) -> f32 {
        self.tween.progress()
    }

    /// Drop the transition without running its arrival step.
    pub fn cancel(self) {
        log::debug!(
            "Cancelled transition to {:?} at {:.0}%",
            self.room.as_deref().unwrap_or("corridor"),
            self.progress() * 100.0
        );
    }
}

/// What happened on a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    Idle,
    Moving { progress: f32 },
    /// The transition finished this tick.
    Arrived { room: Option<String> },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    active: Option<TransitionHandle>,
    duration_ms: f32,
    descriptions: BTreeMap<String, String>,
}

impl Navigator {
    pub fn new(rooms: &[RoomDefinition], duration_ms: f32) -> Self {
        Self {
            active: None,
            duration_ms,
            descriptions: rooms
                .iter()
                .map(|r| (r.name.clone(), r.description.clone()))
                .collect(),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&TransitionHandle> {
        self.active.as_ref()
    }

    /// Start moving toward `viewpoint`. `room` names the room whose info
    /// is shown on arrival; `None` hides the overlay on arrival.
    pub fn navigate_to(
        &mut self,
        viewpoint: Viewpoint,
        room: Option<&str>,
        camera: &PerspectiveCamera,
        controls: &mut OrbitControls,
    ) {
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }
        controls.enabled = false;
        controls.reset_motion();
        let start = channels(camera.position, controls.target);
        let end = channels(viewpoint.position, viewpoint.look_at);
        self.active = Some(TransitionHandle {
            tween: Tween::new(start, end, self.duration_ms),
            end: viewpoint,
            room: room.map(str::to_string),
        });
    }

    /// Advance the running transition by `dt_ms` and apply the pose.
    pub fn tick(
        &mut self,
        dt_ms: f32,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
        overlay: &mut InfoOverlay,
    ) -> NavEvent {
        let Some(handle) = self.active.as_mut() else {
            return NavEvent::Idle;
        };
        match handle.tween.advance(dt_ms) {
            TweenStep::Running(values) => {
                let (position, target) = split(values);
                camera.position = position;
                controls.target = target;
                camera.look_at(target);
                NavEvent::Moving {
                    progress: handle.progress(),
                }
            }
            TweenStep::Finished(_) => {
                let end = handle.end;
                let room = handle.room.take();
                self.active = None;
                camera.position = end.position;
                controls.target = end.look_at;
                camera.look_at(end.look_at);
                controls.enabled = true;
                self.update_overlay(room.as_deref(), overlay);
                NavEvent::Arrived { room }
            }
        }
    }

    fn update_overlay(&self, room: Option<&str>, overlay: &mut InfoOverlay) {
        match room {
            Some(name) => match self.descriptions.get(name) {
                Some(description) => overlay.show(name, description),
                None => log::warn!("No room named '{}'; overlay left unchanged", name),
            },
            None => overlay.hide(),
        }
    }
}
