//! Pure scene construction and camera tour logic for CampusTour.
//!
//! This crate builds a procedural building (corridor, rooms, doorways,
//! furniture, lights) as an engine-agnostic scene graph and drives a
//! camera tour between named viewpoints. Functions take plain data and
//! return results, so everything here is unit-testable without a window.
//! The Bevy viewer and the headless harness are thin hosts over it.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`assets`] | Texture manifest and the load barrier that gates startup |
//! | [`building`] | Corridor shell and full scene assembly |
//! | [`camera`] | Perspective camera pose, projection and point projection |
//! | [`catalog`] | Room type registry (floor texture, furniture, light rig) |
//! | [`config`] | Tour configuration, JSON loading and validation |
//! | [`constants`] | Building dimensions, timing, camera defaults, colors |
//! | [`controls`] | Orbit controller with damping and polar limits |
//! | [`driver`] | Viewer lifecycle, per-frame order, resize handling |
//! | [`furnishing`] | Furniture arrangements for the reference rooms |
//! | [`furniture`] | Parametric furniture factories (person, desk, shelf, table) |
//! | [`lighting`] | Global lights and per-room light rigs |
//! | [`math`] | Vectors, colors, rotation matrices |
//! | [`navigator`] | Animated viewpoint transitions with cancel-and-restart |
//! | [`overlay`] | Room info panel and projected room labels |
//! | [`palette`] | Shared and per-instance material descriptions |
//! | [`rooms`] | Room definitions, reference building, room builder |
//! | [`scene`] | Scene graph nodes, traversal and summaries |
//! | [`tween`] | Eased fixed-duration channel interpolation |
//! | [`walls`] | Wall spans with doorway decomposition |

pub mod assets;
pub mod building;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod controls;
pub mod driver;
pub mod furnishing;
pub mod furniture;
pub mod lighting;
pub mod math;
pub mod navigator;
pub mod overlay;
pub mod palette;
pub mod rooms;
pub mod scene;
pub mod tween;
pub mod walls;
