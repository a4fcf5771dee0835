//! Tour configuration: building layout, textures, camera and controls.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes. [`TourConfig::default`] is the reference building.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::assets::TextureManifest;
use crate::camera::CameraConfig;
use crate::constants::colors;
use crate::constants::layout::DOOR_WIDTH;
use crate::constants::transition::DURATION_MS;
use crate::controls::ControlsConfig;
use crate::math::Color;
use crate::rooms::{corridor_viewpoint, reference_rooms, RoomDefinition, Viewpoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Clear color as `0xRRGGBB`.
    pub background: Color,
    pub corridor_viewpoint: Viewpoint,
    pub rooms: Vec<RoomDefinition>,
    pub textures: TextureManifest,
    /// Seed for furniture jitter. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub transition_ms: f32,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            title: "Campus Tour".to_string(),
            window_width: 1280,
            window_height: 720,
            background: colors::BACKGROUND,
            corridor_viewpoint: corridor_viewpoint(),
            rooms: reference_rooms(),
            textures: TextureManifest::default(),
            seed: None,
            transition_ms: DURATION_MS,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl TourConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TourConfig = serde_json::from_str(json)?;
        let issues = validate_config(&config);
        if !issues.is_empty() {
            return Err(ConfigError::Invalid(issues));
        }
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn room(&self, name: &str) -> Option<&RoomDefinition> {
        self.rooms.iter().find(|r| r.name == name)
    }
}

/// A problem found by [`validate_config`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Room must be wider than a doorway.
    RoomTooNarrow { room: String, width: f32 },
    /// Room depth must be positive.
    NonPositiveDepth { room: String, depth: f32 },
    DuplicateRoomName(String),
    /// Room at this index has a blank name.
    EmptyRoomName(usize),
    /// A coordinate or size is NaN or infinite.
    NonFinite { room: String, field: &'static str },
    /// Window must have a nonzero size.
    InvalidWindowSize { width: u32, height: u32 },
    NegativeTransition(f32),
    /// Corridor position or look-at is NaN or infinite.
    NonFiniteCorridorViewpoint,
    /// Vertical field of view must lie strictly between 0 and 180 degrees.
    InvalidFieldOfView(f32),
    /// Clip planes need `0 < near < far`, both finite.
    InvalidClipRange { near: f32, far: f32 },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::RoomTooNarrow { room, width } => write!(
                f,
                "room '{}' is {} wide, must exceed door width {}",
                room, width, DOOR_WIDTH
            ),
            ValidationIssue::NonPositiveDepth { room, depth } => {
                write!(f, "room '{}' has non-positive depth {}", room, depth)
            }
            ValidationIssue::DuplicateRoomName(name) => write!(f, "duplicate room name '{}'", name),
            ValidationIssue::EmptyRoomName(index) => write!(f, "room #{} has an empty name", index),
            ValidationIssue::NonFinite { room, field } => {
                write!(f, "room '{}' has a non-finite {}", room, field)
            }
            ValidationIssue::InvalidWindowSize { width, height } => {
                write!(f, "invalid window size {}x{}", width, height)
            }
            ValidationIssue::NegativeTransition(ms) => {
                write!(f, "transition duration {}ms is negative", ms)
            }
            ValidationIssue::NonFiniteCorridorViewpoint => {
                write!(f, "corridor viewpoint has a non-finite coordinate")
            }
            ValidationIssue::InvalidFieldOfView(fov) => {
                write!(f, "camera fov {} must be between 0 and 180 degrees", fov)
            }
            ValidationIssue::InvalidClipRange { near, far } => {
                write!(f, "camera clip range {}..{} must satisfy 0 < near < far", near, far)
            }
        }
    }
}

/// Validate a tour configuration, returning all issues found.
pub fn validate_config(config: &TourConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (i, room) in config.rooms.iter().enumerate() {
        if room.name.trim().is_empty() {
            issues.push(ValidationIssue::EmptyRoomName(i));
        } else if !seen.insert(room.name.as_str()) {
            issues.push(ValidationIssue::DuplicateRoomName(room.name.clone()));
        }

        let fields = [
            ("x", room.x.is_finite()),
            ("z", room.z.is_finite()),
            ("width", room.width.is_finite()),
            ("depth", room.depth.is_finite()),
            (
                "viewpoint",
                room.viewpoint.position.is_finite() && room.viewpoint.look_at.is_finite(),
            ),
        ];
        for (field, finite) in fields {
            if !finite {
                issues.push(ValidationIssue::NonFinite {
                    room: room.name.clone(),
                    field,
                });
            }
        }

        if room.width <= DOOR_WIDTH {
            issues.push(ValidationIssue::RoomTooNarrow {
                room: room.name.clone(),
                width: room.width,
            });
        }
        if room.depth <= 0.0 {
            issues.push(ValidationIssue::NonPositiveDepth {
                room: room.name.clone(),
                depth: room.depth,
            });
        }
    }

    if config.window_width == 0 || config.window_height == 0 {
        issues.push(ValidationIssue::InvalidWindowSize {
            width: config.window_width,
            height: config.window_height,
        });
    }
    if config.transition_ms < 0.0 {
        issues.push(ValidationIssue::NegativeTransition(config.transition_ms));
    }

    let corridor = config.corridor_viewpoint;
    if !(corridor.position.is_finite() && corridor.look_at.is_finite()) {
        issues.push(ValidationIssue::NonFiniteCorridorViewpoint);
    }
    let camera = &config.camera;
    if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
        issues.push(ValidationIssue::InvalidFieldOfView(camera.fov_degrees));
    }
    if !(camera.near > 0.0 && camera.near < camera.far && camera.far.is_finite()) {
        issues.push(ValidationIssue::InvalidClipRange {
            near: camera.near,
            far: camera.far,
        });
    }

    issues
}

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(Vec<ValidationIssue>),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(issues) => {
                write!(f, "Invalid config: ")?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", issue)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
