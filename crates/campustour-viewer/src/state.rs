//! State management for the CampusTour viewer.
//!
//! Contains resource types and Bevy components used throughout the viewer.

use bevy::prelude::*;
use campustour_logic::assets::TextureKey;
use campustour_logic::config::TourConfig;
use campustour_logic::driver::Viewer;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// RESOURCES
// ============================================================================

/// The engine-free viewer: load barrier, scene, camera, navigator.
#[derive(Resource)]
pub struct TourViewer(pub Viewer);

/// Command-line options.
#[derive(Debug, Clone, Default)]
pub struct ViewerArgs {
    pub config_path: Option<String>,
    pub seed: Option<u64>,
    /// Arguments that could not be used, reported once logging is up.
    pub warnings: Vec<String>,
}

impl ViewerArgs {
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut parsed = Self::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" if i + 1 < args.len() => {
                    parsed.config_path = Some(args[i + 1].clone());
                    i += 2;
                }
                "--seed" | "-s" if i + 1 < args.len() => {
                    match args[i + 1].parse() {
                        Ok(seed) => parsed.seed = Some(seed),
                        Err(e) => parsed.warnings.push(format!(
                            "Ignoring --seed '{}': {}",
                            args[i + 1],
                            e
                        )),
                    }
                    i += 2;
                }
                "--seed" | "-s" | "--config" | "-c" => {
                    parsed
                        .warnings
                        .push(format!("Ignoring {}: missing value", args[i]));
                    i += 1;
                }
                _ => i += 1,
            }
        }
        parsed
    }

    /// Load the config file if one was given, falling back to the
    /// reference building. A `--seed` overrides the file's seed.
    /// Also returns the argument and load problems to report once
    /// logging is up.
    pub fn load_config(&self) -> (TourConfig, Vec<String>) {
        let mut warnings = self.warnings.clone();
        let mut config = match &self.config_path {
            Some(path) => match TourConfig::load(path) {
                Ok(config) => config,
                Err(e) => {
                    warnings.push(format!(
                        "Failed to load config {}: {}; using the built-in building",
                        path, e
                    ));
                    TourConfig::default()
                }
            },
            None => TourConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        (config, warnings)
    }
}

/// Argument and config problems found before the app started, logged at
/// startup.
#[derive(Resource, Default)]
pub struct StartupWarnings(pub Vec<String>);

/// Texture loads issued to the asset server and not yet reported.
#[derive(Resource, Default)]
pub struct PendingTextures {
    pub handles: BTreeMap<TextureKey, Handle<Image>>,
    pub reported: BTreeSet<TextureKey>,
}

/// Whether the scene graph has been turned into entities.
#[derive(Resource, Default)]
pub struct SceneSpawned(pub bool);

// ============================================================================
// BEVY COMPONENTS
// ============================================================================

#[derive(Component)]
pub struct TourCamera;

/// Root entity of the spawned building.
#[derive(Component)]
pub struct BuildingRoot;

/// Tags entities built from scene nodes with the node's name.
#[derive(Component)]
pub struct SceneNodeName(pub String);

/// Where a navigation button takes the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Corridor,
    Room(String),
}

#[derive(Component)]
pub struct NavButton(pub NavTarget);

#[derive(Component)]
pub struct InfoOverlayPanel;

#[derive(Component)]
pub struct InfoRoomName;

#[derive(Component)]
pub struct InfoDescription;

#[derive(Component)]
pub struct LoadingText;

/// Screen-space room label; `0` indexes the viewer's projected labels.
#[derive(Component)]
pub struct RoomLabelText(pub usize);
