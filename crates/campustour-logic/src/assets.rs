//! Texture manifest and the asset-load barrier.
//!
//! Texture loads are fire-and-forget on the host side. Each load reports
//! exactly one outcome (loaded or failed) through [`LoadBarrier::settle`].
//! The barrier releases the set of successfully loaded textures once every
//! requested texture has settled, in any order. A failed texture still
//! counts toward readiness; the palette falls back to a flat color for it.
//!
//! There is no timeout: a load that never reports keeps the barrier closed
//! forever.
//!
//! ```
//! use campustour_logic::assets::{LoadBarrier, LoadOutcome, TextureKey, TextureManifest};
//!
//! let manifest = TextureManifest::default();
//! let mut barrier = LoadBarrier::new(&manifest);
//! let mut released = None;
//! for key in barrier.pending() {
//!     if let Some(textures) = barrier.settle(key, LoadOutcome::Failed("offline".into())) {
//!         released = Some(textures);
//!     }
//! }
//! let textures = released.expect("all outcomes reported");
//! assert!(textures.get(TextureKey::Wall).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every texture slot the building knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKey {
    CorridorFloor,
    ReceptionFloor,
    ClassroomFloor,
    LibraryFloor,
    CafeteriaFloor,
    Wall,
    Wood,
    /// Never textured; plain white material.
    Whiteboard,
    /// Never textured; plain metallic material.
    Metal,
}

impl TextureKey {
    pub const ALL: [TextureKey; 9] = [
        TextureKey::CorridorFloor,
        TextureKey::ReceptionFloor,
        TextureKey::ClassroomFloor,
        TextureKey::LibraryFloor,
        TextureKey::CafeteriaFloor,
        TextureKey::Wall,
        TextureKey::Wood,
        TextureKey::Whiteboard,
        TextureKey::Metal,
    ];

    pub fn is_floor(self) -> bool {
        matches!(
            self,
            TextureKey::CorridorFloor
                | TextureKey::ReceptionFloor
                | TextureKey::ClassroomFloor
                | TextureKey::LibraryFloor
                | TextureKey::CafeteriaFloor
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureKey::CorridorFloor => "corridor_floor",
            TextureKey::ReceptionFloor => "reception_floor",
            TextureKey::ClassroomFloor => "classroom_floor",
            TextureKey::LibraryFloor => "library_floor",
            TextureKey::CafeteriaFloor => "cafeteria_floor",
            TextureKey::Wall => "wall",
            TextureKey::Wood => "wood",
            TextureKey::Whiteboard => "whiteboard",
            TextureKey::Metal => "metal",
        }
    }
}

/// Texture sampling mode outside the unit UV square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// Floors tile their texture this many times across the surface.
pub const FLOOR_REPEAT: f32 = 4.0;

/// Which texture to request for each slot. `None` means the slot is
/// never requested and does not count toward the barrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureManifest {
    pub entries: BTreeMap<TextureKey, Option<String>>,
}

impl Default for TextureManifest {
    fn default() -> Self {
        let hardwood = "textures/hardwood2_diffuse.jpg";
        let brick = "textures/brick_diffuse.jpg";
        let entries = [
            (TextureKey::CorridorFloor, Some(hardwood)),
            (TextureKey::ReceptionFloor, Some(brick)),
            (TextureKey::ClassroomFloor, Some(hardwood)),
            (TextureKey::LibraryFloor, Some("textures/carpet.jpg")),
            (TextureKey::CafeteriaFloor, Some(brick)),
            (TextureKey::Wall, Some("textures/wall.jpg")),
            (TextureKey::Wood, Some(hardwood)),
            (TextureKey::Whiteboard, None),
            (TextureKey::Metal, None),
        ]
        .into_iter()
        .map(|(k, p)| (k, p.map(str::to_string)))
        .collect();
        Self { entries }
    }
}

impl TextureManifest {
    /// Slots that will actually be requested, with their paths.
    pub fn requested(&self) -> Vec<(TextureKey, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, p)| p.as_deref().map(|p| (*k, p)))
            .collect()
    }

    /// Sampler settings a host should apply when it issues the load.
    pub fn sampling(&self, key: TextureKey) -> (WrapMode, (f32, f32)) {
        if key.is_floor() {
            (WrapMode::Repeat, (FLOOR_REPEAT, FLOOR_REPEAT))
        } else {
            (WrapMode::ClampToEdge, (1.0, 1.0))
        }
    }
}

/// Result of a single texture load as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
}

/// A texture that finished loading, with the sampler settings to use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureInfo {
    pub key: TextureKey,
    pub path: String,
    pub wrap: WrapMode,
    pub repeat: (f32, f32),
}

/// The successfully loaded textures handed over when the barrier opens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTextures {
    textures: BTreeMap<TextureKey, TextureInfo>,
}

impl LoadedTextures {
    /// No textures at all; every surface uses its flat fallback.
    pub fn none() -> Self {
        Self::default()
    }

    /// Treat every requested texture as loaded. Used by headless runs.
    pub fn all_from(manifest: &TextureManifest) -> Self {
        let textures = manifest
            .requested()
            .into_iter()
            .map(|(key, path)| (key, texture_info(manifest, key, path)))
            .collect();
        Self { textures }
    }

    pub fn get(&self, key: TextureKey) -> Option<&TextureInfo> {
        self.textures.get(&key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn texture_info(manifest: &TextureManifest, key: TextureKey, path: &str) -> TextureInfo {
    let (wrap, repeat) = manifest.sampling(key);
    TextureInfo {
        key,
        path: path.to_string(),
        wrap,
        repeat,
    }
}

/// Completion-counter gate that defers scene construction until every
/// requested texture has reported.
#[derive(Debug, Clone)]
pub struct LoadBarrier {
    manifest: TextureManifest,
    expected: BTreeSet<TextureKey>,
    settled: BTreeMap<TextureKey, LoadOutcome>,
    released: bool,
}

impl LoadBarrier {
    pub fn new(manifest: &TextureManifest) -> Self {
        let expected = manifest.requested().into_iter().map(|(k, _)| k).collect();
        Self {
            manifest: manifest.clone(),
            expected,
            settled: BTreeMap::new(),
            released: false,
        }
    }

    /// Number of outcomes the barrier waits for.
    pub fn expected(&self) -> usize {
        self.expected.len()
    }

    /// Number of distinct outcomes received so far.
    pub fn settled(&self) -> usize {
        self.settled.len()
    }

    /// Requested textures that have not reported yet.
    pub fn pending(&self) -> Vec<TextureKey> {
        self.expected
            .iter()
            .filter(|k| !self.settled.contains_key(k))
            .copied()
            .collect()
    }

    /// Textures that reported a failure, with the reason.
    pub fn failures(&self) -> Vec<(TextureKey, &str)> {
        self.settled
            .iter()
            .filter_map(|(k, o)| match o {
                LoadOutcome::Failed(reason) => Some((*k, reason.as_str())),
                LoadOutcome::Loaded => None,
            })
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Record one load outcome. Returns the loaded texture set exactly
    /// once: on the call that settles the last outstanding texture.
    pub fn settle(&mut self, key: TextureKey, outcome: LoadOutcome) -> Option<LoadedTextures> {
        if !self.expected.contains(&key) {
            log::warn!("Ignoring load outcome for unrequested texture: {}", key.name());
            return None;
        }
        if self.settled.contains_key(&key) {
            log::warn!("Duplicate load outcome for texture: {}", key.name());
            return None;
        }
        if let LoadOutcome::Failed(reason) = &outcome {
            log::error!("Failed to load texture: {} ({})", key.name(), reason);
        }
        self.settled.insert(key, outcome);
        self.try_release()
    }

    /// Open the barrier if everything has settled and it has not opened
    /// yet. An empty manifest opens on the first call.
    pub fn try_release(&mut self) -> Option<LoadedTextures> {
        if self.released || self.settled.len() < self.expected.len() {
            return None;
        }
        self.released = true;
        let textures: BTreeMap<_, _> = self
            .settled
            .iter()
            .filter(|(_, o)| **o == LoadOutcome::Loaded)
            .filter_map(|(k, _)| {
                self.manifest
                    .entries
                    .get(k)
                    .and_then(|p| p.as_deref())
                    .map(|p| (*k, texture_info(&self.manifest, *k, p)))
            })
            .collect();
        log::info!(
            "All textures settled: {} loaded, {} failed",
            textures.len(),
            self.expected.len() - textures.len()
        );
        Some(LoadedTextures { textures })
    }
}
