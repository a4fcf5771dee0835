//! Viewer lifecycle: load barrier, one-time scene build, per-frame driver
//! and resize handling.
//!
//! A [`Viewer`] starts uninitialized. Hosts report texture outcomes with
//! [`Viewer::settle_texture`]; when the last one arrives the scene is
//! built and a [`ViewerContext`] (camera, controls, overlays, navigator)
//! is created. Until then navigation, resize and frame calls are no-ops.
//!
//! Each frame runs in a fixed order: advance the transition, update the
//! controls (only when idle and enabled), render the 3D view, render the
//! labels.
//!
//! ```
//! use campustour_logic::config::TourConfig;
//! use campustour_logic::driver::Viewer;
//!
//! let config = TourConfig { seed: Some(1), ..TourConfig::default() };
//! let mut viewer = Viewer::new(config);
//! assert!(!viewer.is_initialized());
//! viewer.settle_all_loaded();
//! assert!(viewer.is_initialized());
//! viewer.go_to_room("Library");
//! viewer.frame(1000.0);
//! assert!(viewer.context().unwrap().overlay.visible);
//! ```

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::assets::{LoadBarrier, LoadOutcome, LoadedTextures, TextureKey};
use crate::building::build_scene;
use crate::camera::PerspectiveCamera;
use crate::config::TourConfig;
use crate::controls::OrbitControls;
use crate::navigator::{NavEvent, Navigator};
use crate::overlay::{InfoOverlay, LabelLayer, SurfaceSize};
use crate::rooms::Viewpoint;
use crate::scene::{LabelAnchor, Scene};

/// The main 3D render surface. The host draws; this tracks size and the
/// number of frames presented.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    size: SurfaceSize,
    frames: u64,
}

impl RenderSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size, frames: 0 }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// Everything that exists only after initialization.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub overlay: InfoOverlay,
    pub navigator: Navigator,
    pub surface: RenderSurface,
    pub labels: LabelLayer,
    anchors: Vec<LabelAnchor>,
}

impl ViewerContext {
    fn new(config: &TourConfig, scene: &Scene) -> Self {
        let size = SurfaceSize::new(config.window_width, config.window_height);
        let start = config.corridor_viewpoint;
        let mut camera = PerspectiveCamera::new(&config.camera, size.aspect());
        camera.position = start.position;
        let mut controls = OrbitControls::new(config.controls);
        controls.target = start.look_at;
        controls.update(&mut camera);
        Self {
            camera,
            controls,
            overlay: InfoOverlay::default(),
            navigator: Navigator::new(&config.rooms, config.transition_ms),
            surface: RenderSurface::new(size),
            labels: LabelLayer::new(size),
            anchors: scene.label_anchors(),
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.camera.aspect = size.aspect();
        self.camera.update_projection();
        self.surface.set_size(size);
        self.labels.set_size(size);
    }

    fn frame(&mut self, dt_ms: f32) -> FrameReport {
        let nav = self.navigator.tick(
            dt_ms,
            &mut self.camera,
            &mut self.controls,
            &mut self.overlay,
        );
        let controls_updated = !self.navigator.is_transitioning() && self.controls.enabled;
        if controls_updated {
            self.controls.update(&mut self.camera);
        }
        self.surface.present();
        self.labels.render(&self.anchors, &self.camera);
        FrameReport {
            nav,
            controls_updated,
        }
    }
}

/// What a frame did, for hosts and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub nav: NavEvent,
    pub controls_updated: bool,
}

pub struct Viewer {
    config: TourConfig,
    barrier: LoadBarrier,
    scene: Option<Scene>,
    context: Option<ViewerContext>,
}

impl Viewer {
    pub fn new(config: TourConfig) -> Self {
        let barrier = LoadBarrier::new(&config.textures);
        Self {
            config,
            barrier,
            scene: None,
            context: None,
        }
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn barrier(&self) -> &LoadBarrier {
        &self.barrier
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn context(&self) -> Option<&ViewerContext> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut ViewerContext> {
        self.context.as_mut()
    }

    /// Report one texture load. Initializes the viewer when this was the
    /// last outstanding texture. Returns whether initialization happened.
    pub fn settle_texture(&mut self, key: TextureKey, outcome: LoadOutcome) -> bool {
        match self.barrier.settle(key, outcome) {
            Some(textures) => {
                self.initialize(textures);
                true
            }
            None => false,
        }
    }

    /// Initialize if nothing is outstanding (an empty manifest). Returns
    /// whether initialization happened.
    pub fn poll(&mut self) -> bool {
        match self.barrier.try_release() {
            Some(textures) => {
                self.initialize(textures);
                true
            }
            None => false,
        }
    }

    /// Report every requested texture as loaded. Used by headless hosts.
    pub fn settle_all_loaded(&mut self) -> bool {
        let mut initialized = self.poll();
        for key in self.barrier.pending() {
            initialized |= self.settle_texture(key, LoadOutcome::Loaded);
        }
        initialized
    }

    fn initialize(&mut self, textures: LoadedTextures) {
        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = build_scene(&self.config, &textures, &mut rng);
        log::info!(
            "Viewer initialized (seed {}, {} textures loaded)",
            seed,
            textures.len()
        );
        self.context = Some(ViewerContext::new(&self.config, &scene));
        self.scene = Some(scene);
    }

    /// Animate the camera to `viewpoint`. No-op before initialization.
    pub fn navigate_to(&mut self, viewpoint: Viewpoint, room: Option<&str>) {
        let Some(ctx) = self.context.as_mut() else {
            log::warn!("Navigation requested before the viewer is ready; ignored");
            return;
        };
        ctx.navigator
            .navigate_to(viewpoint, room, &ctx.camera, &mut ctx.controls);
    }

    pub fn go_to_corridor(&mut self) {
        let viewpoint = self.config.corridor_viewpoint;
        self.navigate_to(viewpoint, None);
    }

    /// Navigate to a configured room. Returns `false` for an unknown name.
    pub fn go_to_room(&mut self, name: &str) -> bool {
        let Some(viewpoint) = self.config.room(name).map(|r| r.viewpoint) else {
            log::warn!("No room named '{}'", name);
            return false;
        };
        self.navigate_to(viewpoint, Some(name));
        true
    }

    /// Resize the camera and both surfaces. No-op before initialization
    /// and for zero-sized surfaces.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        ctx.resize(SurfaceSize::new(width, height));
    }

    /// Run one frame. `None` before initialization.
    pub fn frame(&mut self, dt_ms: f32) -> Option<FrameReport> {
        self.context.as_mut().map(|ctx| ctx.frame(dt_ms))
    }
}
