//! Screen-space overlays: the room info panel and the projected room
//! labels.

use serde::Serialize;

use crate::camera::PerspectiveCamera;
use crate::scene::LabelAnchor;

/// The room info panel shown after arriving at a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoOverlay {
    pub visible: bool,
    pub room_name: String,
    pub description: String,
}

impl InfoOverlay {
    pub fn show(&mut self, room_name: &str, description: &str) {
        self.room_name = room_name.to_string();
        self.description = description.to_string();
        self.visible = true;
    }

    /// Hide the panel. The text is kept for the next show.
    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Pixel size of a render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// One label after projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// False when the anchor is behind the camera or out of range.
    pub visible: bool,
}

/// Second render surface that draws label text over the 3D view.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayer {
    size: SurfaceSize,
    labels: Vec<ScreenLabel>,
    frames: u64,
}

impl LabelLayer {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            labels: Vec::new(),
            frames: 0,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    pub fn labels(&self) -> &[ScreenLabel] {
        &self.labels
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Project every anchor through `camera` onto this surface.
    pub fn render(&mut self, anchors: &[LabelAnchor], camera: &PerspectiveCamera) {
        let SurfaceSize { width, height } = self.size;
        self.labels = anchors
            .iter()
            .map(|a| match camera.project(a.position, width, height) {
                Some((x, y)) => ScreenLabel {
                    text: a.text.clone(),
                    x,
                    y,
                    visible: true,
                },
                None => ScreenLabel {
                    text: a.text.clone(),
                    x: 0.0,
                    y: 0.0,
                    visible: false,
                },
            })
            .collect();
        self.frames += 1;
    }
}
