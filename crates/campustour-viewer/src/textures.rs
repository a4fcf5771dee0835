//! Texture loading through the asset server, feeding the load barrier.
//!
//! Every requested texture is loaded once at startup. Each frame the load
//! state of the outstanding handles is checked and each one that loaded
//! or failed is reported to the viewer exactly once.

use bevy::asset::LoadState;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use campustour_logic::assets::{LoadOutcome, WrapMode};

use crate::state::{PendingTextures, TourViewer};

fn address_mode(wrap: WrapMode) -> ImageAddressMode {
    match wrap {
        WrapMode::Repeat => ImageAddressMode::Repeat,
        WrapMode::ClampToEdge => ImageAddressMode::ClampToEdge,
    }
}

pub fn start_texture_loads(
    asset_server: Res<AssetServer>,
    viewer: Res<TourViewer>,
    mut pending: ResMut<PendingTextures>,
) {
    let manifest = &viewer.0.config().textures;
    for (key, path) in manifest.requested() {
        let (wrap, _) = manifest.sampling(key);
        let mode = address_mode(wrap);
        let handle: Handle<Image> =
            asset_server.load_with_settings(path.to_string(), move |s: &mut ImageLoaderSettings| {
                s.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                    address_mode_u: mode,
                    address_mode_v: mode,
                    ..default()
                });
            });
        pending.handles.insert(key, handle);
    }
    info!("Requested {} textures", pending.handles.len());
}

pub fn poll_texture_loads(
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingTextures>,
    mut viewer: ResMut<TourViewer>,
) {
    if viewer.0.is_initialized() {
        return;
    }
    // Nothing requested: open the barrier straight away
    if pending.handles.is_empty() {
        viewer.0.poll();
        return;
    }

    let mut outcomes = Vec::new();
    for (key, handle) in &pending.handles {
        if pending.reported.contains(key) {
            continue;
        }
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => outcomes.push((*key, LoadOutcome::Loaded)),
            Some(LoadState::Failed(err)) => {
                outcomes.push((*key, LoadOutcome::Failed(err.to_string())))
            }
            _ => {}
        }
    }

    for (key, outcome) in outcomes {
        pending.reported.insert(key);
        if viewer.0.settle_texture(key, outcome) {
            let barrier = viewer.0.barrier();
            info!(
                "Textures settled ({} of {} failed), building scene",
                barrier.failures().len(),
                barrier.expected()
            );
        }
    }
}
