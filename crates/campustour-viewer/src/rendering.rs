//! 3D rendering for the CampusTour viewer.
//!
//! Turns the engine-agnostic scene (node tree, material palette, light
//! list) into Bevy entities once the viewer has initialized.

use bevy::math::Affine2;
use bevy::pbr::{DirectionalLightShadowMap, NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use campustour_logic::lighting::LightSpec;
use campustour_logic::math::Color as TourColor;
use campustour_logic::palette::MaterialSpec;
use campustour_logic::scene::{NodeKind, NodeTransform, Scene, SceneNode, Shape};

use crate::state::{BuildingRoot, PendingTextures, SceneNodeName, SceneSpawned, TourViewer};

/// Ambient brightness for a relative intensity of 1.0.
const AMBIENT_BRIGHTNESS: f32 = 400.0;
/// Directional illuminance (lux) for a relative intensity of 1.0.
const SUN_ILLUMINANCE: f32 = 4000.0;
/// Point and spot luminous power (lumens) for a relative intensity of 1.0.
const LAMP_LUMENS: f32 = 100_000.0;

pub fn to_color(c: TourColor) -> Color {
    let (r, g, b) = c.rgb_u8();
    Color::srgb_u8(r, g, b)
}

fn to_transform(t: &NodeTransform) -> Transform {
    let r = t.rotation;
    Transform::from_translation(t.translation)
        .with_rotation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z))
}

fn shape_mesh(shape: Shape) -> Mesh {
    match shape {
        Shape::Box {
            width,
            height,
            depth,
        } => Cuboid::new(width, height, depth).into(),
        Shape::Plane { width, height } => Rectangle::new(width, height).into(),
        Shape::Cylinder {
            radius,
            height,
            segments,
        } => Cylinder::new(radius, height)
            .mesh()
            .resolution(segments)
            .into(),
        Shape::Sphere { radius, segments } => Sphere::new(radius)
            .mesh()
            .uv(segments as usize, segments as usize),
    }
}

fn standard_material(spec: &MaterialSpec, textures: &PendingTextures) -> StandardMaterial {
    let alpha = if spec.transparent { spec.opacity } else { 1.0 };
    let mut material = StandardMaterial {
        base_color: to_color(spec.color).with_alpha(alpha),
        alpha_mode: if spec.transparent {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        perceptual_roughness: spec.roughness,
        metallic: spec.metalness,
        double_sided: spec.double_sided,
        cull_mode: if spec.double_sided {
            None
        } else {
            Some(Face::Back)
        },
        ..default()
    };
    if let Some(binding) = &spec.texture {
        if let Some(handle) = textures.handles.get(&binding.key) {
            material.base_color_texture = Some(handle.clone());
            let (u, v) = binding.repeat;
            material.uv_transform = Affine2::from_scale(Vec2::new(u, v));
        }
    }
    material
}

/// Asset handles shared while spawning one scene.
struct SpawnAssets<'a> {
    meshes: &'a mut Assets<Mesh>,
    mesh_cache: Vec<(Shape, Handle<Mesh>)>,
    materials: Vec<Handle<StandardMaterial>>,
}

impl SpawnAssets<'_> {
    fn mesh(&mut self, shape: Shape) -> Handle<Mesh> {
        if let Some((_, handle)) = self.mesh_cache.iter().find(|(s, _)| *s == shape) {
            return handle.clone();
        }
        let handle = self.meshes.add(shape_mesh(shape));
        self.mesh_cache.push((shape, handle.clone()));
        handle
    }
}

/// Shadow flags set on a group apply to every mesh below it.
#[derive(Clone, Copy)]
struct Shadows {
    cast: bool,
    receive: bool,
}

fn spawn_node(
    parent: &mut ChildBuilder,
    node: &SceneNode,
    assets: &mut SpawnAssets,
    inherited: Shadows,
) {
    let shadows = Shadows {
        cast: inherited.cast || node.cast_shadow,
        receive: inherited.receive || node.receive_shadow,
    };
    let transform = to_transform(&node.transform);
    let name = SceneNodeName(node.name.clone());

    let mut entity = match &node.kind {
        NodeKind::Mesh { shape, material } => {
            let mesh = assets.mesh(*shape);
            let Some(material) = assets.materials.get(material.index()).cloned() else {
                warn!("Node '{}' references a missing material", node.name);
                return;
            };
            let mut entity =
                parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), transform, name));
            if !shadows.cast {
                entity.insert(NotShadowCaster);
            }
            if !shadows.receive {
                entity.insert(NotShadowReceiver);
            }
            entity
        }
        // Labels are drawn as screen-space text by the UI
        NodeKind::Group | NodeKind::Label { .. } => {
            parent.spawn((transform, Visibility::default(), name))
        }
    };

    if !node.children.is_empty() {
        entity.with_children(|children| {
            for child in &node.children {
                spawn_node(children, child, assets, shadows);
            }
        });
    }
}

fn spawn_light(commands: &mut Commands, light: &LightSpec) {
    match light {
        LightSpec::Ambient { color, intensity } => {
            commands.insert_resource(AmbientLight {
                color: to_color(*color),
                brightness: intensity * AMBIENT_BRIGHTNESS,
            });
        }
        LightSpec::Directional {
            color,
            intensity,
            position,
            cast_shadow,
            shadow_map_size,
        } => {
            commands.insert_resource(DirectionalLightShadowMap {
                size: *shadow_map_size as usize,
            });
            commands.spawn((
                DirectionalLight {
                    color: to_color(*color),
                    illuminance: intensity * SUN_ILLUMINANCE,
                    shadows_enabled: *cast_shadow,
                    ..default()
                },
                Transform::from_translation(*position)
                    .looking_at(Vec3::ZERO, Vec3::Y),
            ));
        }
        LightSpec::Point {
            color,
            intensity,
            range,
            position,
        } => {
            commands.spawn((
                PointLight {
                    color: to_color(*color),
                    intensity: intensity * LAMP_LUMENS,
                    range: *range,
                    ..default()
                },
                Transform::from_translation(*position),
            ));
        }
        LightSpec::Spot {
            color,
            intensity,
            range,
            angle,
            penumbra,
            position,
            target,
        } => {
            commands.spawn((
                SpotLight {
                    color: to_color(*color),
                    intensity: intensity * LAMP_LUMENS,
                    range: *range,
                    outer_angle: *angle,
                    inner_angle: angle * (1.0 - penumbra.clamp(0.0, 1.0)),
                    ..default()
                },
                Transform::from_translation(*position)
                    .looking_at(*target, Vec3::Y),
            ));
        }
    }
}

fn spawn_building(
    commands: &mut Commands,
    scene: &Scene,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    textures: &PendingTextures,
) {
    let material_handles = scene
        .materials
        .iter()
        .map(|(_, spec)| materials.add(standard_material(spec, textures)))
        .collect();
    let mut assets = SpawnAssets {
        meshes,
        mesh_cache: Vec::new(),
        materials: material_handles,
    };

    let root = &scene.root;
    let shadows = Shadows {
        cast: root.cast_shadow,
        receive: root.receive_shadow,
    };
    commands
        .spawn((
            to_transform(&root.transform),
            Visibility::default(),
            BuildingRoot,
            SceneNodeName(root.name.clone()),
        ))
        .with_children(|parent| {
            for child in &root.children {
                spawn_node(parent, child, &mut assets, shadows);
            }
        });

    for light in &scene.lights {
        spawn_light(commands, light);
    }
    commands.insert_resource(ClearColor(to_color(scene.background)));

    let summary = scene.summary();
    info!(
        "Spawned building: {} rooms, {} meshes ({} cached shapes), {} lights",
        summary.rooms,
        summary.meshes,
        assets.mesh_cache.len(),
        summary.lights
    );
}

/// Spawn the scene the first frame after the viewer initializes.
pub fn spawn_scene(
    mut commands: Commands,
    viewer: Res<TourViewer>,
    textures: Res<PendingTextures>,
    mut spawned: ResMut<SceneSpawned>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if spawned.0 {
        return;
    }
    let Some(scene) = viewer.0.scene() else {
        return;
    };
    spawn_building(&mut commands, scene, &mut meshes, &mut materials, &textures);
    spawned.0 = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use campustour_logic::assets::LoadedTextures;
    use campustour_logic::math::euler_xyz;
    use campustour_logic::palette::{MaterialClass, MaterialPalette};

    #[test]
    fn glass_maps_to_blended_material() {
        let palette = MaterialPalette::new(&LoadedTextures::none());
        let glass = palette.get(palette.shared(MaterialClass::Glass)).unwrap();
        let material = standard_material(glass, &PendingTextures::default());
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert!((material.base_color.alpha() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn double_sided_disables_culling() {
        let palette = MaterialPalette::new(&LoadedTextures::none());
        let wall = palette.get(palette.shared(MaterialClass::Wall)).unwrap();
        let material = standard_material(wall, &PendingTextures::default());
        assert!(material.double_sided);
        assert!(material.cull_mode.is_none());
    }

    #[test]
    fn euler_order_matches_scene_graph() {
        let t = NodeTransform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.3, -0.7, 1.1),
        };
        let local = Vec3::new(0.5, -1.0, 2.0);
        let expected = euler_xyz(t.rotation) * local;
        let got = to_transform(&t).rotation * local;
        assert!((got - expected).length() < 1e-5);
    }
}
