//! Integration tests for the full tour pipeline.
//!
//! Exercises: TourConfig → LoadBarrier → Scene → Viewer frames
//!
//! All tests are pure logic: no window, no renderer.

use std::collections::BTreeMap;

use campustour_logic::assets::{LoadBarrier, LoadOutcome, TextureKey, TextureManifest};
use campustour_logic::catalog::RoomCatalog;
use campustour_logic::config::{validate_config, TourConfig};
use campustour_logic::constants::layout::{DOOR_HEIGHT, DOOR_WIDTH};
use campustour_logic::driver::Viewer;
use campustour_logic::furniture::BuildContext;
use campustour_logic::math::{approx_eq_vec, Vec3};
use campustour_logic::navigator::NavEvent;
use campustour_logic::palette::MaterialPalette;
use campustour_logic::rooms::{build_room, corridor_viewpoint, RoomDefinition, Viewpoint};
use campustour_logic::scene::{NodeKind, NodeRole, SceneNode, Shape};
use campustour_logic::walls::create_wall;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn ready_viewer(seed: u64) -> Viewer {
    let mut viewer = Viewer::new(TourConfig {
        seed: Some(seed),
        ..TourConfig::default()
    });
    viewer.settle_all_loaded();
    viewer
}

/// Run frames of `dt` until the navigator reports arrival.
fn run_until_arrival(viewer: &mut Viewer, dt: f32) -> usize {
    for n in 1..=1000 {
        match viewer.frame(dt) {
            Some(report) if matches!(report.nav, NavEvent::Arrived { .. }) => return n,
            Some(_) => {}
            None => panic!("viewer not initialized"),
        }
    }
    panic!("transition never finished");
}

fn random_room(rng: &mut StdRng, name: &str) -> RoomDefinition {
    let width = rng.gen_range(DOOR_WIDTH + 0.1..12.0);
    let depth = rng.gen_range(0.5..12.0);
    let x = rng.gen_range(-15.0..15.0);
    let z = rng.gen_range(-12.0..12.0);
    RoomDefinition {
        name: name.to_string(),
        description: format!("{name} description"),
        x,
        z,
        width,
        depth,
        viewpoint: Viewpoint::new(Vec3::new(x, 1.7, z + 1.0), Vec3::new(x, 1.7, z - 1.0)),
    }
}

fn box_front_area(node: &SceneNode) -> f32 {
    match node.kind {
        NodeKind::Mesh {
            shape: Shape::Box { width, height, .. },
            ..
        }
        | NodeKind::Mesh {
            shape: Shape::Plane { width, height },
            ..
        } => width * height,
        _ => 0.0,
    }
}

// ── Room structure ─────────────────────────────────────────────────────

#[test]
fn any_valid_room_has_four_walls_one_door_one_floor_one_label() {
    let mut rng = StdRng::seed_from_u64(2024);
    let names = ["Reception", "Classroom", "Library", "Cafeteria", "Boiler Room"];
    for i in 0..200 {
        let def = random_room(&mut rng, names[i % names.len()]);
        let mut palette = MaterialPalette::new(&Default::default());
        let mut build_rng = StdRng::seed_from_u64(i as u64);
        let mut ctx = BuildContext::new(&mut palette, &mut build_rng);
        let room = build_room(&def, &mut ctx, &RoomCatalog::default());

        assert_eq!(room.children_with_role(NodeRole::Wall).count(), 4);
        assert_eq!(room.count_role(NodeRole::WallSegment), 3 + 3);
        assert_eq!(room.count_role(NodeRole::Door), 1);
        assert_eq!(room.count_role(NodeRole::Floor), 1);
        assert_eq!(room.count_role(NodeRole::Label), 1);
    }
}

#[test]
fn doorway_split_preserves_wall_area() {
    let mut rng = StdRng::seed_from_u64(77);
    let palette = MaterialPalette::new(&Default::default());
    for _ in 0..100 {
        let width = rng.gen_range(DOOR_WIDTH + 0.01..20.0);
        let height = rng.gen_range(DOOR_HEIGHT + 0.01..8.0);
        let wall = create_wall(&palette, width, height, 0.2, 0.0, 0.0, 0.0, true);
        assert_eq!(wall.children.len(), 4);

        let solid: f32 = wall
            .children_with_role(NodeRole::WallSegment)
            .map(box_front_area)
            .sum();
        let opening = DOOR_WIDTH * DOOR_HEIGHT;
        assert!((solid - (width * height - opening)).abs() < 1e-3);

        let door = wall.children_with_role(NodeRole::Door).next().unwrap();
        assert!((box_front_area(door) - opening).abs() < 1e-5);
    }
}

#[test]
fn library_shelves_are_full_and_books_tilt_within_bounds() {
    let viewer = ready_viewer(99);
    let scene = viewer.scene().unwrap();
    let library = scene.root.find("Library").unwrap();
    let mut books = 0;
    library.walk(&mut |node| {
        if node.name == "book" {
            books += 1;
            assert!(node.transform.rotation.y.abs() <= 0.05 + 1e-6);
        }
    });
    // 3 shelves x 4 rows x 6 books
    assert_eq!(books, 72);
}

// ── Navigation ─────────────────────────────────────────────────────────

#[test]
fn double_navigation_ends_exactly_at_target() {
    let mut viewer = ready_viewer(1);
    let target = viewer.config().room("Classroom").unwrap().viewpoint;
    viewer.go_to_room("Classroom");
    viewer.frame(16.0);
    viewer.frame(300.0);
    viewer.go_to_room("Classroom");
    assert!(viewer.context().unwrap().navigator.is_transitioning());
    run_until_arrival(&mut viewer, 16.0);

    let ctx = viewer.context().unwrap();
    assert!(!ctx.navigator.is_transitioning());
    assert!(approx_eq_vec(ctx.camera.position, target.position, 1e-5));
    assert!(approx_eq_vec(ctx.controls.target, target.look_at, 1e-5));
}

#[test]
fn restart_takes_full_duration_from_interruption() {
    let mut viewer = ready_viewer(1);
    viewer.go_to_room("Library");
    viewer.frame(900.0);
    viewer.go_to_room("Cafeteria");
    // A fresh 1000ms transition, not the remaining 100ms
    assert!(matches!(
        viewer.frame(500.0).map(|r| r.nav),
        Some(NavEvent::Moving { .. })
    ));
    assert!(matches!(
        viewer.frame(500.0).map(|r| r.nav),
        Some(NavEvent::Arrived { .. })
    ));
    let ctx = viewer.context().unwrap();
    assert_eq!(ctx.overlay.room_name, "Cafeteria");
}

#[test]
fn overlay_round_trip_corridor_reception_corridor() {
    let mut viewer = ready_viewer(5);
    viewer.go_to_room("Reception");
    run_until_arrival(&mut viewer, 16.0);
    {
        let ctx = viewer.context().unwrap();
        assert!(ctx.overlay.visible);
        assert_eq!(ctx.overlay.room_name, "Reception");
        assert_eq!(ctx.overlay.description, "Main reception area.");
    }

    viewer.go_to_corridor();
    run_until_arrival(&mut viewer, 16.0);
    let ctx = viewer.context().unwrap();
    let corridor = corridor_viewpoint();
    assert!(!ctx.overlay.visible);
    assert!(approx_eq_vec(ctx.camera.position, corridor.position, 1e-5));
    assert!(approx_eq_vec(ctx.controls.target, corridor.look_at, 1e-5));
}

#[test]
fn labels_follow_the_camera() {
    let mut viewer = ready_viewer(8);
    viewer.frame(16.0);
    let visible_from_entrance = viewer
        .context()
        .unwrap()
        .labels
        .labels()
        .iter()
        .filter(|l| l.visible)
        .count();
    // Every room label is down the corridor ahead of the entrance
    assert_eq!(visible_from_entrance, 4);

    viewer.go_to_room("Classroom");
    run_until_arrival(&mut viewer, 50.0);
    let labels = viewer.context().unwrap().labels.labels().to_vec();
    let reception = labels.iter().find(|l| l.text == "Reception").unwrap();
    // Reception's label is now behind the camera
    assert!(!reception.visible);
}

// ── Asset barrier ──────────────────────────────────────────────────────

#[test]
fn barrier_opens_once_for_every_order_and_outcome_mix() {
    let keys = [TextureKey::Wall, TextureKey::Wood, TextureKey::CorridorFloor];
    let manifest = TextureManifest {
        entries: keys
            .iter()
            .map(|k| (*k, Some(format!("textures/{}.jpg", k.name()))))
            .collect::<BTreeMap<_, _>>(),
    };
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        for fail_mask in 0u8..8 {
            let mut barrier = LoadBarrier::new(&manifest);
            let mut releases = 0;
            for (step, &i) in order.iter().enumerate() {
                let outcome = if fail_mask & (1 << i) != 0 {
                    LoadOutcome::Failed("network".into())
                } else {
                    LoadOutcome::Loaded
                };
                if let Some(textures) = barrier.settle(keys[i], outcome) {
                    releases += 1;
                    assert_eq!(step, keys.len() - 1);
                    assert_eq!(textures.len(), 3 - fail_mask.count_ones() as usize);
                }
            }
            assert_eq!(releases, 1);
            assert!(barrier.try_release().is_none());
        }
    }
}

#[test]
fn viewer_initializes_after_shuffled_outcomes() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..20 {
        let mut viewer = Viewer::new(TourConfig {
            seed: Some(4),
            ..TourConfig::default()
        });
        let mut pending = viewer.barrier().pending();
        pending.shuffle(&mut rng);
        let last = pending.len() - 1;
        for (i, key) in pending.into_iter().enumerate() {
            assert!(!viewer.is_initialized());
            let outcome = if rng.gen_bool(0.3) {
                LoadOutcome::Failed("timeout".into())
            } else {
                LoadOutcome::Loaded
            };
            assert_eq!(viewer.settle_texture(key, outcome), i == last);
        }
        assert!(viewer.is_initialized());
    }
}

#[test]
fn stalled_texture_keeps_viewer_uninitialized() {
    let mut viewer = Viewer::new(TourConfig::default());
    let mut pending = viewer.barrier().pending();
    let stalled = pending.pop().unwrap();
    for key in pending {
        viewer.settle_texture(key, LoadOutcome::Loaded);
    }
    assert!(!viewer.is_initialized());
    assert_eq!(viewer.barrier().pending(), vec![stalled]);
    assert!(viewer.frame(16.0).is_none());
}

// ── Resize ─────────────────────────────────────────────────────────────

#[test]
fn resize_before_init_changes_nothing() {
    let mut viewer = Viewer::new(TourConfig::default());
    viewer.resize(1920, 1080);
    assert!(viewer.context().is_none());
    viewer.settle_all_loaded();
    let ctx = viewer.context().unwrap();
    assert_eq!(ctx.surface.size().width, 1280);
    assert_eq!(ctx.surface.size().height, 720);
}

#[test]
fn resize_after_init_matches_new_size() {
    let mut viewer = ready_viewer(2);
    for (w, h) in [(1920, 1080), (800, 600), (333, 777)] {
        viewer.resize(w, h);
        let ctx = viewer.context().unwrap();
        assert!((ctx.camera.aspect - w as f32 / h as f32).abs() < 1e-6);
        assert_eq!(ctx.surface.size().width, w);
        assert_eq!(ctx.surface.size().height, h);
        assert_eq!(ctx.labels.size(), ctx.surface.size());
    }
}

// ── Config ─────────────────────────────────────────────────────────────

#[test]
fn custom_building_from_json() {
    let json = r#"{
        "seed": 12,
        "rooms": [
            {
                "name": "Workshop",
                "description": "Tools and benches.",
                "x": -6.0, "z": 0.0, "width": 8.0, "depth": 7.0,
                "viewpoint": {
                    "position": [-5.0, 1.7, 1.0],
                    "look_at": [-5.0, 1.7, -3.0]
                }
            }
        ]
    }"#;
    let config = TourConfig::from_json(json).unwrap();
    assert!(validate_config(&config).is_empty());
    let mut viewer = Viewer::new(config);
    viewer.settle_all_loaded();
    let summary = viewer.scene().unwrap().summary();
    assert_eq!(summary.rooms, 1);
    assert_eq!(summary.doors, 1);
    assert_eq!(summary.furniture, 0);
    // Ambient + sun + default room light
    assert_eq!(summary.lights, 3);

    assert!(viewer.go_to_room("Workshop"));
    run_until_arrival(&mut viewer, 100.0);
    assert_eq!(
        viewer.context().unwrap().overlay.description,
        "Tools and benches."
    );
}
