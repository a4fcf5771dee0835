//! CampusTour Headless Harness
//!
//! Builds the reference building and drives the camera tour without a
//! window: config validation, texture barrier, scene structure, lighting,
//! navigation and resize handling.
//!
//! Usage:
//!   cargo run -p campustour-simtest
//!   cargo run -p campustour-simtest -- --verbose
//!   cargo run -p campustour-simtest -- --json --seed 7

use campustour_logic::assets::{LoadOutcome, LoadedTextures, TextureKey, TextureManifest};
use campustour_logic::building::build_scene;
use campustour_logic::config::{validate_config, TourConfig};
use campustour_logic::constants::layout::{DOOR_HEIGHT, DOOR_WIDTH};
use campustour_logic::constants::room_names;
use campustour_logic::driver::Viewer;
use campustour_logic::furnishing::LIBRARY_SHELVES;
use campustour_logic::furniture::{books_per_row, SHELF_ROWS};
use campustour_logic::math::approx_eq_vec;
use campustour_logic::navigator::NavEvent;
use campustour_logic::rooms::RoomDefinition;
use campustour_logic::scene::{NodeRole, Scene, SceneNode, SceneSummary, Shape};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Frame step used when driving transitions.
const FRAME_MS: f32 = 1000.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

const USAGE: &str = "Usage: campustour-simtest [--verbose|-v] [--json] [--seed <u64>]";

#[derive(Debug, PartialEq)]
struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

impl Options {
    fn from_args() -> Self {
        match Self::parse(std::env::args().skip(1)) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("{}\n{}", message, USAGE);
                std::process::exit(2);
            }
        }
    }

    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut opts = Self {
            verbose: false,
            json: false,
            seed: 42,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" | "-v" => opts.verbose = true,
                "--json" => opts.json = true,
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    opts.seed = value
                        .parse()
                        .map_err(|e| format!("invalid --seed '{}': {}", value, e))?;
                }
                _ => {}
            }
        }
        Ok(opts)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    seed: u64,
    summary: SceneSummary,
    passed: usize,
    failed: usize,
    failures: Vec<&'a str>,
}

fn main() {
    let opts = Options::from_args();
    if !opts.json {
        println!("=== CampusTour Headless Harness ===\n");
    }

    let config = TourConfig {
        seed: Some(opts.seed),
        ..TourConfig::default()
    };

    let mut results = Vec::new();

    // 1. Config loading and validation
    results.extend(validate_configuration(&config, opts.json));

    // 2. Texture barrier and fallbacks
    results.extend(validate_texture_barrier(&config, opts.json));

    // 3. Building structure
    let scene = build_reference_scene(&config, opts.seed);
    results.extend(validate_building(&scene, &config.rooms, opts.json));

    // 4. Furniture
    results.extend(validate_furniture(&scene, opts.json));

    // 5. Lighting
    results.extend(validate_lighting(&scene, opts.json));

    // 6. Navigation tour
    results.extend(validate_navigation(&config, opts.json));

    // 7. Resize handling
    results.extend(validate_resize(&config, opts.json));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if opts.json {
        let report = JsonReport {
            seed: opts.seed,
            summary: scene.summary(),
            passed,
            failed,
            failures: results
                .iter()
                .filter(|r| !r.passed)
                .map(|r| r.name.as_str())
                .collect(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(title: &str, quiet: bool) {
    if !quiet {
        println!("--- {} ---", title);
    }
}

fn build_reference_scene(config: &TourConfig, seed: u64) -> Scene {
    let textures = LoadedTextures::all_from(&config.textures);
    let mut rng = StdRng::seed_from_u64(seed);
    build_scene(config, &textures, &mut rng)
}

/// Drive a viewer until the running transition finishes.
fn run_until_idle(viewer: &mut Viewer) -> (usize, Option<NavEvent>) {
    let mut frames = 0;
    while frames < 600 {
        frames += 1;
        match viewer.frame(FRAME_MS) {
            Some(report) if matches!(report.nav, NavEvent::Arrived { .. }) => {
                return (frames, Some(report.nav));
            }
            Some(_) => {}
            None => return (frames, None),
        }
    }
    (frames, None)
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &TourConfig, quiet: bool) -> Vec<TestResult> {
    section("Configuration", quiet);
    let mut results = Vec::new();

    let issues = validate_config(config);
    results.push(TestResult::new(
        "config_default_valid",
        issues.is_empty(),
        format!("{} issues in the built-in config", issues.len()),
    ));

    let round_trip = config
        .to_json()
        .and_then(|json| TourConfig::from_json(&json));
    results.push(match round_trip {
        Ok(parsed) => TestResult::new(
            "config_json_round_trip",
            parsed == *config,
            "built-in config survives JSON",
        ),
        Err(e) => TestResult::new("config_json_round_trip", false, e.to_string()),
    });

    let mut narrow = config.clone();
    if let Some(room) = narrow.rooms.first_mut() {
        room.width = DOOR_WIDTH;
    }
    if let Some(room) = narrow.rooms.get_mut(1) {
        room.name = room_names::RECEPTION.to_string();
    }
    let issues = validate_config(&narrow);
    results.push(TestResult::new(
        "config_rejects_bad_rooms",
        issues.len() == 2,
        issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; "),
    ));

    let partial = TourConfig::from_json(r#"{"title": "Night Tour", "transition_ms": 250}"#);
    results.push(match partial {
        Ok(parsed) => TestResult::new(
            "config_partial_json_defaults",
            parsed.rooms.len() == 4 && parsed.transition_ms == 250.0,
            format!("'{}' with {} rooms", parsed.title, parsed.rooms.len()),
        ),
        Err(e) => TestResult::new("config_partial_json_defaults", false, e.to_string()),
    });

    results
}

// ── 2. Texture barrier ──────────────────────────────────────────────────

fn validate_texture_barrier(config: &TourConfig, quiet: bool) -> Vec<TestResult> {
    section("Texture Barrier", quiet);
    let mut results = Vec::new();

    let mut viewer = Viewer::new(config.clone());
    let pending = viewer.barrier().pending();
    results.push(TestResult::new(
        "barrier_requests_seven",
        pending.len() == 7,
        format!("{} textures requested", pending.len()),
    ));

    // Fail the wall and every other floor; the last outcome releases
    let mut early_release = false;
    for (i, key) in pending.iter().enumerate() {
        let outcome = if *key == TextureKey::Wall || i % 2 == 1 {
            LoadOutcome::Failed("not found".into())
        } else {
            LoadOutcome::Loaded
        };
        let released = viewer.settle_texture(*key, outcome);
        if released && i + 1 < pending.len() {
            early_release = true;
        }
    }
    results.push(TestResult::new(
        "barrier_releases_on_last",
        !early_release && viewer.is_initialized(),
        format!(
            "{} settled, {} failed",
            viewer.barrier().settled(),
            viewer.barrier().failures().len()
        ),
    ));

    let wall_fallback = viewer.scene().and_then(|scene| {
        let wall = scene.root.find("wall_segment")?;
        scene.materials.get(wall.material()?).cloned()
    });
    results.push(match wall_fallback {
        Some(spec) => TestResult::new(
            "barrier_wall_fallback",
            spec.texture.is_none() && spec.double_sided,
            format!("wall material '{}' is #{:06x}", spec.label, spec.color.0),
        ),
        None => TestResult::new("barrier_wall_fallback", false, "no wall mesh found"),
    });

    let mut bare = Viewer::new(TourConfig {
        textures: TextureManifest {
            entries: Default::default(),
        },
        ..config.clone()
    });
    results.push(TestResult::new(
        "barrier_empty_manifest",
        bare.poll() && bare.is_initialized(),
        "empty manifest releases on first poll",
    ));

    results
}

// ── 3. Building ─────────────────────────────────────────────────────────

/// Every door panel is door-sized, stands on the floor and sits under
/// the lintel of its wall.
fn door_within_opening(wall: &SceneNode) -> bool {
    let lintel_x = wall
        .children_with_role(NodeRole::WallSegment)
        .find(|s| matches!(s.shape(), Some(Shape::Box { width, .. }) if width == DOOR_WIDTH))
        .map(|s| s.position().x);
    wall.children_with_role(NodeRole::Door).all(|door| {
        let fits = matches!(
            door.shape(),
            Some(Shape::Plane { width, height }) if width == DOOR_WIDTH && height == DOOR_HEIGHT
        );
        let p = door.position();
        fits && lintel_x.is_some_and(|x| (p.x - x).abs() < 1e-4)
            && (p.y - DOOR_HEIGHT / 2.0).abs() < 1e-4
    })
}

fn validate_building(scene: &Scene, rooms: &[RoomDefinition], quiet: bool) -> Vec<TestResult> {
    section("Building", quiet);
    let mut results = Vec::new();
    let summary = scene.summary();

    results.push(TestResult::new(
        "building_room_count",
        summary.rooms == rooms.len(),
        format!("{} rooms, {} nodes", summary.rooms, summary.nodes),
    ));

    let corridor_walls: Vec<_> = scene.root.children_with_role(NodeRole::Wall).collect();
    let corridor_doors: usize = corridor_walls
        .iter()
        .map(|w| w.count_role(NodeRole::Door))
        .sum();
    results.push(TestResult::new(
        "building_corridor_shell",
        corridor_walls.len() == 4 && corridor_doors == 0,
        format!(
            "{} corridor walls, {} corridor doors",
            corridor_walls.len(),
            corridor_doors
        ),
    ));

    for def in rooms {
        let name = format!("room_{}_walls", def.name.to_lowercase());
        let Some(room) = scene.root.find(&def.name) else {
            results.push(TestResult::new(&name, false, "room group missing"));
            continue;
        };
        let walls: Vec<_> = room.children_with_role(NodeRole::Wall).collect();
        let doorway_walls: Vec<_> = walls
            .iter()
            .filter(|w| w.count_role(NodeRole::Door) == 1)
            .collect();
        let door_z = doorway_walls
            .first()
            .and_then(|w| w.children_with_role(NodeRole::Door).next())
            .map(|door| door.position().z);
        let facing_corridor = door_z.is_some_and(|z| {
            if def.is_left_side() {
                z > 0.0
            } else {
                z < 0.0
            }
        });
        let door_ok = walls.iter().all(|w| door_within_opening(w));
        results.push(TestResult::new(
            &name,
            walls.len() == 4 && doorway_walls.len() == 1 && facing_corridor && door_ok,
            format!(
                "{} walls, {} with doorway, faces corridor: {}",
                walls.len(),
                doorway_walls.len(),
                facing_corridor
            ),
        ));
    }

    results.push(TestResult::new(
        "building_labels",
        summary.labels == rooms.len(),
        format!("{} labels", summary.labels),
    ));

    results
}

// ── 4. Furniture ────────────────────────────────────────────────────────

fn validate_furniture(scene: &Scene, quiet: bool) -> Vec<TestResult> {
    section("Furniture", quiet);
    let mut results = Vec::new();

    let library = scene.root.find(room_names::LIBRARY);
    let shelf_books = library.map_or(0, |room| room.count(|n| n.name == "book"));
    let expected = LIBRARY_SHELVES * SHELF_ROWS * books_per_row(1.0);
    results.push(TestResult::new(
        "library_shelves_full",
        shelf_books == expected,
        format!("{} shelf books (expected {})", shelf_books, expected),
    ));

    let classroom_desks = scene
        .root
        .find(room_names::CLASSROOM)
        .map_or(0, |room| room.count(|n| n.name == "desk"));
    results.push(TestResult::new(
        "classroom_desks",
        classroom_desks == 10,
        format!("{} desks (9 student + 1 lecturer)", classroom_desks),
    ));

    let cafeteria_tables = scene
        .root
        .find(room_names::CAFETERIA)
        .map_or(0, |room| room.count(|n| n.name == "table"));
    results.push(TestResult::new(
        "cafeteria_tables",
        cafeteria_tables == 4,
        format!("{} tables", cafeteria_tables),
    ));

    let people = scene.root.count(|n| n.name == "person");
    results.push(TestResult::new(
        "people_present",
        people >= 2,
        format!("{} people", people),
    ));

    results
}

// ── 5. Lighting ─────────────────────────────────────────────────────────

fn validate_lighting(scene: &Scene, quiet: bool) -> Vec<TestResult> {
    section("Lighting", quiet);
    let mut results = Vec::new();

    results.push(TestResult::new(
        "lighting_count",
        scene.lights.len() == 10,
        format!("{} lights", scene.lights.len()),
    ));

    let finite = scene
        .lights
        .iter()
        .all(|l| l.position().map_or(true, |p| p.is_finite()) && l.intensity() > 0.0);
    results.push(TestResult::new(
        "lighting_finite",
        finite,
        "every light has a finite position and positive intensity",
    ));

    results
}

// ── 6. Navigation ───────────────────────────────────────────────────────

fn validate_navigation(config: &TourConfig, quiet: bool) -> Vec<TestResult> {
    section("Navigation", quiet);
    let mut results = Vec::new();

    let mut viewer = Viewer::new(config.clone());
    viewer.settle_all_loaded();

    for def in &config.rooms {
        let name = format!("tour_{}", def.name.to_lowercase());
        viewer.go_to_room(&def.name);
        let (frames, event) = run_until_idle(&mut viewer);
        let Some(ctx) = viewer.context() else {
            results.push(TestResult::new(&name, false, "viewer not initialized"));
            continue;
        };
        let arrived = matches!(&event, Some(NavEvent::Arrived { room: Some(r) }) if *r == def.name);
        let at_pose = approx_eq_vec(ctx.camera.position, def.viewpoint.position, 1e-4)
            && approx_eq_vec(ctx.controls.target, def.viewpoint.look_at, 1e-4);
        let overlay = ctx.overlay.visible && ctx.overlay.room_name == def.name;
        results.push(TestResult::new(
            &name,
            arrived && at_pose && overlay && ctx.controls.enabled,
            format!("arrived after {} frames", frames),
        ));
    }

    // Retarget mid-flight: only the second destination is reached
    viewer.go_to_room(room_names::LIBRARY);
    for _ in 0..20 {
        viewer.frame(FRAME_MS);
    }
    viewer.go_to_corridor();
    let replaced = viewer.context().and_then(|ctx| ctx.navigator.active()).is_some_and(|t| {
        t.room().is_none() && t.progress() == 0.0
    });
    results.push(TestResult::new(
        "tour_retarget_replaces_transition",
        replaced,
        "one transition in flight, restarted toward the corridor",
    ));
    let (_, event) = run_until_idle(&mut viewer);
    let corridor = config.corridor_viewpoint;
    let retarget_ok = viewer.context().is_some_and(|ctx| {
        approx_eq_vec(ctx.camera.position, corridor.position, 1e-4) && !ctx.overlay.visible
    });
    results.push(TestResult::new(
        "tour_retarget_mid_flight",
        retarget_ok && matches!(event, Some(NavEvent::Arrived { room: None })),
        "corridor reached after interrupting the library transition",
    ));

    // A drag still coasting when a move starts must not bend the arrival
    if let Some(ctx) = viewer.context_mut() {
        ctx.controls.rotate(200.0, 0.0);
    }
    viewer.go_to_room(room_names::LIBRARY);
    let drag_dropped = viewer
        .context()
        .is_some_and(|ctx| ctx.controls.pending_rotation() == (0.0, 0.0));
    run_until_idle(&mut viewer);
    let library = config.room(room_names::LIBRARY).map(|r| r.viewpoint);
    let exact = viewer.context().zip(library).is_some_and(|(ctx, vp)| {
        approx_eq_vec(ctx.camera.position, vp.position, 1e-4)
            && approx_eq_vec(ctx.controls.target, vp.look_at, 1e-4)
    });
    results.push(TestResult::new(
        "tour_drag_dropped_on_move",
        drag_dropped && exact,
        "pending drag cleared and library pose exact on arrival",
    ));

    let unknown = viewer.go_to_room("Gymnasium");
    results.push(TestResult::new(
        "tour_unknown_room",
        !unknown && viewer.context().is_some_and(|c| !c.navigator.is_transitioning()),
        "unknown room name is refused",
    ));

    results
}

// ── 7. Resize ───────────────────────────────────────────────────────────

fn validate_resize(config: &TourConfig, quiet: bool) -> Vec<TestResult> {
    section("Resize", quiet);
    let mut results = Vec::new();

    let mut viewer = Viewer::new(config.clone());
    viewer.resize(640, 480);
    let early_noop = viewer.context().is_none();
    viewer.settle_all_loaded();
    viewer.resize(1920, 800);
    viewer.resize(0, 600);
    viewer.frame(FRAME_MS);

    let synced = viewer.context().is_some_and(|ctx| {
        let size = ctx.surface.size();
        (ctx.camera.aspect - 2.4).abs() < 1e-5
            && size.width == 1920
            && ctx.labels.size() == size
            && ctx.labels.labels().len() == config.rooms.len()
    });
    results.push(TestResult::new(
        "resize_syncs_surfaces",
        early_noop && synced,
        "camera aspect and both surfaces follow the window",
    ));

    results
}
