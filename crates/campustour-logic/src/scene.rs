//! Engine-agnostic scene graph.
//!
//! Every constructed mesh, label and group lives in one tree rooted at the
//! building node. Children are owned by their parent; factory output is
//! moved into the owning group. Transforms are local to the parent:
//! a translation plus Euler rotation (X, then Y, then Z).

use serde::Serialize;

use crate::lighting::LightSpec;
use crate::math::{euler_xyz, Color, Mat3, Vec3};
use crate::palette::{MaterialHandle, MaterialPalette};

/// Local placement of a node relative to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NodeTransform {
    pub translation: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
}

/// Parametric mesh shapes. Dimensions are full extents, not half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Shape {
    /// Axis-aligned box centered on the node origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Flat rectangle in the local XY plane, facing +Z.
    Plane { width: f32, height: f32 },
    /// Upright cylinder centered on the node origin.
    Cylinder { radius: f32, height: f32, segments: u32 },
    Sphere { radius: f32, segments: u32 },
}

/// What a node represents in the building. Used by hosts for tagging and
/// by tests for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeRole {
    Building,
    Room,
    /// One logical wall; its children are segments and at most one door.
    Wall,
    WallSegment,
    Door,
    Floor,
    Ceiling,
    Label,
    /// A furniture group (desk, shelf, person, table set).
    Furniture,
    /// A mesh inside a furniture group or a loose prop.
    Part,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Group,
    Mesh {
        shape: Shape,
        material: MaterialHandle,
    },
    /// Screen-space text anchored at the node position.
    Label { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub role: NodeRole,
    pub kind: NodeKind,
    pub transform: NodeTransform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneNode>,
}

/// Accumulated world placement of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub position: Vec3,
    pub rotation: Mat3,
}

impl WorldPose {
    pub const ORIGIN: Self = Self {
        position: Vec3::ZERO,
        rotation: Mat3::IDENTITY,
    };

    fn then(&self, local: &NodeTransform) -> Self {
        Self {
            position: self.position + self.rotation * local.translation,
            rotation: self.rotation * euler_xyz(local.rotation),
        }
    }
}

impl SceneNode {
    fn new(name: impl Into<String>, role: NodeRole, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            role,
            kind,
            transform: NodeTransform::default(),
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, role: NodeRole) -> Self {
        Self::new(name, role, NodeKind::Group)
    }

    pub fn mesh(
        name: impl Into<String>,
        role: NodeRole,
        shape: Shape,
        material: MaterialHandle,
    ) -> Self {
        Self::new(name, role, NodeKind::Mesh { shape, material })
    }

    pub fn label(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(
            format!("label:{text}"),
            NodeRole::Label,
            NodeKind::Label { text },
        )
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.translation = Vec3::new(x, y, z);
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = SceneNode>) {
        self.children.extend(children);
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn shape(&self) -> Option<Shape> {
        match self.kind {
            NodeKind::Mesh { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<MaterialHandle> {
        match self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Pre-order traversal including `self`.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Pre-order traversal with the accumulated world pose of each node.
    pub fn walk_world<'a>(
        &'a self,
        parent: WorldPose,
        f: &mut impl FnMut(&'a SceneNode, WorldPose),
    ) {
        let pose = parent.then(&self.transform);
        f(self, pose);
        for child in &self.children {
            child.walk_world(pose, f);
        }
    }

    /// Number of nodes in this subtree (including `self`) matching `pred`.
    pub fn count(&self, pred: impl Fn(&SceneNode) -> bool) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if pred(node) {
                n += 1;
            }
        });
        n
    }

    pub fn count_role(&self, role: NodeRole) -> usize {
        self.count(|n| n.role == role)
    }

    pub fn mesh_count(&self) -> usize {
        self.count(|n| matches!(n.kind, NodeKind::Mesh { .. }))
    }

    pub fn node_count(&self) -> usize {
        self.count(|_| true)
    }

    /// First node in pre-order with the given name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// All direct children with the given role.
    pub fn children_with_role(&self, role: NodeRole) -> impl Iterator<Item = &SceneNode> {
        self.children.iter().filter(move |c| c.role == role)
    }
}

/// A label's text and world-space anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub text: String,
    pub position: Vec3,
}

/// A fully constructed, static scene: geometry tree, materials, lights.
#[derive(Debug, Clone)]
pub struct Scene {
    pub root: SceneNode,
    pub materials: MaterialPalette,
    pub lights: Vec<LightSpec>,
    pub background: Color,
}

impl Scene {
    /// World-space anchors of every label in the tree.
    pub fn label_anchors(&self) -> Vec<LabelAnchor> {
        let mut anchors = Vec::new();
        self.root.walk_world(WorldPose::ORIGIN, &mut |node, pose| {
            if let NodeKind::Label { text } = &node.kind {
                anchors.push(LabelAnchor {
                    text: text.clone(),
                    position: pose.position,
                });
            }
        });
        anchors
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            rooms: self.root.count_role(NodeRole::Room),
            nodes: self.root.node_count(),
            meshes: self.root.mesh_count(),
            walls: self.root.count_role(NodeRole::Wall),
            doors: self.root.count_role(NodeRole::Door),
            labels: self.root.count_role(NodeRole::Label),
            furniture: self.root.count_role(NodeRole::Furniture),
            materials: self.materials.len(),
            lights: self.lights.len(),
        }
    }
}

/// Counts describing a built scene, for logs and the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub rooms: usize,
    pub nodes: usize,
    pub meshes: usize,
    pub walls: usize,
    pub doors: usize,
    pub labels: usize,
    pub furniture: usize,
    pub materials: usize,
    pub lights: usize,
}
