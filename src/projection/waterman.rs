//! Waterman butterfly projection
//!
//! The globe is mapped onto a truncated octahedron: each of the eight
//! octahedron faces is cut into a hexagon (the cut sits at 0.9487/0.3162 of
//! every edge) and three corner triangles. Every face is drawn with its own
//! gnomonic projection, and the faces are unfolded as a tree. A child face is
//! attached to its parent by the affine transform that lines up their shared
//! edge, so the unfolded net is continuous across tree edges and cut
//! everywhere else.
//!
//! Face numbering: hexagons are `0..8` in octahedron face order, the corner
//! triangles of hexagon `h` are `8 + 3h .. 8 + 3h + 3`.

use std::f64::consts::{FRAC_PI_2, PI};

use super::rotation::Rotation;
use super::RawProjection;

/// Octahedron vertices as `[lon, lat]` in degrees
const OCTAHEDRON: [[f64; 2]; 6] = [
    [0.0, 90.0],
    [-90.0, 0.0],
    [0.0, 0.0],
    [90.0, 0.0],
    [180.0, 0.0],
    [0.0, -90.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 1],
    [0, 3, 2],
    [5, 1, 2],
    [5, 2, 3],
    [0, 1, 4],
    [0, 4, 3],
    [5, 4, 1],
    [5, 3, 4],
];

/// Parent of each hexagon in the unfolding tree
const HEXAGON_PARENTS: [Option<usize>; 8] = [
    None,
    Some(0),
    Some(0),
    Some(1),
    Some(0),
    Some(1),
    Some(4),
    Some(5),
];

/// Weights placing the hexagon corners along each octahedron edge
const NEAR: f64 = 0.9486832980505138;
const FAR: f64 = 0.31622776601683794;

/// Fraction of the way from an outline corner toward the face centroid
const OUTLINE_INSET: f64 = 1e-6;

/// Tolerance when matching vertices shared between faces
const VERTEX_EPSILON: f64 = 1e-9;

type Vec3 = [f64; 3];

/// Row-major affine transform `[a, b, c, d, e, f]` for
/// `x' = a·x + b·y + c`, `y' = d·x + e·y + f`
type Affine = [f64; 6];

const IDENTITY: Affine = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// Rotation of the root hexagon in the plane; lays the butterfly out wide
const ROOT_ANGLE: f64 = -PI / 6.0;

/// Gnomonic projection centred on one face
#[derive(Debug, Clone, Copy)]
struct FaceProjection {
    rotation: Rotation,
}

impl FaceProjection {
    fn centred_on(center: [f64; 2]) -> Self {
        Self {
            rotation: Rotation::new([-center[0], -center[1], 0.0]),
        }
    }

    /// Project a `[lon, lat]` point in degrees; y grows downward
    fn project(&self, point: [f64; 2]) -> [f64; 2] {
        let (lambda, phi) = self
            .rotation
            .forward(point[0].to_radians(), point[1].to_radians());
        let cos_phi = phi.cos();
        let k = lambda.cos() * cos_phi;
        [cos_phi * lambda.sin() / k, -(phi.sin() / k)]
    }
}

/// A face edge, either still open or glued to a neighbouring face
#[derive(Debug, Clone, Copy, PartialEq)]
enum Edge {
    Open([f64; 2], [f64; 2]),
    Linked(usize),
}

impl Edge {
    fn joins(&self, shared: &[[f64; 2]; 2]) -> bool {
        match self {
            Edge::Open(a, b) => {
                (same_vertex(a, &shared[0]) && same_vertex(b, &shared[1]))
                    || (same_vertex(a, &shared[1]) && same_vertex(b, &shared[0]))
            }
            Edge::Linked(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Face {
    vertices: Vec<[f64; 2]>,
    projection: FaceProjection,
    /// Unit vector toward the middle of the face
    centroid: Vec3,
    transform: Affine,
    edges: Vec<Edge>,
    children: Vec<usize>,
}

/// Waterman's butterfly, unfolded from the truncated octahedron
#[derive(Debug, Clone)]
pub struct WatermanButterfly {
    faces: Vec<Face>,
    /// For each hexagon, the normals of the planes cutting off its corners
    corner_normals: Vec<[Vec3; 3]>,
}

impl WatermanButterfly {
    pub fn new() -> Self {
        let octahedron: Vec<Vec<[f64; 2]>> = OCTAHEDRON_FACES
            .iter()
            .map(|face| face.iter().map(|&i| OCTAHEDRON[i]).collect())
            .collect();

        let hexagons: Vec<Vec<[f64; 2]>> = octahedron.iter().map(|face| truncate(face)).collect();

        let mut polygons = hexagons.clone();
        let mut parents: Vec<Option<usize>> = HEXAGON_PARENTS.to_vec();
        let mut corner_normals = Vec::with_capacity(hexagons.len());

        for (j, hexagon) in hexagons.iter().enumerate() {
            let face = &octahedron[j];
            let n = face.len();
            let mut normals = [[0.0; 3]; 3];
            for i in 0..n {
                let near = hexagon[(i * 2 + 2) % (2 * n)];
                let far = hexagon[(i * 2 + 1) % (2 * n)];
                polygons.push(vec![face[i], near, far]);
                parents.push(Some(j));
                normals[i] = cross(cartesian(near), cartesian(far));
            }
            corner_normals.push(normals);
        }

        let mut faces: Vec<Face> = polygons
            .into_iter()
            .map(|vertices| {
                let center = if vertices.len() == 6 {
                    spherical(normalize(vertex_sum(&vertices)))
                } else {
                    vertices[0]
                };
                Face {
                    projection: FaceProjection::centred_on(center),
                    centroid: normalize(vertex_sum(&vertices)),
                    vertices,
                    transform: IDENTITY,
                    edges: Vec::new(),
                    children: Vec::new(),
                }
            })
            .collect();

        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                faces[*p].children.push(i);
            }
        }

        faces[0].transform = [
            ROOT_ANGLE.cos(),
            ROOT_ANGLE.sin(),
            0.0,
            -ROOT_ANGLE.sin(),
            ROOT_ANGLE.cos(),
            0.0,
        ];
        unfold(&mut faces, 0, None);

        Self {
            faces,
            corner_normals,
        }
    }

    /// Index of the face containing a point (radians)
    fn face_index(&self, lambda: f64, phi: f64) -> usize {
        let cos_phi = phi.cos();
        let p = [cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()];

        let hexagon = if lambda < -FRAC_PI_2 {
            if phi < 0.0 { 6 } else { 4 }
        } else if lambda < 0.0 {
            if phi < 0.0 { 2 } else { 0 }
        } else if lambda < FRAC_PI_2 {
            if phi < 0.0 { 3 } else { 1 }
        } else if phi < 0.0 {
            7
        } else {
            5
        };

        let normals = &self.corner_normals[hexagon];
        normals
            .iter()
            .position(|n| dot(*n, p) < 0.0)
            .map_or(hexagon, |corner| 8 + 3 * hexagon + corner)
    }

    /// Walk the unfolding tree and collect the open edges, in order.
    fn trace_outline(&self, node: usize, parent: Option<usize>, out: &mut Vec<(f64, f64)>) {
        let face = &self.faces[node];
        let n = face.edges.len();

        // Start right after the edge we arrived through
        let start = match parent {
            Some(p) => {
                face.edges
                    .iter()
                    .position(|edge| *edge == Edge::Linked(p))
                    .unwrap_or(n)
                    + 1
            }
            None => 0,
        };

        let mut inside = false;
        for i in 0..n {
            match face.edges[(i + start) % n] {
                Edge::Open(a, b) => {
                    if !inside {
                        out.push(inset(a, face.centroid));
                        inside = true;
                    }
                    out.push(inset(b, face.centroid));
                }
                Edge::Linked(next) => {
                    inside = false;
                    if Some(next) != parent {
                        self.trace_outline(next, Some(node), out);
                    }
                }
            }
        }
    }
}

impl Default for WatermanButterfly {
    fn default() -> Self {
        Self::new()
    }
}

impl RawProjection for WatermanButterfly {
    fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let face = &self.faces[self.face_index(lambda, phi)];
        let [x, y] = face
            .projection
            .project([lambda.to_degrees(), phi.to_degrees()]);
        let t = &face.transform;
        (t[0] * x + t[1] * y + t[2], -(t[3] * x + t[4] * y + t[5]))
    }

    fn outline(&self) -> Vec<(f64, f64)> {
        let mut ring = Vec::new();
        self.trace_outline(0, None, &mut ring);
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
        ring
    }
}

/// Glue `node` to `parent` along their shared edge, then recurse into the
/// children of `node`.
fn unfold(faces: &mut [Face], node: usize, parent: Option<usize>) {
    faces[node].edges = face_edges(&faces[node].vertices);

    if let Some(p) = parent {
        if let Some(shared) = shared_edge(&faces[node].vertices, &faces[p].vertices) {
            let m = edge_matrix(
                [
                    faces[p].projection.project(shared[0]),
                    faces[p].projection.project(shared[1]),
                ],
                [
                    faces[node].projection.project(shared[0]),
                    faces[node].projection.project(shared[1]),
                ],
            );
            faces[node].transform = multiply(&faces[p].transform, &m);

            for edge in faces[p].edges.iter_mut() {
                if edge.joins(&shared) {
                    *edge = Edge::Linked(node);
                }
            }
            for edge in faces[node].edges.iter_mut() {
                if edge.joins(&shared) {
                    *edge = Edge::Linked(p);
                }
            }
        }
    }

    let children = faces[node].children.clone();
    for child in children {
        unfold(faces, child, Some(node));
    }
}

/// Edges of a polygon; edge `i` ends at vertex `i`
fn face_edges(vertices: &[[f64; 2]]) -> Vec<Edge> {
    let n = vertices.len();
    (0..n)
        .map(|i| Edge::Open(vertices[(i + n - 1) % n], vertices[i]))
        .collect()
}

fn shared_edge(face: &[[f64; 2]], other: &[[f64; 2]]) -> Option<[[f64; 2]; 2]> {
    let mut found = None;
    for p in face {
        if other.iter().any(|q| same_vertex(p, q)) {
            match found {
                Some(first) => return Some([first, *p]),
                None => found = Some(*p),
            }
        }
    }
    None
}

/// Cut the corners off a spherical triangle, giving a hexagon
fn truncate(face: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let xyz: Vec<Vec3> = face.iter().map(|&p| cartesian(p)).collect();
    let mut hexagon = Vec::with_capacity(2 * xyz.len());
    let mut a = xyz[xyz.len() - 1];
    for &b in &xyz {
        hexagon.push(spherical(mix(a, b)));
        hexagon.push(spherical(mix(b, a)));
        a = b;
    }
    hexagon
}

fn mix(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[0] * NEAR + b[0] * FAR,
        a[1] * NEAR + b[1] * FAR,
        a[2] * NEAR + b[2] * FAR,
    ]
}

/// Transform taking the segment `b` onto the segment `a`
fn edge_matrix(a: [[f64; 2]; 2], b: [[f64; 2]; 2]) -> Affine {
    let u = [a[1][0] - a[0][0], a[1][1] - a[0][1]];
    let v = [b[1][0] - b[0][0], b[1][1] - b[0][1]];
    let phi = (u[0] * v[1] - u[1] * v[0]).atan2(u[0] * v[0] + u[1] * v[1]);
    let s = u[0].hypot(u[1]) / v[0].hypot(v[1]);

    multiply(
        &[1.0, 0.0, a[0][0], 0.0, 1.0, a[0][1]],
        &multiply(
            &[s, 0.0, 0.0, 0.0, s, 0.0],
            &multiply(
                &[phi.cos(), phi.sin(), 0.0, -phi.sin(), phi.cos(), 0.0],
                &[1.0, 0.0, -b[0][0], 0.0, 1.0, -b[0][1]],
            ),
        ),
    )
}

fn multiply(a: &Affine, b: &Affine) -> Affine {
    [
        a[0] * b[0] + a[1] * b[3],
        a[0] * b[1] + a[1] * b[4],
        a[0] * b[2] + a[1] * b[5] + a[2],
        a[3] * b[0] + a[4] * b[3],
        a[3] * b[1] + a[4] * b[4],
        a[3] * b[2] + a[4] * b[5] + a[5],
    ]
}

/// Move a corner a tiny step toward the face centroid so that it projects
/// with the face it belongs to. Returns radians.
fn inset(corner: [f64; 2], centroid: Vec3) -> (f64, f64) {
    let a = cartesian(corner);
    let d = dot(a, centroid).clamp(-1.0, 1.0).acos();
    if d == 0.0 {
        return (corner[0].to_radians(), corner[1].to_radians());
    }
    let k = d.sin();
    let wa = (d - OUTLINE_INSET * d).sin() / k;
    let wc = (OUTLINE_INSET * d).sin() / k;
    let p = [
        wa * a[0] + wc * centroid[0],
        wa * a[1] + wc * centroid[1],
        wa * a[2] + wc * centroid[2],
    ];
    (p[1].atan2(p[0]), p[2].atan2(p[0].hypot(p[1])))
}

fn same_vertex(a: &[f64; 2], b: &[f64; 2]) -> bool {
    (a[0] - b[0]).abs() < VERTEX_EPSILON && (a[1] - b[1]).abs() < VERTEX_EPSILON
}

fn vertex_sum(vertices: &[[f64; 2]]) -> Vec3 {
    vertices.iter().fold([0.0; 3], |acc, &v| {
        let c = cartesian(v);
        [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]]
    })
}

fn cartesian(point: [f64; 2]) -> Vec3 {
    let lambda = point[0].to_radians();
    let phi = point[1].to_radians();
    let cos_phi = phi.cos();
    [cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()]
}

fn spherical(c: Vec3) -> [f64; 2] {
    [
        c[1].atan2(c[0]).to_degrees(),
        c[2].clamp(-1.0, 1.0).asin().to_degrees(),
    ]
}

fn normalize(c: Vec3) -> Vec3 {
    let m = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
    [c[0] / m, c[1] / m, c[2] / m]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
