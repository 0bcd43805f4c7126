use kurbo::{Cap, Circle, Ellipse, Join, RoundedRect, Shape as _, Stroke};

use crate::{
    core::{BezPath, Point, Rgba8, Vec2},
    error::{ChibiError, ChibiResult},
    layout::{ArcSpec, CurlPrimitive, generate_arc, generate_spiral},
};

/// Design-space size the standard rig is authored in. Rendering scales this
/// box onto the target canvas.
pub const DESIGN_WIDTH: f64 = 212.0;
pub const DESIGN_HEIGHT: f64 = 190.0;

const SKIN: Rgba8 = Rgba8::rgb(0xb8, 0x89, 0x5e);
const SKIN_SHADOW: Rgba8 = Rgba8::rgb(0xa4, 0x78, 0x50);
const HAIR: Rgba8 = Rgba8::rgb(0x1a, 0x14, 0x10);
const GLASSES: Rgba8 = Rgba8::new(0x1a, 0x1a, 0x2e, 217);
const SHIRT: Rgba8 = Rgba8::rgb(0xff, 0xff, 0xff);
const SHOULDER: Rgba8 = Rgba8::rgb(0x40, 0x40, 0x40);
const MOUTH_LINE: Rgba8 = Rgba8::rgb(0x8a, 0x6a, 0x5a);
const TONGUE: Rgba8 = Rgba8::rgb(0xff, 0xaa, 0x96);
const EYE: Rgba8 = Rgba8::rgb(0x00, 0x00, 0x00);
const EYELID: Rgba8 = Rgba8::rgb(0x28, 0x28, 0x28);
const DAZED_MOUTH: Rgba8 = Rgba8::rgb(0x26, 0x25, 0x28);
const SPIRAL: Rgba8 = Rgba8::rgb(0x00, 0x00, 0x00);

const HEAD_CENTER: Point = Point::new(104.8, 88.5);
const BODY_PIVOT: Point = Point::new(104.8, 183.0);
const LEFT_EYE: Point = Point::new(92.6, 87.5);
const RIGHT_EYE: Point = Point::new(116.8, 87.5);

/// The fixed set of named visual groups. Eye and mouth variants are
/// separate layers whose visibility the expression poses select, so mutual
/// exclusion is decided by the state machine rather than z-ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Body,
    HairBack,
    EarLeft,
    EarRight,
    Head,
    Eyebrows,
    MouthClosed,
    MouthSmile,
    MouthDazed,
    EyesOpen,
    EyesBlinking,
    SpiralLeft,
    SpiralRight,
    Nose,
    Glasses,
    HairFront,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum LayerShape {
    Fill {
        path: BezPath,
        color: Rgba8,
    },
    /// Curl primitives kept alongside the pre-expanded path that draws
    /// them, so the generated geometry stays inspectable.
    Curls {
        curls: Vec<CurlPrimitive>,
        path: BezPath,
        color: Rgba8,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    /// Parallax sensitivity: the layer translates by `intensity * depth`.
    pub depth: f64,
    /// Stacking position, ascending back-to-front.
    pub z: i32,
    /// Rotation/scale pivot in design space.
    pub pivot: Point,
    /// Whether the dizzy head wobble applies on top of the body wobble.
    pub wobbles_with_head: bool,
    pub shapes: Vec<LayerShape>,
}

/// The avatar's static geometry: every layer, its depth and its stacking
/// order, generated once at construction.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AvatarRig {
    layers: Vec<Layer>,
}

impl AvatarRig {
    /// The built-in chibi character: curly hair from arc-generated curls,
    /// round glasses, and the full eye/mouth variant set.
    pub fn standard() -> ChibiResult<Self> {
        let layers = vec![
            body_layer(),
            hair_back_layer(),
            ear_layer(LayerKind::EarLeft, Point::new(72.0, 105.1), 21),
            ear_layer(LayerKind::EarRight, Point::new(137.5, 105.2), 22),
            head_layer(),
            eyebrows_layer(),
            mouth_closed_layer(),
            mouth_smile_layer(),
            mouth_dazed_layer(),
            eyes_open_layer(),
            eyes_blinking_layer(),
            spiral_layer(LayerKind::SpiralLeft, LEFT_EYE, 71),
            spiral_layer(LayerKind::SpiralRight, RIGHT_EYE, 72),
            nose_layer(),
            glasses_layer(),
            hair_front_layer(),
        ];
        let rig = Self { layers };
        rig.validate()?;
        Ok(rig)
    }

    pub fn validate(&self) -> ChibiResult<()> {
        for layer in &self.layers {
            if !(0.0..=4.0).contains(&layer.depth) {
                return Err(ChibiError::validation(format!(
                    "layer {:?} depth {} outside 0.0..=4.0",
                    layer.kind, layer.depth
                )));
            }
            if layer.shapes.is_empty() {
                return Err(ChibiError::validation(format!(
                    "layer {:?} has no shapes",
                    layer.kind
                )));
            }
        }
        for pair in self.layers.windows(2) {
            if pair[0].z >= pair[1].z {
                return Err(ChibiError::validation(
                    "rig layers must be in strictly ascending z order",
                ));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.kind) {
                return Err(ChibiError::validation(format!(
                    "duplicate rig layer kind {:?}",
                    layer.kind
                )));
            }
        }
        Ok(())
    }

    /// Layers in ascending z order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

/// Expands a stroked centerline into a fill path at construction time; the
/// renderer only ever fills.
fn stroked(path: &BezPath, width: f64, color: Rgba8) -> LayerShape {
    let outline = kurbo::stroke(
        path.iter(),
        &round_stroke(width),
        &kurbo::StrokeOpts::default(),
        0.05,
    );
    LayerShape::Fill {
        path: outline,
        color,
    }
}

fn fill(path: BezPath, color: Rgba8) -> LayerShape {
    LayerShape::Fill { path, color }
}

fn quad(p0: Point, ctrl: Point, p1: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(p0);
    path.quad_to(ctrl, p1);
    path
}

fn curls_shape(spec: &ArcSpec, color: Rgba8) -> LayerShape {
    let curls = generate_arc(spec);
    let mut path = BezPath::new();
    for curl in &curls {
        let circle = Circle::new(curl.center, curl.radius).to_path(0.1);
        path.extend(circle.elements().iter().copied());
    }
    LayerShape::Curls { curls, path, color }
}

fn body_layer() -> Layer {
    let neck = RoundedRect::new(95.8, 120.0, 114.2, 152.0, 4.0).to_path(0.1);
    let shirt = RoundedRect::new(80.0, 148.0, 130.0, 184.0, 8.0).to_path(0.1);
    let shoulder_l = RoundedRect::new(66.5, 152.0, 96.5, 184.0, 10.0).to_path(0.1);
    let shoulder_r = RoundedRect::new(113.5, 152.0, 143.5, 184.0, 10.0).to_path(0.1);
    let neck_shadow = Ellipse::new(Point::new(105.0, 124.0), Vec2::new(9.2, 3.4), 0.0).to_path(0.1);
    Layer {
        kind: LayerKind::Body,
        depth: 0.0,
        z: 0,
        pivot: BODY_PIVOT,
        wobbles_with_head: false,
        shapes: vec![
            fill(neck, SKIN),
            fill(neck_shadow, SKIN_SHADOW),
            fill(shoulder_l, SHOULDER),
            fill(shoulder_r, SHOULDER),
            fill(shirt, SHIRT),
        ],
    }
}

fn hair_back_layer() -> Layer {
    // Silhouette mass plus a ring of generated curls around it.
    let mass = Ellipse::new(Point::new(104.8, 82.0), Vec2::new(36.0, 35.0), 0.0).to_path(0.1);
    let ring = ArcSpec {
        center: Point::new(104.8, 80.0),
        radius_x: 37.0,
        radius_y: 36.0,
        start_deg: 150.0,
        end_deg: 390.0,
        count: 24,
        min_radius: 8.0,
        max_radius: 13.0,
    };
    Layer {
        kind: LayerKind::HairBack,
        depth: 1.0,
        z: 10,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![fill(mass, HAIR), curls_shape(&ring, HAIR)],
    }
}

fn ear_layer(kind: LayerKind, center: Point, z: i32) -> Layer {
    let ear = Circle::new(center, 8.2).to_path(0.1);
    let shadow = Ellipse::new(
        Point::new(center.x, center.y - 0.6),
        Vec2::new(4.0, 1.2),
        0.0,
    )
    .to_path(0.1);
    Layer {
        kind,
        depth: 2.0,
        z,
        pivot: center,
        wobbles_with_head: true,
        shapes: vec![fill(ear, SKIN), fill(shadow, SKIN_SHADOW)],
    }
}

fn head_layer() -> Layer {
    let face = RoundedRect::new(74.0, 48.3, 135.5, 128.8, 26.0).to_path(0.1);
    Layer {
        kind: LayerKind::Head,
        depth: 1.2,
        z: 30,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![fill(face, SKIN)],
    }
}

fn eyebrows_layer() -> Layer {
    let left = quad(
        Point::new(88.9, 79.1),
        Point::new(93.0, 77.3),
        Point::new(97.1, 79.4),
    );
    let right = quad(
        Point::new(112.5, 78.6),
        Point::new(116.6, 77.1),
        Point::new(120.7, 79.0),
    );
    Layer {
        kind: LayerKind::Eyebrows,
        depth: 3.5,
        z: 40,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![stroked(&left, 1.04, HAIR), stroked(&right, 1.04, HAIR)],
    }
}

fn mouth_closed_layer() -> Layer {
    let line = quad(
        Point::new(97.0, 107.5),
        Point::new(104.0, 111.2),
        Point::new(111.0, 109.1),
    );
    Layer {
        kind: LayerKind::MouthClosed,
        depth: 2.5,
        z: 50,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![stroked(&line, 1.04, MOUTH_LINE)],
    }
}

fn mouth_smile_layer() -> Layer {
    let mut smile = BezPath::new();
    smile.move_to(Point::new(96.5, 109.0));
    smile.curve_to(
        Point::new(96.5, 106.5),
        Point::new(98.0, 105.5),
        Point::new(101.0, 105.5),
    );
    smile.curve_to(
        Point::new(103.0, 105.5),
        Point::new(104.0, 107.0),
        Point::new(105.0, 107.0),
    );
    smile.curve_to(
        Point::new(106.0, 107.0),
        Point::new(107.0, 105.5),
        Point::new(109.0, 105.5),
    );
    smile.curve_to(
        Point::new(112.0, 105.5),
        Point::new(113.5, 106.5),
        Point::new(113.5, 109.0),
    );
    smile.curve_to(
        Point::new(113.5, 111.5),
        Point::new(110.0, 112.5),
        Point::new(105.0, 112.0),
    );
    smile.curve_to(
        Point::new(100.0, 112.5),
        Point::new(96.5, 111.5),
        Point::new(96.5, 109.0),
    );
    smile.close_path();
    let tongue = Ellipse::new(Point::new(105.0, 110.8), Vec2::new(3.2, 1.3), 0.0).to_path(0.1);
    Layer {
        kind: LayerKind::MouthSmile,
        depth: 2.5,
        z: 51,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![fill(smile, EYE), fill(tongue, TONGUE)],
    }
}

fn mouth_dazed_layer() -> Layer {
    let oh = Ellipse::new(Point::new(105.1, 111.0), Vec2::new(4.8, 5.8), 0.0).to_path(0.1);
    Layer {
        kind: LayerKind::MouthDazed,
        depth: 2.5,
        z: 52,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![fill(oh, DAZED_MOUTH)],
    }
}

fn eyes_open_layer() -> Layer {
    let left = Ellipse::new(LEFT_EYE, Vec2::new(3.0, 3.8), 0.0).to_path(0.1);
    let right = Ellipse::new(RIGHT_EYE, Vec2::new(3.0, 3.8), 0.0).to_path(0.1);
    Layer {
        kind: LayerKind::EyesOpen,
        depth: 4.0,
        z: 60,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![fill(left, EYE), fill(right, EYE)],
    }
}

fn eyes_blinking_layer() -> Layer {
    let left = quad(
        Point::new(89.9, 88.0),
        Point::new(92.4, 89.1),
        Point::new(94.9, 87.9),
    );
    let right = quad(
        Point::new(114.1, 88.0),
        Point::new(116.6, 89.1),
        Point::new(119.2, 87.9),
    );
    Layer {
        kind: LayerKind::EyesBlinking,
        depth: 4.0,
        z: 61,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![stroked(&left, 1.04, EYELID), stroked(&right, 1.04, EYELID)],
    }
}

fn spiral_layer(kind: LayerKind, center: Point, z: i32) -> Layer {
    let spiral = generate_spiral(center, 2.25, 3.5, 48);
    Layer {
        kind,
        depth: 4.0,
        z,
        pivot: center,
        wobbles_with_head: true,
        shapes: vec![stroked(&spiral, 0.75, SPIRAL)],
    }
}

fn nose_layer() -> Layer {
    let line = quad(
        Point::new(102.4, 98.1),
        Point::new(105.2, 99.8),
        Point::new(108.2, 98.1),
    );
    Layer {
        kind: LayerKind::Nose,
        depth: 2.5,
        z: 80,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![stroked(&line, 1.0, SKIN_SHADOW)],
    }
}

fn glasses_layer() -> Layer {
    let left_rim = Circle::new(Point::new(87.8, 92.0), 10.4).to_path(0.1);
    let right_rim = Circle::new(Point::new(121.8, 92.0), 10.4).to_path(0.1);
    let mut bridge = BezPath::new();
    bridge.move_to(Point::new(97.6, 89.2));
    bridge.quad_to(Point::new(104.8, 86.8), Point::new(112.0, 89.2));
    let mut temple_l = BezPath::new();
    temple_l.move_to(Point::new(77.6, 90.0));
    temple_l.line_to(Point::new(72.0, 103.0));
    let mut temple_r = BezPath::new();
    temple_r.move_to(Point::new(132.0, 90.0));
    temple_r.line_to(Point::new(137.5, 103.0));
    Layer {
        kind: LayerKind::Glasses,
        depth: 2.5,
        z: 90,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes: vec![
            stroked(&left_rim, 2.2, GLASSES),
            stroked(&right_rim, 2.2, GLASSES),
            stroked(&bridge, 2.2, GLASSES),
            stroked(&temple_l, 1.6, GLASSES),
            stroked(&temple_r, 1.6, GLASSES),
        ],
    }
}

fn hair_front_layer() -> Layer {
    // Five bang rows across the forehead at different vertical offsets,
    // each its own independent generator call.
    let mut shapes = Vec::new();
    for row in 0..5u32 {
        let r = row as f64;
        let spec = ArcSpec {
            center: Point::new(104.8, 58.0 + 4.5 * r),
            radius_x: 32.0 - 2.5 * r,
            radius_y: 9.0 + 1.5 * r,
            start_deg: 200.0,
            end_deg: 340.0,
            count: 13 - row as usize,
            min_radius: 5.5,
            max_radius: 9.5,
        };
        shapes.push(curls_shape(&spec, HAIR));
    }
    Layer {
        kind: LayerKind::HairFront,
        depth: 1.5,
        z: 100,
        pivot: HEAD_CENTER,
        wobbles_with_head: true,
        shapes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rig_validates() {
        let rig = AvatarRig::standard().unwrap();
        assert_eq!(rig.layers().len(), 16);
    }

    #[test]
    fn layers_are_back_to_front() {
        let rig = AvatarRig::standard().unwrap();
        let z: Vec<i32> = rig.layers().iter().map(|l| l.z).collect();
        let mut sorted = z.clone();
        sorted.sort_unstable();
        assert_eq!(z, sorted);

        let idx = |kind: LayerKind| {
            rig.layers()
                .iter()
                .position(|l| l.kind == kind)
                .unwrap()
        };
        // Back hair behind head behind bangs and face features.
        assert!(idx(LayerKind::HairBack) < idx(LayerKind::Head));
        assert!(idx(LayerKind::Head) < idx(LayerKind::EyesOpen));
        assert!(idx(LayerKind::Head) < idx(LayerKind::HairFront));
        assert!(idx(LayerKind::Glasses) < idx(LayerKind::HairFront));
    }

    #[test]
    fn depths_stay_in_design_range() {
        let rig = AvatarRig::standard().unwrap();
        for layer in rig.layers() {
            assert!((0.0..=4.0).contains(&layer.depth), "{:?}", layer.kind);
        }
    }

    #[test]
    fn hair_layers_carry_generated_curls() {
        let rig = AvatarRig::standard().unwrap();
        let front = rig
            .layers()
            .iter()
            .find(|l| l.kind == LayerKind::HairFront)
            .unwrap();
        let rows: Vec<usize> = front
            .shapes
            .iter()
            .filter_map(|s| match s {
                LayerShape::Curls { curls, .. } => Some(curls.len()),
                _ => None,
            })
            .collect();
        assert_eq!(rows, vec![13, 12, 11, 10, 9]);
    }

    #[test]
    fn validate_rejects_shuffled_z() {
        let mut rig = AvatarRig::standard().unwrap();
        rig.layers.swap(0, 1);
        assert!(rig.validate().is_err());
    }

    #[test]
    fn rig_round_trips_through_json() {
        let rig = AvatarRig::standard().unwrap();
        let s = serde_json::to_string(&rig).unwrap();
        let de: AvatarRig = serde_json::from_str(&s).unwrap();
        assert_eq!(de.layers().len(), rig.layers().len());
        de.validate().unwrap();
    }
}
