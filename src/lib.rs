#![forbid(unsafe_code)]

pub mod anim;
pub mod anim_ease;
pub mod avatar;
pub mod core;
pub mod entrance;
pub mod error;
pub mod expression;
pub mod layout;
pub mod parallax;
pub mod projects;
pub mod render_cpu;
pub mod rig;
pub mod typewriter;

pub use anim::{Lerp, Sequence, Tween};
pub use anim_ease::Ease;
pub use avatar::{Avatar, AvatarConfig, AvatarFrame, LayerPlacement};
pub use core::{
    Canvas, HoverTarget, MotionPreference, Point, PointerSample, Rgba8, SurfaceBounds, Vec2,
};
pub use error::{ChibiError, ChibiResult};
pub use expression::{ExpressionFrame, ExpressionMachine, EyePose, MouthPose};
pub use layout::{ArcSpec, CurlPrimitive, generate_arc, generate_spiral};
pub use parallax::{ParallaxEngine, ParallaxSignal, directional_intensity};
pub use projects::{Category, LinkType, ProjectCatalog, ProjectLink, ProjectMeta, ThumbnailKind};
pub use render_cpu::{png_bytes, render_frame};
pub use rig::{AvatarRig, Layer, LayerKind, LayerShape};
pub use typewriter::Typewriter;
