#![forbid(unsafe_code)]
//! Strata composites layered 2D canvases into raster frames.
//!
//! A [`Canvas`] is an ordered list of [`Layer`]s, front-most first. A
//! [`PasteCanvas`] layer embeds another canvas, shifted by an origin and scaled
//! by `e^zoom` around the embedded canvas's focus point, so scenes nest to any
//! depth. Shared canvases may reference each other in cycles; every render,
//! time update and hit test follows at most [`MAX_DEPTH`] nested canvases.
//!
//! Rendering runs through a [`Context`], the chain "layer `i` and everything
//! behind it", and reports a [`RenderOutcome`] alongside any image.

pub mod animation;
pub mod canvas;
pub mod composite;
pub mod document;
pub mod foundation;
pub mod layer;
pub mod render;
pub mod target;

pub use animation::anim::{Animated, InterpMode, Keyframe, Keyframes, Lerp};
pub use canvas::canvas::{Canvas, CanvasHandle, EmbeddedCanvas};
pub use canvas::signal::{ChangeEvent, ChangeSignal, SubscriptionId};
pub use composite::blend::BlendMethod;
pub use composite::surface::{AlphaPen, MAX_SURFACE_PIXELS, Surface};
pub use document::{CanvasDef, CanvasRef, Document, LayerDef, LayerKindDef};
pub use foundation::core::{Color, Point, Rect, Time, Vec2};
pub use foundation::error::{StrataError, StrataResult};
pub use foundation::geom::FocusTransform;
pub use layer::{
    LAYER_TYPES, Layer, LayerId, LayerInfo, LayerKind, ParamDesc, ParamValue, PasteCanvas,
    Rectangle, SolidColor,
};
pub use render::context::Context;
pub use render::desc::RendDesc;
pub use render::pipeline::{RenderSettings, RenderedFrame, hit_test, render_frame, render_to_target};
pub use render::progress::{NoProgress, ProgressCallback, SubProgress, TracingProgress};
pub use render::scope::{DepthGuard, MAX_DEPTH, RenderOutcome, RenderScope};
pub use target::{FrameBufferTarget, SheetDirection, SheetParams, SpritesheetTarget, Target};
