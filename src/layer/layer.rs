use std::{
    cell::Cell,
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    animation::anim::Animated,
    canvas::canvas::{Canvas, CanvasHandle},
    composite::{blend::BlendMethod, surface::Surface},
    foundation::core::{Color, Point, Rect, Time},
    foundation::error::{StrataError, StrataResult},
    foundation::geom,
    layer::{
        params::{self, ParamDesc, ParamEntry, ParamValue},
        paste::{PASTE_PARAMS, PasteCanvas},
        rectangle::{RECTANGLE_PARAMS, Rectangle},
        solid::{SOLID_PARAMS, SolidColor},
    },
    render::{
        context::Context,
        desc::RendDesc,
        progress::{ProgressCallback, SubProgress},
        scope::{RenderOutcome, RenderScope},
    },
};

/// A layer claims a hit only where its effective alpha reaches this.
pub(crate) const HIT_ALPHA: f32 = 0.25;

/// Progress scale every layer reports on.
pub(crate) const PROGRESS_TOTAL: u32 = 10_000;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique layer identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl LayerId {
    fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registration record of a layer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: &'static str,
    pub local_name: &'static str,
    pub version: &'static str,
    pub category: &'static str,
}

/// Every layer type [`Layer::create`] knows, by registered name.
pub const LAYER_TYPES: [LayerInfo; 3] = [
    LayerInfo {
        name: "paste_canvas",
        local_name: "Group",
        version: "0.1",
        category: "Other",
    },
    LayerInfo {
        name: "solid_color",
        local_name: "Solid Color",
        version: "0.1",
        category: "Geometry",
    },
    LayerInfo {
        name: "rectangle",
        local_name: "Rectangle",
        version: "0.1",
        category: "Geometry",
    },
];

#[derive(Debug)]
pub enum LayerKind {
    SolidColor(SolidColor),
    Rectangle(Rectangle),
    PasteCanvas(PasteCanvas),
}

impl LayerKind {
    pub fn info(&self) -> &'static LayerInfo {
        match self {
            Self::PasteCanvas(_) => &LAYER_TYPES[0],
            Self::SolidColor(_) => &LAYER_TYPES[1],
            Self::Rectangle(_) => &LAYER_TYPES[2],
        }
    }
}

/// Blend parameters of a layer resolved at its current time.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Composite {
    pub id: LayerId,
    pub amount: f32,
    pub blend: BlendMethod,
    pub time: Time,
}

impl Composite {
    /// Fully replaces what is behind it wherever it has content.
    pub fn is_solid_color(&self) -> bool {
        self.amount == 1.0 && self.blend == BlendMethod::Straight
    }
}

static LAYER_PARAMS: [ParamEntry<Layer>; 2] = [
    ParamEntry {
        desc: ParamDesc {
            name: "amount",
            local_name: "Opacity",
            description: "How much the layer contributes, 0 to 1",
        },
        get: |l, t| ParamValue::Real(l.amount.sample(t)),
        set: Some(|l, v| {
            l.amount = Animated::Constant(v.into_real("amount")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "blend_method",
            local_name: "Blend Method",
            description: "How the layer combines with what is behind it",
        },
        get: |l, _| ParamValue::Blend(l.blend),
        set: Some(|l, v| {
            l.blend = v.into_blend("blend_method")?;
            Ok(())
        }),
    },
];

/// One node of a canvas's layer list.
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    description: String,
    active: bool,
    amount: Animated<f64>,
    blend: BlendMethod,
    kind: LayerKind,
    time: Cell<Time>,
}

impl Layer {
    pub fn new(kind: impl Into<LayerKind>) -> Self {
        Self {
            id: LayerId::next(),
            description: String::new(),
            active: true,
            amount: Animated::Constant(1.0),
            blend: BlendMethod::Composite,
            kind: kind.into(),
            time: Cell::new(Time::ZERO),
        }
    }

    /// Construct a default layer of a registered type.
    pub fn create(type_name: &str) -> StrataResult<Self> {
        let kind = match type_name {
            "paste_canvas" | "PasteCanvas" => LayerKind::PasteCanvas(PasteCanvas::default()),
            "solid_color" => LayerKind::SolidColor(SolidColor::default()),
            "rectangle" => LayerKind::Rectangle(Rectangle::default()),
            other => {
                return Err(StrataError::validation(format!(
                    "unknown layer type '{other}'"
                )));
            }
        };
        Ok(Self::new(kind))
    }

    pub fn solid_color(color: impl Into<Animated<Color>>) -> Self {
        Self::new(SolidColor::new(color))
    }

    pub fn rectangle(
        point1: impl Into<Animated<Point>>,
        point2: impl Into<Animated<Point>>,
        color: impl Into<Animated<Color>>,
    ) -> Self {
        Self::new(Rectangle::new(point1, point2, color))
    }

    pub fn paste_canvas(paste: PasteCanvas) -> Self {
        Self::new(paste)
    }

    pub fn with_amount(mut self, amount: impl Into<Animated<f64>>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_blend(mut self, blend: BlendMethod) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn info(&self) -> &'static LayerInfo {
        self.kind.info()
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut LayerKind {
        &mut self.kind
    }

    pub fn as_paste(&self) -> Option<&PasteCanvas> {
        match &self.kind {
            LayerKind::PasteCanvas(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paste_mut(&mut self) -> Option<&mut PasteCanvas> {
        match &mut self.kind {
            LayerKind::PasteCanvas(p) => Some(p),
            _ => None,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn blend_method(&self) -> BlendMethod {
        self.blend
    }

    pub fn set_blend_method(&mut self, blend: BlendMethod) {
        self.blend = blend;
    }

    pub fn amount(&self) -> f64 {
        self.amount.sample(self.time.get())
    }

    pub fn amount_param(&self) -> &Animated<f64> {
        &self.amount
    }

    pub fn set_amount(&mut self, amount: impl Into<Animated<f64>>) {
        self.amount = amount.into();
    }

    pub fn time(&self) -> Time {
        self.time.get()
    }

    /// Name shown to users: the description if set, else a per-kind name.
    pub fn local_name(&self, owner: Option<&Canvas>) -> String {
        if !self.description.is_empty() {
            return self.description.clone();
        }
        match &self.kind {
            LayerKind::PasteCanvas(p) => p.local_name(owner),
            kind => kind.info().local_name.to_owned(),
        }
    }

    pub(crate) fn composite(&self) -> Composite {
        let time = self.time.get();
        Composite {
            id: self.id,
            amount: self.amount.sample(time) as f32,
            blend: self.blend,
            time,
        }
    }

    /// Amount 1 with straight blending.
    pub fn is_solid_color(&self) -> bool {
        self.composite().is_solid_color()
    }

    pub fn validate(&self) -> StrataResult<()> {
        self.amount.validate()?;
        match &self.kind {
            LayerKind::SolidColor(s) => s.validate(),
            LayerKind::Rectangle(r) => r.validate(),
            LayerKind::PasteCanvas(p) => p.validate(),
        }
    }

    pub fn param_vocab(&self) -> Vec<ParamDesc> {
        let kind: Vec<ParamDesc> = match &self.kind {
            LayerKind::SolidColor(_) => SOLID_PARAMS.iter().map(|e| e.desc).collect(),
            LayerKind::Rectangle(_) => RECTANGLE_PARAMS.iter().map(|e| e.desc).collect(),
            LayerKind::PasteCanvas(_) => PASTE_PARAMS.iter().map(|e| e.desc).collect(),
        };
        LAYER_PARAMS.iter().map(|e| e.desc).chain(kind).collect()
    }

    pub fn get_param(&self, name: &str) -> Option<ParamValue> {
        let t = self.time.get();
        if let Some(e) = params::lookup(&LAYER_PARAMS, name) {
            return Some((e.get)(self, t));
        }
        match &self.kind {
            LayerKind::SolidColor(s) => params::lookup(&SOLID_PARAMS, name).map(|e| (e.get)(s, t)),
            LayerKind::Rectangle(r) => params::lookup(&RECTANGLE_PARAMS, name).map(|e| (e.get)(r, t)),
            LayerKind::PasteCanvas(p) => params::lookup(&PASTE_PARAMS, name).map(|e| (e.get)(p, t)),
        }
    }

    /// Set a named parameter. Returns whether its value changed.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> StrataResult<bool> {
        let before = self
            .get_param(name)
            .ok_or_else(|| StrataError::validation(format!(
                "layer type '{}' has no parameter '{name}'",
                self.info().name
            )))?;
        if let Some(e) = params::lookup(&LAYER_PARAMS, name) {
            let set = e.set.ok_or_else(|| params::read_only(name))?;
            set(self, value)?;
        } else {
            match &mut self.kind {
                LayerKind::SolidColor(s) => set_kind_param(&SOLID_PARAMS, s, name, value)?,
                LayerKind::Rectangle(r) => set_kind_param(&RECTANGLE_PARAMS, r, name, value)?,
                LayerKind::PasteCanvas(p) => set_kind_param(&PASTE_PARAMS, p, name, value)?,
            }
        }
        Ok(self.get_param(name).as_ref() != Some(&before))
    }

    pub(crate) fn on_canvas_set(&self, owner: &CanvasHandle) {
        if let LayerKind::PasteCanvas(p) = &self.kind {
            p.on_canvas_set(owner);
        }
    }

    /// The layer's own unblended color at `p`; `None` where it has no content.
    fn own_color(&self, time: Time, p: Point) -> Option<Color> {
        match &self.kind {
            LayerKind::SolidColor(s) => Some(s.color_at(time)),
            LayerKind::Rectangle(r) => r.color_at(time, p),
            LayerKind::PasteCanvas(_) => None,
        }
    }

    pub(crate) fn get_color(&self, ctx: Context<'_>, p: Point) -> Color {
        let comp = self.composite();
        if let LayerKind::PasteCanvas(paste) = &self.kind {
            return paste.get_color(&comp, ctx, p);
        }
        match self.own_color(comp.time, p) {
            Some(c) if comp.is_solid_color() => c,
            Some(c) => Color::blend(c, ctx.get_color(p), comp.amount, comp.blend),
            None if comp.blend.is_straight() => {
                Color::blend(Color::TRANSPARENT, ctx.get_color(p), comp.amount, comp.blend)
            }
            None => ctx.get_color(p),
        }
    }

    /// This layer's own extent, not including what is behind it.
    pub(crate) fn get_bounding_rect(&self) -> Rect {
        match &self.kind {
            LayerKind::SolidColor(_) => geom::INFINITE,
            LayerKind::Rectangle(r) => r.rect_at(self.time.get()),
            LayerKind::PasteCanvas(p) => p.bounds(),
        }
    }

    pub(crate) fn hit_check(&self, ctx: Context<'_>, p: Point) -> Option<LayerId> {
        let comp = self.composite();
        if let LayerKind::PasteCanvas(paste) = &self.kind {
            return paste.hit_check(&comp, ctx, p);
        }
        match self.own_color(comp.time, p) {
            Some(c) if c.a * comp.amount >= HIT_ALPHA => Some(self.id),
            _ => ctx.hit_check(p),
        }
    }

    pub(crate) fn set_time(&self, ctx: Context<'_>, time: Time) {
        self.time.set(time);
        match &self.kind {
            LayerKind::PasteCanvas(paste) => paste.set_time(ctx, time),
            _ => ctx.set_time(time),
        }
    }

    /// Keyframe times of this layer and anything it embeds.
    pub(crate) fn get_times(&self, scope: &RenderScope) -> BTreeSet<Time> {
        let mut times = self.amount.times();
        match &self.kind {
            LayerKind::SolidColor(s) => times.extend(s.times()),
            LayerKind::Rectangle(r) => times.extend(r.times()),
            LayerKind::PasteCanvas(p) => times.extend(p.get_times(scope)),
        }
        times
    }

    pub(crate) fn accelerated_render(
        &self,
        ctx: Context<'_>,
        surface: &mut Surface,
        quality: u8,
        desc: &RendDesc,
        cb: &mut dyn ProgressCallback,
    ) -> StrataResult<RenderOutcome> {
        let comp = self.composite();
        let leaf = match &self.kind {
            LayerKind::PasteCanvas(paste) => {
                return paste.accelerated_render(&comp, ctx, surface, quality, desc, cb);
            }
            leaf => leaf,
        };

        if !cb.amount_complete(0, PROGRESS_TOTAL) {
            return Ok(RenderOutcome::Cancelled);
        }
        let mut outcome = RenderOutcome::Complete;
        if comp.is_solid_color() && matches!(leaf, LayerKind::SolidColor(_)) {
            surface.set_wh(desc.width, desc.height)?;
        } else {
            let mut behind = SubProgress::new(cb, 0, 9_000, PROGRESS_TOTAL);
            outcome = ctx.accelerated_render(surface, quality, desc, &mut behind)?;
            if outcome.is_cancelled() {
                return Ok(outcome);
            }
        }

        match leaf {
            LayerKind::SolidColor(s) => s.paint(surface, &comp),
            LayerKind::Rectangle(r) => r.paint(surface, desc, quality, &comp),
            LayerKind::PasteCanvas(_) => {}
        }

        if !cb.amount_complete(PROGRESS_TOTAL, PROGRESS_TOTAL) {
            return Ok(RenderOutcome::Cancelled);
        }
        Ok(outcome)
    }
}

fn set_kind_param<K: 'static>(
    table: &'static [ParamEntry<K>],
    target: &mut K,
    name: &str,
    value: ParamValue,
) -> StrataResult<()> {
    let entry = params::lookup(table, name)
        .ok_or_else(|| StrataError::validation(format!("unknown parameter '{name}'")))?;
    let set = entry.set.ok_or_else(|| params::read_only(name))?;
    set(target, value)
}

impl From<SolidColor> for LayerKind {
    fn from(v: SolidColor) -> Self {
        Self::SolidColor(v)
    }
}

impl From<Rectangle> for LayerKind {
    fn from(v: Rectangle) -> Self {
        Self::Rectangle(v)
    }
}

impl From<PasteCanvas> for LayerKind {
    fn from(v: PasteCanvas) -> Self {
        Self::PasteCanvas(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/layer.rs"]
mod tests;
