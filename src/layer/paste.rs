use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use crate::{
    animation::anim::Animated,
    canvas::{
        canvas::{Canvas, CanvasHandle, EmbeddedCanvas},
        signal::SubscriptionId,
    },
    composite::{blend::BlendMethod, surface::Surface},
    foundation::core::{Color, Point, Rect, Time},
    foundation::error::{StrataError, StrataResult},
    foundation::geom::{self, FocusTransform},
    layer::{
        layer::{Composite, HIT_ALPHA, LayerId, PROGRESS_TOTAL},
        params::{ParamDesc, ParamEntry, ParamValue},
    },
    render::{
        context::Context,
        desc::RendDesc,
        progress::{ProgressCallback, SubProgress},
        scope::{MAX_DEPTH, RenderOutcome, RenderScope},
    },
};

/// Composites another canvas, zoomed and shifted, into its own canvas.
///
/// The embedded canvas runs `time_offset` ahead of this layer's timeline. With
/// `children_lock` set, hits inside the embedded canvas report this layer
/// instead of the child that was hit.
#[derive(Debug)]
pub struct PasteCanvas {
    canvas: Option<EmbeddedCanvas>,
    origin: Animated<Point>,
    zoom: Animated<f64>,
    time_offset: Time,
    children_lock: bool,
    time_tracking: bool,
    curr_time: Cell<Option<Time>>,
    bounds: Cell<Rect>,
    watch: RefCell<Option<Watch>>,
}

/// Subscription on the embedded canvas that dirties the owning canvas.
#[derive(Debug)]
struct Watch {
    owner: Weak<Canvas>,
    id: SubscriptionId,
}

impl Default for PasteCanvas {
    fn default() -> Self {
        Self {
            canvas: None,
            origin: Animated::Constant(Point::ZERO),
            zoom: Animated::Constant(0.0),
            time_offset: Time::ZERO,
            children_lock: false,
            time_tracking: true,
            curr_time: Cell::new(None),
            bounds: Cell::new(Rect::ZERO),
            watch: RefCell::new(None),
        }
    }
}

impl Drop for PasteCanvas {
    fn drop(&mut self) {
        self.unwatch();
    }
}

pub(crate) static PASTE_PARAMS: [ParamEntry<PasteCanvas>; 5] = [
    ParamEntry {
        desc: ParamDesc {
            name: "origin",
            local_name: "Origin",
            description: "Point where you want the origin to be",
        },
        get: |p, t| ParamValue::Point(p.origin.sample(t)),
        set: Some(|p, v| {
            p.set_origin(v.into_point("origin")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "canvas",
            local_name: "Canvas",
            description: "Group content",
        },
        get: |p, _| {
            ParamValue::Canvas(p.canvas.as_ref().map(|c| c.handle().id().to_owned()))
        },
        set: None,
    },
    ParamEntry {
        desc: ParamDesc {
            name: "zoom",
            local_name: "Zoom",
            description: "Size of canvas, as a power of e",
        },
        get: |p, t| ParamValue::Real(p.zoom.sample(t)),
        set: Some(|p, v| {
            p.set_zoom(v.into_real("zoom")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "time_offset",
            local_name: "Time Offset",
            description: "Time offset to apply to the embedded canvas",
        },
        get: |p, _| ParamValue::Time(p.time_offset),
        set: Some(|p, v| {
            p.set_time_offset(v.into_time("time_offset")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "children_lock",
            local_name: "Children Lock",
            description: "Select this layer instead of its children when hit",
        },
        get: |p, _| ParamValue::Bool(p.children_lock),
        set: Some(|p, v| {
            p.children_lock = v.into_bool("children_lock")?;
            Ok(())
        }),
    },
];

impl PasteCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: EmbeddedCanvas) -> Self {
        self.set_canvas(Some(canvas));
        self
    }

    pub fn with_origin(mut self, origin: impl Into<Animated<Point>>) -> Self {
        self.set_origin(origin);
        self
    }

    pub fn with_zoom(mut self, zoom: impl Into<Animated<f64>>) -> Self {
        self.set_zoom(zoom);
        self
    }

    pub fn with_time_offset(mut self, offset: Time) -> Self {
        self.time_offset = offset;
        self
    }

    pub fn with_children_lock(mut self, lock: bool) -> Self {
        self.children_lock = lock;
        self
    }

    pub fn canvas(&self) -> Option<&EmbeddedCanvas> {
        self.canvas.as_ref()
    }

    fn handle(&self) -> Option<&CanvasHandle> {
        self.canvas.as_ref().map(EmbeddedCanvas::handle)
    }

    /// Replace the embedded canvas, returning the previous one.
    pub fn set_canvas(&mut self, canvas: Option<EmbeddedCanvas>) -> Option<EmbeddedCanvas> {
        self.unwatch();
        let old = std::mem::replace(&mut self.canvas, canvas);
        self.refresh_bounds(&RenderScope::new());
        old
    }

    pub fn take_canvas(&mut self) -> Option<EmbeddedCanvas> {
        self.set_canvas(None)
    }

    pub fn origin(&self) -> &Animated<Point> {
        &self.origin
    }

    pub fn set_origin(&mut self, origin: impl Into<Animated<Point>>) {
        self.origin = origin.into();
        self.refresh_bounds(&RenderScope::new());
    }

    /// Zoom as a power of e.
    pub fn zoom(&self) -> &Animated<f64> {
        &self.zoom
    }

    pub fn set_zoom(&mut self, zoom: impl Into<Animated<f64>>) {
        self.zoom = zoom.into();
        self.refresh_bounds(&RenderScope::new());
    }

    pub fn time_offset(&self) -> Time {
        self.time_offset
    }

    /// Returns whether the offset changed.
    pub fn set_time_offset(&mut self, offset: Time) -> bool {
        let changed = self.time_offset != offset;
        self.time_offset = offset;
        changed
    }

    pub fn children_lock(&self) -> bool {
        self.children_lock
    }

    pub fn set_children_lock(&mut self, lock: bool) {
        self.children_lock = lock;
    }

    /// Whether rendering re-syncs the embedded canvas's time first.
    pub fn time_tracking(&self) -> bool {
        self.time_tracking
    }

    pub fn set_time_tracking(&mut self, enabled: bool) {
        self.time_tracking = enabled;
    }

    /// Cached extent of the embedded content in the owner's space.
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn sample_time(&self) -> Time {
        self.curr_time.get().unwrap_or(Time::ZERO)
    }

    fn transform(&self, canvas: &Canvas) -> FocusTransform {
        let t = self.sample_time();
        FocusTransform::new(canvas.focus(), self.origin.sample(t), self.zoom.sample(t))
    }

    fn refresh_bounds(&self, scope: &RenderScope) {
        let bounds = match self.handle() {
            Some(canvas) => {
                let full = canvas.context(scope).get_full_bounding_rect();
                self.transform(canvas).rect_to_outer(full)
            }
            None => Rect::ZERO,
        };
        self.bounds.set(bounds);
    }

    pub fn local_name(&self, owner: Option<&Canvas>) -> String {
        let Some(embedded) = &self.canvas else {
            return "Pasted Canvas".to_owned();
        };
        if embedded.is_inline() {
            return "Inline Canvas".to_owned();
        }
        let canvas = embedded.handle();
        if owner.is_some_and(|o| o.same_root(canvas)) {
            return format!("[{}]", canvas.id());
        }
        format!("[{}]", canvas.file_name().unwrap_or(canvas.id()))
    }

    pub(crate) fn validate(&self) -> StrataResult<()> {
        self.origin.validate()?;
        self.zoom.validate()?;
        if !self.time_offset.as_secs().is_finite() {
            return Err(StrataError::validation("time_offset must be finite"));
        }
        match &self.canvas {
            Some(c) => c.validate(),
            None => Ok(()),
        }
    }

    pub(crate) fn on_canvas_set(&self, owner: &CanvasHandle) {
        if let Some(EmbeddedCanvas::Inline(canvas)) = &self.canvas {
            let adopted = canvas.parent().is_some_and(|p| Rc::ptr_eq(&p, owner));
            if !adopted {
                canvas.set_inline(owner);
            }
        }
        self.watch(owner);
    }

    /// Keep `owner` dirty whenever the embedded canvas changes, so cached
    /// bounds are refreshed on its next `set_time`.
    fn watch(&self, owner: &CanvasHandle) {
        let Some(canvas) = self.handle() else {
            return;
        };
        let mut watch = self.watch.borrow_mut();
        if watch
            .as_ref()
            .is_some_and(|w| std::ptr::eq(w.owner.as_ptr(), Rc::as_ptr(owner)))
        {
            return;
        }
        if let Some(old) = watch.take() {
            canvas.unsubscribe(old.id);
        }
        let owner = Rc::downgrade(owner);
        let target = owner.clone();
        let id = canvas.subscribe(move |_| {
            if let Some(owner) = target.upgrade() {
                owner.embedded_changed();
            }
        });
        *watch = Some(Watch { owner, id });
    }

    fn unwatch(&mut self) {
        let Some(old) = self.watch.get_mut().take() else {
            return;
        };
        if let Some(canvas) = self.handle() {
            canvas.unsubscribe(old.id);
        }
    }

    pub(crate) fn set_time(&self, ctx: Context<'_>, time: Time) {
        let Some(_guard) = ctx.scope().enter() else {
            tracing::debug!(depth = MAX_DEPTH, "paste canvas depth limit reached in set_time");
            ctx.set_time(time);
            return;
        };
        self.curr_time.set(Some(time));
        ctx.set_time(time);
        if let Some(canvas) = self.handle() {
            canvas.set_time_in(ctx.scope(), time + self.time_offset);
        }
        self.refresh_bounds(ctx.scope());
    }

    pub(crate) fn get_times(&self, scope: &RenderScope) -> BTreeSet<Time> {
        let mut times = self.origin.times();
        times.extend(self.zoom.times());
        if let Some(canvas) = self.handle()
            && let Some(_guard) = scope.enter()
        {
            let offset = self.time_offset;
            times.extend(canvas.times_in(scope).into_iter().map(|t| t - offset));
        }
        times
    }

    pub(crate) fn get_color(&self, comp: &Composite, ctx: Context<'_>, p: Point) -> Color {
        let Some(canvas) = self.handle() else {
            return ctx.get_color(p);
        };
        if comp.amount == 0.0 {
            return ctx.get_color(p);
        }
        let Some(_guard) = ctx.scope().enter() else {
            tracing::debug!(layer = %comp.id, "paste canvas depth limit reached in get_color");
            return ctx.get_color(p);
        };
        let inner = canvas
            .context(ctx.scope())
            .get_color(self.transform(canvas).to_inner(p));
        Color::blend(inner, ctx.get_color(p), comp.amount, comp.blend)
    }

    pub(crate) fn hit_check(&self, comp: &Composite, ctx: Context<'_>, p: Point) -> Option<LayerId> {
        let Some(canvas) = self.handle() else {
            return ctx.hit_check(p);
        };
        if comp.amount == 0.0 {
            return ctx.hit_check(p);
        }
        let Some(_guard) = ctx.scope().enter() else {
            tracing::debug!(layer = %comp.id, "paste canvas depth limit reached in hit_check");
            return ctx.hit_check(p);
        };
        let target = self.transform(canvas).to_inner(p);
        let inner = canvas.context(ctx.scope());
        if inner.get_color(target).a >= HIT_ALPHA {
            if self.children_lock {
                return Some(comp.id);
            }
            return inner.hit_check(target);
        }
        ctx.hit_check(p)
    }

    pub(crate) fn accelerated_render(
        &self,
        comp: &Composite,
        ctx: Context<'_>,
        surface: &mut Surface,
        quality: u8,
        desc: &RendDesc,
        cb: &mut dyn ProgressCallback,
    ) -> StrataResult<RenderOutcome> {
        if !cb.amount_complete(0, PROGRESS_TOTAL) {
            return Ok(RenderOutcome::Cancelled);
        }

        let Some(_guard) = ctx.scope().enter() else {
            tracing::debug!(layer = %comp.id, depth = MAX_DEPTH, "paste canvas depth limit reached; rendering as transparent");
            let outcome = ctx.accelerated_render(surface, quality, desc, cb)?;
            return Ok(outcome.merge(RenderOutcome::DepthLimited));
        };

        let Some(canvas) = self.handle() else {
            return ctx.accelerated_render(surface, quality, desc, cb);
        };
        if comp.amount == 0.0 {
            return ctx.accelerated_render(surface, quality, desc, cb);
        }

        if self.time_tracking
            && let Some(t) = self.curr_time.get()
        {
            let want = t + self.time_offset;
            if !canvas.get_time().is_equal(want) {
                canvas.set_time_in(ctx.scope(), want);
                self.refresh_bounds(ctx.scope());
            }
        }

        let transform = self.transform(canvas);
        let mut inner_desc = desc.clone();
        inner_desc.clear_flags();
        inner_desc.set_tl(transform.to_inner(desc.tl));
        inner_desc.set_br(transform.to_inner(desc.br));
        inner_desc.set_pixel_aspect_locked(true);

        let mut outcome = RenderOutcome::Complete;
        if comp.is_solid_color() || ctx.is_empty() {
            surface.set_wh(desc.width, desc.height)?;
        } else {
            let mut behind = SubProgress::new(cb, 0, 4_500, PROGRESS_TOTAL);
            outcome = ctx.accelerated_render(surface, quality, desc, &mut behind)?;
            if outcome.is_cancelled() {
                return Ok(outcome);
            }
        }

        // With nothing behind this layer, composite and straight agree and
        // onto methods have nothing to land on.
        let mut blend = comp.blend;
        let nothing_behind =
            ctx.is_empty() || !geom::intersects(ctx.get_full_bounding_rect(), self.bounds.get());
        if nothing_behind {
            if blend.is_onto() {
                tracing::debug!(layer = %comp.id, ?blend, "nothing behind onto-blended paste canvas");
                return finish(cb, outcome);
            }
            if blend == BlendMethod::Composite {
                tracing::debug!(layer = %comp.id, "nothing behind paste canvas; compositing straight");
                blend = BlendMethod::Straight;
            }
        }

        let inner = canvas.context(ctx.scope());
        let area = geom::intersect(inner_desc.rect(), inner.get_full_bounding_rect());
        if geom::is_empty(area) {
            return finish(cb, outcome);
        }

        let Some((x, y, w, h)) = pixel_window(&inner_desc, area) else {
            return finish(cb, outcome);
        };
        inner_desc.set_subwindow(x, y, w, h);

        let mut pasted = Surface::default();
        {
            let mut stage = SubProgress::new(cb, 4_500, 9_000, PROGRESS_TOTAL);
            let inner_outcome = inner.accelerated_render(&mut pasted, quality, &inner_desc, &mut stage)?;
            if inner_outcome.is_cancelled() {
                return Ok(inner_outcome);
            }
            outcome = outcome.merge(inner_outcome);
        }

        let mut pen = surface.get_pen(i64::from(x), i64::from(y));
        pen.set_alpha(comp.amount);
        pen.set_blend_method(blend);
        pasted.blit_to(&mut pen);

        let mut stage = SubProgress::new(cb, 9_000, 9_999, PROGRESS_TOTAL);
        if !stage.amount_complete(1, 1) {
            return Ok(RenderOutcome::Cancelled);
        }
        finish(cb, outcome)
    }
}

fn finish(cb: &mut dyn ProgressCallback, outcome: RenderOutcome) -> StrataResult<RenderOutcome> {
    if !cb.amount_complete(PROGRESS_TOTAL, PROGRESS_TOTAL) {
        return Ok(RenderOutcome::Cancelled);
    }
    Ok(outcome)
}

/// The pixel rectangle of `desc`'s grid covering `area`, clamped to the grid.
/// `None` when nothing is left.
fn pixel_window(desc: &RendDesc, area: Rect) -> Option<(u32, u32, u32, u32)> {
    let (mut min, mut max) = (area.origin(), Point::new(area.x1, area.y1));
    if desc.tl.x > desc.br.x {
        std::mem::swap(&mut min.x, &mut max.x);
    }
    if desc.tl.y > desc.br.y {
        std::mem::swap(&mut min.y, &mut max.y);
    }
    let (pw, ph) = (desc.pw(), desc.ph());
    let (width, height) = (f64::from(desc.width), f64::from(desc.height));

    let x0 = ((min.x - desc.tl.x) / pw).floor().clamp(0.0, width);
    let y0 = ((min.y - desc.tl.y) / ph).floor().clamp(0.0, height);
    let x1 = ((max.x - desc.tl.x) / pw).ceil().clamp(0.0, width);
    let y1 = ((max.y - desc.tl.y) / ph).ceil().clamp(0.0, height);
    if !(x1 > x0 && y1 > y0) {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/paste.rs"]
mod tests;
