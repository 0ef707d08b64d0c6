use crate::{
    canvas::canvas::Canvas,
    composite::surface::Surface,
    foundation::core::{Color, Point, Time},
    foundation::error::{StrataError, StrataResult},
    layer::LayerId,
    render::{
        progress::{ProgressCallback, SubProgress},
        scope::{RenderOutcome, RenderScope},
    },
    target::Target,
};

/// Knobs that do not belong to a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// 0 is best, 10 is fastest. Rectangles render hard-edged from 8 up.
    pub quality: u8,
    /// Flatten the result onto this color; `None` keeps transparency.
    pub background: Option<Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quality: 3,
            background: None,
        }
    }
}

impl RenderSettings {
    pub const QUALITY_ENV: &'static str = "STRATA_QUALITY";
    pub const BACKGROUND_ENV: &'static str = "STRATA_BACKGROUND";

    /// Defaults overridden by `STRATA_QUALITY` and `STRATA_BACKGROUND`;
    /// unparsable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let quality = std::env::var(Self::QUALITY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u8>().ok())
            .filter(|&q| q <= 10)
            .unwrap_or(defaults.quality);
        let background = std::env::var(Self::BACKGROUND_ENV)
            .ok()
            .and_then(|v| Color::parse_hex(v.trim()).ok())
            .or(defaults.background);
        Self {
            quality,
            background,
        }
    }
}

/// One rendered image and how its render ended.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub time: Time,
    pub surface: Surface,
    pub outcome: RenderOutcome,
}

/// Render `canvas` at `time` through its own render descriptor.
#[tracing::instrument(skip(canvas, settings, cb), fields(canvas = canvas.id()))]
pub fn render_frame(
    canvas: &Canvas,
    time: Time,
    settings: &RenderSettings,
    cb: &mut dyn ProgressCallback,
) -> StrataResult<RenderedFrame> {
    let desc = canvas.rend_desc();
    desc.validate()?;
    canvas.set_time(time);

    let scope = RenderScope::new();
    let mut surface = Surface::default();
    let outcome = canvas
        .context(&scope)
        .accelerated_render(&mut surface, settings.quality, &desc, cb)?;
    if outcome == RenderOutcome::DepthLimited {
        tracing::warn!(refused = scope.limit_hits(), "nested canvases exceeded the depth limit");
    }
    if let Some(bg) = settings.background
        && outcome.is_success()
    {
        surface.flatten_onto(bg);
    }
    Ok(RenderedFrame {
        time,
        surface,
        outcome,
    })
}

/// Render every frame in the canvas's time range into `target`.
#[tracing::instrument(skip(canvas, target, settings, cb), fields(canvas = canvas.id()))]
pub fn render_to_target(
    canvas: &Canvas,
    target: &mut dyn Target,
    settings: &RenderSettings,
    cb: &mut dyn ProgressCallback,
) -> StrataResult<RenderOutcome> {
    let desc = canvas.rend_desc();
    desc.validate()?;
    target.set_rend_desc(&desc)?;

    let frames = desc.frame_count();
    let per_frame = 10_000_u32;
    let total = per_frame.saturating_mul(frames);
    let mut outcome = RenderOutcome::Complete;

    for i in 0..frames {
        let frame = desc.frame_start() + i64::from(i);
        let time = Time::from_frame(frame, desc.frame_rate);
        cb.task(&format!("rendering frame {} of {frames}", i + 1));

        if !target.start_frame(cb)? {
            return Ok(RenderOutcome::Cancelled);
        }
        let rendered = {
            let start = per_frame.saturating_mul(i);
            let mut sub = SubProgress::new(cb, start, start.saturating_add(per_frame), total);
            render_frame(canvas, time, settings, &mut sub)
        };
        let rendered = match rendered {
            Ok(r) => r,
            Err(e) => {
                cb.error(&format!("frame {frame}: {e}"));
                return Err(e);
            }
        };
        if rendered.outcome.is_cancelled() {
            return Ok(RenderOutcome::Cancelled);
        }
        outcome = outcome.merge(rendered.outcome);

        for y in 0..rendered.surface.height() {
            let src = rendered.surface.row(y);
            let row = target.start_scanline(y)?;
            if row.len() != src.len() {
                let msg = format!("scanline {y} holds {} pixels, frame has {}", row.len(), src.len());
                cb.error(&msg);
                return Err(StrataError::target(msg));
            }
            row.copy_from_slice(src);
            target.end_scanline()?;
        }
        target.end_frame()?;
    }
    target.finish()?;
    Ok(outcome)
}

/// Front-most layer claiming `p` at `time`.
pub fn hit_test(canvas: &Canvas, time: Time, p: Point) -> Option<LayerId> {
    canvas.set_time(time);
    canvas.hit_check(p)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
