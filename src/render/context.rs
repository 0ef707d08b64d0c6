use crate::{
    canvas::canvas::Canvas,
    composite::surface::Surface,
    foundation::core::{Color, Point, Rect, Time},
    foundation::error::StrataResult,
    foundation::geom,
    layer::{Layer, LayerId},
    render::{
        desc::RendDesc,
        progress::ProgressCallback,
        scope::{RenderOutcome, RenderScope},
    },
};

/// A position in a canvas's layer list: "layer `index` and everything behind it".
///
/// Every query is answered by the first active layer at or after `index`, which
/// combines its own contribution with the answer of the context behind it. An
/// exhausted context is the empty base case: transparent, empty bounds, no hit.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    canvas: &'a Canvas,
    index: usize,
    scope: &'a RenderScope,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("canvas", &self.canvas.id())
            .field("index", &self.index)
            .field("depth", &self.scope.depth())
            .finish()
    }
}

impl<'a> Context<'a> {
    pub fn new(canvas: &'a Canvas, scope: &'a RenderScope) -> Self {
        Self {
            canvas,
            index: 0,
            scope,
        }
    }

    pub fn canvas(&self) -> &'a Canvas {
        self.canvas
    }

    pub fn scope(&self) -> &'a RenderScope {
        self.scope
    }

    /// Run `f` on the first active layer of this context and the context behind it.
    fn with_current<R>(&self, f: impl FnOnce(&Layer, Context<'a>) -> R) -> Option<R> {
        let Some(layers) = self.canvas.layers_for_render() else {
            tracing::warn!(canvas = self.canvas.id(), "canvas is being edited; treated as empty");
            return None;
        };
        let (offset, layer) = layers
            .iter()
            .enumerate()
            .skip(self.index)
            .find(|(_, l)| l.is_active())?;
        let next = Self {
            index: offset + 1,
            ..*self
        };
        Some(f(layer, next))
    }

    /// True when no active layer remains.
    pub fn is_empty(&self) -> bool {
        self.with_current(|_, _| ()).is_none()
    }

    pub fn get_color(&self, p: Point) -> Color {
        self.with_current(|layer, next| layer.get_color(next, p))
            .unwrap_or(Color::TRANSPARENT)
    }

    /// Union of the bounding rects of every active layer in this context.
    pub fn get_full_bounding_rect(&self) -> Rect {
        self.with_current(|layer, next| {
            geom::union(layer.get_bounding_rect(), next.get_full_bounding_rect())
        })
        .unwrap_or(Rect::ZERO)
    }

    /// The front-most layer that claims `p`.
    pub fn hit_check(&self, p: Point) -> Option<LayerId> {
        self.with_current(|layer, next| layer.hit_check(next, p))
            .flatten()
    }

    pub fn set_time(&self, time: Time) {
        self.with_current(|layer, next| layer.set_time(next, time));
    }

    /// Render this context into `surface`, resizing it to `desc`'s grid.
    ///
    /// Layers whose bounds miss the window are skipped unless their blend
    /// method can erase what lies behind them.
    pub fn accelerated_render(
        &self,
        surface: &mut Surface,
        quality: u8,
        desc: &RendDesc,
        cb: &mut dyn ProgressCallback,
    ) -> StrataResult<RenderOutcome> {
        let rendered = self.with_current(|layer, next| {
            if !layer.blend_method().is_straight()
                && !geom::intersects(layer.get_bounding_rect(), desc.rect())
            {
                tracing::trace!(layer = %layer.id(), "layer outside render window");
                return next.accelerated_render(surface, quality, desc, cb);
            }
            layer.accelerated_render(next, surface, quality, desc, cb)
        });
        match rendered {
            Some(result) => result,
            None => {
                surface.set_wh(desc.width, desc.height)?;
                Ok(RenderOutcome::Complete)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
