use std::collections::BTreeMap;

use crate::{
    canvas::canvas::{Canvas, CanvasHandle, EmbeddedCanvas},
    document::model::{CanvasDef, CanvasRef, Document, LayerDef, LayerKindDef},
    foundation::error::{StrataError, StrataResult},
    layer::{Layer, PasteCanvas, Rectangle, SolidColor},
};

impl Document {
    /// Build the canvas graph and return the root canvas at its start time.
    ///
    /// Every root canvas exists before any layer is built, so paste layers may
    /// reference canvases in any order, including themselves.
    #[tracing::instrument(skip(self), fields(root = %self.root))]
    pub fn instantiate(&self) -> StrataResult<CanvasHandle> {
        self.validate()?;

        let handles: BTreeMap<&str, CanvasHandle> = self
            .canvases
            .iter()
            .map(|(id, def)| {
                let canvas = shell(Canvas::new(id.as_str(), def.rend_desc.clone()), def);
                (id.as_str(), canvas.into_handle())
            })
            .collect();

        for (id, def) in &self.canvases {
            let Some(handle) = handles.get(id.as_str()) else {
                continue;
            };
            for layer in &def.layers {
                handle.add_layer_back(build_layer(layer, &handles)?)?;
            }
        }

        for handle in handles.values() {
            handle.set_time(handle.rend_desc().time_start);
        }
        tracing::debug!(canvases = handles.len(), "document instantiated");

        handles
            .get(self.root.as_str())
            .cloned()
            .ok_or_else(|| StrataError::validation(format!("root canvas '{}' is not defined", self.root)))
    }
}

fn shell(canvas: Canvas, def: &CanvasDef) -> Canvas {
    let canvas = canvas
        .with_name(def.name.clone())
        .with_description(def.description.clone());
    match &def.file_name {
        Some(f) => canvas.with_file_name(f.clone()),
        None => canvas,
    }
}

fn build_inline(def: &CanvasDef, handles: &BTreeMap<&str, CanvasHandle>) -> StrataResult<Canvas> {
    let mut canvas = shell(Canvas::new_inline(def.rend_desc.clone()), def);
    for layer in &def.layers {
        let layer = build_layer(layer, handles)?;
        layer.validate()?;
        canvas = canvas.with_layer(layer);
    }
    Ok(canvas)
}

fn build_layer(def: &LayerDef, handles: &BTreeMap<&str, CanvasHandle>) -> StrataResult<Layer> {
    let layer = match &def.kind {
        LayerKindDef::SolidColor { color } => Layer::new(SolidColor::new(color.clone())),
        LayerKindDef::Rectangle {
            point1,
            point2,
            color,
        } => Layer::new(Rectangle::new(point1.clone(), point2.clone(), color.clone())),
        LayerKindDef::PasteCanvas {
            canvas,
            origin,
            zoom,
            time_offset,
            children_lock,
        } => {
            let mut paste = PasteCanvas::new()
                .with_origin(origin.clone())
                .with_zoom(zoom.clone())
                .with_time_offset(*time_offset)
                .with_children_lock(*children_lock);
            let embedded = match canvas {
                None => None,
                Some(CanvasRef::Shared(id)) => {
                    let handle = handles.get(id.as_str()).ok_or_else(|| {
                        StrataError::validation(format!("missing canvas '{id}'"))
                    })?;
                    Some(EmbeddedCanvas::shared(handle.clone())?)
                }
                Some(CanvasRef::Inline(def)) => Some(EmbeddedCanvas::inline(build_inline(def, handles)?)),
            };
            paste.set_canvas(embedded);
            Layer::paste_canvas(paste)
        }
    };
    Ok(layer
        .with_description(def.desc.clone())
        .with_active(def.active)
        .with_amount(def.amount.clone())
        .with_blend(def.blend))
}

#[cfg(test)]
#[path = "../../tests/unit/document/load.rs"]
mod tests;
