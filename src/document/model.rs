use std::{collections::BTreeMap, path::Path};

use crate::{
    animation::anim::Animated,
    composite::blend::BlendMethod,
    foundation::core::{Color, Point, Time},
    foundation::error::{StrataError, StrataResult},
    render::desc::RendDesc,
};

/// A scene on disk: named root canvases, one of which is rendered.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Key into `canvases`.
    pub root: String,
    pub canvases: BTreeMap<String, CanvasDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CanvasDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub rend_desc: RendDesc,
    /// Front to back.
    #[serde(default)]
    pub layers: Vec<LayerDef>,
}

fn default_active() -> bool {
    true
}

fn default_amount() -> Animated<f64> {
    Animated::Constant(1.0)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_amount")]
    pub amount: Animated<f64>,
    #[serde(default)]
    pub blend: BlendMethod,
    #[serde(flatten)]
    pub kind: LayerKindDef,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKindDef {
    SolidColor {
        color: Animated<Color>,
    },
    Rectangle {
        point1: Animated<Point>,
        point2: Animated<Point>,
        color: Animated<Color>,
    },
    PasteCanvas {
        #[serde(default)]
        canvas: Option<CanvasRef>,
        #[serde(default)]
        origin: Animated<Point>,
        #[serde(default)]
        zoom: Animated<f64>,
        #[serde(default)]
        time_offset: Time,
        #[serde(default)]
        children_lock: bool,
    },
}

/// The canvas a paste layer shows: a root canvas by id, or an inline one.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CanvasRef {
    Shared(String),
    Inline(Box<CanvasDef>),
}

impl Document {
    pub fn from_json_str(s: &str) -> StrataResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StrataResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StrataError::Other(anyhow::Error::new(e).context(format!("read '{}'", path.display())))
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> StrataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> StrataResult<()> {
        if !self.canvases.contains_key(&self.root) {
            return Err(StrataError::validation(format!(
                "root canvas '{}' is not defined",
                self.root
            )));
        }
        for (id, canvas) in &self.canvases {
            if id.trim().is_empty() {
                return Err(StrataError::validation("canvas ids must be non-empty"));
            }
            self.validate_canvas(id, canvas)?;
        }
        Ok(())
    }

    fn validate_canvas(&self, path: &str, canvas: &CanvasDef) -> StrataResult<()> {
        canvas.rend_desc.validate().map_err(|e| {
            StrataError::validation(format!("canvas '{path}': {e}"))
        })?;
        for (i, layer) in canvas.layers.iter().enumerate() {
            layer.amount.validate()?;
            match &layer.kind {
                LayerKindDef::SolidColor { color } => color.validate()?,
                LayerKindDef::Rectangle {
                    point1,
                    point2,
                    color,
                } => {
                    point1.validate()?;
                    point2.validate()?;
                    color.validate()?;
                }
                LayerKindDef::PasteCanvas {
                    canvas,
                    origin,
                    zoom,
                    ..
                } => {
                    origin.validate()?;
                    zoom.validate()?;
                    match canvas {
                        Some(CanvasRef::Shared(id)) if !self.canvases.contains_key(id) => {
                            return Err(StrataError::validation(format!(
                                "canvas '{path}' layer {i} references missing canvas '{id}'"
                            )));
                        }
                        Some(CanvasRef::Inline(def)) => {
                            self.validate_canvas(&format!("{path}/{i}"), def)?;
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
