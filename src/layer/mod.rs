pub(crate) mod layer;
pub(crate) mod params;
pub(crate) mod paste;
pub(crate) mod rectangle;
pub(crate) mod solid;

pub use layer::{LAYER_TYPES, Layer, LayerId, LayerInfo, LayerKind};
pub use params::{ParamDesc, ParamValue};
pub use paste::PasteCanvas;
pub use rectangle::Rectangle;
pub use solid::SolidColor;
