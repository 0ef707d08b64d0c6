pub(crate) mod load;
pub(crate) mod model;

pub use model::{CanvasDef, CanvasRef, Document, LayerDef, LayerKindDef};
