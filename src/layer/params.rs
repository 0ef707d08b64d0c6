use crate::{
    composite::blend::BlendMethod,
    foundation::core::{Color, Point, Time},
    foundation::error::{StrataError, StrataResult},
};

/// Static description of one layer parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDesc {
    pub name: &'static str,
    pub local_name: &'static str,
    pub description: &'static str,
}

/// A parameter value as seen through the generic get/set interface.
///
/// Animated parameters read as their value at the layer's current time and are
/// replaced by a constant when set.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Real(f64),
    Point(Point),
    Color(Color),
    Time(Time),
    Bool(bool),
    Blend(BlendMethod),
    /// Id of the embedded canvas, read-only; `""` for inline canvases.
    Canvas(Option<String>),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Real(_) => "real",
            Self::Point(_) => "point",
            Self::Color(_) => "color",
            Self::Time(_) => "time",
            Self::Bool(_) => "bool",
            Self::Blend(_) => "blend_method",
            Self::Canvas(_) => "canvas",
        }
    }

    fn mismatch(&self, param: &str, expected: &str) -> StrataError {
        StrataError::validation(format!(
            "parameter '{param}' expects {expected}, got {}",
            self.type_name()
        ))
    }

    pub(crate) fn into_real(self, param: &str) -> StrataResult<f64> {
        match self {
            Self::Real(v) if v.is_finite() => Ok(v),
            Self::Real(_) => Err(StrataError::validation(format!(
                "parameter '{param}' must be finite"
            ))),
            other => Err(other.mismatch(param, "real")),
        }
    }

    pub(crate) fn into_point(self, param: &str) -> StrataResult<Point> {
        match self {
            Self::Point(p) if p.is_finite() => Ok(p),
            Self::Point(_) => Err(StrataError::validation(format!(
                "parameter '{param}' must be finite"
            ))),
            other => Err(other.mismatch(param, "point")),
        }
    }

    pub(crate) fn into_color(self, param: &str) -> StrataResult<Color> {
        match self {
            Self::Color(c) => Ok(c),
            other => Err(other.mismatch(param, "color")),
        }
    }

    pub(crate) fn into_time(self, param: &str) -> StrataResult<Time> {
        match self {
            Self::Time(t) => Ok(t),
            Self::Real(secs) => Ok(Time::seconds(secs)),
            other => Err(other.mismatch(param, "time")),
        }
    }

    pub(crate) fn into_bool(self, param: &str) -> StrataResult<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(other.mismatch(param, "bool")),
        }
    }

    pub(crate) fn into_blend(self, param: &str) -> StrataResult<BlendMethod> {
        match self {
            Self::Blend(b) => Ok(b),
            other => Err(other.mismatch(param, "blend_method")),
        }
    }
}

/// Typed accessors for one parameter of `K`.
pub(crate) struct ParamEntry<K> {
    pub desc: ParamDesc,
    pub get: fn(&K, Time) -> ParamValue,
    /// `None` for read-only parameters.
    pub set: Option<fn(&mut K, ParamValue) -> StrataResult<()>>,
}

pub(crate) fn lookup<K>(table: &'static [ParamEntry<K>], name: &str) -> Option<&'static ParamEntry<K>> {
    table.iter().find(|e| e.desc.name == name)
}

pub(crate) fn read_only(name: &str) -> StrataError {
    StrataError::validation(format!("parameter '{name}' is read-only"))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/params.rs"]
mod tests;
