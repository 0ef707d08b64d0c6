pub(crate) mod context;
pub(crate) mod desc;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod scope;
