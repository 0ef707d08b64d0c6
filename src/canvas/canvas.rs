use std::{
    cell::{Cell, Ref, RefCell},
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use crate::{
    canvas::signal::{ChangeEvent, ChangeSignal, SubscriptionId},
    foundation::core::{Color, Point, Rect, Time},
    foundation::error::{StrataError, StrataResult},
    layer::{Layer, LayerId, ParamValue},
    render::{context::Context, desc::RendDesc, scope::RenderScope},
};

/// Shared handle to a canvas. Root canvases may be referenced by any number of
/// paste layers; a cycle of strong handles is never freed.
pub type CanvasHandle = Rc<Canvas>;

/// An ordered list of layers plus the descriptor they are rendered through.
///
/// Layer 0 is the front-most; each layer composites over everything after it.
/// All mutation goes through `&self` so canvases can be edited through shared
/// handles; edits made while a render is walking the layers are refused.
pub struct Canvas {
    id: String,
    name: String,
    description: String,
    file_name: Option<String>,
    rend_desc: RefCell<RendDesc>,
    layers: RefCell<Vec<Layer>>,
    time: Cell<Time>,
    dirty: Cell<bool>,
    notifying: Cell<bool>,
    inline: Cell<bool>,
    parent: RefCell<Weak<Canvas>>,
    changes: ChangeSignal,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("inline", &self.inline.get())
            .field("layers", &self.layer_count())
            .field("time", &self.time.get())
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// A root canvas.
    pub fn new(id: impl Into<String>, rend_desc: RendDesc) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            file_name: None,
            rend_desc: RefCell::new(rend_desc),
            layers: RefCell::new(Vec::new()),
            time: Cell::new(Time::ZERO),
            dirty: Cell::new(true),
            notifying: Cell::new(false),
            inline: Cell::new(false),
            parent: RefCell::new(Weak::new()),
            changes: ChangeSignal::default(),
        }
    }

    /// An anonymous canvas meant to be owned by a single paste layer.
    pub fn new_inline(rend_desc: RendDesc) -> Self {
        let c = Self::new("", rend_desc);
        c.inline.set(true);
        c
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Append `layer` behind the layers added so far.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.get_mut().push(layer);
        self
    }

    /// Move into a shared handle, adopting any inline canvases the layers own.
    pub fn into_handle(self) -> CanvasHandle {
        let handle = Rc::new(self);
        for layer in handle.layers.borrow().iter() {
            layer.on_canvas_set(&handle);
        }
        handle
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn rend_desc(&self) -> RendDesc {
        self.rend_desc.borrow().clone()
    }

    pub fn set_rend_desc(&self, desc: RendDesc) {
        *self.rend_desc.borrow_mut() = desc;
        self.announce(&ChangeEvent::ContentChanged);
    }

    pub fn focus(&self) -> Point {
        self.rend_desc.borrow().focus
    }

    pub fn is_inline(&self) -> bool {
        self.inline.get()
    }

    /// The canvas owning the paste layer that owns this inline canvas.
    pub fn parent(&self) -> Option<CanvasHandle> {
        self.parent.borrow().upgrade()
    }

    /// Make this canvas inline under `parent`.
    pub fn set_inline(&self, parent: &CanvasHandle) {
        self.inline.set(true);
        *self.parent.borrow_mut() = Rc::downgrade(parent);
    }

    /// Drop the parent link; the canvas becomes a root canvas.
    pub fn clear_parent(&self) {
        self.inline.set(false);
        *self.parent.borrow_mut() = Weak::new();
    }

    fn root_ptr(&self) -> *const Canvas {
        match self.parent() {
            Some(parent) if self.is_inline() => parent.root_ptr(),
            _ => self as *const Canvas,
        }
    }

    /// True when both canvases belong to the same root canvas tree.
    pub fn same_root(&self, other: &Canvas) -> bool {
        std::ptr::eq(self.root_ptr(), other.root_ptr())
    }

    pub fn context<'a>(&'a self, scope: &'a RenderScope) -> Context<'a> {
        Context::new(self, scope)
    }

    pub(crate) fn layers_for_render(&self) -> Option<Ref<'_, Vec<Layer>>> {
        self.layers.try_borrow().ok()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.try_borrow().map_or(0, |l| l.len())
    }

    /// Layer ids, front to back.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers
            .try_borrow()
            .map(|l| l.iter().map(Layer::id).collect())
            .unwrap_or_default()
    }

    pub fn with_layer_ref<R>(&self, id: LayerId, f: impl FnOnce(&Layer) -> R) -> Option<R> {
        let layers = self.layers.try_borrow().ok()?;
        layers.iter().find(|l| l.id() == id).map(f)
    }

    /// Edit a layer in place. Observers see a `LayerChanged` with an empty
    /// parameter name.
    pub fn edit_layer<R>(
        self: &Rc<Self>,
        id: LayerId,
        f: impl FnOnce(&mut Layer) -> R,
    ) -> StrataResult<R> {
        let out = {
            let mut layers = self.layers_mut()?;
            let layer = layers
                .iter_mut()
                .find(|l| l.id() == id)
                .ok_or_else(|| StrataError::validation(format!("no layer {id} in canvas")))?;
            let out = f(layer);
            layer.on_canvas_set(self);
            out
        };
        self.announce(&ChangeEvent::LayerChanged {
            layer: id,
            param: String::new(),
        });
        Ok(out)
    }

    /// Set one named parameter. Returns whether the value changed; only a
    /// change is announced to observers.
    pub fn set_layer_param(&self, id: LayerId, name: &str, value: ParamValue) -> StrataResult<bool> {
        let changed = {
            let mut layers = self.layers_mut()?;
            let layer = layers
                .iter_mut()
                .find(|l| l.id() == id)
                .ok_or_else(|| StrataError::validation(format!("no layer {id} in canvas")))?;
            layer.set_param(name, value)?
        };
        if changed {
            self.announce(&ChangeEvent::LayerChanged {
                layer: id,
                param: name.to_owned(),
            });
        }
        Ok(changed)
    }

    fn layers_mut(&self) -> StrataResult<std::cell::RefMut<'_, Vec<Layer>>> {
        self.layers
            .try_borrow_mut()
            .map_err(|_| StrataError::validation(format!("canvas '{}' is busy rendering", self.id)))
    }

    /// Insert `layer` at `index` (clamped). Index 0 is the front.
    pub fn insert_layer(self: &Rc<Self>, index: usize, layer: Layer) -> StrataResult<LayerId> {
        layer.validate()?;
        layer.on_canvas_set(self);
        let id = layer.id();
        {
            let mut layers = self.layers_mut()?;
            let index = index.min(layers.len());
            layers.insert(index, layer);
        }
        self.announce(&ChangeEvent::LayerAdded(id));
        Ok(id)
    }

    pub fn add_layer_front(self: &Rc<Self>, layer: Layer) -> StrataResult<LayerId> {
        self.insert_layer(0, layer)
    }

    pub fn add_layer_back(self: &Rc<Self>, layer: Layer) -> StrataResult<LayerId> {
        self.insert_layer(usize::MAX, layer)
    }

    /// Remove and return a layer; the caller decides whether it is dropped.
    pub fn remove_layer(&self, id: LayerId) -> StrataResult<Layer> {
        let layer = {
            let mut layers = self.layers_mut()?;
            let pos = layers
                .iter()
                .position(|l| l.id() == id)
                .ok_or_else(|| StrataError::validation(format!("no layer {id} in canvas")))?;
            layers.remove(pos)
        };
        self.announce(&ChangeEvent::LayerRemoved(id));
        Ok(layer)
    }

    fn announce(&self, event: &ChangeEvent) {
        self.dirty.set(true);
        let outer = self.notifying.replace(true);
        self.changes.emit(event);
        self.notifying.set(outer);
    }

    /// A canvas pasted into this one changed. Marks this canvas dirty so the
    /// next `set_time` refreshes cached paste bounds, and passes the change on
    /// to whatever pastes this canvas. Cycles stop at a canvas that is
    /// already announcing.
    pub(crate) fn embedded_changed(&self) {
        self.dirty.set(true);
        if self.notifying.get() {
            return;
        }
        self.announce(&ChangeEvent::ContentChanged);
    }

    pub fn get_time(&self) -> Time {
        self.time.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Move the canvas to `time` and propagate to every active layer.
    pub fn set_time(&self, time: Time) {
        let scope = RenderScope::new();
        self.set_time_in(&scope, time);
    }

    pub(crate) fn set_time_in(&self, scope: &RenderScope, time: Time) {
        if !self.dirty.get() && self.time.get().is_equal(time) {
            return;
        }
        self.time.set(time);
        self.dirty.set(false);
        self.context(scope).set_time(time);
    }

    /// Every keyframe time reachable from this canvas, in its own timeline.
    pub fn get_times(&self) -> BTreeSet<Time> {
        let scope = RenderScope::new();
        self.times_in(&scope)
    }

    pub(crate) fn times_in(&self, scope: &RenderScope) -> BTreeSet<Time> {
        let Some(layers) = self.layers_for_render() else {
            return BTreeSet::new();
        };
        layers
            .iter()
            .filter(|l| l.is_active())
            .flat_map(|l| l.get_times(scope))
            .collect()
    }

    /// Color at `p` for the current time.
    pub fn get_color(&self, p: Point) -> Color {
        let scope = RenderScope::new();
        self.context(&scope).get_color(p)
    }

    pub fn get_full_bounding_rect(&self) -> Rect {
        let scope = RenderScope::new();
        self.context(&scope).get_full_bounding_rect()
    }

    pub fn hit_check(&self, p: Point) -> Option<LayerId> {
        let scope = RenderScope::new();
        self.context(&scope).hit_check(p)
    }

    pub fn changes(&self) -> &ChangeSignal {
        &self.changes
    }

    pub fn subscribe(&self, handler: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.changes.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }
}

/// How a paste layer holds its canvas.
///
/// `Inline` canvases belong to exactly one paste layer and are dropped with it;
/// `Shared` canvases are root canvases any number of paste layers may point at.
#[derive(Debug)]
pub enum EmbeddedCanvas {
    Inline(CanvasHandle),
    Shared(CanvasHandle),
}

impl EmbeddedCanvas {
    /// Take exclusive ownership of `canvas` as an inline canvas.
    pub fn inline(canvas: Canvas) -> Self {
        canvas.inline.set(true);
        Self::Inline(canvas.into_handle())
    }

    /// Reference a root canvas.
    pub fn shared(canvas: CanvasHandle) -> StrataResult<Self> {
        if canvas.is_inline() {
            return Err(StrataError::validation(
                "an inline canvas cannot be shared; detach it first",
            ));
        }
        Ok(Self::Shared(canvas))
    }

    pub fn handle(&self) -> &CanvasHandle {
        match self {
            Self::Inline(c) | Self::Shared(c) => c,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// Check the ownership tag against the canvas's own state.
    pub fn validate(&self) -> StrataResult<()> {
        match self {
            Self::Inline(c) if !c.is_inline() => Err(StrataError::validation(
                "inline embedding holds a root canvas",
            )),
            Self::Inline(c) if Rc::strong_count(c) != 1 => Err(StrataError::validation(format!(
                "inline canvas has {} owners",
                Rc::strong_count(c)
            ))),
            Self::Shared(c) if c.is_inline() => Err(StrataError::validation(format!(
                "shared embedding holds inline canvas (parent: {:?})",
                c.parent().map(|p| p.id().to_owned())
            ))),
            _ => Ok(()),
        }
    }

    /// Release the canvas as a root canvas.
    pub fn detach(self) -> CanvasHandle {
        let canvas = match self {
            Self::Inline(c) | Self::Shared(c) => c,
        };
        canvas.clear_parent();
        canvas
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/canvas.rs"]
mod tests;
