use std::cell::Cell;

/// Deepest nesting of paste-canvas layers a single render call tree will follow.
pub const MAX_DEPTH: usize = 10;

/// How a render finished.
///
/// `DepthLimited` still produced an image; some nested content beyond
/// [`MAX_DEPTH`] was rendered as transparent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    #[default]
    Complete,
    DepthLimited,
    Cancelled,
}

impl RenderOutcome {
    pub fn is_cancelled(self) -> bool {
        self == Self::Cancelled
    }

    /// True unless cancelled.
    pub fn is_success(self) -> bool {
        !self.is_cancelled()
    }

    /// Combine the outcomes of two parts of one render; the most severe wins.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Cancelled, _) | (_, Self::Cancelled) => Self::Cancelled,
            (Self::DepthLimited, _) | (_, Self::DepthLimited) => Self::DepthLimited,
            _ => Self::Complete,
        }
    }
}

/// Recursion bookkeeping for one render call tree.
///
/// Every nested canvas entry holds a [`DepthGuard`]; once [`MAX_DEPTH`] guards
/// are live, [`RenderScope::enter`] refuses. Each top-level render, time update
/// or bounds query builds its own scope, so independent calls never share a
/// counter.
#[derive(Debug, Default)]
pub struct RenderScope {
    depth: Cell<usize>,
    peak: Cell<usize>,
    limit_hits: Cell<u64>,
}

impl RenderScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Deepest nesting reached so far.
    pub fn peak_depth(&self) -> usize {
        self.peak.get()
    }

    /// How many entries were refused at the depth limit.
    pub fn limit_hits(&self) -> u64 {
        self.limit_hits.get()
    }

    pub fn enter(&self) -> Option<DepthGuard<'_>> {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            self.limit_hits.set(self.limit_hits.get() + 1);
            return None;
        }
        self.depth.set(depth + 1);
        self.peak.set(self.peak.get().max(depth + 1));
        Some(DepthGuard { scope: self })
    }
}

/// One level of nesting; released on drop, including early returns.
#[derive(Debug)]
pub struct DepthGuard<'a> {
    scope: &'a RenderScope,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.scope.depth.get();
        self.scope.depth.set(depth.saturating_sub(1));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scope.rs"]
mod tests;
