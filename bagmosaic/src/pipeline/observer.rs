//! Progress notifications from a running pipeline.

use std::fmt;
use std::sync::Arc;

use crate::tile::TileId;

/// Steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lookup,
    Fetch,
    Normalize,
    Merge,
    Shift,
    Export,
    Script,
    Editor,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lookup => "lookup",
            Stage::Fetch => "fetch",
            Stage::Normalize => "normalize",
            Stage::Merge => "merge",
            Stage::Shift => "shift",
            Stage::Export => "export",
            Stage::Script => "script",
            Stage::Editor => "editor",
        };
        f.write_str(name)
    }
}

/// Observer of pipeline progress.
///
/// All methods default to doing nothing, so implementations only override
/// what they display.
pub trait RunObserver: Send + Sync {
    /// A stage is starting.
    fn stage_started(&self, _stage: Stage) {}

    /// The tile index returned `count` tiles.
    fn tiles_found(&self, _count: usize) {}

    /// One tile download finished.
    fn tile_fetched(&self, _tile: &TileId, _ok: bool) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Shared observer handle.
pub type SharedObserver = Arc<dyn RunObserver>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Normalize.to_string(), "normalize");
        assert_eq!(Stage::Editor.to_string(), "editor");
    }

    #[test]
    fn test_noop_observer() {
        let observer: SharedObserver = Arc::new(NoopObserver);
        observer.stage_started(Stage::Fetch);
        observer.tile_fetched(&TileId::new("1"), true);
    }
}
