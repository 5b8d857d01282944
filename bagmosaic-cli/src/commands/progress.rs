//! Download progress bar.

use bagmosaic::pipeline::{RunObserver, Stage};
use bagmosaic::tile::TileId;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles {msg}";

/// Shows tile downloads as a progress bar and clears it when fetching ends.
pub struct FetchProgress {
    bar: ProgressBar,
}

impl FetchProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = ProgressBar::new(0).with_style(style);
        Self { bar }
    }
}

impl Default for FetchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for FetchProgress {
    fn stage_started(&self, stage: Stage) {
        match stage {
            Stage::Lookup => self.bar.set_message("looking up tiles"),
            Stage::Fetch => self.bar.set_message(""),
            _ => {
                if !self.bar.is_finished() {
                    self.bar.finish_and_clear();
                }
            }
        }
    }

    fn tiles_found(&self, count: usize) {
        self.bar.set_length(count as u64);
    }

    fn tile_fetched(&self, tile: &TileId, ok: bool) {
        if !ok {
            self.bar.println(format!("  skipped tile {}", tile));
        }
        self.bar.set_message(tile.to_string());
        self.bar.inc(1);
    }
}
