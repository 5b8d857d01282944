//! `tiles` - list the tiles around a point.

use clap::Args;

use bagmosaic::config::ConfigFile;
use bagmosaic::source::{TileIndex, WfsTileIndex};
use bagmosaic::tile::BoundingBox;

use super::common::{http_client, init_logging};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct TilesArgs {
    /// X coordinate of the point of interest (EPSG:28992)
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// Y coordinate of the point of interest (EPSG:28992)
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// Half-width of the square area around the point, in metres
    #[arg(short, long, default_value_t = 1000.0)]
    pub radius: f64,
}

pub fn run(args: TilesArgs, config: &ConfigFile, verbose: bool) -> Result<(), CliError> {
    let _guard = init_logging(None, verbose)?;

    let index = WfsTileIndex::with_url(http_client(config)?, config.source.index_url.as_str());
    let bbox = BoundingBox::around(args.x, args.y, args.radius);
    let tiles = index.lookup(&bbox)?;

    for tile in &tiles {
        match tile.bounds() {
            Some(b) => println!(
                "{}\t{:.1},{:.1},{:.1},{:.1}",
                tile.id, b.min_x, b.min_y, b.max_x, b.max_y
            ),
            None => println!("{}", tile.id),
        }
    }
    eprintln!("{} tile(s) within {}", tiles.len(), bbox.to_query());
    Ok(())
}
