//! Tile adjacency from footprint overlap.

use std::io::{self, Write};

use super::fetch::TILE_PLACEHOLDER;
use crate::tile::{BoundingBox, TileId, TileRecord};

/// Default path pattern for tile files listed in a neighbours CSV.
pub const DEFAULT_NEIGHBOUR_PATTERN: &str =
    "/data/3DBAGv2/export/cityjson/v210908_fd2cee53/3dbag_v210908_fd2cee53_{TID}.json.gz";

/// Adjacency of one tile.
pub type Adjacency = (TileId, Vec<TileId>);

/// For every tile, the tiles whose footprint bounding boxes overlap or touch
/// its own, in index order. A tile is never its own neighbour; tiles without
/// a footprint have no neighbours.
pub fn neighbours(tiles: &[TileRecord]) -> Vec<Adjacency> {
    let bounds: Vec<Option<BoundingBox>> = tiles.iter().map(TileRecord::bounds).collect();

    tiles
        .iter()
        .enumerate()
        .map(|(i, tile)| {
            let adjacent = match bounds[i] {
                Some(own) => bounds
                    .iter()
                    .enumerate()
                    .filter(|&(j, other)| j != i && other.is_some_and(|b| b.intersects(&own)))
                    .map(|(j, _)| tiles[j].id.clone())
                    .collect(),
                None => Vec::new(),
            };
            (tile.id.clone(), adjacent)
        })
        .collect()
}

/// Write one `;`-separated row per tile: the tile's own file, then its
/// neighbours' files, each named by substituting `{TID}` in `pattern`.
pub fn write_neighbours_csv<W: Write>(
    adjacency: &[Adjacency],
    pattern: &str,
    mut out: W,
) -> io::Result<()> {
    for (tile, adjacent) in adjacency {
        let row: Vec<String> = std::iter::once(tile)
            .chain(adjacent)
            .map(|id| pattern.replace(TILE_PLACEHOLDER, id.as_str()))
            .collect();
        writeln!(out, "{}", row.join(";"))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str, x: f64, y: f64) -> TileRecord {
        TileRecord::new(
            TileId::new(id),
            vec![[x, y], [x + 10.0, y], [x + 10.0, y + 10.0], [x, y + 10.0], [x, y]],
        )
    }

    #[test]
    fn test_grid_neighbours() {
        // a b
        // c     d (far away)
        let tiles = vec![
            square("a", 0.0, 10.0),
            square("b", 10.0, 10.0),
            square("c", 0.0, 0.0),
            square("d", 100.0, 100.0),
        ];

        let adjacency = neighbours(&tiles);

        let ids = |v: &Vec<TileId>| v.iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&adjacency[0].1), vec!["b", "c"]);
        assert_eq!(ids(&adjacency[1].1), vec!["a", "c"]);
        assert_eq!(ids(&adjacency[2].1), vec!["a", "b"]);
        assert!(adjacency[3].1.is_empty());
    }

    #[test]
    fn test_duplicate_footprints_are_neighbours() {
        let tiles = vec![square("a", 0.0, 0.0), square("a2", 0.0, 0.0)];
        let adjacency = neighbours(&tiles);
        assert_eq!(adjacency[0].1, vec![TileId::new("a2")]);
        assert_eq!(adjacency[1].1, vec![TileId::new("a")]);
    }

    #[test]
    fn test_empty_footprint_has_no_neighbours() {
        let tiles = vec![TileRecord::new(TileId::new("x"), vec![]), square("a", 0.0, 0.0)];
        let adjacency = neighbours(&tiles);
        assert!(adjacency[0].1.is_empty());
        assert!(adjacency[1].1.is_empty());
    }

    #[test]
    fn test_csv_rows() {
        let adjacency = vec![
            (TileId::new("1"), vec![TileId::new("2"), TileId::new("3")]),
            (TileId::new("4"), vec![]),
        ];
        let mut out = Vec::new();

        write_neighbours_csv(&adjacency, "/tiles/{TID}.json.gz", &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "/tiles/1.json.gz;/tiles/2.json.gz;/tiles/3.json.gz\n/tiles/4.json.gz\n"
        );
    }
}
