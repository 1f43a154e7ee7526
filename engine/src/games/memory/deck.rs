use super::palette::ColorPalette;
use super::types::{BoardLayout, PairId, Shape, Tile};
use crate::games::session_rng::SessionRng;
use crate::identifiers::TileId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    PaletteTooSmall { required: usize, available: usize },
    GridTooSmall { grid_cells: usize, required: usize },
}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::PaletteTooSmall { required, available } => write!(
                f,
                "Palette has {} distinct colors, {} required",
                available, required
            ),
            DeckError::GridTooSmall { grid_cells, required } => write!(
                f,
                "Grid has {} cells, {} required for all pairs",
                grid_cells, required
            ),
        }
    }
}

impl std::error::Error for DeckError {}

pub struct TileDeckGenerator {
    palette: ColorPalette,
}

impl TileDeckGenerator {
    pub fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Builds `grid_size²` tiles: `pairs_count` pairs with matching color and
    /// shape, padded with pre-matched filler, in uniformly random order.
    pub fn generate(&self, layout: BoardLayout, rng: &mut SessionRng) -> Result<Vec<Tile>, DeckError> {
        let required_cells = layout.pairs_count * 2;
        if layout.cell_count() < required_cells {
            return Err(DeckError::GridTooSmall {
                grid_cells: layout.cell_count(),
                required: required_cells,
            });
        }

        let mut colors = self.palette.distinct_colors();
        if colors.len() < layout.pairs_count {
            return Err(DeckError::PaletteTooSmall {
                required: layout.pairs_count,
                available: colors.len(),
            });
        }
        rng.shuffle(&mut colors);
        colors.truncate(layout.pairs_count);

        let mut shapes = Shape::ALL;
        rng.shuffle(&mut shapes);

        let mut tiles = Vec::with_capacity(layout.cell_count());
        let mut next_id = 0u32;
        let mut allocate_id = || {
            let id = TileId::new(next_id);
            next_id += 1;
            id
        };

        for pair_index in 0..layout.pairs_count {
            let color = colors[pair_index % colors.len()];
            let shape = shapes[pair_index % shapes.len()];
            let pair_id = PairId::new(pair_index as u32);
            tiles.push(Tile::new(allocate_id(), shape, color, pair_id));
            tiles.push(Tile::new(allocate_id(), shape, color, pair_id));
        }

        while tiles.len() < layout.cell_count() {
            tiles.push(Tile::filler(allocate_id()));
        }

        rng.shuffle(&mut tiles);
        Ok(tiles)
    }
}

impl Default for TileDeckGenerator {
    fn default() -> Self {
        Self::new(ColorPalette::standard())
    }
}
