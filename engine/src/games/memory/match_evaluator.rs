use super::types::{MatchMode, Tile};

/// Two tiles form a pair only when they share a real pair id and agree on the
/// attributes the mode compares. Pairs are generated with identical color and
/// shape, so every mode accepts them today; the mode still decides the
/// comparison for decks whose pairs diverge in one attribute.
pub fn matches(first: &Tile, second: &Tile, mode: MatchMode) -> bool {
    if first.pair_id != second.pair_id || first.is_filler() || second.is_filler() {
        return false;
    }

    match mode {
        MatchMode::ColorOnly => first.color == second.color,
        MatchMode::ShapeOnly => first.shape == second.shape,
        MatchMode::ColorAndShape => first.color == second.color && first.shape == second.shape,
    }
}
