//! Validation and round scoring.
//!
//! Validation is derived from the grid alone: a cell is validated when its
//! top card is face up, sits on its own target cell, and confirms at least
//! one consumed card. The `validated` flag on [`PlacedCard`] is a cache kept
//! in sync by [`recompute_validation`]; nothing here reads it.
//!
//! A round score is the sum of validated values, plus the modifiers of all
//! face-up cards, plus the color-zone bonus, clamped at zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::{Grid, GRID_SIZE};
use crate::cards::{Color, PlacedCard};
use crate::core::ScoringRules;

/// Is the cell at `index` validated?
#[must_use]
pub fn is_cell_validated(grid: &Grid, index: usize) -> bool {
    grid.get(index).is_some_and(|placed| placed_is_validated(placed, index))
}

fn placed_is_validated(placed: &PlacedCard, index: usize) -> bool {
    placed.face_up && placed.card.target_index() == index && placed.is_confirmed()
}

/// Validation state of every cell.
#[must_use]
pub fn validation_mask(grid: &Grid) -> [bool; GRID_SIZE] {
    std::array::from_fn(|i| is_cell_validated(grid, i))
}

/// Bring every cached `validated` flag in line with the grid.
///
/// Returns the cells that became validated. Running it again on the same
/// grid changes nothing and returns an empty list.
pub fn recompute_validation(grid: &mut Grid) -> SmallVec<[usize; GRID_SIZE]> {
    let mask = validation_mask(grid);
    let mut newly_validated = SmallVec::new();

    for (index, &validated) in mask.iter().enumerate() {
        if let Some(placed) = grid.cell_mut(index) {
            if validated && !placed.validated {
                newly_validated.push(index);
            }
            placed.validated = validated;
        }
    }

    newly_validated
}

/// A connected group of face-up cells sharing a color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorZone {
    pub color: Color,
    pub cells: SmallVec<[usize; GRID_SIZE]>,
}

impl ColorZone {
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Find every color zone on the grid.
///
/// Zones are grown by flood fill over orthogonally adjacent face-up cells.
/// A `multi` card joins a zone of any color, so it may belong to zones of
/// several colors at once. Every zone contains at least one card of its
/// own color.
#[must_use]
pub fn color_zones(grid: &Grid) -> Vec<ColorZone> {
    let face_up_color = |index: usize| {
        grid.get(index)
            .filter(|placed| placed.face_up)
            .map(|placed| placed.card.color)
    };

    let mut zones = Vec::new();
    for color in Color::ALL.into_iter().filter(|c| !c.is_wildcard()) {
        let mut visited = [false; GRID_SIZE];

        for start in 0..GRID_SIZE {
            if visited[start] || face_up_color(start) != Some(color) {
                continue;
            }

            let mut cells: SmallVec<[usize; GRID_SIZE]> = SmallVec::new();
            let mut frontier: SmallVec<[usize; GRID_SIZE]> = SmallVec::new();
            visited[start] = true;
            frontier.push(start);

            while let Some(index) = frontier.pop() {
                cells.push(index);
                for next in Grid::neighbors(index) {
                    if visited[next] {
                        continue;
                    }
                    if face_up_color(next).is_some_and(|c| c.joins(color)) {
                        visited[next] = true;
                        frontier.push(next);
                    }
                }
            }

            cells.sort_unstable();
            zones.push(ColorZone { color, cells });
        }
    }

    zones
}

/// Bonus for zones of at least `zone_min_size` cards.
///
/// Each qualifying zone is worth `size * zone_bonus_per_card * (round + 1)`.
#[must_use]
pub fn color_zone_bonus(grid: &Grid, round: u8, rules: &ScoringRules) -> i32 {
    let multiplier = i32::from(round) + 1;
    color_zones(grid)
        .iter()
        .filter(|zone| zone.size() >= rules.zone_min_size)
        .map(|zone| zone.size() as i32 * rules.zone_bonus_per_card * multiplier)
        .sum()
}

/// Round score split into its parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub validated_values: i32,
    pub modifiers: i32,
    pub zone_bonus: i32,
    /// Clamped sum of the parts.
    pub total: i32,
}

/// Score a grid for the given round, with each part itemized.
#[must_use]
pub fn score_breakdown(grid: &Grid, round: u8, rules: &ScoringRules) -> ScoreBreakdown {
    let validated_values = grid
        .occupied()
        .filter(|&(index, placed)| placed_is_validated(placed, index))
        .map(|(_, placed)| i32::from(placed.card.value))
        .sum();

    let modifiers = grid
        .occupied()
        .filter(|(_, placed)| placed.face_up)
        .map(|(_, placed)| i32::from(placed.card.scoring_modifier))
        .sum();

    let zone_bonus = color_zone_bonus(grid, round, rules);

    ScoreBreakdown {
        validated_values,
        modifiers,
        zone_bonus,
        total: (validated_values + modifiers + zone_bonus).max(0),
    }
}

/// Score a grid for the given round. Never negative.
#[must_use]
pub fn score_round(grid: &Grid, round: u8, rules: &ScoringRules) -> i32 {
    score_breakdown(grid, round, rules).total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn card(id: u8, value: u8, color: Color, modifier: i8) -> Card {
        Card::new(id, value, color, modifier, false)
    }

    #[test]
    fn test_plain_placement_is_not_validated() {
        let mut grid = Grid::new();
        grid.set(2, PlacedCard::face_up(card(1, 3, Color::Red, 0)));

        assert!(!is_cell_validated(&grid, 2));
        assert!(recompute_validation(&mut grid).is_empty());
    }

    #[test]
    fn test_confirmed_card_on_target_is_validated() {
        let mut grid = Grid::new();
        let placed = PlacedCard::face_up(card(1, 3, Color::Red, 0)).absorbing(card(2, 3, Color::Blue, 0));
        grid.set(2, placed);

        assert!(is_cell_validated(&grid, 2));
        assert_eq!(recompute_validation(&mut grid).as_slice(), &[2]);
        assert!(grid.get(2).unwrap().validated);

        // Second pass is a no-op.
        let before = grid.clone();
        assert!(recompute_validation(&mut grid).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_face_down_card_is_never_validated() {
        let mut grid = Grid::new();
        let placed = PlacedCard::face_down(card(1, 1, Color::Red, 0)).absorbing(card(2, 5, Color::Red, 0));
        grid.set(0, placed);

        assert!(!is_cell_validated(&grid, 0));
    }

    #[test]
    fn test_stale_flag_is_ignored() {
        let mut grid = Grid::new();
        let mut placed = PlacedCard::face_up(card(1, 4, Color::Green, 0));
        placed.validated = true;
        grid.set(3, placed);

        assert_eq!(score_round(&grid, 1, &ScoringRules::default()), 0);
        recompute_validation(&mut grid);
        assert!(!grid.get(3).unwrap().validated);
    }

    #[test]
    fn test_zone_flood_fill_with_wildcard() {
        // R M R
        // . . B
        // . . .
        let mut grid = Grid::new();
        grid.set(0, PlacedCard::face_up(card(1, 1, Color::Red, 0)));
        grid.set(1, PlacedCard::face_up(card(2, 2, Color::Multi, 0)));
        grid.set(2, PlacedCard::face_up(card(3, 3, Color::Red, 0)));
        grid.set(5, PlacedCard::face_up(card(4, 6, Color::Blue, 0)));

        let zones = color_zones(&grid);
        let red: Vec<_> = zones.iter().filter(|z| z.color == Color::Red).collect();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].cells.as_slice(), &[0, 1, 2]);

        // Cell 2 is red, so the blue card stays alone.
        let blue: Vec<_> = zones.iter().filter(|z| z.color == Color::Blue).collect();
        assert_eq!(blue.len(), 1);
        assert_eq!(blue[0].size(), 1);

        // Round 1 multiplier is 2.
        assert_eq!(color_zone_bonus(&grid, 1, &ScoringRules::default()), 6);
        assert_eq!(color_zone_bonus(&grid, 3, &ScoringRules::default()), 12);
    }

    #[test]
    fn test_face_down_cards_break_zones() {
        let mut grid = Grid::new();
        grid.set(0, PlacedCard::face_up(card(1, 1, Color::Green, 0)));
        grid.set(1, PlacedCard::face_down(card(2, 9, Color::Green, 0)));
        grid.set(2, PlacedCard::face_up(card(3, 3, Color::Green, 0)));

        assert_eq!(color_zones(&grid).len(), 2);
        assert_eq!(color_zone_bonus(&grid, 1, &ScoringRules::default()), 0);
    }

    #[test]
    fn test_score_breakdown_and_clamp() {
        let rules = ScoringRules::default();
        let mut grid = Grid::new();
        grid.set(
            4,
            PlacedCard::face_up(card(1, 5, Color::Yellow, 1)).absorbing(card(2, 5, Color::Red, 0)),
        );
        grid.set(0, PlacedCard::face_up(card(3, 1, Color::Blue, -2)));
        grid.set(8, PlacedCard::face_down(card(4, 2, Color::Red, 2)));

        let breakdown = score_breakdown(&grid, 1, &rules);
        assert_eq!(breakdown.validated_values, 5);
        assert_eq!(breakdown.modifiers, -1);
        assert_eq!(breakdown.zone_bonus, 0);
        assert_eq!(breakdown.total, 4);

        let mut negative = Grid::new();
        negative.set(0, PlacedCard::face_up(card(5, 1, Color::Multi, -1)));
        assert_eq!(score_round(&negative, 1, &rules), 0);
    }

    #[test]
    fn test_zone_min_size_is_configurable() {
        let mut grid = Grid::new();
        grid.set(0, PlacedCard::face_up(card(1, 1, Color::Red, 0)));
        grid.set(3, PlacedCard::face_up(card(2, 4, Color::Red, 0)));

        let pairs = ScoringRules {
            zone_min_size: 2,
            zone_bonus_per_card: 3,
        };
        assert_eq!(color_zone_bonus(&grid, 2, &pairs), 2 * 3 * 3);
        assert_eq!(color_zone_bonus(&grid, 2, &ScoringRules::default()), 0);
    }
}
