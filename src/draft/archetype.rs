//! Archetype inference from picks so far.
//!
//! Counts colored pips across every picked card, takes the two most
//! frequent colors (ties keep first-seen order) and maps that pair to a
//! recognized archetype. Anything else, including a cold start with zero
//! or one color seen, is `XX`.

use crate::types::{Archetype, CardRecord, Color};

/// Pip tally that remembers first-seen order.
#[derive(Debug, Default, Clone)]
pub struct ColorTally {
    counts: Vec<(Color, usize)>,
}

impl ColorTally {
    pub fn add(&mut self, color: Color) {
        match self.counts.iter_mut().find(|(c, _)| *c == color) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((color, 1)),
        }
    }

    pub fn add_card(&mut self, card: &CardRecord) {
        for color in card.color_pips() {
            self.add(color);
        }
    }

    pub fn count(&self, color: Color) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| *c == color)
            .map_or(0, |(_, n)| *n)
    }

    /// Colors by descending count; equal counts stay in first-seen order.
    pub fn most_common(&self) -> Vec<(Color, usize)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// Infer the archetype from the picked cards, in pick order.
pub fn infer_archetype<'a>(picks: impl IntoIterator<Item = &'a CardRecord>) -> Archetype {
    let mut tally = ColorTally::default();
    for card in picks {
        tally.add_card(card);
    }
    archetype_from_tally(&tally)
}

pub fn archetype_from_tally(tally: &ColorTally) -> Archetype {
    match tally.most_common().as_slice() {
        [(a, _), (b, _), ..] => Archetype::from_pair(*a, *b).unwrap_or(Archetype::XX),
        _ => Archetype::XX,
    }
}
