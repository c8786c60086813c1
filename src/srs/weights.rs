//! Weak-area reprioritization used when scheduling state can't be persisted.
//!
//! Every miss pushes a card up by [`MISS_PENALTY`], every hit lowers it by
//! [`HIT_RELIEF`] down to zero. A pass is simply the deck sorted by weight,
//! heaviest first, so the cards the learner keeps missing come back sooner.

use std::collections::HashMap;

use crate::domain::{Card, CardId, Quality};

pub const MISS_PENALTY: u32 = 2;
pub const HIT_RELIEF: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
  weights: HashMap<CardId, u32>,
}

impl WeightTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn weight(&self, card_id: &str) -> u32 {
    self.weights.get(card_id).copied().unwrap_or(0)
  }

  /// Apply one review result and return the card's new weight
  pub fn record(&mut self, card_id: &str, quality: Quality) -> u32 {
    let entry = self.weights.entry(card_id.to_string()).or_insert(0);
    *entry = if quality.is_correct() {
      entry.saturating_sub(HIT_RELIEF)
    } else {
      entry.saturating_add(MISS_PENALTY)
    };
    *entry
  }

  /// Deck ordered heaviest first; equal weights keep content order
  pub fn order<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
    let mut ordered: Vec<&Card> = cards.iter().collect();
    ordered.sort_by_key(|card| std::cmp::Reverse(self.weight(&card.id)));
    ordered
  }
}
