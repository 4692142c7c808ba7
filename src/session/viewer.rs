use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Flashcard, FlashcardDeck};

/// Cursor over one flashcard deck.
#[derive(Debug, Clone)]
pub struct FlashcardViewer {
    deck: Arc<FlashcardDeck>,
    index: usize,
    flipped: bool,
}

impl FlashcardViewer {
    pub fn new(deck: Arc<FlashcardDeck>) -> Self {
        Self {
            deck,
            index: 0,
            flipped: false,
        }
    }

    pub fn deck(&self) -> &Arc<FlashcardDeck> {
        &self.deck
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Next/previous are disabled for decks of zero or one card.
    pub fn can_navigate(&self) -> bool {
        self.len() > 1
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.deck.cards.get(self.index)
    }

    pub fn flip(&mut self) {
        if self.is_empty() {
            return;
        }
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self) {
        if !self.can_navigate() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + 1) % self.len();
    }

    pub fn previous(&mut self) {
        if !self.can_navigate() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + self.len() - 1) % self.len();
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.flipped = false;
    }

    /// Swaps in a different deck; the cursor goes back to the first card.
    pub fn replace_deck(&mut self, deck: Arc<FlashcardDeck>) {
        if !Arc::ptr_eq(&self.deck, &deck) {
            log::debug!("flashcard deck replaced ({} cards)", deck.len());
        }
        self.deck = deck;
        self.restart();
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cards = self.deck.cards.clone();
        cards.shuffle(rng);
        self.replace_deck(Arc::new(FlashcardDeck::new(cards)));
    }
}
