//! Decks of distinct cards. A card is identified by its position in the unshuffled deck, so a
//! fresh deck of size _N_ is the identity permutation `0..N`.

pub type Card = usize;

/// Creates a deck of `size` cards in identity order.
pub fn identity(size: usize) -> Vec<Card> {
    (0..size).collect()
}

/// Resets an existing deck buffer to identity order without reallocating.
#[inline]
pub fn reset(deck: &mut [Card]) {
    for (position, card) in deck.iter_mut().enumerate() {
        *card = position;
    }
}

/// Determines whether `deck` is a permutation of `0..deck.len()`. The `bitmap` is scratch space
/// of the same length as the deck; its prior contents are ignored.
pub fn is_permutation(deck: &[Card], bitmap: &mut [bool]) -> bool {
    debug_assert_eq!(deck.len(), bitmap.len());
    bitmap.fill(false);
    for &card in deck {
        if card >= bitmap.len() || bitmap[card] {
            return false;
        }
        bitmap[card] = true;
    }
    true
}
