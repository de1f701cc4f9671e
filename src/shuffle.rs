//! The riffle shuffle. A deck is cut into two halves (the first half taking the extra card when
//! the deck is odd), and the halves are merged back by repeatedly dropping the bottom card of
//! either half, chosen by a fair coin, onto the shuffled pile. The pile is built from its last
//! position towards its first. Once either half runs out, the remainder of the other half is
//! dropped as-is, without consulting the coin.
//!
//! The relative order of the cards within each half is preserved; only the interleaving is random.

use std::collections::VecDeque;
use std::mem;

use tinyrand::Rand;

/// Draws a uniformly distributed value in the range [0, 1), using the top 53 bits of the next
/// `u64` in the stream.
#[inline(always)]
pub fn random_f64(rand: &mut impl Rand) -> f64 {
    const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
    (rand.next_u64() >> 11) as f64 * SCALE
}

/// Flips a fair coin. `true` selects the first half.
#[inline(always)]
pub fn flip(rand: &mut impl Rand) -> bool {
    random_f64(rand) < 0.5
}

/// The index at which the second half begins. For an odd-sized deck, the first half is larger.
#[inline(always)]
pub fn split_point(len: usize) -> usize {
    len.div_ceil(2)
}

/// Riffles `deck` into `shuffled`, which must be of the same length. `deck` is left untouched.
///
/// Each half is walked by a cursor from its end towards its start, while a third cursor fills
/// `shuffled` from its end towards its start, so no insertion at the front is ever needed.
pub fn shuffle_once_into<T: Copy>(deck: &[T], shuffled: &mut [T], rand: &mut impl Rand) {
    debug_assert_eq!(deck.len(), shuffled.len());
    let (first, second) = deck.split_at(split_point(deck.len()));
    let mut first_remaining = first.len();
    let mut second_remaining = second.len();
    let mut output = deck.len();

    while first_remaining > 0 && second_remaining > 0 {
        output -= 1;
        if flip(rand) {
            first_remaining -= 1;
            shuffled[output] = first[first_remaining];
        } else {
            second_remaining -= 1;
            shuffled[output] = second[second_remaining];
        }
    }

    let rest = if first_remaining > 0 {
        &first[..first_remaining]
    } else {
        &second[..second_remaining]
    };
    debug_assert_eq!(output, rest.len());
    shuffled[..output].copy_from_slice(rest);
}

/// Riffles `deck` once, returning the shuffled deck.
pub fn shuffle_once<T: Copy>(deck: &[T], rand: &mut impl Rand) -> Vec<T> {
    let mut shuffled = deck.to_vec();
    shuffle_once_into(deck, &mut shuffled, rand);
    shuffled
}

/// Riffles a deck of arbitrary (possibly non-[Copy]) elements once by treating each half as a
/// stack and pushing popped elements onto the front of a double-ended queue. Consumes coin flips
/// in exactly the same way as [shuffle_once_into], so both produce identical outcomes from
/// identical random streams.
pub fn shuffle_once_stacked<T: Clone>(deck: &[T], rand: &mut impl Rand) -> Vec<T> {
    let (first, second) = deck.split_at(split_point(deck.len()));
    let mut first = first.to_vec();
    let mut second = second.to_vec();
    let mut shuffled = VecDeque::with_capacity(deck.len());

    loop {
        let take_first = match (first.is_empty(), second.is_empty()) {
            (true, true) => break,
            (true, false) => false,
            (false, true) => true,
            (false, false) => flip(rand),
        };
        let card = if take_first { first.pop() } else { second.pop() };
        if let Some(card) = card {
            shuffled.push_front(card);
        }
    }
    shuffled.into()
}

/// Applies `shuffles` consecutive riffles to `deck`, in place. `scratch` is a reusable buffer;
/// it is resized to the length of the deck and its contents on return are unspecified.
#[inline]
pub fn shuffle_in_place<T: Copy>(
    deck: &mut Vec<T>,
    scratch: &mut Vec<T>,
    shuffles: u64,
    rand: &mut impl Rand,
) {
    if shuffles == 0 {
        return;
    }
    scratch.clear();
    scratch.extend_from_slice(deck);
    for _ in 0..shuffles {
        shuffle_once_into(deck, scratch, rand);
        mem::swap(deck, scratch);
    }
}

/// Applies `shuffles` consecutive riffles to a copy of `deck`, each riffle feeding the next.
pub fn shuffle<T: Copy>(deck: &[T], shuffles: u64, rand: &mut impl Rand) -> Vec<T> {
    let mut current = deck.to_vec();
    let mut scratch = Vec::with_capacity(deck.len());
    shuffle_in_place(&mut current, &mut scratch, shuffles, rand);
    current
}
