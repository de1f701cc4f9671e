use riffle::mc::Simulator;
use riffle::{deck, shuffle};
use tinyrand::{Seeded, StdRand};

fn main() {
    // riffle a small deck a few times, watching the cards interleave
    let mut rand = StdRand::seed(2023);
    let mut cards = deck::identity(10);
    println!("unshuffled: {cards:?}");
    for shuffles in 1..=3 {
        cards = shuffle::shuffle_once(&cards, &mut rand);
        println!("after {shuffles}: {cards:?}");
    }

    // how far from uniform is a 52-card deck after each number of riffles?
    for shuffles in 1..=10 {
        let outcome = Simulator::default()
            .with_trials(10_000)
            .with_shuffles(shuffles)
            .with_workers(4)
            .with_seed(shuffles)
            .run()
            .unwrap();
        println!(
            "shuffles: {shuffles:>2}, total variation: {:.4}, top card stays on top: {:.4}",
            outcome.total_variation(),
            outcome.frequencies()[(0, 0)]
        );
    }
}
