//! Round history example.
//!
//! Demonstrates: simulate rounds → store stats in a DynamicArray → read the
//! latest rounds with a reverse cursor → annotate in place with a mutable
//! cursor. Run with `RUST_LOG=trace` to see growth events.

use dynarray::Direction;
use dynarray_bench::simulate_rounds;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Round History Example ===\n");

    let mut history = simulate_rounds(25, 42).unwrap();
    println!(
        "Recorded {} rounds (capacity {}, growth factor {})\n",
        history.len(),
        history.capacity(),
        history.growth_factor()
    );

    println!("Last five rounds:");
    for stats in history.cursor_rev().take(5) {
        println!(
            "  round {:>2}: population {:>4}, land {:>5}, wheat {:>6}, starved {:>3}",
            stats.round, stats.population, stats.land, stats.wheat, stats.starved
        );
    }

    // Cap starvation at 10 per round, in place.
    let mut cursor = history.cursor_mut_from(Direction::Forward);
    let mut capped = 0;
    while cursor.has_more() {
        let stats = cursor.current_mut().unwrap();
        if stats.starved > 10 {
            stats.starved = 10;
            capped += 1;
        }
        cursor.advance().unwrap();
    }
    println!("\nCapped starvation in {capped} rounds");

    let total: i32 = history.iter().map(|s| s.starved).sum();
    println!("Total starved after capping: {total}");
}
