//! Benchmark workloads and a sample consumer for dynarray.
//!
//! - [`filled`]: container of `0..n` grown from a small initial capacity
//! - [`index_sequence`]: deterministic pseudo-random indices for insert/remove
//! - [`RoundStats`] / [`simulate_rounds`]: per-round history of a small
//!   farming simulation, stored in a [`DynamicArray`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dynarray::{ArrayConfig, ArrayError, DynamicArray};
use tracing::info;

/// Container holding `0..n`, started at capacity 1 so it grows repeatedly.
pub fn filled(n: u64) -> DynamicArray<u64> {
    let mut array = DynamicArray::with_capacity(1).expect("capacity 1 is valid");
    for i in 0..n {
        array.append(i);
    }
    array
}

/// `count` indices where the i-th lies in `[0, start_len + i]`.
///
/// Valid insert positions for a container that starts at `start_len` and
/// gains one element per index. Linear congruential, so the same seed always
/// yields the same sequence.
pub fn index_sequence(count: usize, start_len: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..count)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) as usize) % (start_len + i + 1)
        })
        .collect()
}

/// Outcome of one simulated round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundStats {
    pub round: u32,
    pub population: i32,
    pub land: i32,
    pub wheat: i32,
    pub starved: i32,
}

/// Run `rounds` rounds of a deterministic farming loop and record each one.
///
/// Every round the settlement sows half its land, eats 20 wheat per person
/// and buys land with any surplus above a 1000-wheat reserve. Quantities
/// saturate at `i32::MAX` instead of overflowing on long runs. The history
/// starts at capacity 2 so long runs exercise growth.
pub fn simulate_rounds(rounds: u32, seed: u64) -> Result<DynamicArray<RoundStats>, ArrayError> {
    let mut history = DynamicArray::with_config(ArrayConfig::new(2).with_growth_factor(1.5))?;
    let mut state = RoundStats {
        round: 0,
        population: 100,
        land: 1000,
        wheat: 2800,
        starved: 0,
    };
    let yields = index_sequence(rounds as usize, 5, seed);

    for (round, roll) in (1..=rounds).zip(yields) {
        let per_acre = 1 + (roll % 6) as i32;
        let harvest = (state.land / 2).saturating_mul(per_acre);
        let demand = state.population.saturating_mul(20);
        let available = state.wheat.saturating_add(harvest);
        let eaten = demand.min(available);
        let starved = (demand - eaten) / 20;
        let mut wheat = available - eaten;
        let bought = ((wheat - 1000).max(0)) / 25;
        wheat -= bought * 25;

        state = RoundStats {
            round,
            population: (state.population - starved)
                .saturating_add(state.population / 20)
                .max(0),
            land: state.land.saturating_add(bought),
            wheat,
            starved,
        };
        history.append(state);
    }

    info!(
        rounds,
        capacity = history.capacity(),
        "simulated round history"
    );
    Ok(history)
}
