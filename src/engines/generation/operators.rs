use crate::data::AssetCatalog;
use crate::types::{Individual, Strategy};
use rand::Rng;
use rust_decimal::Decimal;

/// Draws below this take the first parent's gene.
pub const FIRST_PARENT_THRESHOLD: f64 = 0.4;

/// Draws below this (and at or above [`FIRST_PARENT_THRESHOLD`]) mutate the gene.
pub const MUTATION_THRESHOLD: f64 = 0.6;

/// Random share count for the asset at `index`, in `[0, floor(budget / price)]`.
///
/// Matches `round(u * max)` for uniform `u`: both endpoints are half as likely
/// as each interior value.
pub fn random_gene<R: Rng>(catalog: &AssetCatalog, index: usize, budget: Decimal, rng: &mut R) -> u64 {
    let max = catalog.max_affordable_shares(index, budget);
    if max == 0 {
        return 0;
    }
    let slot = rng.gen_range(0..max.saturating_mul(2));
    (slot + 1) / 2
}

/// Independent random gene for every asset. The total cost may exceed the
/// budget; the evaluator penalizes that.
pub fn random_strategy<R: Rng>(catalog: &AssetCatalog, budget: Decimal, rng: &mut R) -> Strategy {
    (0..catalog.len())
        .map(|index| random_gene(catalog, index, budget, rng))
        .collect()
}

/// Uniform per-gene recombination: 40% first parent, 20% fresh random gene,
/// 40% second parent.
pub fn mate<R: Rng>(
    parent1: &Strategy,
    parent2: &Strategy,
    catalog: &AssetCatalog,
    budget: Decimal,
    rng: &mut R,
) -> Strategy {
    (0..catalog.len())
        .map(|index| {
            let draw: f64 = rng.gen();
            if draw < FIRST_PARENT_THRESHOLD {
                parent1.gene(index)
            } else if draw < MUTATION_THRESHOLD {
                random_gene(catalog, index, budget, rng)
            } else {
                parent2.gene(index)
            }
        })
        .collect()
}

/// Pick a parent uniformly at random, with replacement. `pool` must not be empty.
pub fn select_parent<'a, R: Rng>(pool: &'a [Individual], rng: &mut R) -> &'a Individual {
    &pool[rng.gen_range(0..pool.len())]
}
