use crate::data::AssetCatalog;
use crate::engines::evaluation::build_report;
use crate::engines::generation::{
    operators::{mate, random_strategy, select_parent},
    stagnation::StagnationWindow,
};
use crate::error::{RebalanceError, Result};
use crate::types::{Individual, Strategy, StrategyStats};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::Decimal;

pub struct EvolutionConfig {
    pub population_size: usize,
    pub stop_after_generations_without_improvement: usize,
    pub seed: Option<u64>,
}

/// How every generation after the first is assembled from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Best individuals carried over unchanged, `floor(10% of N)`.
    pub elites: usize,
    /// Children bred each generation, `floor(90% of N)`.
    pub offspring: usize,
    /// Parents are drawn from this many of the best, `floor(50% of N)`.
    pub parent_pool: usize,
}

impl GenerationPlan {
    pub fn for_population(population_size: usize) -> Self {
        let elites = population_size * 10 / 100;
        let mut offspring = population_size * 90 / 100;
        // one-individual populations would otherwise die out after generation 1
        if elites + offspring == 0 {
            offspring = 1;
        }
        let parent_pool = (population_size * 50 / 100).max(1);

        Self {
            elites,
            offspring,
            parent_pool,
        }
    }

    pub fn generation_size(&self) -> usize {
        self.elites + self.offspring
    }
}

/// Final state of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub generation: usize,
    pub best: Individual,
    pub stats: StrategyStats,
    pub investment_limit: Decimal,
}

pub trait ProgressCallback: Send {
    /// Called once per generation that did not end the search.
    fn on_generation_complete(&mut self, generation: usize, best: &Individual);
    /// Called exactly once, after every generation event.
    fn on_search_complete(&mut self, outcome: &SearchOutcome);
    /// Checked between generations.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_complete(&mut self, generation: usize, best: &Individual) {
        (**self).on_generation_complete(generation, best)
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        (**self).on_search_complete(outcome)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

pub struct EvolutionEngine<R = StdRng> {
    config: EvolutionConfig,
    catalog: AssetCatalog,
    budget: Decimal,
    plan: GenerationPlan,
    rng: R,
}

impl EvolutionEngine<StdRng> {
    /// Engine seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: EvolutionConfig, catalog: AssetCatalog, budget: Decimal) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, catalog, budget, rng)
    }
}

impl<R: Rng> EvolutionEngine<R> {
    pub fn with_rng(
        config: EvolutionConfig,
        catalog: AssetCatalog,
        budget: Decimal,
        rng: R,
    ) -> Result<Self> {
        if config.population_size < 1 {
            return Err(RebalanceError::Validation(
                "Population size must be at least 1".to_string(),
            ));
        }
        if config.stop_after_generations_without_improvement < 1 {
            return Err(RebalanceError::Validation(
                "Stop-after generation count must be at least 1".to_string(),
            ));
        }
        if budget <= Decimal::ZERO {
            return Err(RebalanceError::Validation(format!(
                "Investment limit must be positive, found {}",
                budget
            )));
        }
        catalog.check_budget(budget)?;

        let plan = GenerationPlan::for_population(config.population_size);

        Ok(Self {
            config,
            catalog,
            budget,
            plan,
            rng,
        })
    }

    /// Run generations until the best fitness is ideal or stops improving.
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<SearchOutcome> {
        let mut window = StagnationWindow::new(self.config.stop_after_generations_without_improvement);
        let mut generation = 1;
        let mut population = self.initial_generation();

        loop {
            let best = fittest(&population, generation)?;
            window.push(best.fitness());

            debug!(
                "Generation {}: best fitness {}, population {}",
                generation,
                best.fitness(),
                population.len()
            );

            if window.is_converged() {
                break;
            }

            if callback.is_cancelled() {
                info!("Search cancelled after generation {}", generation);
                return Err(RebalanceError::Cancelled(generation));
            }

            callback.on_generation_complete(generation, best);

            generation += 1;
            population = self.next_generation(&population);
        }

        let best = fittest(&population, generation)?.clone();
        let stats = build_report(best.strategy(), &self.catalog);
        let outcome = SearchOutcome {
            generation,
            best,
            stats,
            investment_limit: self.budget,
        };

        info!(
            "Search converged at generation {} with fitness {}",
            outcome.generation,
            outcome.best.fitness()
        );
        callback.on_search_complete(&outcome);

        Ok(outcome)
    }

    /// First generation of random strategies, sorted best first.
    pub fn initial_generation(&mut self) -> Vec<Individual> {
        let strategies: Vec<Strategy> = (0..self.config.population_size)
            .map(|_| random_strategy(&self.catalog, self.budget, &mut self.rng))
            .collect();
        self.evaluate_population(strategies)
    }

    /// Elites of `previous` plus children of its best half, sorted best first.
    ///
    /// `previous` must be sorted ascending by fitness and non-empty.
    pub fn next_generation(&mut self, previous: &[Individual]) -> Vec<Individual> {
        let elites = &previous[..self.plan.elites.min(previous.len())];
        let pool = &previous[..self.plan.parent_pool.min(previous.len())];

        let catalog = &self.catalog;
        let budget = self.budget;
        let rng = &mut self.rng;
        let children: Vec<Strategy> = (0..self.plan.offspring)
            .map(|_| {
                let parent1 = select_parent(pool, rng);
                let parent2 = select_parent(pool, rng);
                mate(parent1.strategy(), parent2.strategy(), catalog, budget, rng)
            })
            .collect();

        let mut next = Vec::with_capacity(self.plan.generation_size());
        next.extend_from_slice(elites);
        next.extend(self.score(children));
        sort_population(&mut next);
        next
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn plan(&self) -> GenerationPlan {
        self.plan
    }

    fn evaluate_population(&self, strategies: Vec<Strategy>) -> Vec<Individual> {
        let mut population = self.score(strategies);
        sort_population(&mut population);
        population
    }

    /// Fitness is pure, so scoring runs in parallel; order is preserved.
    fn score(&self, strategies: Vec<Strategy>) -> Vec<Individual> {
        let catalog = &self.catalog;
        let budget = self.budget;
        strategies
            .into_par_iter()
            .map(|strategy| Individual::evaluated(strategy, catalog, budget))
            .collect()
    }
}

/// Stable ascending sort by fitness.
pub fn sort_population(population: &mut [Individual]) {
    population.sort_by_key(|individual| individual.fitness());
}

fn fittest(population: &[Individual], generation: usize) -> Result<&Individual> {
    population.first().ok_or_else(|| {
        RebalanceError::Worker(format!("Generation {} is empty", generation))
    })
}
