use crate::types::Fitness;
use std::collections::VecDeque;

/// Best fitness of the most recent generations, oldest first.
#[derive(Debug, Clone)]
pub struct StagnationWindow {
    values: VecDeque<Fitness>,
    capacity: usize,
}

impl StagnationWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::new(),
            capacity,
        }
    }

    /// Record a generation's best fitness, evicting the oldest entry when full.
    pub fn push(&mut self, fitness: Fitness) {
        self.values.push_back(fitness);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn oldest(&self) -> Option<Fitness> {
        self.values.front().copied()
    }

    pub fn newest(&self) -> Option<Fitness> {
        self.values.back().copied()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// Full window whose oldest and newest entries are equal.
    pub fn is_stagnant(&self) -> bool {
        self.is_full() && self.oldest() == self.newest()
    }

    /// Stop when the newest best is ideal or the search has stagnated.
    pub fn is_converged(&self) -> bool {
        self.newest().is_some_and(|f| f.is_ideal()) || self.is_stagnant()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fitness> {
        self.values.iter()
    }
}
