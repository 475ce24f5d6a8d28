//! Action-value table for tabular Q-learning

use std::{collections::HashMap, hash::Hash};

/// Sparse mapping from `(state, action)` pairs to estimated values
///
/// Unseen pairs are worth 0. Entries are never evicted, so the table grows
/// with the number of distinct pairs an agent has learned about.
#[derive(Debug, Clone)]
pub struct ActionValueTable<S, A> {
    values: HashMap<S, HashMap<A, f64>>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl<S, A> ActionValueTable<S, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    /// Create an empty table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Value of a state-action pair, 0 if never set
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set the value of a state-action pair
    pub fn set(&mut self, state: &S, action: &A, value: f64) {
        self.values
            .entry(state.clone())
            .or_default()
            .insert(action.clone(), value);
    }

    /// Maximum value over `actions` in `state`, `None` if `actions` is empty
    pub fn max_value(&self, state: &S, actions: &[A]) -> Option<f64> {
        actions
            .iter()
            .map(|action| self.get(state, action))
            .reduce(f64::max)
    }

    /// First action of `actions` holding the greatest value
    ///
    /// Callers that want random tie-breaking shuffle `actions` first.
    pub fn greedy_action(&self, state: &S, actions: Vec<A>) -> Option<A> {
        let mut best: Option<(A, f64)> = None;
        for action in actions {
            let value = self.get(state, &action);
            match &best {
                Some((_, best_value)) if *best_value >= value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Bellman update toward the value of the next state
    ///
    /// Q(s,a) ← Q(s,a) + r + α[γ V(s') - Q(s,a)]
    ///
    /// The reward is added unscaled, so repeated updates settle at
    /// `γ V(s') + r / α`.
    pub fn bellman_update(&mut self, state: &S, action: &A, reward: f64, next_value: f64) {
        let current = self.get(state, action);
        let updated =
            current + reward + self.learning_rate * (self.discount_factor * next_value - current);
        self.set(state, action, updated);
    }

    /// Number of stored state-action pairs
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every stored `(state, action, value)`
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A, f64)> {
        self.values.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(action, &value)| (state, action, value))
        })
    }

    /// Forget every learned value
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
