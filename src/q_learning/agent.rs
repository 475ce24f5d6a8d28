//! Q-learning agent
//!
//! Chooses ε-greedily from an [`ActionValueTable`] and learns with the
//! Bellman update whenever the trainer reports what followed its last move.

use rand::{
    Rng, SeedableRng,
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Agent, Game},
    q_learning::action_values::ActionValueTable,
};

/// Hyperparameters of a [`QAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QAgentConfig {
    /// α: weight of the temporal-difference error
    pub learning_rate: f64,
    /// ε: probability of a uniformly random legal action
    pub explore_chance: f64,
    /// γ: weight of the next state's value
    pub discount_factor: f64,
}

impl Default for QAgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            explore_chance: 0.1,
            discount_factor: 0.9,
        }
    }
}

impl QAgentConfig {
    pub fn with_explore_chance(mut self, explore_chance: f64) -> Self {
        self.explore_chance = explore_chance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_probability("explore chance", self.explore_chance)?;
        validate_probability("discount factor", self.discount_factor)?;
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::config(format!(
                "learning rate {} must be positive and finite",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::config(format!("{name} {value} must lie in [0, 1]")));
    }
    Ok(())
}

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent
///
/// Works with any [`Game`]: states and actions are only used as table keys.
pub struct QAgent<G: Game> {
    id: String,
    table: ActionValueTable<G::State, G::Action>,
    explore_chance: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<G: Game> QAgent<G> {
    /// Create an agent with the default hyperparameters
    /// (α = 0.1, ε = 0.1, γ = 0.9).
    pub fn new(id: impl Into<String>) -> Self {
        let config = QAgentConfig::default();
        Self {
            id: id.into(),
            table: ActionValueTable::new(config.learning_rate, config.discount_factor),
            explore_chance: config.explore_chance,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Create an agent from validated hyperparameters
    pub fn from_config(id: impl Into<String>, config: QAgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: id.into(),
            table: ActionValueTable::new(config.learning_rate, config.discount_factor),
            explore_chance: config.explore_chance,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_explore_chance(mut self, explore_chance: f64) -> Self {
        self.explore_chance = explore_chance;
        self
    }

    /// The learned action values
    pub fn table(&self) -> &ActionValueTable<G::State, G::Action> {
        &self.table
    }

    /// Mutable access to the learned values, for seeding or surgery
    pub fn table_mut(&mut self) -> &mut ActionValueTable<G::State, G::Action> {
        &mut self.table
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl<G: Game> Agent<G> for QAgent<G> {
    fn id(&self) -> &str {
        &self.id
    }

    fn choose_action(&mut self, game: &G, state: &G::State) -> Result<G::Action> {
        let mut actions = game.actions(state);
        if actions.is_empty() {
            return Err(Error::NoLegalActions {
                state: format!("{state:?}"),
            });
        }

        if self.rng.random::<f64>() < self.explore_chance {
            // Explore: random action
            if let Some(action) = actions.choose(&mut self.rng) {
                return Ok(action.clone());
            }
        }

        // Exploit: shuffling first makes ties between equal values uniform.
        actions.shuffle(&mut self.rng);
        self.table
            .greedy_action(state, actions)
            .ok_or_else(|| Error::NoLegalActions {
                state: format!("{state:?}"),
            })
    }

    fn value(&self, game: &G, state: &G::State) -> Result<f64> {
        Ok(self
            .table
            .max_value(state, &game.actions(state))
            .unwrap_or(0.0))
    }

    fn update_action_value(
        &mut self,
        game: &G,
        old_state: &G::State,
        action: &G::Action,
        new_state: &G::State,
        reward: f64,
    ) -> Result<()> {
        let next_value = self.value(game, new_state)?;
        self.table
            .bellman_update(old_state, action, reward, next_value);
        Ok(())
    }

    fn explore_chance(&self) -> f64 {
        self.explore_chance
    }

    fn set_explore_chance(&mut self, explore_chance: f64) {
        self.explore_chance = explore_chance;
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::games::Countdown;

    fn greedy_agent(seed: u64) -> QAgent<Countdown> {
        QAgent::new("A").with_explore_chance(0.0).with_seed(seed)
    }

    #[test]
    fn test_terminal_value_is_zero() {
        let game = Countdown::new(20);
        let mut agent = greedy_agent(1);
        agent.table_mut().set(&0, &1, 5.0);
        assert_eq!(agent.value(&game, &0).unwrap(), 0.0);
    }

    #[test]
    fn test_value_is_max_over_legal_actions() {
        let game = Countdown::new(20);
        let mut agent = greedy_agent(1);
        agent.table_mut().set(&5, &3, -1.0);
        agent.table_mut().set(&5, &2, -0.5);
        agent.table_mut().set(&5, &1, -2.0);
        assert_eq!(agent.value(&game, &5).unwrap(), -0.5);

        // Entries for illegal actions do not count.
        agent.table_mut().set(&2, &3, 9.0);
        assert_eq!(agent.value(&game, &2).unwrap(), 0.0);
    }

    #[test]
    fn test_choose_action_without_legal_actions_fails() {
        let game = Countdown::new(20);
        let mut greedy = greedy_agent(2);
        assert!(matches!(
            greedy.choose_action(&game, &0),
            Err(Error::NoLegalActions { .. })
        ));

        let mut explorer: QAgent<Countdown> = QAgent::new("B").with_explore_chance(1.0).with_seed(2);
        assert!(explorer.choose_action(&game, &0).is_err());
    }

    #[test]
    fn test_greedy_choice_follows_table() {
        let game = Countdown::new(20);
        let mut agent = greedy_agent(3);
        agent.table_mut().set(&7, &2, 0.4);
        for _ in 0..20 {
            assert_eq!(agent.choose_action(&game, &7).unwrap(), 2);
        }
    }

    #[test]
    fn test_greedy_ties_resolve_uniformly() {
        let game = Countdown::new(20);
        let mut agent = greedy_agent(11);
        agent.table_mut().set(&9, &3, 0.5);
        agent.table_mut().set(&9, &2, 0.5);
        agent.table_mut().set(&9, &1, 0.1);

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for _ in 0..2000 {
            *counts.entry(agent.choose_action(&game, &9).unwrap()).or_default() += 1;
        }

        assert_eq!(counts.get(&1), None);
        let threes = counts.get(&3).copied().unwrap_or(0);
        let twos = counts.get(&2).copied().unwrap_or(0);
        assert_eq!(threes + twos, 2000);
        assert!((850..=1150).contains(&threes), "3 chosen {threes} times");
    }

    #[test]
    fn test_full_exploration_reaches_every_action() {
        let game = Countdown::new(20);
        let mut agent: QAgent<Countdown> = QAgent::new("A").with_explore_chance(1.0).with_seed(4);
        agent.table_mut().set(&9, &3, 10.0);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(agent.choose_action(&game, &9).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_update_uses_value_of_new_state() {
        let game = Countdown::new(20);
        let mut agent = greedy_agent(5);
        agent.table_mut().set(&3, &3, 2.0);

        agent.update_action_value(&game, &5, &2, &3, 0.0).unwrap();
        // 0 + 0 + 0.1 * (0.9 * 2.0 - 0)
        assert!((agent.table().get(&5, &2) - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_updates_reach_bellman_fixed_point() {
        let game = Countdown::new(20);

        // Without reward the estimate converges to γ V(s').
        let mut agent = greedy_agent(6);
        agent.table_mut().set(&3, &3, 1.0);
        for _ in 0..500 {
            agent.update_action_value(&game, &5, &2, &3, 0.0).unwrap();
        }
        assert!((agent.table().get(&5, &2) - 0.9).abs() < 1e-6);

        // With α = 1 a single step lands on r + γ V(s').
        let config = QAgentConfig {
            learning_rate: 1.0,
            ..QAgentConfig::default()
        };
        let mut agent: QAgent<Countdown> = QAgent::from_config("B", config).unwrap();
        agent.table_mut().set(&3, &3, 1.0);
        for _ in 0..3 {
            agent.update_action_value(&game, &5, &2, &3, 0.5).unwrap();
            assert!((agent.table().get(&5, &2) - 1.4).abs() < 1e-12);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(QAgentConfig::default().validate().is_ok());
        assert!(
            QAgentConfig::default()
                .with_explore_chance(1.5)
                .validate()
                .is_err()
        );
        let config = QAgentConfig {
            learning_rate: 0.0,
            ..QAgentConfig::default()
        };
        assert!(QAgent::<Countdown>::from_config("A", config).is_err());
    }

    #[test]
    fn test_same_seed_same_choices() {
        let game = Countdown::new(20);
        let mut a: QAgent<Countdown> = QAgent::new("A").with_seed(99);
        let mut b: QAgent<Countdown> = QAgent::new("B").with_seed(99);
        for state in (1..=20).rev() {
            assert_eq!(
                a.choose_action(&game, &state).unwrap(),
                b.choose_action(&game, &state).unwrap()
            );
        }
    }
}
