//! Neural network agent

use std::marker::PhantomData;

use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    neural::{NetworkConfig, NeuralNetwork},
    ports::{Agent, DqnCodec, Game},
    q_learning::agent::{build_rng, validate_probability},
};

/// Hyperparameters of a [`DqnAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnAgentConfig {
    /// Hidden layer width; `None` uses the codec's suggestion
    pub hidden_size: Option<usize>,
    pub explore_chance: f64,
    pub discount_factor: f64,
    /// Gradient descent step size of the network
    pub learning_rate: f64,
    /// Standard deviation of the initial weights
    pub initial_scale: f64,
}

impl Default for DqnAgentConfig {
    fn default() -> Self {
        Self {
            hidden_size: None,
            explore_chance: 0.1,
            discount_factor: 0.9,
            learning_rate: 0.1,
            initial_scale: 0.01,
        }
    }
}

impl DqnAgentConfig {
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = Some(hidden_size);
        self
    }

    pub fn with_explore_chance(mut self, explore_chance: f64) -> Self {
        self.explore_chance = explore_chance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_probability("explore chance", self.explore_chance)?;
        validate_probability("discount factor", self.discount_factor)?;
        if self.hidden_size == Some(0) {
            return Err(Error::config("hidden layer must have at least one unit"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::config(format!(
                "learning rate {} must be positive and finite",
                self.learning_rate
            )));
        }
        if !self.initial_scale.is_finite() || self.initial_scale < 0.0 {
            return Err(Error::config(format!(
                "initial scale {} must be non-negative and finite",
                self.initial_scale
            )));
        }
        Ok(())
    }

    /// Network shape for `codec` with these hyperparameters
    pub fn network_config<G: Game, C: DqnCodec<G>>(&self, codec: &C) -> NetworkConfig {
        let hidden_size = self
            .hidden_size
            .unwrap_or_else(|| codec.suggested_hidden_size());
        NetworkConfig::new(codec.input_size(), hidden_size, codec.output_size())
            .with_learning_rate(self.learning_rate)
            .with_initial_scale(self.initial_scale)
    }
}

/// DQN-style agent: a [`NeuralNetwork`] behind a game-specific [`DqnCodec`]
///
/// Chooses ε-greedily like the tabular agent, but the greedy action is the
/// best legal output of a single forward pass.
pub struct DqnAgent<G: Game, C: DqnCodec<G>> {
    id: String,
    codec: C,
    network: NeuralNetwork,
    explore_chance: f64,
    discount_factor: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
    _game: PhantomData<fn(&G)>,
}

impl<G: Game, C: DqnCodec<G>> DqnAgent<G, C> {
    /// Create an agent with randomly initialised weights.
    pub fn new(id: impl Into<String>, codec: C, config: DqnAgentConfig) -> Result<Self> {
        Self::build(id.into(), codec, config, None)
    }

    /// Create an agent whose initial weights and later random choices all
    /// come from `seed`.
    pub fn seeded(
        id: impl Into<String>,
        codec: C,
        config: DqnAgentConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::build(id.into(), codec, config, Some(seed))
    }

    /// Wrap an existing network.
    ///
    /// The network's input and output sizes must match the codec.
    pub fn from_network(
        id: impl Into<String>,
        codec: C,
        network: NeuralNetwork,
        config: DqnAgentConfig,
    ) -> Result<Self> {
        config.validate()?;
        let expected = (codec.input_size(), codec.output_size());
        let got = (network.input_size(), network.output_size());
        if expected != got {
            return Err(Error::ShapeMismatch {
                operand: "network (inputs, outputs)",
                expected,
                got,
            });
        }
        Ok(Self {
            id: id.into(),
            codec,
            network,
            explore_chance: config.explore_chance,
            discount_factor: config.discount_factor,
            rng: build_rng(None),
            rng_seed: None,
            _game: PhantomData,
        })
    }

    fn build(id: String, codec: C, config: DqnAgentConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let mut rng = build_rng(seed);
        let network = NeuralNetwork::new(config.network_config(&codec), &mut rng)?;
        Ok(Self {
            id,
            codec,
            network,
            explore_chance: config.explore_chance,
            discount_factor: config.discount_factor,
            rng,
            rng_seed: seed,
            _game: PhantomData,
        })
    }

    pub fn with_explore_chance(mut self, explore_chance: f64) -> Self {
        self.explore_chance = explore_chance;
        self
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    fn no_legal_actions(state: &G::State) -> Error {
        Error::NoLegalActions {
            state: format!("{state:?}"),
        }
    }
}

impl<G: Game, C: DqnCodec<G>> Agent<G> for DqnAgent<G, C> {
    fn id(&self) -> &str {
        &self.id
    }

    fn choose_action(&mut self, game: &G, state: &G::State) -> Result<G::Action> {
        let mask = self.codec.action_mask(game, state);
        if !mask.any_legal() {
            return Err(Self::no_legal_actions(state));
        }

        if self.rng.random::<f64>() < self.explore_chance {
            if let Some(action) = game.actions(state).choose(&mut self.rng) {
                return Ok(action.clone());
            }
        }

        let output = self.network.predict(&self.codec.input_vector(game, state))?;
        self.codec
            .action_and_value(game, &output, &mask)
            .map(|(action, _)| action)
            .ok_or_else(|| Self::no_legal_actions(state))
    }

    fn value(&self, game: &G, state: &G::State) -> Result<f64> {
        let mask = self.codec.action_mask(game, state);
        if !mask.any_legal() {
            return Ok(0.0);
        }
        let output = self.network.predict(&self.codec.input_vector(game, state))?;
        Ok(self
            .codec
            .action_and_value(game, &output, &mask)
            .map_or(0.0, |(_, value)| value))
    }

    fn update_action_value(
        &mut self,
        game: &G,
        old_state: &G::State,
        action: &G::Action,
        new_state: &G::State,
        reward: f64,
    ) -> Result<()> {
        // Unmasked: illegal positions of new_state take part in the max.
        let next_output = self
            .network
            .predict(&self.codec.input_vector(game, new_state))?;
        let next_value = next_output
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let target = reward + self.discount_factor * next_value;

        let input = self.codec.input_vector(game, old_state);
        let mut target_vector = self.network.predict(&input)?;
        let index = self.codec.action_index(game, action);
        if index >= target_vector.ncols() {
            return Err(Error::ActionIndexOutOfRange {
                index,
                size: target_vector.ncols(),
            });
        }
        target_vector[[0, index]] = target;

        let costs = self
            .network
            .train(&[input], &[target_vector], 1, &mut self.rng)?;
        trace!(
            "{}: {:?} target {:.4}, cost {:?}",
            self.id, action, target, costs
        );
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
    use ndarray::Array2;

    use super::*;
    use crate::{
        games::{Countdown, CountdownCodec},
        ports::ActionMask,
    };

    fn agent(seed: u64) -> DqnAgent<Countdown, CountdownCodec> {
        let game = Countdown::new(10);
        DqnAgent::seeded("N", game.codec(), DqnAgentConfig::default(), seed)
            .unwrap()
            .with_explore_chance(0.0)
    }

    #[test]
    fn test_network_shape_follows_codec() {
        let agent = agent(1);
        assert_eq!(agent.network().input_size(), 11);
        assert_eq!(agent.network().hidden_size(), 11);
        assert_eq!(agent.network().output_size(), 3);

        let config = DqnAgentConfig::default().with_hidden_size(4);
        let game = Countdown::new(10);
        let agent: DqnAgent<Countdown, CountdownCodec> =
            DqnAgent::seeded("N", game.codec(), config, 1).unwrap();
        assert_eq!(agent.network().hidden_size(), 4);
    }

    #[test]
    fn test_terminal_value_is_zero() {
        let game = Countdown::new(10);
        let agent = agent(2);
        assert_eq!(agent.value(&game, &0).unwrap(), 0.0);
        assert_ne!(agent.value(&game, &7).unwrap(), 0.0);
    }

    #[test]
    fn test_choose_action_without_legal_actions_fails() {
        let game = Countdown::new(10);
        let mut greedy = agent(3);
        assert!(matches!(
            greedy.choose_action(&game, &0),
            Err(Error::NoLegalActions { .. })
        ));
        let mut explorer = agent(3).with_explore_chance(1.0);
        assert!(explorer.choose_action(&game, &0).is_err());
    }

    #[test]
    fn test_greedy_choice_is_legal_argmax() {
        let game = Countdown::new(10);
        let mut agent = agent(4);
        assert_eq!(agent.choose_action(&game, &1).unwrap(), 1);

        let output = agent
            .network()
            .predict(&agent.codec().input_vector(&game, &8))
            .unwrap();
        let (expected, value) = ActionMask::new(vec![true; 3])
            .masked_argmax(output.row(0))
            .unwrap();
        assert_eq!(agent.choose_action(&game, &8).unwrap(), expected as i64 + 1);
        assert_eq!(agent.value(&game, &8).unwrap(), value);
    }

    #[test]
    fn test_update_moves_prediction_toward_target() {
        let game = Countdown::new(10);
        let mut agent = agent(5);
        let input = agent.codec().input_vector(&game, &2);
        let before = agent.network().predict(&input).unwrap();
        let next = agent
            .network()
            .predict(&agent.codec().input_vector(&game, &0))
            .unwrap();
        let target = 1.0 + 0.9 * next.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        agent.update_action_value(&game, &2, &2, &0, 1.0).unwrap();

        let after = agent.network().predict(&input).unwrap();
        assert!((after[[0, 1]] - target).abs() < (before[[0, 1]] - target).abs());
    }

    #[test]
    fn test_repeated_updates_learn_winning_move() {
        let game = Countdown::new(10);
        let config = DqnAgentConfig {
            discount_factor: 0.0,
            explore_chance: 0.0,
            ..DqnAgentConfig::default()
        };
        let mut agent: DqnAgent<Countdown, CountdownCodec> =
            DqnAgent::seeded("N", game.codec(), config, 6).unwrap();
        for _ in 0..300 {
            agent.update_action_value(&game, &2, &2, &0, 1.0).unwrap();
            agent.update_action_value(&game, &2, &1, &1, 0.0).unwrap();
        }
        assert_eq!(agent.choose_action(&game, &2).unwrap(), 2);
    }

    struct MisplacedCodec(CountdownCodec);

    impl DqnCodec<Countdown> for MisplacedCodec {
        fn input_size(&self) -> usize {
            self.0.input_size()
        }

        fn output_size(&self) -> usize {
            self.0.output_size()
        }

        fn input_vector(&self, game: &Countdown, state: &i64) -> Array2<f64> {
            self.0.input_vector(game, state)
        }

        fn action_mask(&self, game: &Countdown, state: &i64) -> ActionMask {
            self.0.action_mask(game, state)
        }

        fn action_and_value(
            &self,
            game: &Countdown,
            output: &Array2<f64>,
            mask: &ActionMask,
        ) -> Option<(i64, f64)> {
            self.0.action_and_value(game, output, mask)
        }

        fn action_index(&self, _game: &Countdown, _action: &i64) -> usize {
            7
        }
    }

    #[test]
    fn test_action_index_out_of_range_is_rejected() {
        let game = Countdown::new(10);
        let mut agent: DqnAgent<Countdown, MisplacedCodec> = DqnAgent::seeded(
            "N",
            MisplacedCodec(game.codec()),
            DqnAgentConfig::default(),
            7,
        )
        .unwrap();
        assert!(matches!(
            agent.update_action_value(&game, &5, &2, &3, 0.0),
            Err(Error::ActionIndexOutOfRange { index: 7, size: 3 })
        ));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = agent(8);
        let b = agent(8);
        assert_eq!(
            a.network().weights_input_hidden(),
            b.network().weights_input_hidden()
        );
        assert_eq!(
            a.network().weights_hidden_output(),
            b.network().weights_hidden_output()
        );
    }

    #[test]
    fn test_from_network_checks_sizes() {
        let game = Countdown::new(10);
        let mut rng = StdRng::seed_from_u64(9);
        let network = NeuralNetwork::new(NetworkConfig::new(4, 2, 3), &mut rng).unwrap();
        let result: Result<DqnAgent<Countdown, CountdownCodec>> =
            DqnAgent::from_network("N", game.codec(), network, DqnAgentConfig::default());
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_config_validation() {
        assert!(DqnAgentConfig::default().validate().is_ok());
        assert!(
            DqnAgentConfig::default()
                .with_hidden_size(0)
                .validate()
                .is_err()
        );
        assert!(
            DqnAgentConfig::default()
                .with_explore_chance(-0.1)
                .validate()
                .is_err()
        );
        let config: DqnAgentConfig = serde_json::from_str(r#"{"hidden_size": 18}"#).unwrap();
        assert_eq!(config.hidden_size, Some(18));
        assert_eq!(config.discount_factor, 0.9);
    }
}
