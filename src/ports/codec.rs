//! Codec port - how a game is presented to a neural network

use ndarray::{Array2, ArrayView1};

use crate::ports::Game;

/// Legal-action mask over the network's output positions.
///
/// `true` marks a position whose action is legal in the masked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMask {
    legal: Vec<bool>,
}

impl ActionMask {
    /// Wrap a per-position legality vector.
    pub fn new(legal: Vec<bool>) -> Self {
        Self { legal }
    }

    /// A mask of `size` positions where only `indices` are legal.
    ///
    /// Indices outside `0..size` are ignored.
    pub fn from_legal_indices(size: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut legal = vec![false; size];
        for index in indices {
            if let Some(slot) = legal.get_mut(index) {
                *slot = true;
            }
        }
        Self { legal }
    }

    pub fn len(&self) -> usize {
        self.legal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legal.is_empty()
    }

    pub fn is_legal(&self, index: usize) -> bool {
        self.legal.get(index).copied().unwrap_or(false)
    }

    /// True if at least one position is legal.
    pub fn any_legal(&self) -> bool {
        self.legal.iter().any(|&legal| legal)
    }

    /// Index and value of the largest legal output.
    ///
    /// The first maximum wins ties. Returns `None` when nothing is legal.
    pub fn masked_argmax(&self, output: ArrayView1<'_, f64>) -> Option<(usize, f64)> {
        output
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.is_legal(index))
            .fold(None, |best, (index, &value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((index, value)),
            })
    }
}

/// Encoding of one game's states and actions for a network of fixed shape.
///
/// Supplied per game integration. Only the neural agent needs it, so games
/// that are only ever played by tabular agents never implement it.
pub trait DqnCodec<G: Game> {
    /// Length of the encoded state vector (network input size).
    fn input_size(&self) -> usize;

    /// Number of action positions (network output size).
    fn output_size(&self) -> usize;

    /// Hidden layer width used when the agent configuration leaves it open.
    ///
    /// # Default Implementation
    ///
    /// Same width as the input layer.
    fn suggested_hidden_size(&self) -> usize {
        self.input_size()
    }

    /// Encode `state` as a `(1, input_size)` row vector.
    fn input_vector(&self, game: &G, state: &G::State) -> Array2<f64>;

    /// Which output positions are legal actions in `state`.
    fn action_mask(&self, game: &G, state: &G::State) -> ActionMask;

    /// Best legal action encoded in a `(1, output_size)` network output, with its value.
    ///
    /// Returns `None` when the mask has no legal position.
    fn action_and_value(
        &self,
        game: &G,
        output: &Array2<f64>,
        mask: &ActionMask,
    ) -> Option<(G::Action, f64)>;

    /// Output position that `action` is encoded at.
    fn action_index(&self, game: &G, action: &G::Action) -> usize;
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_masked_argmax_skips_illegal_maximum() {
        let mask = ActionMask::from_legal_indices(4, [0, 2, 3]);
        let output = array![1.1, 20.0, 3.0, 2.5];
        assert_eq!(mask.masked_argmax(output.view()), Some((2, 3.0)));
    }

    #[test]
    fn test_masked_argmax_first_maximum_wins() {
        let mask = ActionMask::new(vec![true, true, true]);
        let output = array![0.5, 0.5, 0.1];
        assert_eq!(mask.masked_argmax(output.view()), Some((0, 0.5)));
    }

    #[test]
    fn test_fully_illegal_mask() {
        let mask = ActionMask::from_legal_indices(3, []);
        assert!(!mask.any_legal());
        assert_eq!(mask.masked_argmax(array![1.0, 2.0, 3.0].view()), None);
    }

    #[test]
    fn test_out_of_range_indices_ignored() {
        let mask = ActionMask::from_legal_indices(2, [1, 7]);
        assert_eq!(mask.len(), 2);
        assert!(mask.is_legal(1));
        assert!(!mask.is_legal(7));
    }
}
