use super::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// An ActivationType represents the activation
/// function applied by every non-input layer
/// of a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationType {
    // 1 / (1 + exp(-4.9x))
    Sigmoid,
    // x
    Identity,
    // 0   if x < 0
    // x   if x ≥ 0
    ReLU,
    // exp(-x²)
    Gaussian,
    // sin(πx)
    Sinusoidal,
    // tanh(x)
    Tanh,
}

/// Configuration data for network generation
/// and weight inheritance.
///
/// Every network built from the same settings
/// shares one topology: an input layer, `hidden_layer_count`
/// hidden layers of `hidden_layer_size` neurons each, and
/// an output layer, each fully connected to the one before.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Number of neurons in the input layer.
    pub input_count: NonZeroUsize,
    /// Number of hidden layers.
    pub hidden_layer_count: NonZeroUsize,
    /// Number of neurons in each hidden layer.
    pub hidden_layer_size: NonZeroUsize,
    /// Number of neurons in the output layer.
    pub output_count: NonZeroUsize,
    /// Scale of the per-connection perturbation applied
    /// when a child inherits its parent's weights.
    /// Must lie in [0.0, 1.0].
    pub mutation_rate: f64,
    /// Activation function of all hidden and output neurons.
    pub activation: ActivationType,
}

impl NetworkSettings {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. The activation is [`Sigmoid`].
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// [`Sigmoid`]: ActivationType::Sigmoid
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::NetworkSettings;
    /// use std::num::NonZeroUsize;
    ///
    /// let settings = NetworkSettings {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     mutation_rate: 0.1,
    ///     ..NetworkSettings::zero()
    /// };
    /// assert_eq!(settings.layer_sizes(), vec![2, 1, 1]);
    /// ```
    pub const fn zero() -> NetworkSettings {
        NetworkSettings {
            input_count: NonZeroUsize::MIN,
            hidden_layer_count: NonZeroUsize::MIN,
            hidden_layer_size: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            mutation_rate: 0.0,
            activation: ActivationType::Sigmoid,
        }
    }

    /// Checks the values the type system can't.
    ///
    /// # Errors
    /// Returns an error if the mutation rate is
    /// not a finite number in [0.0, 1.0].
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::NetworkSettings;
    ///
    /// let mut settings = NetworkSettings::zero();
    /// assert!(settings.validate().is_ok());
    ///
    /// settings.mutation_rate = 1.5;
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.mutation_rate) {
            Ok(())
        } else {
            Err(ConfigError::MutationRateOutOfRange(self.mutation_rate))
        }
    }

    /// Returns the neuron count of every layer, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_count.get())
            .chain(std::iter::repeat(self.hidden_layer_size.get()).take(self.hidden_layer_count.get()))
            .chain(std::iter::once(self.output_count.get()))
            .collect()
    }

    /// Returns the total number of connections in a
    /// network built from these settings.
    pub fn connection_count(&self) -> usize {
        self.layer_sizes().windows(2).map(|w| w[0] * w[1]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(input: usize, hidden_count: usize, hidden_size: usize, output: usize) -> NetworkSettings {
        NetworkSettings {
            input_count: NonZeroUsize::new(input).unwrap(),
            hidden_layer_count: NonZeroUsize::new(hidden_count).unwrap(),
            hidden_layer_size: NonZeroUsize::new(hidden_size).unwrap(),
            output_count: NonZeroUsize::new(output).unwrap(),
            ..NetworkSettings::zero()
        }
    }

    #[test]
    fn layer_sizes() {
        assert_eq!(settings(2, 1, 3, 1).layer_sizes(), vec![2, 3, 1]);
        assert_eq!(settings(6, 3, 5, 4).layer_sizes(), vec![6, 5, 5, 5, 4]);
    }

    #[test]
    fn connection_count() {
        assert_eq!(settings(2, 1, 3, 1).connection_count(), 9);
        assert_eq!(settings(6, 2, 5, 4).connection_count(), 6 * 5 + 5 * 5 + 5 * 4);
    }

    #[test]
    fn validate_mutation_rate() {
        for rate in [0.0, 0.5, 1.0] {
            let s = NetworkSettings { mutation_rate: rate, ..NetworkSettings::zero() };
            assert!(s.validate().is_ok(), "{}", rate);
        }
        for rate in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let s = NetworkSettings { mutation_rate: rate, ..NetworkSettings::zero() };
            assert!(s.validate().is_err(), "{}", rate);
        }
    }

    #[test]
    fn serde_roundtrip() {
        let s = NetworkSettings {
            mutation_rate: 0.25,
            activation: ActivationType::Tanh,
            ..settings(6, 2, 4, 4)
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<NetworkSettings>(&json).unwrap(), s);
    }

    #[test]
    fn zero_sized_layers_rejected_on_deserialize() {
        let json = r#"{
            "input_count": 0,
            "hidden_layer_count": 1,
            "hidden_layer_size": 1,
            "output_count": 1,
            "mutation_rate": 0.1,
            "activation": "Sigmoid"
        }"#;
        assert!(serde_json::from_str::<NetworkSettings>(json).is_err());
    }
}
