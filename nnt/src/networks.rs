//! A Network is a fixed-topology, fully-connected
//! stack of layers: one input layer, one or more hidden
//! layers, and one output layer, all sharing a single
//! activation function.
//!
//! Networks are stored arena-style: layers own their
//! neurons, neurons own their incoming connections, and
//! connections refer to their source neuron by index. A child
//! network inherits weights from its parent by walking both
//! arenas positionally, so parent and child never alias.
//!
//! Weights are assigned once, when the network is built,
//! and never change afterwards.
mod config;
mod connection;
mod errors;
mod layer;

pub use config::{ActivationType, NetworkSettings};
pub use connection::Connection;
pub use errors::{ConfigError, NetworkError};
pub use layer::{Layer, Neuron};

use rand::Rng;

use std::fmt;
use std::sync::Arc;

/// A fully-connected feedforward neural network.
#[derive(Clone, Debug)]
pub struct Network {
    settings: Arc<NetworkSettings>,
    layers: Box<[Layer]>,
}

impl Network {
    /// Builds a network from the passed settings and
    /// assigns its weights.
    ///
    /// If `parent` is `None`, every weight is drawn uniformly
    /// from [-1, 1]. Otherwise each weight is the corresponding
    /// parent weight, perturbed by [`mutate_weight`] with the
    /// settings' mutation rate.
    ///
    /// # Errors
    /// Returns [`NetworkError::StructuralMismatch`] if the
    /// parent's layer sizes differ from the settings'.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::{Network, NetworkSettings};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let settings = Arc::new(NetworkSettings {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_layer_size: NonZeroUsize::new(3).unwrap(),
    ///     mutation_rate: 0.1,
    ///     ..NetworkSettings::zero()
    /// });
    /// let mut rng = rand::thread_rng();
    ///
    /// let parent = Network::init(Arc::clone(&settings), None, &mut rng).unwrap();
    /// let child = Network::init(settings, Some(&parent), &mut rng).unwrap();
    ///
    /// assert_eq!(child.layer_sizes(), parent.layer_sizes());
    /// assert_eq!(child.connection_count(), 9);
    /// ```
    pub fn init<R: Rng>(
        settings: Arc<NetworkSettings>,
        parent: Option<&Network>,
        rng: &mut R,
    ) -> Result<Network, NetworkError> {
        let mut network = Network::unweighted(settings);
        match parent {
            Some(parent) => network.mutate_weights(parent, rng)?,
            None => network.randomize_weights(rng),
        }
        Ok(network)
    }

    /// Builds a network with uniformly random weights.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::{Network, NetworkSettings};
    /// use std::sync::Arc;
    ///
    /// let network = Network::random(Arc::new(NetworkSettings::zero()), &mut rand::thread_rng());
    /// assert!(network.weights().all(|w| (-1.0..=1.0).contains(&w)));
    /// ```
    pub fn random<R: Rng>(settings: Arc<NetworkSettings>, rng: &mut R) -> Network {
        let mut network = Network::unweighted(settings);
        network.randomize_weights(rng);
        network
    }

    /// Builds a network with the passed weights, in the
    /// order [`Network::weights`] returns them.
    ///
    /// # Errors
    /// Returns [`NetworkError::WeightCount`] if the number of
    /// weights differs from the settings' connection count.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::{ActivationType, Network, NetworkSettings};
    /// use std::sync::Arc;
    ///
    /// let settings = Arc::new(NetworkSettings {
    ///     activation: ActivationType::Identity,
    ///     ..NetworkSettings::zero()
    /// });
    /// let mut network = Network::from_weights(settings, &[0.5, 4.0]).unwrap();
    /// assert_eq!(network.evaluate(&[3.0]).unwrap(), vec![6.0]);
    /// ```
    pub fn from_weights(settings: Arc<NetworkSettings>, weights: &[f64]) -> Result<Network, NetworkError> {
        let mut network = Network::unweighted(settings);
        let expected = network.connection_count();
        if weights.len() != expected {
            return Err(NetworkError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        for (connection, &weight) in network.connections_mut().zip(weights) {
            connection.weight = weight;
        }
        Ok(network)
    }

    /// Builds a network whose weights are mutated from
    /// `parent`'s, sharing its settings.
    pub fn mutated_from<R: Rng>(parent: &Network, rng: &mut R) -> Network {
        let mut network = Network::unweighted(Arc::clone(&parent.settings));
        network.inherit_weights(parent, rng);
        network
    }

    /// Builds the layer chain and wires each layer
    /// to the one before it, with all weights at 0.
    fn unweighted(settings: Arc<NetworkSettings>) -> Network {
        let mut layers: Vec<Layer> = settings
            .layer_sizes()
            .into_iter()
            .map(Layer::new)
            .collect();
        for i in 1..layers.len() {
            let (previous, current) = layers.split_at_mut(i);
            current[0].connect_to(&previous[i - 1]);
        }
        Network {
            settings,
            layers: layers.into(),
        }
    }

    fn randomize_weights<R: Rng>(&mut self, rng: &mut R) {
        for connection in self.connections_mut() {
            connection.weight = rng.gen_range(-1.0..=1.0);
        }
    }

    fn mutate_weights<R: Rng>(&mut self, parent: &Network, rng: &mut R) -> Result<(), NetworkError> {
        let (expected, actual) = (self.layer_sizes(), parent.layer_sizes());
        if expected != actual {
            return Err(NetworkError::StructuralMismatch { expected, actual });
        }
        self.inherit_weights(parent, rng);
        Ok(())
    }

    /// Sets every weight to a mutation of `parent`'s matching weight.
    /// `parent` must have the same topology.
    fn inherit_weights<R: Rng>(&mut self, parent: &Network, rng: &mut R) {
        let mutation_rate = self.settings.mutation_rate;
        for (connection, inherited) in self.connections_mut().zip(parent.connections()) {
            connection.weight = mutate_weight(inherited.weight, mutation_rate, rng.gen_range(-1.0..=1.0));
        }
    }

    /// Feeds `inputs` through the network and returns
    /// the output layer's values.
    ///
    /// Inputs are assigned to the input layer as-is; every
    /// other layer, in order, computes the activation of the
    /// weighted sum of the previous layer's values.
    ///
    /// # Errors
    /// Returns [`NetworkError::InvalidInput`] if the number of
    /// inputs differs from the size of the input layer.
    ///
    /// # Examples
    /// ```
    /// use nnt::networks::{Network, NetworkError, NetworkSettings};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let settings = Arc::new(NetworkSettings {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..NetworkSettings::zero()
    /// });
    /// let mut network = Network::random(settings, &mut rand::thread_rng());
    ///
    /// assert_eq!(network.evaluate(&[1.0, -1.0]).unwrap().len(), 1);
    /// assert_eq!(
    ///     network.evaluate(&[1.0, -1.0, 0.0]),
    ///     Err(NetworkError::InvalidInput { expected: 2, actual: 3 })
    /// );
    /// ```
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        let expected = self.input_count();
        if inputs.len() != expected {
            return Err(NetworkError::InvalidInput {
                expected,
                actual: inputs.len(),
            });
        }

        self.layers[0].set_values(inputs);
        let activation = self.settings.activation;
        for i in 1..self.layers.len() {
            let (previous, current) = self.layers.split_at_mut(i);
            current[0].feed_forward(&previous[i - 1], activation);
        }
        Ok(self.output_layer().values())
    }

    /// Returns the settings the network was built from.
    pub fn settings(&self) -> &Arc<NetworkSettings> {
        &self.settings
    }

    /// Returns all layers, input layer first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the input layer.
    pub fn input_layer(&self) -> &Layer {
        &self.layers[0]
    }

    /// Returns the hidden layers, in feed order.
    pub fn hidden_layers(&self) -> &[Layer] {
        &self.layers[1..self.layers.len() - 1]
    }

    /// Returns the output layer.
    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Returns the size of the input layer.
    pub fn input_count(&self) -> usize {
        self.input_layer().len()
    }

    /// Returns the size of the output layer.
    pub fn output_count(&self) -> usize {
        self.output_layer().len()
    }

    /// Returns the neuron count of every layer, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    /// Returns the total number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections().count()
    }

    /// Returns all weights, ordered by layer,
    /// then neuron, then source neuron.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.connections().map(Connection::weight)
    }

    fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.layers
            .iter()
            .flat_map(|l| l.neurons.iter())
            .flat_map(|n| n.connections.iter())
    }

    fn connections_mut(&mut self) -> impl Iterator<Item = &mut Connection> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.neurons.iter_mut())
            .flat_map(|n| n.connections.iter_mut())
    }
}

/// Perturbs `weight` proportionally to its own magnitude:
/// `weight + weight × mutation_rate × r`, where `r` is
/// expected to lie in [-1, 1].
///
/// A weight of 0 is never changed by mutation.
///
/// # Examples
/// ```
/// use nnt::networks::mutate_weight;
///
/// assert_eq!(mutate_weight(0.5, 0.5, 1.0), 0.75);
/// assert_eq!(mutate_weight(0.5, 0.0, 0.7), 0.5);
/// assert_eq!(mutate_weight(0.0, 1.0, -1.0), 0.0);
/// ```
pub fn mutate_weight(weight: f64, mutation_rate: f64, r: f64) -> f64 {
    weight + weight * (mutation_rate * r)
}

// Applies one of the available functions to the input and returns the output as the result
fn compute_activation(input_sum: f64, activation: ActivationType) -> f64 {
    match activation {
        ActivationType::Sigmoid => 1.0 / (1.0 + (-4.9 * input_sum).exp()),
        ActivationType::Identity => input_sum,
        ActivationType::ReLU => input_sum.max(0.0),
        ActivationType::Gaussian => (-input_sum.powi(2)).exp(),
        ActivationType::Sinusoidal => (input_sum * std::f64::consts::PI).sin(),
        ActivationType::Tanh => input_sum.tanh(),
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network {:?} ({:?})", self.layer_sizes(), self.settings.activation)?;
        for (i, layer) in self.layers.iter().enumerate().skip(1) {
            for (j, neuron) in layer.neurons().iter().enumerate() {
                writeln!(f, "\t{}.{} <- {:?}", i, j, neuron.connections())?;
            }
        }
        Ok(())
    }
}
