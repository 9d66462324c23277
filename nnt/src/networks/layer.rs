use super::{compute_activation, ActivationType, Connection};

/// A single unit of a layer. Holds the value computed
/// during the latest forward pass, and its incoming connections.
#[derive(Clone, Debug, PartialEq)]
pub struct Neuron {
    pub(super) value: f64,
    pub(super) connections: Box<[Connection]>,
}

impl Neuron {
    fn new() -> Neuron {
        Neuron {
            value: 0.0,
            connections: Box::new([]),
        }
    }

    /// Returns the value computed during the latest forward pass.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the neuron's incoming connections,
    /// ordered by source index.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Weighted sum of the connected neurons' values.
    fn input_sum(&self, previous: &Layer) -> f64 {
        self.connections
            .iter()
            .map(|c| c.weight * previous.neurons[c.source].value)
            .sum()
    }
}

/// An ordered, fixed-size sequence of neurons.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub(super) neurons: Box<[Neuron]>,
}

impl Layer {
    /// Creates an unconnected layer of `size` neurons.
    pub(super) fn new(size: usize) -> Layer {
        Layer {
            neurons: (0..size).map(|_| Neuron::new()).collect(),
        }
    }

    /// Fully connects every neuron in this layer to
    /// every neuron in `previous`, with zero weights.
    pub(super) fn connect_to(&mut self, previous: &Layer) {
        for neuron in self.neurons.iter_mut() {
            neuron.connections = (0..previous.len()).map(|i| Connection::new(i, 0.0)).collect();
        }
    }

    /// Assigns values directly, without activation.
    /// The caller guarantees `values` matches the layer size.
    pub(super) fn set_values(&mut self, values: &[f64]) {
        for (neuron, value) in self.neurons.iter_mut().zip(values) {
            neuron.value = *value;
        }
    }

    /// Recomputes every neuron's value from the
    /// values currently held by `previous`.
    pub(super) fn feed_forward(&mut self, previous: &Layer, activation: ActivationType) {
        for neuron in self.neurons.iter_mut() {
            neuron.value = compute_activation(neuron.input_sum(previous), activation);
        }
    }

    /// Returns the neurons' current values.
    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::value).collect()
    }

    /// Returns the layer's neurons.
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Returns the number of neurons in the layer.
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Returns whether the layer has no neurons.
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}
