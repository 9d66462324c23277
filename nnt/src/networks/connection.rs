use std::fmt;

/// A weighted edge from a neuron in the
/// previous layer, identified by its index.
#[derive(Clone, Copy, PartialEq)]
pub struct Connection {
    pub(super) source: usize,
    pub(super) weight: f64,
}

impl Connection {
    /// Creates a new Connection from the specified
    /// source neuron with the given weight.
    pub fn new(source: usize, weight: f64) -> Connection {
        Connection { source, weight }
    }

    /// Returns the index of the source neuron
    /// in the previous layer.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the connection's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.source, self.weight)
    }
}
