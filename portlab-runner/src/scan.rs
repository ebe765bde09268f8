//! Parameter scanning for grid search.
//!
//! A `ParamScanner` walks one named value axis; a `ConfigScanner` composes
//! several of them into a mixed-radix counter over the Cartesian product and
//! turns each combination into a candidate config through a factory.
//! Exhaustion is signalled by `None`, never by an error.

use portlab_core::config::PredictorConfig;

/// One scan axis: a named, ordered list of candidate values.
#[derive(Debug, Clone)]
pub struct ParamScanner {
    name: String,
    values: Vec<f64>,
    index: usize,
}

impl ParamScanner {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            index: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The value at the cursor, or `None` once the axis is exhausted.
    pub fn current(&self) -> Option<f64> {
        self.values.get(self.index).copied()
    }

    pub fn advance(&mut self) {
        if self.index < self.values.len() {
            self.index += 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.values.len()
    }
}

/// Assembles a candidate config from one value per scan axis, in the order
/// the axes were added.
pub trait CandidateFactory: Send + Sync {
    fn assemble(&self, values: &[f64]) -> Box<dyn PredictorConfig>;
}

impl<F> CandidateFactory for F
where
    F: Fn(&[f64]) -> Box<dyn PredictorConfig> + Send + Sync,
{
    fn assemble(&self, values: &[f64]) -> Box<dyn PredictorConfig> {
        self(values)
    }
}

/// Mixed-radix counter over the product of all scan axes.
///
/// The last-added scanner is the fastest-changing digit: a tick advances it
/// and carries toward the front, resetting every digit that rolled over. No
/// combination is ever visited twice.
pub struct ConfigScanner {
    scanners: Vec<ParamScanner>,
    factory: Box<dyn CandidateFactory>,
    index: usize,
    exhausted: bool,
}

impl ConfigScanner {
    pub fn new(scanners: Vec<ParamScanner>, factory: Box<dyn CandidateFactory>) -> Self {
        let exhausted = scanners.is_empty() || scanners.iter().any(|s| s.size() == 0);
        Self {
            scanners,
            factory,
            index: 0,
            exhausted,
        }
    }

    /// Total number of combinations in the product.
    pub fn size(&self) -> usize {
        if self.scanners.is_empty() {
            return 0;
        }
        self.scanners.iter().map(ParamScanner::size).product()
    }

    /// Number of combinations ticked past so far.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Progress through the product, in whole percent.
    pub fn percent(&self) -> usize {
        let size = self.size();
        if size == 0 {
            return 100;
        }
        100 * self.index / size
    }

    pub fn is_done(&self) -> bool {
        self.exhausted
    }

    /// The current combination, one value per axis, or `None` when exhausted.
    pub fn current_values(&self) -> Option<Vec<f64>> {
        if self.exhausted {
            return None;
        }
        self.scanners.iter().map(ParamScanner::current).collect()
    }

    /// Tick the counter: advance the last digit, carrying toward the front.
    pub fn advance(&mut self) {
        if self.exhausted {
            return;
        }
        self.index += 1;
        for position in (0..self.scanners.len()).rev() {
            self.scanners[position].advance();
            if !self.scanners[position].is_done() {
                return;
            }
            if position == 0 {
                // The slowest digit rolled over: the product is spent.
                self.exhausted = true;
                return;
            }
            self.scanners[position].reset();
        }
    }

    /// Build candidates until one passes validation, ticking past each
    /// combination exactly once. `None` means the product is exhausted.
    pub fn next_valid(&mut self) -> Option<Box<dyn PredictorConfig>> {
        loop {
            let values = self.current_values()?;
            let candidate = self.factory.assemble(&values);
            self.advance();
            if candidate.is_valid() {
                return Some(candidate);
            }
        }
    }
}
