//! Filtering algorithms for sensor data

/// A generic filter interface
pub trait Filter<T> {
    /// Feed one sample and return the filtered value
    fn filter(&mut self, input: T) -> T;

    /// Current filter output without feeding a sample
    fn value(&self) -> T;
}

/// Single-pole exponential low-pass filter
///
/// `alpha` is the weight of each new sample: `1.0` passes input straight
/// through, `0.0` freezes the output.
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    alpha: f64,
    state: f64,
}

impl LowPassFilter {
    /// Create a new filter seeded with `initial`
    pub fn new(alpha: f64, initial: f64) -> Self {
        LowPassFilter {
            alpha: alpha.clamp(0.0, 1.0),
            state: initial,
        }
    }

    /// Smoothing factor in use
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Overwrite the filter state
    pub fn reset(&mut self, value: f64) {
        self.state = value;
    }
}

impl Filter<f64> for LowPassFilter {
    fn filter(&mut self, input: f64) -> f64 {
        self.state += self.alpha * (input - self.state);
        self.state
    }

    fn value(&self) -> f64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn converges_toward_constant_input() {
        let mut lpf = LowPassFilter::new(0.08, 12.0);
        for _ in 0..200 {
            lpf.filter(10.0);
        }
        assert_abs_diff_eq!(lpf.value(), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn single_step_matches_blend() {
        let mut lpf = LowPassFilter::new(0.25, 0.0);
        assert_abs_diff_eq!(lpf.filter(4.0), 1.0);
        assert_abs_diff_eq!(lpf.filter(4.0), 1.75);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(LowPassFilter::new(3.0, 0.0).alpha(), 1.0);
        assert_eq!(LowPassFilter::new(-1.0, 0.0).alpha(), 0.0);
    }
}
