//! Geometric resolution schedule.

/// Per-step decay factor `exp(ln(delta1 / delta0) / steps)`.
///
/// After `steps` multiplications `delta0` would reach `delta1`; the last
/// trial, at index `steps - 1`, runs one factor above it.
pub fn decay_factor(delta0: f64, delta1: f64, steps: usize) -> f64 {
    ((delta1 / delta0).ln() / steps as f64).exp()
}

/// Iterator over `(index, delta)` for every trial of a sweep.
///
/// Deltas are accumulated by repeated multiplication, so `delta_i` equals
/// `delta0 * fac^i` up to rounding.
#[derive(Debug, Clone)]
pub struct Schedule {
    delta: f64,
    factor: f64,
    index: usize,
    steps: usize,
}

impl Schedule {
    /// Schedule of `steps` trials decaying from `delta0` towards `delta1`.
    pub fn new(delta0: f64, delta1: f64, steps: usize) -> Self {
        Self {
            delta: delta0,
            factor: decay_factor(delta0, delta1, steps),
            index: 0,
            steps,
        }
    }

    /// The decay factor applied between trials.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Iterator for Schedule {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.steps {
            return None;
        }
        let item = (self.index, self.delta);
        self.delta *= self.factor;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.steps - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Schedule {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decay_factor() {
        let fac = decay_factor(0.25, 0.01, 100);
        assert_relative_eq!(fac.powi(100), 0.04, max_relative = 1e-12);
        assert!(fac < 1.0);
        assert_eq!(decay_factor(0.1, 0.1, 10), 1.0);
    }

    #[test]
    fn test_schedule_length_and_values() {
        let schedule = Schedule::new(0.25, 0.01, 100);
        let fac = schedule.factor();
        assert_eq!(schedule.len(), 100);
        let deltas: Vec<(usize, f64)> = schedule.collect();
        assert_eq!(deltas.len(), 100);
        assert_eq!(deltas[0], (0, 0.25));
        for &(i, delta) in &deltas {
            assert_relative_eq!(delta, 0.25 * fac.powi(i as i32), max_relative = 1e-12);
        }
        for pair in deltas.windows(2) {
            assert!(pair[1].1 < pair[0].1);
        }
        let last = deltas[99].1;
        assert_relative_eq!(last, 0.01 / fac, max_relative = 1e-12);
    }

    #[test]
    fn test_single_step() {
        let deltas: Vec<_> = Schedule::new(0.5, 0.1, 1).collect();
        assert_eq!(deltas, vec![(0, 0.5)]);
    }

    #[test]
    fn test_constant_schedule() {
        for (_, delta) in Schedule::new(0.2, 0.2, 5) {
            assert_eq!(delta, 0.2);
        }
    }
}
