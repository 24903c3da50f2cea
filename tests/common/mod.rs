use tick_stats::Statistic;

/// Reduced statistic carrying only a sum and the most recent value.
///
/// Exercises the generic aggregation path without the full summary.
#[derive(Clone, Debug, PartialEq)]
pub struct SumLast {
    pub sum: f64,
    pub last: f64,
}

impl Statistic for SumLast {
    fn create(value: f64) -> Self {
        Self {
            sum: value,
            last: value,
        }
    }

    fn merge(&mut self, later: &Self) {
        self.sum += later.sum;
        self.last = later.last;
    }
}
