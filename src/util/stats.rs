use std::fmt::Display;

/// Running min / max / average over integer samples (tree depths, node counts).
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

impl Stats {
    pub fn add_sample(&mut self, value: usize) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.avg += (value as f64 - self.avg) / (self.count as f64);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: usize::MAX,
            max: 0,
            avg: 0.0,
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "no samples")
        } else {
            write!(
                f,
                "{} - {}; avg {:.1}; {} samples",
                self.min, self.max, self.avg, self.count
            )
        }
    }
}
