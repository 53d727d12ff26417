// src/perf/stats.rs

/// Two-sided 95% Student t critical values for 1..=30 degrees of freedom.
const T_TABLE: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];
const T_INFINITY: f64 = 1.96;

fn t_critical(degrees_of_freedom: usize) -> f64 {
    match degrees_of_freedom {
        0 => 0.0,
        df if df <= T_TABLE.len() => T_TABLE[df - 1],
        _ => T_INFINITY,
    }
}

/// Summary statistics over per-iteration timings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub samples: usize,
    pub mean: f64,
    /// Sample standard deviation.
    pub deviation: f64,
    /// Standard error of the mean.
    pub sem: f64,
    /// Margin of error at 95% confidence.
    pub moe: f64,
    /// Relative margin of error, in percent of the mean.
    pub rme: f64,
}

impl Stats {
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let deviation = variance.sqrt();
        let sem = deviation / (n as f64).sqrt();
        let moe = sem * t_critical(n - 1);
        let rme = if mean > 0.0 { moe / mean * 100.0 } else { 0.0 };

        Some(Self {
            samples: n,
            mean,
            deviation,
            sem,
            moe,
            rme,
        })
    }

    pub fn ops_per_sec(&self) -> f64 {
        if self.mean > 0.0 { 1.0 / self.mean } else { f64::INFINITY }
    }
}
