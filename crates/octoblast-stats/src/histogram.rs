/// One bin of a [`Histogram`]: the half-open value range `[lower, upper)`
/// and the number of samples that fell into it. The final bin is closed at
/// the top so the maximum sample is counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Fixed-width frequency distribution over a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bins values into `num_bins` equal-width intervals spanning the data
    /// range.
    ///
    /// Returns `None` when the dataset is empty or `num_bins` is zero. A
    /// dataset with zero range collapses into a single bin.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if num_bins == 0 {
            return None;
        }
        let values = values.into_iter().collect::<Vec<_>>();
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;

        if max == min {
            return Some(Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                }],
            });
        }

        let width = (max - min) / num_bins as f64;
        let mut bins: Vec<HistogramBin> = (0..num_bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for value in values {
            let index = (((value - min) / width) as usize).min(num_bins - 1);
            bins[index].count += 1;
        }
        Some(Self { bins })
    }

    #[must_use]
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// The largest bin count, for scaling bar renderings.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
