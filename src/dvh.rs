use ndarray::Array1;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DvhError {
    #[error("Histogram contains no dose bins")]
    EmptyHistogram,

    #[error("Histogram bin {index} holds an invalid volume: {value}")]
    InvalidBin { index: usize, value: f64 },
}

/// Cumulative dose volume histogram for a single structure.
///
/// Bin index is the dose in integer dose units (typically cGy), the bin value
/// is the structure volume (cc) receiving *at least* that dose. The histogram
/// is expected to be non-increasing; this is not enforced, but the inverse
/// query is only clinically meaningful on cumulative data.
///
/// Immutable after construction. Queries are pure and never panic, so a
/// `Dvh` can be shared freely across threads once built.
#[derive(Debug)]
pub struct Dvh {
    bins: Array1<f64>,
}

impl Dvh {
    /// Build a DVH from a raw cumulative histogram.
    ///
    /// # Arguments
    ///
    /// * `bins` - Volume (cc) per dose bin, bin 0 first
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram is empty or any bin holds a
    /// negative or non-finite volume.
    pub fn new(bins: impl Into<Array1<f64>>) -> Result<Self, DvhError> {
        let bins = bins.into();
        if bins.is_empty() {
            return Err(DvhError::EmptyHistogram);
        }
        if let Some((index, &value)) = bins
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(DvhError::InvalidBin { index, value });
        }
        Ok(Self { bins })
    }

    /// Last valid dose bin index
    pub fn max_dose(&self) -> usize {
        self.bins.len() - 1
    }

    /// Volume at dose 0, the total structure volume as recorded in the histogram
    pub fn max_volume(&self) -> f64 {
        self.bins[0]
    }

    /// Get a reference to the underlying histogram
    pub fn bins(&self) -> &Array1<f64> {
        &self.bins
    }

    /// The histogram re-expressed as (dose, volume) pairs for plotting
    pub fn curve(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .map(|(dose, &volume)| (dose as f64, volume))
    }

    /// Percentage (0-100) of the structure volume receiving at least `dose`.
    ///
    /// `dose` need not be an integer; values between bins are linearly
    /// interpolated. Doses outside `[0, max_dose]` are clamped, so a negative
    /// dose yields 100% and a dose past the last bin yields the last bin's
    /// volume. A histogram with zero total volume yields 0 for every dose.
    pub fn volume_constraint(&self, dose: f64) -> f64 {
        let max_volume = self.max_volume();
        if max_volume <= 0.0 {
            return 0.0;
        }
        let dose = if dose.is_nan() {
            0.0
        } else {
            dose.clamp(0.0, self.max_dose() as f64)
        };

        let bin = dose.floor() as usize;
        let frac = dose - bin as f64;
        let volume = if frac == 0.0 {
            self.bins[bin]
        } else {
            let upper = self.bins[bin];
            let lower = self.bins[bin + 1];
            upper + frac * (lower - upper)
        };

        // Divide first: the full volume must come out as exactly 100%.
        volume / max_volume * 100.0
    }

    /// Absolute volume (cc) receiving at least `dose`, scaled to the
    /// structure's true physical volume `total_volume_cc`.
    pub fn volume_constraint_cc(&self, dose: f64, total_volume_cc: f64) -> f64 {
        self.volume_constraint(dose) * total_volume_cc / 100.0
    }

    /// Minimum dose received by at least `volume_percent` of the structure
    /// volume, the inverse of [`volume_constraint`](Self::volume_constraint).
    ///
    /// The fractional dose is linearly interpolated within the bin where the
    /// cumulative volume crosses the target. Where the histogram is flat at
    /// exactly the target volume, the lowest dose satisfying the constraint
    /// is returned; in particular a target at or above the total volume
    /// yields 0. A target below the volume at the last bin is never reached
    /// within the recorded dose range and yields `max_dose`.
    pub fn dose_constraint(&self, volume_percent: f64) -> f64 {
        let max_volume = self.max_volume();
        if max_volume <= 0.0 {
            return 0.0;
        }
        // Divide first so 100% maps to exactly the full volume.
        let target = volume_percent / 100.0 * max_volume;
        if target >= max_volume {
            return 0.0;
        }

        // First bin transition dropping to or below the target. The previous
        // bin is always above the target here, so the divisor is non-zero.
        for bin in 0..self.max_dose() {
            let upper = self.bins[bin];
            let lower = self.bins[bin + 1];
            if lower <= target {
                return bin as f64 + (upper - target) / (upper - lower);
            }
        }

        self.max_dose() as f64
    }
}
