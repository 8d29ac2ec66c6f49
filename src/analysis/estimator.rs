//! Extreme-weather probability estimation
//!
//! Thresholds are hybrid: temperature extremes sit `1.5 σ` either side of the mean,
//! wind and precipitation extremes at the 90th percentile (linear interpolation),
//! since those two are heavy-tailed and often zero-inflated.
//!
//! Probabilities are in-sample frequencies: the share of the same samples that
//! produced the thresholds lying strictly beyond them. They describe the record,
//! they do not forecast.

use tracing::debug;

use super::stats::{mean, percent_where, quantile_linear, sample_std_dev};
use crate::models::{Averages, ExtremeValues, ProbabilityReport, ProbabilitySummary, SampleSet};

/// Standard deviations between the temperature mean and the hot/cold thresholds
pub const TEMPERATURE_SIGMA_FACTOR: f64 = 1.5;

/// Quantile used for the windy and wet thresholds
pub const TAIL_QUANTILE: f64 = 0.9;

/// Turns a sample set into a probability report
pub struct ProbabilityEstimator;

impl ProbabilityEstimator {
    /// Estimate thresholds, exceedance probabilities and averages.
    ///
    /// Pure: the same sample set always yields the same report. An empty set
    /// yields the no-data report without computing anything.
    #[must_use]
    pub fn estimate(samples: &SampleSet) -> ProbabilityReport {
        if samples.is_empty() {
            debug!("No samples, returning no-data report");
            return ProbabilityReport::no_data();
        }

        let temperatures = samples.temperatures();
        let winds = samples.wind_speeds();
        let precipitation = samples.precipitation();

        let temp_mean = mean(&temperatures);
        let temp_std = sample_std_dev(&temperatures);

        let thresholds = ExtremeValues {
            very_hot: temp_mean + TEMPERATURE_SIGMA_FACTOR * temp_std,
            very_cold: temp_mean - TEMPERATURE_SIGMA_FACTOR * temp_std,
            very_windy: quantile_linear(&winds, TAIL_QUANTILE),
            very_wet: quantile_linear(&precipitation, TAIL_QUANTILE),
        };

        let probabilities = ExtremeValues {
            very_hot: percent_where(&temperatures, |t| t > thresholds.very_hot),
            very_cold: percent_where(&temperatures, |t| t < thresholds.very_cold),
            very_windy: percent_where(&winds, |w| w > thresholds.very_windy),
            very_wet: percent_where(&precipitation, |p| p > thresholds.very_wet),
        };

        let averages = Averages {
            temperature: temp_mean,
            wind: mean(&winds),
            precipitation: mean(&precipitation),
        };

        debug!(
            samples = samples.len(),
            hot = thresholds.very_hot,
            cold = thresholds.very_cold,
            "Computed thresholds"
        );

        ProbabilityReport::Summary(ProbabilitySummary {
            message: Self::format_message(&averages, &thresholds, &probabilities),
            probabilities,
            averages,
            thresholds,
        })
    }

    /// Human-readable narrative. Every number is rendered with one decimal.
    fn format_message(
        averages: &Averages,
        thresholds: &ExtremeValues,
        probabilities: &ExtremeValues,
    ) -> String {
        format!(
            "🌡️ Historical average temperature: {:.1}°C\n\
             💨 Average wind speed: {:.1} m/s\n\
             🌧️ Average precipitation: {:.1} mm/day\n\n\
             Probabilities for this day based on historical data:\n\
             🔥 Very hot: {:.1}% (>{:.1}°C)\n\
             ❄️ Very cold: {:.1}% (<{:.1}°C)\n\
             💨 Very windy: {:.1}% (>{:.1} m/s)\n\
             🌧️ Very wet: {:.1}% (>{:.1} mm/day)",
            averages.temperature,
            averages.wind,
            averages.precipitation,
            probabilities.very_hot,
            thresholds.very_hot,
            probabilities.very_cold,
            thresholds.very_cold,
            probabilities.very_windy,
            thresholds.very_windy,
            probabilities.very_wet,
            thresholds.very_wet,
        )
    }
}
