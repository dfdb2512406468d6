//! Configuration primitives for the MAX31856 driver.

use crate::params::{
    Averaging,
    ConversionMode,
    NoiseFilter,
    OpenCircuitDetection,
    ThermocoupleType,
};

/// User-facing configuration for the MAX31856 converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Thermocouple type selection.
    pub thermocouple_type: ThermocoupleType,
    /// Samples averaged per conversion.
    pub averaging: Averaging,
    /// Mains noise rejection filter.
    pub noise_filter: NoiseFilter,
    /// Open-circuit fault detection mode.
    pub open_circuit: OpenCircuitDetection,
    /// Conversion scheduling mode applied last.
    pub conversion_mode: ConversionMode,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the thermocouple type.
    pub fn thermocouple_type(mut self, thermocouple_type: ThermocoupleType) -> Self {
        self.config.thermocouple_type = thermocouple_type;
        self
    }

    /// Overrides the averaging mode.
    pub fn averaging(mut self, averaging: Averaging) -> Self {
        self.config.averaging = averaging;
        self
    }

    /// Overrides the noise rejection filter.
    pub fn noise_filter(mut self, noise_filter: NoiseFilter) -> Self {
        self.config.noise_filter = noise_filter;
        self
    }

    /// Overrides the open-circuit detection mode.
    pub fn open_circuit(mut self, open_circuit: OpenCircuitDetection) -> Self {
        self.config.open_circuit = open_circuit;
        self
    }

    /// Selects one-shot or continuous conversions.
    pub fn conversion_mode(mut self, conversion_mode: ConversionMode) -> Self {
        self.config.conversion_mode = conversion_mode;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thermocouple_type: ThermocoupleType::K,
            averaging: Averaging::Samples1,
            noise_filter: NoiseFilter::Hz60,
            open_circuit: OpenCircuitDetection::Disabled,
            conversion_mode: ConversionMode::OneShot,
        }
    }
}
