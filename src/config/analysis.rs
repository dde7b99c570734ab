//! Analysis and computation configuration

/// Settings for windowed return derivations
pub struct ReturnSettings {
    // Window length (in samples) for rolling mean-return derivations
    pub default_days_view: usize,
    // Multiplier applied to every return; 1.0 means unlevered
    pub default_leverage: f64,
}

/// Settings for stride (sub-sampled change) transforms
pub struct StrideSettings {
    // Gap between compared samples for percent/absolute change series
    pub default_increment: usize,
}

/// Settings for distribution estimation
pub struct DistributionSettings {
    // Grid resolution per axis for kernel density estimation
    pub default_kde_bins: usize,
    // Quantile of the fitted return distribution a forward projection walks
    pub default_projection_quantile: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub returns: ReturnSettings,
    pub stride: StrideSettings,
    pub distribution: DistributionSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    returns: ReturnSettings {
        default_days_view: 10,
        default_leverage: 1.0,
    },
    stride: StrideSettings {
        default_increment: 5,
    },
    distribution: DistributionSettings {
        default_kde_bins: 64,
        // Median path: symmetric fit makes this the mean drift
        default_projection_quantile: 0.5,
    },
};
