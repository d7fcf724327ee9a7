use std::f64::consts::PI;

// Field geometry defaults (degrees)
pub const DEFAULT_INCLINATION_DEG: f64 = 45.0;
pub const DEFAULT_DECLINATION_DEG: f64 = 45.0;
pub const DEFAULT_AZIMUTH_DEG: f64 = 90.0; // ridge azimuth relative to north
pub const DEFAULT_OBLIQUITY_DEG: f64 = 0.0;

// Magnetized layer defaults
pub const DEFAULT_THICKNESS_KM: f64 = 0.5;
pub const DEFAULT_MAGNETIZATION_A_PER_M: f64 = 10.0;
pub const DEFAULT_SUSCEPTIBILITY: f64 = 0.001;

/// The edge formulas are written for cgs units; k_cgs = 4π k_si.
pub const CGS_SUSCEPTIBILITY_FACTOR: f64 = 4.0 * PI;

// Bathymetry is padded on both sides to keep the truncated ends of the
// model from producing edge anomalies.
pub const EDGE_PADDING_KM: f64 = 20.0;
pub const EDGE_PADDING_STEP_KM: f64 = 1.0;

/// Smallest radius fed to the log-ratio terms of the forward model.
pub const RADIUS_EPSILON_KM: f64 = 1.0e-9;

/// cos(obliquity) below this leaves no usable cross-ridge component.
pub const MIN_OBLIQUITY_COSINE: f64 = 1.0e-6;
