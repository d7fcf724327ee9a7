pub mod constants;
pub mod error;
pub mod math_utils;
pub mod events;
pub mod timeline;
pub mod displacement;
pub mod jump;
pub mod magnetized_layer;
pub mod faults;
pub mod oblique;
pub mod bathymetry;
pub mod config;
pub mod talwani;
pub mod reconstruction;
pub mod report;

pub use bathymetry::{BathymetryProfile, Track};
pub use config::ModelParams;
pub use error::MagellanError;
pub use events::{EventSources, Polarity};
pub use reconstruction::{Reconstruction, Stage, TrackModel};
