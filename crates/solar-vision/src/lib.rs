//! Vision module - rooftop feature detection, irradiance model and caches

pub mod cache;
pub mod detector;
pub mod irradiance;
pub mod rooftop;
pub mod sample;

// Re-export main types for convenience
pub use cache::{Cache, CacheStats};
pub use detector::{Detection, DetectorKind, NullDetector, ObstructionDetector, VegetationDetector};
pub use irradiance::{clear_sky_irradiance, IrradianceService, SunPosition};
pub use rooftop::{analyze_rooftop, analyze_rooftop_image, MIN_DETECTION_CONFIDENCE, OBSTRUCTION_LABELS};
pub use sample::generate_sample_rooftop_image;
