// Default canvas parameters
pub const CANVAS_WIDTH: usize = 1280;
pub const CANVAS_HEIGHT: usize = 1024;
pub const OUT_FILE: &str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Vectors shorter than this cannot be normalized
pub const NORMALIZE_EPSILON: f64 = 1e-6;

// Offset applied along the normal before casting shadow rays
pub const SHADOW_EPSILON: f64 = 1e-4;

// Per-command step sizes
pub const ANGULAR_STEP_DEGREES: f64 = 1.0;
pub const LINEAR_STEP: f64 = 0.1;
