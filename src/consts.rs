// Canvas defaults
pub const CANVAS_WIDTH: usize = 600;
pub const CANVAS_HEIGHT: usize = 600;
pub const OUT_FILE: &str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset for secondary rays leaving a surface, avoids self-intersection
pub const SURFACE_EPSILON: f64 = 0.001;

// Primary rays only see what lies beyond the viewport
pub const PRIMARY_T_MIN: f64 = 1.0;

// Viewport, one unit in front of the eye
pub const VIEWPORT_WIDTH: f64 = 1.0;
pub const VIEWPORT_HEIGHT: f64 = 1.0;
pub const PROJECTION_DISTANCE: f64 = 1.0;

// Maximum recursion depth
pub const REFLECTION_RECURSION_DEPTH: u32 = 3;

// Supersampling grid size (2 means a 2x2 grid)
pub const SAMPLE_GRID_SIZE: usize = 2;

// Largest channel value of a displayable color
pub const MAX_CHANNEL: f64 = 255.0;
