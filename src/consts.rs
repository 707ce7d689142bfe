// Floating point comparisons in tests and value-type equality
pub const FEQ_EPSILON: f64 = 0.0001;

// Geometric tolerance for roundoff error: which side of a surface a point
// lies on, how far a ray must travel before it may hit anything, and how
// close two intersection distances must be to count as a tie.
pub const EPSILON: f64 = 1.0e-6;

// Shift applied along a ray when probing which solid a point is inside of.
pub const SMALL_SHIFT: f64 = 0.001;

// Refractive indices of common media
pub const REFRACTION_VACUUM: f64 = 1.0000;
pub const REFRACTION_AIR: f64 = 1.0003;
pub const REFRACTION_ICE: f64 = 1.3100;
pub const REFRACTION_WATER: f64 = 1.3330;
pub const REFRACTION_GLASS: f64 = 1.5500;
pub const REFRACTION_DIAMOND: f64 = 2.4190;

// Range of allowed refractive indices
pub const REFRACTION_MINIMUM: f64 = 1.0;
pub const REFRACTION_MAXIMUM: f64 = 9.0;

// Cutoffs for reflected and refracted rays: recursion stops at this depth,
// or as soon as a ray carries less than the minimum intensity in every
// color component.
pub const MAX_OPTICAL_RECURSION_DEPTH: usize = 20;
pub const MIN_OPTICAL_INTENSITY: f64 = 0.001;
