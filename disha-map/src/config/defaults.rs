//! Default value functions for serde deserialization.

pub fn arena_extent() -> f32 {
    100.0
}

pub fn inflation_factor() -> usize {
    2
}

pub fn footprint_clearance() -> f32 {
    2.0
}

pub fn error_percentage() -> f32 {
    0.1
}

pub fn ema_alpha() -> f32 {
    0.1
}

pub fn averaging_samples() -> usize {
    10
}

pub fn sample_interval_ms() -> u64 {
    100
}

pub fn max_iterations() -> usize {
    20_000
}
