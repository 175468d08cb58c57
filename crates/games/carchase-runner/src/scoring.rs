/// Advance the running score by one tick.
pub fn accumulate(score: f64, increment: f64, multiplier: u32) -> f64 {
    score + increment * f64::from(multiplier)
}

/// Score reported at the end of a run.
pub fn final_score(score: f64) -> u64 {
    if score.is_finite() && score > 0.0 {
        score.floor() as u64
    } else {
        0
    }
}

/// Whole seconds of simulated time after `ticks` ticks.
pub fn time_played_secs(ticks: u64, tick_rate_hz: f32) -> u64 {
    if tick_rate_hz <= 0.0 {
        return 0;
    }
    (ticks as f64 / f64::from(tick_rate_hz)).floor() as u64
}
