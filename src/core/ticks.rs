use ordered_float::OrderedFloat;

use super::axis::AxisTick;

pub const VALUE_TICK_TARGET_SPACING_PX: f64 = 40.0;
pub const INDEX_TICK_TARGET_SPACING_PX: f64 = 90.0;
pub const MIN_TICKS: usize = 2;
pub const MAX_TICKS: usize = 16;

/// Number of labels that fit along `axis_span_px` at the target spacing.
#[must_use]
pub fn tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds a raw step up to the closest `1`, `2`, `5` or `10` multiple of a
/// power of ten.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }
    let exponent = raw_step.log10().floor();
    let magnitude = 10_f64.powf(exponent);
    let fraction = raw_step / magnitude;
    let nice_fraction = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice_fraction * magnitude
}

/// Evenly spaced human-readable values covering `[from, to]`.
///
/// Returns an empty set when the domain is degenerate.
#[must_use]
pub fn nice_values(from: f64, to: f64, target_count: usize) -> (Vec<f64>, f64) {
    if !from.is_finite() || !to.is_finite() || to <= from || target_count == 0 {
        return (Vec::new(), 0.0);
    }

    let step = nice_step((to - from) / target_count as f64);
    if step <= 0.0 || !step.is_finite() {
        return (Vec::new(), 0.0);
    }

    let first = (from / step).ceil() * step;
    let mut values = Vec::with_capacity(target_count + 2);
    let mut index = 0_u32;
    loop {
        let value = first + f64::from(index) * step;
        if value > to + step * 1e-9 || values.len() > MAX_TICKS * 4 {
            break;
        }
        values.push(value);
        index += 1;
    }
    values.dedup_by(|lhs, rhs| approx_equal(*lhs, *rhs));
    (values, step)
}

/// Values on the `1-2-5` ladder of every decade inside `[min, max]`, thinned
/// to `target_count` evenly spread entries.
///
/// Both bounds must be positive; anything else yields an empty set.
#[must_use]
pub fn log_ladder_values(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= min || target_count == 0 {
        return Vec::new();
    }

    let min_exp = min.log10().floor() as i32;
    let max_exp = max.log10().ceil() as i32;
    let mut ladder = Vec::new();
    for exp in min_exp..=max_exp {
        let decade = 10_f64.powi(exp);
        for multiplier in [1.0, 2.0, 5.0] {
            let candidate = decade * multiplier;
            if candidate >= min && candidate <= max {
                ladder.push(candidate);
            }
        }
    }
    ladder.dedup_by(|lhs, rhs| approx_equal(*lhs, *rhs));
    evenly_sample(ladder, target_count)
}

fn evenly_sample(values: Vec<f64>, target: usize) -> Vec<f64> {
    if values.len() <= target || target == 0 {
        return values;
    }
    if target == 1 {
        return vec![values[0]];
    }

    let last_index = values.len() - 1;
    let mut sampled: Vec<f64> = Vec::with_capacity(target);
    for step in 0..target {
        let ratio = (step as f64) / ((target - 1) as f64);
        let index = (ratio * (last_index as f64)).round() as usize;
        let value = values[index.min(last_index)];
        if sampled.last().is_some_and(|prev| approx_equal(*prev, value)) {
            continue;
        }
        sampled.push(value);
    }
    sampled
}

/// Decimal places needed to print values spaced `step` apart.
#[must_use]
pub fn step_decimal_places(step: f64) -> u32 {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    let places = (-step.log10() - 1e-9).ceil();
    places.clamp(0.0, 12.0) as u32
}

/// Keeps ticks ordered by coordinate and drops labels closer than
/// `min_spacing_px` to the previously kept one.
#[must_use]
pub fn select_ticks_with_min_spacing(mut ticks: Vec<AxisTick>, min_spacing_px: f64) -> Vec<AxisTick> {
    if ticks.is_empty() {
        return ticks;
    }

    ticks.sort_by_key(|tick| OrderedFloat(tick.coord));
    ticks.dedup_by(|lhs, rhs| approx_equal(lhs.value, rhs.value));
    if ticks.len() == 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<AxisTick> = Vec::with_capacity(ticks.len());
    for tick in ticks {
        match selected.last() {
            Some(last) if tick.coord - last.coord < min_spacing_px => {}
            _ => selected.push(tick),
        }
    }
    selected
}

pub(crate) fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}
