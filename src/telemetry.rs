//! Tracing targets and subscriber setup for `chart-panes`.
//!
//! Layout passes log under [`LAYOUT_TARGET`], layer recordings under
//! [`DRAW_TARGET`] and pointer routing under [`EVENTS_TARGET`], so a host can
//! silence the per-event noise while keeping layout summaries.

/// Pane heights, axis columns and axis fitting.
pub const LAYOUT_TARGET: &str = "chart_panes::layout";
/// Widget layer recordings and update levels.
pub const DRAW_TARGET: &str = "chart_panes::draw";
/// Pointer events, crosshair moves and tooltip actions.
pub const EVENTS_TARGET: &str = "chart_panes::events";

/// Filter used when `RUST_LOG` is unset: layout at debug, pointer events
/// only when something goes wrong.
pub const DEFAULT_FILTER: &str =
    "chart_panes=info,chart_panes::layout=debug,chart_panes::events=warn";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, or by
/// [`DEFAULT_FILTER`] when the variable is unset or invalid.
///
/// Returns `false` without the `telemetry` feature or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with caller-chosen fallback directives.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chart_panes=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FILTER, DRAW_TARGET, EVENTS_TARGET, LAYOUT_TARGET};

    #[test]
    fn targets_live_under_the_crate_name() {
        for target in [LAYOUT_TARGET, DRAW_TARGET, EVENTS_TARGET] {
            assert!(target.starts_with("chart_panes::"));
        }
    }

    #[test]
    fn default_filter_names_every_noisy_target() {
        assert!(DEFAULT_FILTER.contains(LAYOUT_TARGET));
        assert!(DEFAULT_FILTER.contains(EVENTS_TARGET));
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn init_is_a_no_op_without_the_feature() {
        assert!(!super::init_default_tracing());
    }
}
