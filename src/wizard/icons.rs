//! Step header rendering
//!
//! Maps step states to status icons and composes the header titles shown for
//! each step.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::step::StepState;

/// Placed between the status icon and the step title (en quad)
pub const ICON_SEPARATOR: &str = "\u{2000}";

/// Icon for a step that has not been configured yet
pub const ICON_INIT: &str = "\u{25cb}";
/// Icon for a runnable step
pub const ICON_READY: &str = "\u{25ce}";
/// Icon for a configured step
pub const ICON_CONFIGURED: &str = "\u{25cf}";
/// Icon for a completed step
pub const ICON_SUCCESS: &str = "\u{2713}";
/// Icon for a failed step
pub const ICON_FAIL: &str = "\u{00d7}";

/// Rotating glyphs shown while a step is running
pub const SPINNER_FRAMES: [&str; 4] = ["\u{25dc}", "\u{25dd}", "\u{25de}", "\u{25df}"];

/// Time since the unix epoch, used to pick the spinner frame
pub fn wall_clock() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Spinner frame for a point in time. The spinner turns once per second.
pub fn spinner_frame(now: Duration) -> &'static str {
    let frames = SPINNER_FRAMES.len();
    let index = (now.as_secs_f64() * frames as f64) as u64 % frames as u64;
    SPINNER_FRAMES[index as usize]
}

/// Status icon for a state at a point in time.
///
/// States outside the modelled set render as their upper-cased name.
pub fn icon_for(state: &StepState, now: Duration) -> String {
    match state {
        StepState::Init => ICON_INIT.to_string(),
        StepState::Ready => ICON_READY.to_string(),
        StepState::Configured => ICON_CONFIGURED.to_string(),
        StepState::Active => spinner_frame(now).to_string(),
        StepState::Success => ICON_SUCCESS.to_string(),
        StepState::Fail => ICON_FAIL.to_string(),
        StepState::Other(_) => state.name(),
    }
}

/// Header title for the step at `index` (0-based)
pub fn step_title(index: usize, title: &str, state: &StepState, now: Duration) -> String {
    format!(
        "{}{}Step {}: {}",
        icon_for(state, now),
        ICON_SEPARATOR,
        index + 1,
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_icons() {
        let now = Duration::from_secs(0);
        assert_eq!(icon_for(&StepState::Init, now), "○");
        assert_eq!(icon_for(&StepState::Ready, now), "◎");
        assert_eq!(icon_for(&StepState::Configured, now), "●");
        assert_eq!(icon_for(&StepState::Success, now), "✓");
        assert_eq!(icon_for(&StepState::Fail, now), "×");
    }

    #[test]
    fn test_spinner_cycles_through_frames() {
        assert_eq!(spinner_frame(Duration::from_millis(0)), SPINNER_FRAMES[0]);
        assert_eq!(spinner_frame(Duration::from_millis(250)), SPINNER_FRAMES[1]);
        assert_eq!(spinner_frame(Duration::from_millis(500)), SPINNER_FRAMES[2]);
        assert_eq!(spinner_frame(Duration::from_millis(750)), SPINNER_FRAMES[3]);
        assert_eq!(spinner_frame(Duration::from_millis(1000)), SPINNER_FRAMES[0]);
    }

    #[test]
    fn test_active_icon_is_a_spinner_frame() {
        let icon = icon_for(&StepState::Active, wall_clock());
        assert!(SPINNER_FRAMES.contains(&icon.as_str()));
    }

    #[test]
    fn test_unknown_state_falls_back_to_name() {
        let state = StepState::Other("queued".to_string());
        assert_eq!(icon_for(&state, Duration::ZERO), "QUEUED");
    }

    #[test]
    fn test_step_title() {
        let title = step_title(0, "Select structure", &StepState::Success, Duration::ZERO);
        assert_eq!(title, "✓\u{2000}Step 1: Select structure");

        let title = step_title(2, "Submit", &StepState::Init, Duration::ZERO);
        assert_eq!(title, "○\u{2000}Step 3: Submit");
    }
}
