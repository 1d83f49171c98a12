//! Wizard controller
//!
//! Reflects step states into step headers and navigation availability, and
//! moves the selection forward when an auto-advancing step succeeds.

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::bus::{EventBus, SubscriptionId};
use super::events::WizardEvent;
use super::icons;
use super::navigation::{NavButton, Navigation, NavigationResult};
use super::spinner::Spinner;
use crate::config::WizardConfig;
use crate::error::WizardError;
use crate::step::{ListenerId, StateChange, StepState, WizardStep};

/// A titled step handed to the controller
pub type StepEntry = (String, Arc<dyn WizardStep>);

/// Serializable view of the whole wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub selected_index: Option<usize>,
    pub titles: Vec<String>,
    pub states: Vec<StepState>,
    pub navigation: Navigation,
    pub can_reset: bool,
}

/// Wizard controller
///
/// Owns the background title refresh. Dropping the controller stops it and
/// detaches from every step.
pub struct WizardController {
    inner: Arc<ControllerInner>,
    listeners: Vec<ListenerId>,
    spinner: Option<Spinner>,
}

struct ControllerInner {
    step_titles: Vec<String>,
    steps: Vec<Arc<dyn WizardStep>>,
    view: Mutex<ViewState>,
    bus: EventBus,
}

/// Everything derived from the selection and the step states
#[derive(Default)]
struct ViewState {
    selected_index: Option<usize>,
    header_titles: Vec<String>,
    navigation: Navigation,
}

impl WizardController {
    /// Create a controller with the default configuration
    pub fn new<I, S>(steps: I) -> Result<Self, WizardError>
    where
        I: IntoIterator<Item = (S, Arc<dyn WizardStep>)>,
        S: Into<String>,
    {
        Self::with_config(steps, &WizardConfig::default())
    }

    /// Create a controller.
    ///
    /// At least two steps are required. The first step is selected.
    pub fn with_config<I, S>(steps: I, config: &WizardConfig) -> Result<Self, WizardError>
    where
        I: IntoIterator<Item = (S, Arc<dyn WizardStep>)>,
        S: Into<String>,
    {
        let (step_titles, steps): (Vec<String>, Vec<Arc<dyn WizardStep>>) = steps
            .into_iter()
            .map(|(title, step)| (title.into(), step))
            .unzip();

        if steps.len() < 2 {
            return Err(WizardError::TooFewSteps { count: steps.len() });
        }

        let inner = Arc::new(ControllerInner {
            step_titles,
            steps,
            view: Mutex::new(ViewState::default()),
            bus: EventBus::new(),
        });

        {
            let mut view = inner.view.lock();
            inner.render_titles(&mut view);
            inner.select(&mut view, Some(0));
        }

        let listeners = inner
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let weak = Arc::downgrade(&inner);
                step.state_cell().observe(move |change| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_step_state(index, change);
                    }
                })
            })
            .collect();

        // Pick up anything that changed before the listeners were attached
        {
            let mut view = inner.view.lock();
            inner.render_titles(&mut view);
            inner.update_buttons(&mut view);
        }

        let spinner = if config.animate {
            start_spinner(Arc::downgrade(&inner), config.refresh_interval())
        } else {
            None
        };

        info!(
            "Wizard created with {} steps: {}",
            inner.steps.len(),
            inner.step_titles.join(", ")
        );

        Ok(Self {
            inner,
            listeners,
            spinner,
        })
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.inner.steps.len()
    }

    /// True if the wizard has no steps
    pub fn is_empty(&self) -> bool {
        self.inner.steps.is_empty()
    }

    /// Step titles as supplied at construction
    pub fn step_titles(&self) -> &[String] {
        &self.inner.step_titles
    }

    /// Step at the given position
    pub fn step(&self, index: usize) -> Option<&Arc<dyn WizardStep>> {
        self.inner.steps.get(index)
    }

    /// Current state of every step
    pub fn states(&self) -> Vec<StepState> {
        self.inner.states()
    }

    /// Rendered step headers
    pub fn titles(&self) -> Vec<String> {
        self.inner.view.lock().header_titles.clone()
    }

    /// Current Back / Reset / Next availability
    pub fn navigation(&self) -> Navigation {
        self.inner.view.lock().navigation
    }

    /// Currently selected step
    pub fn selected_index(&self) -> Option<usize> {
        self.inner.view.lock().selected_index
    }

    /// Select a step, or clear the selection with `None`
    pub fn set_selected_index(&self, index: Option<usize>) -> Result<(), WizardError> {
        if let Some(index) = index {
            if index >= self.len() {
                return Err(WizardError::IndexOutOfRange {
                    index,
                    len: self.len(),
                });
            }
        }

        let mut view = self.inner.view.lock();
        self.inner.select(&mut view, index);
        Ok(())
    }

    /// Go to the previous step, if allowed
    pub fn click_back(&self) -> NavigationResult {
        self.step_by(NavButton::Back)
    }

    /// Go to the next step, if allowed
    pub fn click_next(&self) -> NavigationResult {
        self.step_by(NavButton::Next)
    }

    /// Reset every step and select the first one, if allowed
    pub fn click_reset(&self) -> NavigationResult {
        {
            let mut view = self.inner.view.lock();
            self.inner.update_buttons(&mut view);
            if !view.navigation.reset_enabled {
                return NavigationResult::blocked(NavButton::Reset);
            }
        }

        self.reset(0);

        let mut view = self.inner.view.lock();
        self.inner.select(&mut view, Some(0));
        NavigationResult::Reset
    }

    /// True when every step can be reset and at least one has left INIT
    pub fn can_reset(&self) -> bool {
        self.inner.can_reset()
    }

    /// Reset the steps from `from_index` to the last one.
    ///
    /// Later steps are reset before earlier ones. With `from_index = 1`, all
    /// but the first step are reset.
    pub fn reset(&self, from_index: usize) {
        if from_index >= self.len() {
            debug!("Reset from index {} ignored, wizard has {} steps", from_index, self.len());
            return;
        }
        info!("Resetting wizard from step {}", from_index + 1);

        // No lock held here: step resets notify the controller like any other
        // state change.
        for index in (from_index..self.len()).rev() {
            match self.inner.steps[index].as_resettable() {
                Some(step) => step.reset(),
                None => debug!("Step {} cannot be reset, skipped", index + 1),
            }
        }

        self.inner.bus.publish(WizardEvent::Reset { from_index });

        let mut view = self.inner.view.lock();
        self.inner.update_buttons(&mut view);
    }

    /// Re-render step headers now
    pub fn refresh_titles(&self) {
        self.inner.refresh_titles();
    }

    /// Subscribe to controller events.
    ///
    /// The receiver starts with the current headers and button states.
    pub fn subscribe(&self) -> (Receiver<WizardEvent>, SubscriptionId) {
        // Held so no change can slip in between the primer and the first event
        let view = self.inner.view.lock();
        self.inner.bus.subscribe([
            WizardEvent::TitlesChanged {
                titles: view.header_titles.clone(),
            },
            WizardEvent::ButtonsChanged {
                navigation: view.navigation,
            },
        ])
    }

    /// Stop delivering events to a subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.bus.unsubscribe(id)
    }

    /// Check if the background title refresh is running
    pub fn is_animating(&self) -> bool {
        self.spinner.as_ref().map_or(false, Spinner::is_running)
    }

    /// Consistent view of titles, states, selection and navigation
    pub fn snapshot(&self) -> WizardSnapshot {
        let view = self.inner.view.lock();
        WizardSnapshot {
            selected_index: view.selected_index,
            titles: view.header_titles.clone(),
            states: self.inner.states(),
            navigation: view.navigation,
            can_reset: self.inner.can_reset(),
        }
    }

    fn step_by(&self, button: NavButton) -> NavigationResult {
        let mut view = self.inner.view.lock();
        self.inner.update_buttons(&mut view);

        let Some(from) = view.selected_index else {
            return NavigationResult::blocked(button);
        };
        if !view.navigation.is_enabled(button) {
            return NavigationResult::blocked(button);
        }

        let to = match button {
            NavButton::Back => from - 1,
            _ => from + 1,
        };
        self.inner.select(&mut view, Some(to));
        NavigationResult::Moved { from, to }
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        if let Some(mut spinner) = self.spinner.take() {
            spinner.stop();
        }
        for (step, id) in self.inner.steps.iter().zip(self.listeners.drain(..)) {
            step.state_cell().unobserve(id);
        }
        self.inner.bus.publish(WizardEvent::Shutdown);
        debug!("Wizard controller dropped");
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("steps", &self.inner.step_titles)
            .field("selected_index", &self.selected_index())
            .field("animating", &self.is_animating())
            .finish()
    }
}

fn start_spinner(inner: Weak<ControllerInner>, interval: Duration) -> Option<Spinner> {
    let tick = move || match inner.upgrade() {
        Some(inner) => {
            inner.refresh_titles();
            true
        }
        None => false,
    };

    match Spinner::start(interval, tick) {
        Ok(spinner) => Some(spinner),
        Err(e) => {
            warn!("Failed to start title refresh, running steps will not animate: {}", e);
            None
        }
    }
}

impl ControllerInner {
    fn states(&self) -> Vec<StepState> {
        self.steps.iter().map(|step| step.state()).collect()
    }

    fn can_reset(&self) -> bool {
        if self.steps.iter().any(|step| !step.can_reset()) {
            return false;
        }
        self.steps.iter().any(|step| !step.state().is_init())
    }

    fn on_step_state(&self, index: usize, change: &StateChange) {
        debug!(
            "Step {} changed state: {} -> {}",
            index + 1,
            change.old,
            change.new
        );

        let mut view = self.view.lock();
        self.bus.publish(WizardEvent::StepStateChanged {
            index,
            old: change.old.clone(),
            new: change.new.clone(),
        });
        self.render_titles(&mut view);
        self.update_buttons(&mut view);
        self.consider_auto_advance(&mut view);
    }

    fn refresh_titles(&self) {
        let mut view = self.view.lock();
        self.render_titles(&mut view);
    }

    fn render_titles(&self, view: &mut ViewState) {
        let now = icons::wall_clock();
        let titles: Vec<String> = self
            .step_titles
            .iter()
            .zip(&self.steps)
            .enumerate()
            .map(|(index, (title, step))| icons::step_title(index, title, &step.state(), now))
            .collect();

        if titles != view.header_titles {
            view.header_titles = titles.clone();
            self.bus.publish(WizardEvent::TitlesChanged { titles });
        }
    }

    fn update_buttons(&self, view: &mut ViewState) {
        let navigation =
            Navigation::compute(view.selected_index, &self.states(), self.can_reset());

        if navigation != view.navigation {
            view.navigation = navigation;
            self.bus.publish(WizardEvent::ButtonsChanged { navigation });
        }
    }

    fn select(&self, view: &mut ViewState, index: Option<usize>) {
        let old = view.selected_index;
        if old != index {
            view.selected_index = index;
            debug!("Selected step changed: {:?} -> {:?}", old, index);
            self.bus
                .publish(WizardEvent::SelectionChanged { old, new: index });
        }
        self.update_buttons(view);
    }

    /// Advance past every selected step that auto-advances and has succeeded
    fn consider_auto_advance(&self, view: &mut ViewState) {
        while let Some(index) = view.selected_index {
            let last_step_selected = index + 1 == self.steps.len();
            let step = &self.steps[index];

            if last_step_selected || !step.auto_advance() || step.state() != StepState::Success {
                break;
            }

            info!("Step {} succeeded, advancing to step {}", index + 1, index + 2);
            self.select(view, Some(index + 1));
            self.bus.publish(WizardEvent::AutoAdvanced {
                from: index,
                to: index + 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::BasicStep;

    fn basic_steps(count: usize) -> (Vec<Arc<BasicStep>>, Vec<StepEntry>) {
        let steps: Vec<Arc<BasicStep>> = (0..count)
            .map(|_| Arc::new(BasicStep::new().resettable(true)))
            .collect();
        let entries = steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let step: Arc<dyn WizardStep> = step.clone();
                (format!("Task {}", i + 1), step)
            })
            .collect();
        (steps, entries)
    }

    fn quiet() -> WizardConfig {
        WizardConfig {
            animate: false,
            ..WizardConfig::default()
        }
    }

    #[test]
    fn test_new_controller() {
        let (_steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();

        assert_eq!(wizard.len(), 2);
        assert_eq!(wizard.selected_index(), Some(0));
        assert_eq!(wizard.navigation(), Navigation::default());
        assert_eq!(
            wizard.titles(),
            vec![
                "○\u{2000}Step 1: Task 1".to_string(),
                "○\u{2000}Step 2: Task 2".to_string()
            ]
        );
        assert!(!wizard.is_animating());
    }

    #[test]
    fn test_too_few_steps() {
        let (_steps, entries) = basic_steps(1);
        let err = WizardController::with_config(entries, &quiet()).unwrap_err();
        assert_eq!(err, WizardError::TooFewSteps { count: 1 });
    }

    #[test]
    fn test_titles_follow_state() {
        let (steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();

        steps[0].set_state(StepState::Success);
        steps[1].set_state(StepState::Fail);

        let titles = wizard.titles();
        assert_eq!(titles[0], "✓\u{2000}Step 1: Task 1");
        assert_eq!(titles[1], "×\u{2000}Step 2: Task 2");
    }

    #[test]
    fn test_set_selected_index_out_of_range() {
        let (_steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();

        let err = wizard.set_selected_index(Some(2)).unwrap_err();
        assert_eq!(err, WizardError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(wizard.selected_index(), Some(0));
    }

    #[test]
    fn test_clear_selection_disables_buttons() {
        let (steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        steps[0].set_state(StepState::Success);
        assert!(wizard.navigation().next_enabled);

        wizard.set_selected_index(None).unwrap();
        assert_eq!(wizard.navigation(), Navigation::default());
        assert!(matches!(
            wizard.click_next(),
            NavigationResult::Blocked { .. }
        ));
    }

    #[test]
    fn test_state_change_without_selection_does_not_advance() {
        let first: Arc<dyn WizardStep> = Arc::new(BasicStep::new().with_auto_advance(true));
        let second: Arc<dyn WizardStep> = Arc::new(BasicStep::new());
        let entries = vec![("First", first), ("Second", second)];
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        wizard.set_selected_index(None).unwrap();

        if let Some(step) = wizard.step(0) {
            step.state_cell().set(StepState::Success);
        }
        assert_eq!(wizard.selected_index(), None);
    }

    #[test]
    fn test_drop_detaches_listeners() {
        let (steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        assert_eq!(steps[0].state_cell().listener_count(), 1);

        let (events, _) = wizard.subscribe();
        drop(wizard);

        assert_eq!(steps[0].state_cell().listener_count(), 0);
        assert_eq!(steps[1].state_cell().listener_count(), 0);
        assert!(events.try_iter().any(|e| e == WizardEvent::Shutdown));

        // Still safe to drive the steps afterwards
        steps[0].set_state(StepState::Success);
    }

    #[test]
    fn test_snapshot() {
        let (steps, entries) = basic_steps(3);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        steps[0].set_state(StepState::Success);

        let snapshot = wizard.snapshot();
        assert_eq!(snapshot.selected_index, Some(0));
        assert_eq!(snapshot.states[0], StepState::Success);
        assert!(snapshot.navigation.next_enabled);
        assert!(snapshot.can_reset);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["states"][0], "SUCCESS");
    }

    #[test]
    fn test_reset_past_last_step_is_ignored() {
        let (steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        steps[1].set_state(StepState::Fail);
        let (events, _) = wizard.subscribe();

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            wizard.reset(usize::MAX);
            wizard.reset(2);
        });

        assert_eq!(steps[1].state(), StepState::Fail);
        assert!(!events
            .try_iter()
            .any(|e| matches!(e, WizardEvent::Reset { .. })));
    }

    #[test]
    fn test_subscription_starts_with_current_view() {
        let (steps, entries) = basic_steps(2);
        let wizard = WizardController::with_config(entries, &quiet()).unwrap();
        steps[0].set_state(StepState::Success);

        let (events, id) = wizard.subscribe();
        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![
                WizardEvent::TitlesChanged {
                    titles: wizard.titles()
                },
                WizardEvent::ButtonsChanged {
                    navigation: wizard.navigation()
                },
            ]
        );

        assert!(wizard.unsubscribe(id));
        steps[1].set_state(StepState::Active);
        assert!(events.try_recv().is_err());
    }
}
