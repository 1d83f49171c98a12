use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::RecvTimeoutError;
use wizard_app::logging::initialize_tracing;
use wizard_app::step::{BasicStep, StepState, WizardStep};
use wizard_app::{AppResult, NavigationResult, WizardConfig, WizardController, WizardEvent};

const LOG_TARGET_DEMO: &str = "wizard_app::demo";

/// Simulated work for each demo step
const STEP_DURATION: Duration = Duration::from_millis(600);

struct DemoOptions {
    fail_last_step: bool,
    animate: bool,
}

impl DemoOptions {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self {
            fail_last_step: args.iter().any(|a| a == "--fail"),
            animate: !args.iter().any(|a| a == "--no-animate"),
        }
    }
}

fn main() -> AppResult<()> {
    let options = DemoOptions::from_args();

    let mut config = WizardConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        WizardConfig::default()
    });
    config.animate &= options.animate;

    let _log_guard = initialize_tracing(&config);
    tracing::info!(
        target: LOG_TARGET_DEMO,
        "Starting wizard demo v{}",
        env!("CARGO_PKG_VERSION")
    );

    let steps = vec![
        Arc::new(BasicStep::new().with_auto_advance(true).resettable(true)),
        Arc::new(BasicStep::new().with_auto_advance(true).resettable(true)),
        Arc::new(BasicStep::new().resettable(true)),
    ];
    let titles = ["Select structure", "Configure calculation", "Submit and monitor"];

    let entries = titles.iter().zip(&steps).map(|(title, step)| {
        let step: Arc<dyn WizardStep> = step.clone();
        (title.to_string(), step)
    });
    let wizard =
        WizardController::with_config(entries, &config).context("Failed to build wizard")?;
    // Starts with the current headers
    let (events, _subscription) = wizard.subscribe();

    let workers = steps.clone();
    let fail_last_step = options.fail_last_step;
    let worker = thread::Builder::new()
        .name("demo-worker".to_string())
        .spawn(move || run_steps(&workers, fail_last_step))
        .context("Failed to spawn demo worker")?;

    let last = wizard.len() - 1;
    loop {
        match events.recv_timeout(Duration::from_secs(10)) {
            Ok(WizardEvent::TitlesChanged { titles }) => print_headers(&titles),
            Ok(WizardEvent::StepStateChanged { index, new, .. })
                if index == last && new.is_terminal() =>
            {
                tracing::info!(target: LOG_TARGET_DEMO, "Last step finished: {}", new);
                break;
            }
            Ok(event) => tracing::info!(target: LOG_TARGET_DEMO, "{}", event.description()),
            Err(RecvTimeoutError::Timeout) => {
                anyhow::bail!("Demo stalled waiting for wizard events")
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if worker.join().is_err() {
        anyhow::bail!("Demo worker panicked");
    }

    wizard.refresh_titles();
    print_headers(&wizard.titles());

    let snapshot = serde_json::to_string_pretty(&wizard.snapshot())
        .context("Failed to serialize wizard snapshot")?;
    println!("{}", snapshot);

    if wizard.states()[last].is_failure() {
        match wizard.click_reset() {
            NavigationResult::Reset => println!("Wizard reset after failure"),
            other => println!("Reset not possible: {:?}", other),
        }
        print_headers(&wizard.titles());
    }

    Ok(())
}

/// Walk every step through its lifecycle, one after another
fn run_steps(steps: &[Arc<BasicStep>], fail_last_step: bool) {
    let last = steps.len().saturating_sub(1);

    for (index, step) in steps.iter().enumerate() {
        step.set_state(StepState::Configured);
        thread::sleep(STEP_DURATION / 4);
        step.set_state(StepState::Ready);
        thread::sleep(STEP_DURATION / 4);
        step.set_state(StepState::Active);
        thread::sleep(STEP_DURATION);

        if index == last && fail_last_step {
            step.set_state(StepState::Fail);
        } else {
            step.set_state(StepState::Success);
        }
    }
}

fn print_headers(titles: &[String]) {
    println!("-------------------------------------------");
    for title in titles {
        println!("  {}", title);
    }
}
