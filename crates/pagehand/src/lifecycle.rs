//! Scenario lifecycle hooks.
//!
//! Each scenario gets a fresh driver session: [`ScenarioHooks::before_scenario`]
//! sizes the window, [`ScenarioHooks::after_step`] optionally captures a
//! screenshot per step, and [`ScenarioHooks::after_scenario`] captures the
//! failing state and always ends the session. [`ScenarioHooks::run`] wires
//! the hooks around a [`StepRunner`].

use crate::config::HarnessConfig;
use crate::driver::WebDriver;
use crate::page::save_screenshot;
use crate::result::{HarnessError, HarnessResult};
use crate::steps::StepRunner;
use std::path::PathBuf;

/// Screenshot file stem for a scenario or step name
#[must_use]
pub fn screenshot_stem(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Screenshot file stem for the step at `file:line`
#[must_use]
pub fn step_stem(file: &str, line: u32) -> String {
    screenshot_stem(&format!("{}_{line}", file.replace('/', "_")))
}

/// A step with its location in the feature file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Line number in the feature file
    pub line: u32,
    /// Step text, keyword included
    pub text: String,
}

/// A named list of steps from one feature file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario title
    pub name: String,
    /// Feature file path
    pub file: String,
    /// Steps in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    #[must_use]
    pub fn step(mut self, line: u32, text: impl Into<String>) -> Self {
        self.steps.push(Step {
            line,
            text: text.into(),
        });
        self
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Steps that ran to completion
    pub passed_steps: usize,
    /// First failure, if any
    pub failure: Option<HarnessError>,
    /// Screenshots written while running
    pub screenshots: Vec<PathBuf>,
}

impl ScenarioOutcome {
    /// True when every step passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Per-scenario setup and teardown
#[derive(Debug, Clone, Default)]
pub struct ScenarioHooks {
    config: HarnessConfig,
}

impl ScenarioHooks {
    /// Hooks driven by `config`
    #[must_use]
    pub const fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Harness configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Size the window for the configured form factor
    pub fn before_scenario(&self, driver: &dyn WebDriver) -> HarnessResult<()> {
        tracing::info!(
            mode = ?self.config.driver_mode,
            uri = self.config.driver_uri.as_deref().unwrap_or("-"),
            mobile = self.config.mobile_browser,
            "starting scenario"
        );
        driver.set_window_size(self.config.window_size())
    }

    /// Capture `<dir>/<file>_<line>.png` when step screenshots are enabled
    pub fn after_step(
        &self,
        driver: &dyn WebDriver,
        file: &str,
        line: u32,
    ) -> HarnessResult<Option<PathBuf>> {
        if !self.config.screenshots {
            return Ok(None);
        }
        save_screenshot(driver, &self.config.screenshot_dir, &step_stem(file, line)).map(Some)
    }

    /// Capture a screenshot of a failed scenario, then end the session.
    ///
    /// The session is closed even when the screenshot cannot be taken.
    pub fn after_scenario(
        &self,
        driver: &dyn WebDriver,
        name: &str,
        passed: bool,
    ) -> HarnessResult<Option<PathBuf>> {
        let screenshot = if passed {
            Ok(None)
        } else {
            let taken = save_screenshot(driver, &self.config.screenshot_dir, &screenshot_stem(name));
            if let Ok(path) = &taken {
                tracing::info!(scenario = name, path = %path.display(), "took screenshot of failing scenario");
            }
            taken.map(Some)
        };
        driver.close()?;
        screenshot
    }

    /// Run `scenario` with the hooks around it. Stops at the first failing
    /// step or hook.
    ///
    /// Failures, hook failures included, are recorded in the outcome;
    /// [`after_scenario`](Self::after_scenario) runs on every path, so the
    /// session is always closed.
    pub fn run(
        &self,
        driver: &dyn WebDriver,
        runner: &StepRunner,
        scenario: &Scenario,
    ) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome {
            passed_steps: 0,
            failure: None,
            screenshots: Vec::new(),
        };
        if let Err(err) = self.run_steps(driver, runner, scenario, &mut outcome) {
            outcome.failure = Some(err);
        }

        let passed = outcome.passed();
        match self.after_scenario(driver, &scenario.name, passed) {
            Ok(screenshot) => outcome.screenshots.extend(screenshot),
            Err(err) if outcome.failure.is_none() => outcome.failure = Some(err),
            Err(err) => {
                tracing::warn!(scenario = %scenario.name, error = %err, "teardown failed");
            }
        }
        outcome
    }

    fn run_steps(
        &self,
        driver: &dyn WebDriver,
        runner: &StepRunner,
        scenario: &Scenario,
        outcome: &mut ScenarioOutcome,
    ) -> HarnessResult<()> {
        self.before_scenario(driver)?;
        for step in &scenario.steps {
            let result = runner.run(&step.text);
            let screenshot = self.after_step(driver, &scenario.file, step.line);
            if let Ok(Some(path)) = &screenshot {
                outcome.screenshots.push(path.clone());
            }
            if let Err(err) = result {
                tracing::warn!(scenario = %scenario.name, line = step.line, error = %err, "step failed");
                return Err(err);
            }
            outcome.passed_steps += 1;
            let _ = screenshot?;
        }
        Ok(())
    }
}
