//! Replayable page scenarios
//!
//! A scenario describes a page (viewport plus elements in document order)
//! and a list of steps the rendering layer would perform on it. Running the
//! scenario drives an [`OverlayController`] over a [`Page`] and reports the
//! final visibility and position of every overlay.
//!
//! ```toml
//! [controller]
//! overlays = ["modal-time"]
//!
//! [viewport]
//! width = 900.0
//! height = 600.0
//!
//! [[element]]
//! tag = "button"
//! attributes = { data-modal = "modal-time" }
//! rect = { x = 850.0, y = 280.0, width = 40.0, height = 20.0 }
//!
//! [[element]]
//! id = "modal-time"
//! rect = { x = 0.0, y = 0.0, width = 400.0, height = 400.0 }
//!
//! [[step]]
//! action = "mounted"
//!
//! [[step]]
//! action = "activate"
//! element = 0
//! ```

use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ControllerConfig;
use crate::controller::OverlayController;
use crate::error::{ConfigError, OverlayError};
use crate::geometry::Viewport;
use crate::page::{Element, NodeId, Page};
use crate::resolver::{ResolveReport, SkipReason};
use crate::store::{Visibility, VisibilityState};

/// Errors raised while replaying a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("step {step}: {source}")]
    Overlay {
        step: usize,
        #[source]
        source: OverlayError,
    },

    #[error("step {step}: no element at index {element}")]
    UnknownElement { step: usize, element: usize },

    #[error(transparent)]
    Config(#[from] OverlayError),
}

/// One action performed on the page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Run the initial positioning pass and validate triggers
    Mounted,
    /// Click the element at `element`
    Activate { element: usize },
    Toggle { overlay: String },
    /// Use the overlay's close affordance
    Close { overlay: String },
    /// Run a positioning pass
    Resolve,
    Scroll {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Resize { width: f64, height: f64 },
    Mount { element: usize },
    Unmount { element: usize },
}

/// A page plus the steps to replay on it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub controller: ControllerConfig,

    #[serde(default)]
    pub viewport: Viewport,

    #[serde(default, rename = "element")]
    pub elements: Vec<Element>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scenario from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the page and replay every step against a fresh controller
    pub fn run(&self) -> Result<ScenarioOutcome, ScenarioError> {
        let mut controller = OverlayController::new(self.controller.clone())?;

        let mut page = Page::new(self.viewport);
        for element in &self.elements {
            page.push(element.clone());
        }

        let mut last_report = None;
        let mut config_errors = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "replaying step");
            let overlay_err = |source| ScenarioError::Overlay { step: index, source };
            let element = |element: usize| {
                if element < self.elements.len() {
                    Ok(NodeId(element))
                } else {
                    Err(ScenarioError::UnknownElement {
                        step: index,
                        element,
                    })
                }
            };

            match step {
                Step::Mounted => {
                    let outcome = controller.mounted(&mut page);
                    config_errors.extend(outcome.error);
                    last_report = Some(outcome.report);
                }
                Step::Activate { element: target } => {
                    let node = element(*target)?;
                    controller.activate(&mut page, &node).map_err(overlay_err)?;
                }
                Step::Toggle { overlay } => {
                    controller.toggle(overlay).map_err(overlay_err)?;
                }
                Step::Close { overlay } => {
                    controller.dismiss(overlay).map_err(overlay_err)?;
                }
                Step::Resolve => {
                    last_report = Some(controller.resolve_positions(&mut page));
                }
                Step::Scroll { x, y } => page.scroll_to(*x, *y),
                Step::Resize { width, height } => page.resize(*width, *height),
                Step::Mount { element: target } => {
                    page.mount(element(*target)?);
                }
                Step::Unmount { element: target } => {
                    page.unmount(element(*target)?);
                }
            }
        }

        Ok(ScenarioOutcome {
            state: controller.snapshot(),
            page,
            last_report,
            config_errors,
        })
    }
}

/// The result of running a [`Scenario`]
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Final visibility of every overlay
    pub state: VisibilityState,
    /// The page after all steps, including applied positions
    pub page: Page,
    /// Report of the last explicit `mounted` or `resolve` step
    pub last_report: Option<ResolveReport<NodeId>>,
    /// Trigger configuration errors reported by `mounted` steps
    pub config_errors: Vec<OverlayError>,
}

impl ScenarioOutcome {
    /// A plain-text summary, one overlay per line in id order
    pub fn render(&self) -> String {
        let width = self.state.ids().map(str::len).max().unwrap_or(0);
        let mut out = String::new();

        for (id, visible) in self.state.iter() {
            let position = match self.page.position_of(id) {
                Some(position) => format!("top={} left={}", position.top, position.left),
                None => "unpositioned".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<width$}  {:<7}  {}",
                id,
                Visibility::from(visible).as_css(),
                position,
                width = width
            );
        }

        if let Some(report) = &self.last_report {
            for skipped in &report.skipped {
                let reason = match &skipped.reason {
                    SkipReason::MissingMarker => "no overlay id".to_string(),
                    SkipReason::MissingOverlay { overlay } => {
                        format!("overlay '{}' not mounted", overlay)
                    }
                    SkipReason::Detached => "trigger detached".to_string(),
                };
                let _ = writeln!(out, "skipped trigger #{}: {}", skipped.trigger.0, reason);
            }
        }

        for error in &self.config_errors {
            let _ = writeln!(out, "error: {}", error);
        }

        out
    }
}
