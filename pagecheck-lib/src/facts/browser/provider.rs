use super::LOG_TARGET;
use super::driver::{BrowserDriver, BrowserPage, DESKTOP, MOBILE, ProbeError, VIEWPORTS, Viewport};
use super::probes;
use crate::facts::failure::SourceError;
use crate::facts::{AuditTarget, Progress, SourceResult};
use crate::metrics::{MetricSet, RawDocument, normalize};
use clap::ValueEnum;
use core::time::Duration;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use strum::Display;
use url::Url;

/// Name used when describing failures of this service to users.
pub const SERVICE_NAME: &str = "Browser probe";

/// Reason reported when browser probing is switched off.
pub const DISABLED_REASON: &str = "Visual analysis disabled by mode=off.";

/// Label of the desktop signal visit.
pub const DESKTOP_LABEL: &str = "desktop";

/// Label of the mobile signal visit.
pub const MOBILE_LABEL: &str = "mobile";

/// Whether browser probing is attempted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VisualMode {
    /// Browser probing is required; its absence is a failure
    On,

    /// Browser probing is never attempted
    Off,

    /// Browser probing is used when available and silently skipped otherwise
    Auto,
}

/// Overall outcome of the visual pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VisualStatus {
    /// Every browser visit produced data.
    Ok,

    /// Some browser visits failed.
    Partial,

    /// Probing was not attempted, by choice or because no browser was available in `auto` mode.
    Skipped,

    /// Probing was required but no browser was available.
    Failed,
}

/// Delays granted to a page after load before it is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    /// Before a viewport sweep's screenshot.
    pub navigation: Duration,

    /// Before the desktop signal probes, so that late layout shifts are observed.
    pub signals: Duration,
}

/// Everything the browser visits produced, in fixed label order.
#[derive(Debug, Clone)]
pub struct VisualRun {
    pub status: VisualStatus,
    pub reason: Option<String>,
    pub visits: Vec<(String, SourceResult)>,
    pub screenshots: Vec<PathBuf>,
}

impl VisualRun {
    fn not_run(status: VisualStatus, reason: String) -> Self {
        Self {
            status,
            reason: Some(reason),
            visits: Vec::new(),
            screenshots: Vec::new(),
        }
    }
}

/// Runs the browser visits of the visual pipeline behind the mode gate.
///
/// Every page opened is closed again before the visit returns, whether it succeeded or not.
#[derive(Debug)]
pub struct Provider<D> {
    driver: Option<D>,
    mode: VisualMode,
    screenshot_dir: PathBuf,
    settle: Settle,
}

impl<D: BrowserDriver> Provider<D> {
    /// `driver` is `None` when no browser endpoint is configured at all.
    #[must_use]
    pub fn new(driver: Option<D>, mode: VisualMode, screenshot_dir: impl Into<PathBuf>, settle: Settle) -> Self {
        Self {
            driver,
            mode,
            screenshot_dir: screenshot_dir.into(),
            settle,
        }
    }

    pub async fn run(&self, target: &AuditTarget, progress: &dyn Progress) -> VisualRun {
        if self.mode == VisualMode::Off {
            log::info!(target: LOG_TARGET, "Browser probing disabled");
            return VisualRun::not_run(VisualStatus::Skipped, DISABLED_REASON.to_string());
        }

        progress.set_phase("Connecting");
        let driver = match self.available_driver().await {
            Ok(driver) => driver,
            Err(e) => {
                let detail = match e {
                    ProbeError::Unavailable(msg) => msg,
                    other => other.to_string(),
                };
                let reason = format!("Browser automation unavailable: {detail}");

                return if self.mode == VisualMode::On {
                    log::error!(target: LOG_TARGET, "{reason}");
                    VisualRun::not_run(VisualStatus::Failed, reason)
                } else {
                    log::info!(target: LOG_TARGET, "{reason}");
                    VisualRun::not_run(VisualStatus::Skipped, reason)
                };
            }
        };

        if let Err(e) = fs::create_dir_all(&self.screenshot_dir) {
            log::warn!(target: LOG_TARGET, "Could not create screenshot directory '{}': {e}", self.screenshot_dir.display());
        }

        progress.set_phase("Probing");
        let mut visits = Vec::new();
        let mut screenshots = Vec::new();

        for viewport in VIEWPORTS {
            let label = format!("sweep-{}", viewport.name);
            progress.set_message(&label);

            match self.sweep(driver, viewport, &target.url).await {
                Ok((metrics, shot)) => {
                    visits.push((label, SourceResult::ok(metrics)));
                    screenshots.push(shot);
                }
                Err(e) => visits.push((label, visit_failed(&e))),
            }
        }

        progress.set_message(DESKTOP_LABEL);
        let desktop = self.desktop_signals(driver, &target.url).await;
        visits.push((DESKTOP_LABEL.to_string(), desktop.map_or_else(|e| visit_failed(&e), SourceResult::ok)));

        progress.set_message(MOBILE_LABEL);
        let mobile = self.mobile_signals(driver, &target.url).await;
        visits.push((MOBILE_LABEL.to_string(), mobile.map_or_else(|e| visit_failed(&e), SourceResult::ok)));

        let failed = visits.iter().filter(|(_, r)| !r.is_ok()).count();
        if failed == 0 {
            log::info!(target: LOG_TARGET, "All {} browser visits succeeded", visits.len());
            VisualRun {
                status: VisualStatus::Ok,
                reason: None,
                visits,
                screenshots,
            }
        } else {
            let reason = format!("{failed} of {} browser visits failed", visits.len());
            log::warn!(target: LOG_TARGET, "{reason}");
            VisualRun {
                status: VisualStatus::Partial,
                reason: Some(reason),
                visits,
                screenshots,
            }
        }
    }

    async fn available_driver(&self) -> Result<&D, ProbeError> {
        let driver = self
            .driver
            .as_ref()
            .ok_or_else(|| ProbeError::Unavailable("no WebDriver endpoint configured".to_string()))?;
        driver.ensure_available().await?;
        Ok(driver)
    }

    async fn sweep(&self, driver: &D, viewport: Viewport, url: &Url) -> Result<(MetricSet, PathBuf), SourceError> {
        let shot = self.screenshot_dir.join(format!("homepage-{}.png", viewport.name));
        let mut page = driver.open_page(viewport).await.map_err(probe_failure)?;

        let probed = sweep_page(&mut page, url, &shot, self.settle.navigation).await;
        page.close().await;

        let overlap = probed.map_err(probe_failure)?;
        let metrics = normalize(RawDocument::ViewportSweep {
            viewport: viewport.name,
            overlap: &overlap,
        })?;

        Ok((metrics, shot))
    }

    async fn desktop_signals(&self, driver: &D, url: &Url) -> Result<MetricSet, SourceError> {
        let mut page = driver.open_page(DESKTOP).await.map_err(probe_failure)?;

        let probed = async {
            page.navigate(url).await?;
            tokio::time::sleep(self.settle.signals).await;
            let above_fold = page.evaluate(probes::ABOVE_FOLD).await?;
            let overlap = page.evaluate(probes::OVERLAP).await?;
            let layout_shift = page.evaluate_async(probes::LAYOUT_SHIFT).await?;
            Ok::<_, ProbeError>((above_fold, overlap, layout_shift))
        }
        .await;
        page.close().await;

        let (above_fold, overlap, layout_shift) = probed.map_err(probe_failure)?;
        normalize(RawDocument::DesktopProbe {
            above_fold: &above_fold,
            overlap: &overlap,
            layout_shift: &layout_shift,
        })
        .map_err(SourceError::from)
    }

    async fn mobile_signals(&self, driver: &D, url: &Url) -> Result<MetricSet, SourceError> {
        let mut page = driver.open_page(MOBILE).await.map_err(probe_failure)?;

        let probed = async {
            page.navigate(url).await?;
            tokio::time::sleep(self.settle.navigation).await;
            page.evaluate(probes::MOBILE).await
        }
        .await;
        page.close().await;

        let probe = probed.map_err(probe_failure)?;
        normalize(RawDocument::MobileProbe(&probe)).map_err(SourceError::from)
    }
}

async fn sweep_page<P: BrowserPage>(page: &mut P, url: &Url, shot: &Path, settle: Duration) -> Result<serde_json::Value, ProbeError> {
    page.navigate(url).await?;
    tokio::time::sleep(settle).await;
    page.screenshot(shot).await?;
    page.evaluate(probes::OVERLAP).await
}

fn probe_failure(e: ProbeError) -> SourceError {
    match e {
        ProbeError::Unavailable(msg) => SourceError::CapabilityUnavailable(msg),
        ProbeError::Malformed(_) => SourceError::MalformedResponse(e.to_string()),
        ProbeError::Command(_) | ProbeError::Io(_) => SourceError::Transport(e.to_string()),
    }
}

fn visit_failed(e: &SourceError) -> SourceResult {
    log::warn!(target: LOG_TARGET, "Browser visit failed: {e}");
    SourceResult::failed(SERVICE_NAME, e)
}
