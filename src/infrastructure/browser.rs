//! Browser session collaborator
//!
//! The pipeline drives one exclusively-owned tab through this trait; the
//! production implementation wraps `headless_chrome`. The trait is the seam
//! the integration tests mock, and `find_control_by_label` deliberately
//! hides the lookup strategy (currently an XPath text match) so it can grow
//! accessible-name or structural fallbacks without touching pipeline logic.

use crate::infrastructure::config::BrowserConfig;
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to launch browser: {reason}")]
    Launch { reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("could not read page content: {reason}")]
    Content { reason: String },

    #[error("failed to activate control: {reason}")]
    Activation { reason: String },

    #[error("failed to write screenshot {path}: {reason}")]
    Screenshot { path: String, reason: String },

    #[error("browser connection lost: {reason}")]
    Disconnected { reason: String },
}

impl SessionError {
    /// Fatal errors mean the session is unusable and the pipeline should
    /// stop visiting items; everything else is isolated to the current item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::Disconnected { .. })
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// How long navigation is considered in flight after the load event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Return as soon as the load event fires
    Load,
    /// Load event plus a quiescence delay for late-rendered content
    NetworkIdle,
}

/// Opaque handle to a control located by its visible label
///
/// Holds whatever the session needs to re-find the control at activation
/// time; locating and activating are separate steps because activation can
/// succeed while the content it reveals has not rendered yet.
#[derive(Debug, Clone)]
pub struct ControlLocator {
    lookup: String,
}

impl ControlLocator {
    /// Wrap a session-defined lookup key (an XPath for the Chrome session)
    pub fn new(lookup: impl Into<String>) -> Self {
        Self {
            lookup: lookup.into(),
        }
    }

    pub fn lookup(&self) -> &str {
        &self.lookup
    }
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str, wait: WaitPolicy) -> SessionResult<()>;

    /// Current serialized DOM of the page
    async fn content(&self) -> SessionResult<String>;

    /// Bounded wait for a selector; `Ok(false)` on lapse
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> SessionResult<bool>;

    /// Content-based control lookup; `Ok(None)` when no control carries the label
    async fn find_control_by_label(&self, label: &str) -> SessionResult<Option<ControlLocator>>;

    /// Simulate a pointer activation of a previously located control
    async fn activate(&self, control: &ControlLocator) -> SessionResult<()>;

    async fn screenshot(&self, path: &Path) -> SessionResult<()>;

    async fn close(&self) -> SessionResult<()>;
}

/// Production session over a headless Chrome process
pub struct ChromeSession {
    // field order matters: Tab before Browser so the tab handle drops first
    tab: Arc<Tab>,
    _browser: Browser,
    quiesce: Duration,
}

impl ChromeSession {
    /// Launch a browser process and open the pipeline's single tab
    pub fn launch(config: &BrowserConfig) -> SessionResult<Self> {
        let stealth_args: Vec<OsString> = if config.stealth {
            [
                "--disable-blink-features=AutomationControlled",
                "--no-first-run",
                "--no-default-browser-check",
                "--disable-extensions",
                "--disable-background-networking",
                "--disable-sync",
                "--mute-audio",
                "--no-pings",
            ]
            .iter()
            .map(OsString::from)
            .collect()
        } else {
            Vec::new()
        };
        let args: Vec<&OsStr> = stealth_args.iter().map(OsString::as_os_str).collect();

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(config.sandbox)
            .window_size(Some((config.window_width, config.window_height)))
            .idle_browser_timeout(Duration::from_secs(config.idle_timeout_secs))
            .proxy_server(config.proxy_server.as_deref())
            .args(args)
            .build()
            .map_err(|e| SessionError::Launch {
                reason: e.to_string(),
            })?;

        let browser = Browser::new(options).map_err(|e| SessionError::Launch {
            reason: e.to_string(),
        })?;
        let tab = browser.new_tab().map_err(|e| SessionError::Launch {
            reason: e.to_string(),
        })?;

        if let Err(e) = tab.set_user_agent(&config.user_agent, None, None) {
            warn!(error = %e, "failed to override user agent");
        }

        info!(
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            "browser session launched"
        );

        Ok(Self {
            tab,
            _browser: browser,
            quiesce: Duration::from_millis(config.nav_quiesce_ms),
        })
    }

    /// A dead devtools connection poisons every later call; classify it so
    /// the pipeline stops visiting items instead of skipping them all.
    fn classify(&self, err: &anyhow::Error) -> Option<SessionError> {
        let msg = err.to_string().to_lowercase();
        if msg.contains("connection") || msg.contains("channel") || msg.contains("websocket") {
            Some(SessionError::Disconnected {
                reason: err.to_string(),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str, wait: WaitPolicy) -> SessionResult<()> {
        debug!(url, "navigating");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| {
                self.classify(&e).unwrap_or(SessionError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            })?;

        if wait == WaitPolicy::NetworkIdle {
            tokio::time::sleep(self.quiesce).await;
        }
        Ok(())
    }

    async fn content(&self) -> SessionResult<String> {
        self.tab.get_content().map_err(|e| {
            self.classify(&e).unwrap_or(SessionError::Content {
                reason: e.to_string(),
            })
        })
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> SessionResult<bool> {
        match self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
        {
            Ok(_) => Ok(true),
            Err(e) => match self.classify(&e) {
                Some(fatal) => Err(fatal),
                None => {
                    debug!(selector, ?timeout, "selector wait lapsed");
                    Ok(false)
                }
            },
        }
    }

    async fn find_control_by_label(&self, label: &str) -> SessionResult<Option<ControlLocator>> {
        // double quotes tolerate apostrophes in labels
        let xpath = format!(
            "//*[self::button or self::a or @role='tab'][contains(normalize-space(.), \"{label}\")]"
        );
        match self.tab.find_element_by_xpath(&xpath) {
            Ok(_) => Ok(Some(ControlLocator::new(xpath))),
            Err(e) => match self.classify(&e) {
                Some(fatal) => Err(fatal),
                None => Ok(None),
            },
        }
    }

    async fn activate(&self, control: &ControlLocator) -> SessionResult<()> {
        self.tab
            .find_element_by_xpath(control.lookup())
            .and_then(|element| element.click().map(|_| ()))
            .map_err(|e| {
                self.classify(&e).unwrap_or(SessionError::Activation {
                    reason: e.to_string(),
                })
            })
    }

    async fn screenshot(&self, path: &Path) -> SessionResult<()> {
        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| SessionError::Screenshot {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        std::fs::write(path, png).map_err(|e| SessionError::Screenshot {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "diagnostic snapshot written");
        Ok(())
    }

    async fn close(&self) -> SessionResult<()> {
        // the browser process itself is reaped when the session drops
        if let Err(e) = self.tab.close(false) {
            debug!(error = %e, "tab close returned an error");
        }
        Ok(())
    }
}
