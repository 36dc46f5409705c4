use core::fmt::{Display, Formatter};
use serde_json::Value;
use std::path::Path;
use url::Url;

/// A named browser window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const DESKTOP: Viewport = Viewport {
    name: "desktop",
    width: 1920,
    height: 1080,
};

pub const LAPTOP: Viewport = Viewport {
    name: "laptop",
    width: 1366,
    height: 768,
};

pub const TABLET: Viewport = Viewport {
    name: "tablet",
    width: 768,
    height: 1024,
};

pub const MOBILE: Viewport = Viewport {
    name: "mobile",
    width: 375,
    height: 812,
};

/// Viewports swept for screenshots and overlap diagnostics, in reporting order.
pub const VIEWPORTS: [Viewport; 4] = [DESKTOP, LAPTOP, TABLET, MOBILE];

/// Failure of a browser operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No browser can be driven from this environment.
    Unavailable(String),

    /// The browser answered, but the command failed.
    Command(String),

    /// The browser's answer could not be understood.
    Malformed(String),

    /// Local I/O around the browser failed (e.g. writing a screenshot).
    Io(String),
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "browser automation unavailable: {msg}"),
            Self::Command(msg) => write!(f, "browser command failed: {msg}"),
            Self::Malformed(msg) => write!(f, "unexpected browser response: {msg}"),
            Self::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl core::error::Error for ProbeError {}

/// Something that can open browser pages at a given viewport.
pub trait BrowserDriver: Send + Sync {
    type Page: BrowserPage;

    /// Check that a browser can actually be driven.
    fn ensure_available(&self) -> impl Future<Output = Result<(), ProbeError>> + Send;

    /// Open a fresh, isolated page sized to `viewport`.
    fn open_page(&self, viewport: Viewport) -> impl Future<Output = Result<Self::Page, ProbeError>> + Send;
}

/// One open browser page.
///
/// Callers must call [`close`](Self::close) on every path once the page has been opened.
pub trait BrowserPage: Send {
    /// Load `url` and wait for the load to complete.
    fn navigate(&mut self, url: &Url) -> impl Future<Output = Result<(), ProbeError>> + Send;

    /// Evaluate a synchronous script body and return what it returns.
    fn evaluate(&mut self, script: &str) -> impl Future<Output = Result<Value, ProbeError>> + Send;

    /// Evaluate a script body that reports its result through the callback passed as its last
    /// argument.
    fn evaluate_async(&mut self, script: &str) -> impl Future<Output = Result<Value, ProbeError>> + Send;

    /// Capture the visible viewport as a PNG at `path`.
    fn screenshot(&mut self, path: &Path) -> impl Future<Output = Result<(), ProbeError>> + Send;

    /// Release the page and everything the browser holds for it.
    fn close(self) -> impl Future<Output = ()> + Send;
}
