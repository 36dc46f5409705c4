mod driver;
mod probes;
mod provider;
mod webdriver;

const LOG_TARGET: &str = "   browser";

pub use driver::{BrowserDriver, BrowserPage, DESKTOP, LAPTOP, MOBILE, ProbeError, TABLET, VIEWPORTS, Viewport};
pub use provider::{DESKTOP_LABEL, DISABLED_REASON, MOBILE_LABEL, Provider, SERVICE_NAME, Settle, VisualMode, VisualRun, VisualStatus};
pub use webdriver::{WebDriver, WebDriverPage};
