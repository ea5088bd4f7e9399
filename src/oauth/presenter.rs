//! Usage: Interactive authorization surface (system browser + loopback
//! redirect).

use crate::oauth::callback_server::{bind_callback_listener, wait_for_callback};
use crate::shared::error::OAuthError;
use async_trait::async_trait;
use std::process::Command;
use std::time::Duration;

/// Query parameters carried back on the authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A user-agent-mediated authorization session: takes the authorization URL,
/// resolves once the user agent redirects back to the registered callback.
///
/// Production uses [`BrowserPresenter`]; tests substitute scripted doubles.
#[async_trait]
pub trait AuthorizePresenter: Send + Sync {
    async fn present(&self, authorize_url: &str) -> Result<CallbackQuery, OAuthError>;
}

/// Opens the system browser and waits on a one-shot loopback listener bound
/// to the registered callback port.
pub struct BrowserPresenter {
    callback_port: u16,
    callback_path: String,
    timeout: Duration,
}

impl BrowserPresenter {
    pub fn new(callback_port: u16, callback_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            callback_port,
            callback_path: callback_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AuthorizePresenter for BrowserPresenter {
    async fn present(&self, authorize_url: &str) -> Result<CallbackQuery, OAuthError> {
        // Bind before opening the browser so the redirect cannot race the
        // listener.
        let listener = bind_callback_listener(self.callback_port)
            .await
            .map_err(OAuthError::PresenterFailed)?;

        open_browser(authorize_url).map_err(OAuthError::PresenterFailed)?;
        tracing::info!(
            port = self.callback_port,
            "waiting for authorization redirect"
        );

        wait_for_callback(listener, &self.callback_path, self.timeout)
            .await
            .map_err(OAuthError::PresenterFailed)
    }
}

fn open_browser(url: &str) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    {
        Command::new("rundll32.exe")
            .arg("url.dll,FileProtocolHandler")
            .arg(url)
            .spawn()
            .map_err(|e| format!("failed to open browser: {e}"))?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .spawn()
            .map_err(|e| format!("failed to open browser: {e}"))?;
        return Ok(());
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .map_err(|e| format!("failed to open browser: {e}"))?;
        return Ok(());
    }

    #[allow(unreachable_code)]
    Err("browser open is unsupported on this platform".to_string())
}
