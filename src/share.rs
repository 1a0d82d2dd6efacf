//! Sharing a stage clear
//!
//! The session only builds the payload. Opening it goes through a
//! [`LinkOpener`] chosen at the platform boundary, and any failure there is
//! logged and dropped so it never interrupts play.

use thiserror::Error;

/// Post-intent endpoint the share text is appended to
pub const SHARE_ENDPOINT: &str = "https://x.com/intent/post?text=";
/// Project page linked from the share text
pub const PROJECT_URL: &str = "https://github.com/gomatama5/Jump_Jump_Bouncing_Ball";
pub const HASHTAGS: &str = "#rustlang #rapier";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("no browser window available")]
    NoWindow,
    #[error("the browser refused to open a new window")]
    Blocked,
    #[error("failed to launch the system opener: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("system opener exited with {0}")]
    Status(std::process::ExitStatus),
}

/// Capability to open an external link
pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<(), ShareError>;
}

/// Opens nothing. For headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOpener;

impl LinkOpener for NullOpener {
    fn open(&self, url: &str) -> Result<(), ShareError> {
        log::info!("Share link: {url}");
        Ok(())
    }
}

/// Opens links in a new browser tab
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

#[cfg(target_arch = "wasm32")]
impl LinkOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<(), ShareError> {
        let window = web_sys::window().ok_or(ShareError::NoWindow)?;
        match window.open_with_url_and_target(url, "_blank") {
            Ok(Some(_)) => Ok(()),
            _ => Err(ShareError::Blocked),
        }
    }
}

/// Opens links with the desktop's default handler
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

#[cfg(not(target_arch = "wasm32"))]
impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), ShareError> {
        use std::process::Command;

        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };
        let status = command.arg(url).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Status(status))
        }
    }
}

/// The opener for the current platform
pub fn platform_opener() -> Box<dyn LinkOpener> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(BrowserOpener)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(SystemOpener)
    }
}

/// Human-readable share text
pub fn share_text(clear_time: f32, seed: u64) -> String {
    format!(
        "🎮 Jump Jump Bouncing Ball CLEAR!\n📌 Time: {clear_time:.2} sec [Stage: {seed}]\n{PROJECT_URL}\n{HASHTAGS}"
    )
}

/// Full post-intent URL for a clear
pub fn share_url(clear_time: f32, seed: u64) -> String {
    format!("{SHARE_ENDPOINT}{}", percent_encode(&share_text(clear_time, seed)))
}

/// Open the share link for a clear. Failures are logged and swallowed.
pub fn share_clear(opener: &dyn LinkOpener, clear_time: f32, seed: u64) -> bool {
    match opener.open(&share_url(clear_time, seed)) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Share failed: {e}");
            false
        }
    }
}

/// Percent-encode UTF-8 text, leaving unreserved characters and `/` intact.
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
