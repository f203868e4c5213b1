use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::driver::{Driver, Locator};
use crate::browser::error::SessionError;

/// Default path of the Playwright bridge script.
pub const DEFAULT_SERVER_SCRIPT: &str = "node/browser_server.js";

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate {
        url: String,
    },
    CurrentUrl,
    Count {
        target: Locator,
    },
    Visible {
        target: Locator,
        nth: usize,
    },
    Text {
        target: Locator,
        nth: usize,
    },
    Value {
        target: Locator,
        nth: usize,
    },
    Clear {
        target: Locator,
        nth: usize,
    },
    Type {
        target: Locator,
        nth: usize,
        text: String,
    },
    Select {
        target: Locator,
        nth: usize,
        value: String,
    },
    Click {
        target: Locator,
        nth: usize,
    },
    Wait {
        duration_ms: u64,
    },
    Quit,
}

impl BrowserRequest {
    /// Command name as it appears on the wire, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::CurrentUrl => "current_url",
            BrowserRequest::Count { .. } => "count",
            BrowserRequest::Visible { .. } => "visible",
            BrowserRequest::Text { .. } => "text",
            BrowserRequest::Value { .. } => "value",
            BrowserRequest::Clear { .. } => "clear",
            BrowserRequest::Type { .. } => "type",
            BrowserRequest::Select { .. } => "select",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::Wait { .. } => "wait",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout, strictly
/// one response per request.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the given bridge script.
    pub fn launch(script: &str) -> Result<Self, SessionError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SessionError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            SessionError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            SessionError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let response = read_response(&mut reader, "ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(SessionError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        debug!(script, "browser session ready");

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            closed: false,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, SessionError> {
        let json = serde_json::to_string(request).map_err(|e| SessionError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        debug!(request = %json, "browser command");

        writeln!(self.stdin, "{}", json).map_err(|e| {
            SessionError::SessionIO(format!("Failed to write to browser server stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            SessionError::SessionIO(format!("Failed to flush browser server stdin: {}", e))
        })?;

        read_response(&mut self.reader, "browser server response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, SessionError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(SessionError::SessionProtocol {
                command: request.name().into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort: the process may already be gone
        if let Err(e) = self.send(&BrowserRequest::Quit) {
            warn!(error = %e, "browser server did not acknowledge quit");
        }
        let _ = self.child.wait();
        Ok(())
    }
}

impl Driver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Navigate { url: url.to_string() })?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, SessionError> {
        let response = self.send_ok(&BrowserRequest::CurrentUrl)?;
        response.url.ok_or_else(|| SessionError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, SessionError> {
        let response = self.send_ok(&BrowserRequest::Count {
            target: locator.clone(),
        })?;
        Ok(response.count.unwrap_or(0))
    }

    fn is_visible(&mut self, locator: &Locator, nth: usize) -> Result<bool, SessionError> {
        let response = self.send_ok(&BrowserRequest::Visible {
            target: locator.clone(),
            nth,
        })?;
        Ok(response.visible.unwrap_or(false))
    }

    fn text(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError> {
        let response = self.send_ok(&BrowserRequest::Text {
            target: locator.clone(),
            nth,
        })?;
        Ok(response.text)
    }

    fn value(&mut self, locator: &Locator, nth: usize) -> Result<Option<String>, SessionError> {
        let response = self.send_ok(&BrowserRequest::Value {
            target: locator.clone(),
            nth,
        })?;
        Ok(response.value)
    }

    fn clear(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Clear {
            target: locator.clone(),
            nth,
        })?;
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, nth: usize, text: &str) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Type {
            target: locator.clone(),
            nth,
            text: text.to_string(),
        })?;
        Ok(())
    }

    fn select(&mut self, locator: &Locator, nth: usize, value: &str) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Select {
            target: locator.clone(),
            nth,
            value: value.to_string(),
        })?;
        Ok(())
    }

    fn click(&mut self, locator: &Locator, nth: usize) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Click {
            target: locator.clone(),
            nth,
        })?;
        Ok(())
    }

    fn pause(&mut self, ms: u64) -> Result<(), SessionError> {
        self.send_ok(&BrowserRequest::Wait { duration_ms: ms })?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

fn read_response(
    reader: &mut BufReader<ChildStdout>,
    context: &str,
) -> Result<BrowserResponse, SessionError> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(|e| {
        SessionError::SessionIO(format!("Failed to read {}: {}", context, e))
    })?;

    if line.trim().is_empty() {
        return Err(SessionError::SessionIO(format!(
            "Empty {} (process may have died)",
            context
        )));
    }

    serde_json::from_str(line.trim()).map_err(|e| SessionError::JsonParse {
        context: context.to_string(),
        source: e,
    })
}
