use thiserror::Error;

/// Failures talking to the browser automation backend.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Node.js browser server failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe to or from the browser server broke
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// Response line was not valid JSON
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be encoded
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Browser server answered `ok: false` or left out a required field
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },
}
