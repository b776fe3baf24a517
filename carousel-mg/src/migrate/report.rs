//! Migration reporter
//!
//! Line-oriented, human-readable progress and summary output. The caller
//! context only affects line-ending formatting: CLI runs print lines to
//! stdout as they happen, HTTP runs buffer them and render with `<br>`
//! separators for the response body. Purely observational; nothing here
//! touches the database.

use tracing::info;

/// Where the report is going, which decides line endings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Cli,
    Http,
}

/// Accumulates report lines and echoes them as they are emitted
#[derive(Debug)]
pub struct Reporter {
    mode: OutputMode,
    lines: Vec<String>,
}

impl Reporter {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            lines: Vec::new(),
        }
    }

    /// Emit one report line
    ///
    /// CLI mode prints immediately so progress is visible during long runs;
    /// HTTP mode mirrors non-empty lines to the server log instead.
    pub fn line(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        match self.mode {
            OutputMode::Cli => println!("{}", msg),
            OutputMode::Http => {
                if !msg.is_empty() {
                    info!("{}", msg);
                }
            }
        }
        self.lines.push(msg);
    }

    /// Emit an empty spacer line
    pub fn blank(&mut self) {
        self.line("");
    }

    /// All lines emitted so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the full report with mode-appropriate line endings
    pub fn render(&self) -> String {
        let separator = match self.mode {
            OutputMode::Cli => "\n",
            OutputMode::Http => "<br>\n",
        };

        let mut out = self.lines.join(separator);
        if !out.is_empty() {
            out.push_str(separator);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_rendering() {
        let mut report = Reporter::new(OutputMode::Cli);
        report.line("first");
        report.line("second");

        assert_eq!(report.render(), "first\nsecond\n");
    }

    #[test]
    fn test_http_rendering() {
        let mut report = Reporter::new(OutputMode::Http);
        report.line("first");
        report.blank();
        report.line("second");

        assert_eq!(report.render(), "first<br>\n<br>\nsecond<br>\n");
    }

    #[test]
    fn test_empty_report_renders_empty() {
        let report = Reporter::new(OutputMode::Http);
        assert_eq!(report.render(), "");
    }
}
