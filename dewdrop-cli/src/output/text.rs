//! Text output formatting with colors.

use dewdrop_core::{ConnectionStatus, DiscoveryReport, EndpointReport, Session, SessionStatus};
use dewdrop_store::TranscriptView;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const ID_WIDTH: usize = 22;
const NAME_WIDTH: usize = 34;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Formats a session listing under a connection header.
    pub fn format_sessions(&self, sessions: &[Session], status: ConnectionStatus) -> String {
        let mut lines = vec![self.format_connection(status), "─".repeat(80)];

        if sessions.is_empty() {
            lines.push(self.dim("No sessions"));
            return lines.join("\n");
        }

        lines.push(self.bold(&format!(
            "{:<ID_WIDTH$} {:<NAME_WIDTH$} {:<9} {:>8}  {}",
            "ID", "Name", "Status", "Length", "Started (UTC)"
        )));
        for session in sessions {
            lines.push(self.format_session_line(session));
        }

        lines.join("\n")
    }

    /// Formats a single session line.
    pub fn format_session_line(&self, session: &Session) -> String {
        let status = self.session_status(
            &format!("{:<9}", session.status.label()),
            session.status,
        );
        let duration = session
            .formatted_duration()
            .unwrap_or_else(|| "−".to_string());

        format!(
            "{:<ID_WIDTH$} {:<NAME_WIDTH$} {} {:>8}  {}",
            truncate(&session.id, ID_WIDTH),
            truncate(&session.display_name, NAME_WIDTH),
            status,
            duration,
            session.created_at.format("%Y-%m-%d %H:%M")
        )
    }

    /// Formats an empty search result.
    pub fn format_no_matches(&self, query: &str) -> String {
        self.dim(&format!("No sessions match '{query}'"))
    }

    // ========================================================================
    // Transcript
    // ========================================================================

    /// Formats a transcript with a short header.
    pub fn format_transcript(&self, view: &TranscriptView, session: Option<&Session>) -> String {
        let title = session.map_or(view.session_id.as_str(), |s| s.display_name.as_str());
        let mut lines = vec![self.bold(title)];

        if view.is_synthetic {
            lines.push(self.yellow("Transcript unavailable, showing demo transcript"));
        } else if let (Some(strategy), Some(source)) = (&view.strategy_id, &view.source) {
            lines.push(self.dim(&format!("via {strategy} ({source})")));
        }

        if let Some(session) = session {
            let participants: Vec<&str> = session.participants.iter().map(|p| p.name.as_str()).collect();
            if !participants.is_empty() {
                lines.push(format!("Participants: {}", self.cyan(&participants.join(", "))));
            }
        }

        lines.push("─".repeat(60));
        if view.text.is_empty() {
            lines.push(self.dim("(empty transcript)"));
        } else {
            lines.push(view.text.clone());
        }

        lines.join("\n")
    }

    /// Formats the strategies tried while resolving a transcript.
    pub fn format_attempts(&self, view: &TranscriptView) -> String {
        if view.attempts.is_empty() {
            return self.dim("No strategies tried");
        }

        let mut lines = vec![self.bold("Strategies tried:")];
        for attempt in &view.attempts {
            let mark = if attempt.success {
                self.green("✓")
            } else {
                self.red("✗")
            };
            let mut line = format!(
                "{} {:<20} {:<17} {:>5}ms",
                mark,
                attempt.strategy_id,
                attempt.kind.to_string(),
                attempt.duration.as_millis()
            );
            if let Some(error) = &attempt.error {
                line.push_str(&format!("  {}", self.dim(error)));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    // ========================================================================
    // Status and Diagnostics
    // ========================================================================

    /// Formats the status summary.
    pub fn format_status(
        &self,
        status: ConnectionStatus,
        report: Option<&DiscoveryReport>,
        sessions: usize,
    ) -> String {
        let mut lines = vec![format!("Status:    {}", self.format_connection(status))];

        if let Some(report) = report {
            lines.push(format!(
                "Auth:      {} ({})",
                report.auth_scheme.label(),
                if report.auth_confirmed { "confirmed" } else { "assumed" }
            ));
            lines.push(format!(
                "Endpoints: {}/{} answered",
                report.success_count(),
                report.endpoints.len()
            ));
            lines.push(format!(
                "Checked:   {}",
                report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        let demo = if status.serves_synthetic() { " (demo data)" } else { "" };
        lines.push(format!("Sessions:  {sessions}{demo}"));

        lines.join("\n")
    }

    /// Formats the per-endpoint discovery report.
    pub fn format_report(&self, report: &DiscoveryReport, status: ConnectionStatus) -> String {
        let mut lines = vec![
            self.format_connection(status),
            format!(
                "Auth scheme: {} ({})",
                report.auth_scheme.label(),
                if report.auth_confirmed { "confirmed" } else { "assumed" }
            ),
            "─".repeat(80),
        ];

        for endpoint in &report.endpoints {
            lines.push(self.format_endpoint(endpoint));
        }

        lines.push(String::new());
        lines.push(format!(
            "{}/{} endpoints answered",
            report.success_count(),
            report.endpoints.len()
        ));

        lines.join("\n")
    }

    fn format_endpoint(&self, endpoint: &EndpointReport) -> String {
        let mark = if endpoint.is_success() {
            self.green("✓")
        } else {
            self.red("✗")
        };
        let code = endpoint
            .http_status
            .map_or_else(|| "−".to_string(), |c| c.to_string());

        let mut line = format!(
            "{} {:<38} {:>4} {:<20} {:>5}ms",
            mark,
            endpoint.path,
            code,
            endpoint.shape.label(),
            endpoint.latency_ms
        );
        if let Some(error) = &endpoint.error {
            line.push_str(&format!("\n  {}", self.dim(error)));
        }
        line
    }

    fn format_connection(&self, status: ConnectionStatus) -> String {
        let text = status.to_string();
        let text = match status {
            ConnectionStatus::ConnectedReal => self.green(&text),
            ConnectionStatus::ConnectedEmpty | ConnectionStatus::Checking => self.yellow(&text),
            ConnectionStatus::Disconnected => self.red(&text),
        };

        if status.serves_synthetic() {
            format!("{}  {}", self.bold(&text), self.dim("showing demo data"))
        } else {
            self.bold(&text)
        }
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn session_status(&self, text: &str, status: SessionStatus) -> String {
        match status {
            SessionStatus::Live => self.green(text),
            SessionStatus::Completed => text.to_string(),
            SessionStatus::Unknown => self.dim(text),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Shortens `text` to `width` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
