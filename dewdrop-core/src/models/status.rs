//! Connection status of the orchestrator.

use serde::{Deserialize, Serialize};

// ============================================================================
// Connection Status
// ============================================================================

/// Connection state of the discovery client.
///
/// Every refresh starts in `Checking` and settles on one of the three
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    /// A discovery cycle is running and nothing has been published yet.
    #[default]
    Checking,
    /// Real sessions were discovered and are published.
    ConnectedReal,
    /// The API answered but yielded no sessions; synthetic data is published.
    ConnectedEmpty,
    /// No endpoint answered; synthetic data is published.
    Disconnected,
}

impl ConnectionStatus {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::ConnectedReal => "Connected",
            Self::ConnectedEmpty => "Connected (no sessions)",
            Self::Disconnected => "Disconnected",
        }
    }

    /// Returns an emoji for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Checking => "⚪",
            Self::ConnectedReal => "🟢",
            Self::ConnectedEmpty => "🟡",
            Self::Disconnected => "🔴",
        }
    }

    /// Returns true if the upstream API answered in the last cycle.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::ConnectedReal | Self::ConnectedEmpty)
    }

    /// Returns true if published sessions are synthetic.
    pub fn serves_synthetic(&self) -> bool {
        matches!(self, Self::ConnectedEmpty | Self::Disconnected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_status_display() {
        assert_eq!(ConnectionStatus::ConnectedReal.to_string(), "🟢 Connected");
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "🔴 Disconnected");
    }

    #[test]
    fn test_connection_status_flags() {
        assert!(!ConnectionStatus::Checking.is_connected());
        assert!(ConnectionStatus::ConnectedEmpty.is_connected());
        assert!(ConnectionStatus::ConnectedEmpty.serves_synthetic());
        assert!(ConnectionStatus::Disconnected.serves_synthetic());
        assert!(!ConnectionStatus::ConnectedReal.serves_synthetic());
    }
}
