use thiserror::Error;

/// # Summary
/// Notification domain error enum.
///
/// # Invariants
/// - Must derive `Error` via `thiserror`.
/// - `Config` is raised while wiring a notifier, or when a transport finds its
///   configured endpoint unusable.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Wiring or configuration defect (missing options, no active channel)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A message builder rejected the notification
    #[error("Build error: {0}")]
    Build(String),

    /// The remote side refused our credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The transport gave up waiting for the remote side
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The delivery platform answered with an error (e.g. SMS gateway 5xx)
    #[error("Platform error: {0}")]
    Platform(String),

    /// Several independent causes reported by a fan-out transport
    #[error("Aggregate error: {} failure(s)", .0.len())]
    Aggregate(Vec<NotifyError>),
}

impl NotifyError {
    /// # Summary
    /// Whether the error was produced while transmitting a message.
    ///
    /// # Returns
    /// * `true` for transport-side failures and aggregates of them.
    pub fn is_transmission(&self) -> bool {
        matches!(
            self,
            NotifyError::Auth(_)
                | NotifyError::Network(_)
                | NotifyError::Timeout(_)
                | NotifyError::Platform(_)
                | NotifyError::Aggregate(_)
        )
    }

    /// # Summary
    /// Leaf causes of this error.
    ///
    /// # Logic
    /// 1. Non-aggregate errors yield themselves.
    /// 2. Aggregates are expanded recursively, so nested aggregates never
    ///    appear in the output.
    ///
    /// # Returns
    /// * Borrowed leaf errors in their original order.
    pub fn flatten(&self) -> Vec<&NotifyError> {
        match self {
            NotifyError::Aggregate(causes) => causes.iter().flat_map(|c| c.flatten()).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_expands_nested_aggregates() {
        let err = NotifyError::Aggregate(vec![
            NotifyError::Network("a".into()),
            NotifyError::Aggregate(vec![
                NotifyError::Timeout("b".into()),
                NotifyError::Auth("c".into()),
            ]),
        ]);

        let leaves: Vec<String> = err.flatten().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            leaves,
            vec!["Network error: a", "Timeout: b", "Authentication error: c"]
        );
        assert_eq!(err.to_string(), "Aggregate error: 2 failure(s)");
    }

    #[test]
    fn test_is_transmission() {
        assert!(NotifyError::Network("x".into()).is_transmission());
        assert!(NotifyError::Aggregate(vec![]).is_transmission());
        assert!(!NotifyError::Config("x".into()).is_transmission());
        assert!(!NotifyError::Build("x".into()).is_transmission());
    }
}
