use crate::remote::RemoteFailure;
use crate::token::SyncToken;
use std::fmt;

/// The store's advisory error state (`last_error`).
///
/// Never fatal: the local cache stays authoritative and the display layer only
/// shows [`SyncIssue::advisory`] to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIssue {
    /// A fetch failed; the list fell back to the local cache.
    RemoteUnavailable {
        token: Option<SyncToken>,
        failure: RemoteFailure,
    },
    /// A push failed; local state was kept.
    RemoteWriteFailed {
        token: SyncToken,
        failure: RemoteFailure,
    },
}

impl SyncIssue {
    pub fn failure(&self) -> &RemoteFailure {
        match self {
            SyncIssue::RemoteUnavailable { failure, .. } => failure,
            SyncIssue::RemoteWriteFailed { failure, .. } => failure,
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            SyncIssue::RemoteUnavailable { failure, .. } => match failure {
                RemoteFailure::PermissionDenied(_) => {
                    "Permission denied by the sync server. Using offline mode."
                }
                RemoteFailure::Network(_) => {
                    "Sync server unreachable. Check your connection; using offline mode."
                }
                RemoteFailure::NotFound => {
                    "No shared list exists for this sync code yet. Using local data."
                }
                _ => "Failed to sync from cloud. Using local data.",
            },
            SyncIssue::RemoteWriteFailed { failure, .. } => match failure {
                RemoteFailure::PermissionDenied(_) => {
                    "Permission denied by the sync server. Your wishes are saved locally."
                }
                _ => "Failed to sync to cloud. Your wishes are saved locally.",
            },
        }
    }
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.advisory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisories_are_never_empty() {
        let token = SyncToken::parse("ABC123").unwrap();
        let failures = [
            RemoteFailure::Network("down".into()),
            RemoteFailure::NotFound,
            RemoteFailure::PermissionDenied(403),
            RemoteFailure::Status(500),
            RemoteFailure::Malformed("bad".into()),
        ];
        for failure in failures {
            let read = SyncIssue::RemoteUnavailable {
                token: Some(token.clone()),
                failure: failure.clone(),
            };
            let write = SyncIssue::RemoteWriteFailed {
                token: token.clone(),
                failure,
            };
            assert!(!read.advisory().is_empty());
            assert!(!write.advisory().is_empty());
        }
    }

    #[test]
    fn permission_denied_has_its_own_wording() {
        let issue = SyncIssue::RemoteUnavailable {
            token: None,
            failure: RemoteFailure::PermissionDenied(401),
        };
        assert!(issue.to_string().contains("Permission denied"));
    }
}
