//! Indexer and download-client models.

use serde::{Deserialize, Serialize};

/// One indexer search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release title as published.
    pub title: String,
    /// URL of the NZB payload.
    pub link: String,
}

/// A group in the download client's queue or history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDownload {
    pub name: String,
    pub status: String,
}

impl ActiveDownload {
    /// Deleted and failed groups no longer count as in progress.
    pub fn is_live(&self) -> bool {
        let status = self.status.to_uppercase();
        !(status.starts_with("DELETED") || status.starts_with("FAILURE") || status == "FAILED")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_live() {
        let live = |status: &str| {
            ActiveDownload {
                name: "x".to_string(),
                status: status.to_string(),
            }
            .is_live()
        };
        assert!(live("DOWNLOADING"));
        assert!(live("QUEUED"));
        assert!(live("SUCCESS/ALL"));
        assert!(!live("DELETED"));
        assert!(!live("DELETED/MANUAL"));
        assert!(!live("FAILURE/PAR"));
        assert!(!live("FAILED"));
    }
}
