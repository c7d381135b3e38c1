//! Firmware identification

use std::fmt;

/// Firmware revisions below this predate part of the command set.
pub const MIN_SUPPORTED_REVISION: f32 = 2.23;

/// Placeholder version text installed when the device never answers the
/// version query. Fourteen characters, the same width as a real reply.
pub const INVALID_VERSION: &str = "invalidinvalid";

/// Identity reported by the version query: 14 ASCII characters such as
/// `GMC-300Re 4.20` — model text in the first ten, an f4.1 revision in
/// the last four.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    version: String,
    revision: Option<f32>,
}

impl DeviceInfo {
    /// Parse a version reply. Anything unparseable in the revision
    /// columns leaves the revision unknown, which counts as legacy.
    pub fn parse(version: impl Into<String>) -> Self {
        let version = version.into();
        let revision = version
            .get(10..14)
            .and_then(|s| s.trim().parse::<f32>().ok());
        Self { version, revision }
    }

    /// The placeholder identity used after a failed version query.
    pub fn invalid() -> Self {
        Self {
            version: INVALID_VERSION.to_string(),
            revision: None,
        }
    }

    /// Raw version text exactly as received.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Model portion of the version text, trailing padding removed.
    pub fn model(&self) -> &str {
        self.version.get(..10).unwrap_or(&self.version).trim_end()
    }

    /// Parsed firmware revision, if the reply carried one.
    pub fn revision(&self) -> Option<f32> {
        self.revision
    }

    /// True for firmware older than revision 2.23 (or with no readable
    /// revision). Legacy firmware does not support the full command set.
    pub fn is_legacy(&self) -> bool {
        match self.revision {
            Some(rev) => rev < MIN_SUPPORTED_REVISION,
            None => true,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(f, "{} (rev {rev})", self.model()),
            None => write!(f, "{} (rev unknown)", self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_model_and_revision() {
        let info = DeviceInfo::parse("GMC-300Re 4.20");
        assert_eq!(info.model(), "GMC-300Re");
        assert_eq!(info.revision(), Some(4.20));
        assert!(!info.is_legacy());
    }

    #[test]
    fn old_revision_is_legacy() {
        let info = DeviceInfo::parse("GMC-300Re 2.11");
        assert_eq!(info.revision(), Some(2.11));
        assert!(info.is_legacy());
    }

    #[test]
    fn boundary_revision_is_supported() {
        let info = DeviceInfo::parse("GMC-300Re 2.23");
        assert!(!info.is_legacy());
    }

    #[test]
    fn garbage_revision_is_legacy() {
        let info = DeviceInfo::parse("GMC-300Rev??.?");
        assert_eq!(info.revision(), None);
        assert!(info.is_legacy());
    }

    #[test]
    fn invalid_placeholder() {
        let info = DeviceInfo::invalid();
        assert_eq!(info.version(), "invalidinvalid");
        assert_eq!(info.revision(), None);
        assert!(info.is_legacy());
    }

    #[test]
    fn short_reply_has_no_revision() {
        let info = DeviceInfo::parse("GMC");
        assert_eq!(info.revision(), None);
        assert_eq!(info.model(), "GMC");
    }
}
