//! Lazy component version probing.
//!
//! A candidate's concrete version may be absent from the component
//! manifest; arbitration then inspects the artifact itself, and only when
//! a conflict actually requires the version. Inspection sits behind a
//! trait so hosts embedding other artifact containers can supply their own
//! reader.

use std::path::Path;

use async_trait::async_trait;
use semver::Version;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Magic bytes opening a component artifact header.
pub const COMPONENT_MAGIC: &[u8; 8] = b"QUAYCMP\0";

/// Longest version string the header format admits.
const MAX_VERSION_LEN: usize = u8::MAX as usize;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("artifact does not start with a component header")]
    BadMagic,

    #[error("component header is truncated")]
    Truncated,

    #[error("component header version is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("component header version does not parse: {0}")]
    Version(#[from] semver::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads the concrete version out of a component artifact.
#[async_trait]
pub trait ComponentInspector: Send + Sync {
    /// `Ok(None)` means the artifact carries no version information;
    /// arbitration then treats the candidate as never newer than a
    /// competitor.
    async fn probe(&self, path: &Path) -> Result<Option<Version>, ProbeError>;
}

/// Inspector for the native artifact container: an 8-byte magic, a
/// one-byte length, and a UTF-8 semver string.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderInspector;

#[async_trait]
impl ComponentInspector for HeaderInspector {
    async fn probe(&self, path: &Path) -> Result<Option<Version>, ProbeError> {
        let file = tokio::fs::File::open(path).await?;
        let mut header = Vec::with_capacity(COMPONENT_MAGIC.len() + 1 + MAX_VERSION_LEN);
        file.take((COMPONENT_MAGIC.len() + 1 + MAX_VERSION_LEN) as u64)
            .read_to_end(&mut header)
            .await?;
        parse_header(&header).map(Some)
    }
}

/// Encode a header for `version`, as written by the packaging side.
/// Exposed for fixtures and packaging tooling.
pub fn header_bytes(version: &Version) -> Vec<u8> {
    let rendered = version.to_string();
    debug_assert!(rendered.len() <= MAX_VERSION_LEN);
    let mut bytes = Vec::with_capacity(COMPONENT_MAGIC.len() + 1 + rendered.len());
    bytes.extend_from_slice(COMPONENT_MAGIC);
    bytes.push(rendered.len() as u8);
    bytes.extend_from_slice(rendered.as_bytes());
    bytes
}

fn parse_header(bytes: &[u8]) -> Result<Version, ProbeError> {
    let Some(magic) = bytes.get(..COMPONENT_MAGIC.len()) else {
        return Err(ProbeError::Truncated);
    };
    if magic != COMPONENT_MAGIC {
        return Err(ProbeError::BadMagic);
    }
    let Some(&len) = bytes.get(COMPONENT_MAGIC.len()) else {
        return Err(ProbeError::Truncated);
    };
    let start = COMPONENT_MAGIC.len() + 1;
    let raw = bytes
        .get(start..start + len as usize)
        .ok_or(ProbeError::Truncated)?;
    Ok(Version::parse(std::str::from_utf8(raw)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn probes_the_header_version() {
        let mut artifact = tempfile::NamedTempFile::new().expect("tempfile");
        artifact
            .write_all(&header_bytes(&Version::new(2, 3, 1)))
            .expect("write header");
        artifact.write_all(b"payload bytes").expect("write payload");

        let probed = HeaderInspector
            .probe(artifact.path())
            .await
            .expect("probe");
        assert_eq!(probed, Some(Version::new(2, 3, 1)));
    }

    #[tokio::test]
    async fn rejects_a_foreign_file() {
        let mut artifact = tempfile::NamedTempFile::new().expect("tempfile");
        artifact.write_all(b"ELF or whatever").expect("write");

        let err = HeaderInspector
            .probe(artifact.path())
            .await
            .expect_err("foreign file");
        assert!(matches!(err, ProbeError::BadMagic));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let mut bytes = header_bytes(&Version::new(1, 0, 0));
        bytes.truncate(COMPONENT_MAGIC.len() + 2);
        assert!(matches!(parse_header(&bytes), Err(ProbeError::Truncated)));
    }

    #[test]
    fn garbage_version_string_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(COMPONENT_MAGIC);
        bytes.push(3);
        bytes.extend_from_slice(b"abc");
        assert!(matches!(parse_header(&bytes), Err(ProbeError::Version(_))));
    }
}
