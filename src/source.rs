//! Document sources: where the raw PDF bytes come from.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::pdf::PdfError;

/// Anything that can produce the full byte content of a document.
pub trait SourceProvider {
    fn read_bytes(&self) -> io::Result<Vec<u8>>;

    /// Human-readable name for logs.
    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

impl SourceProvider for [u8] {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl SourceProvider for Vec<u8> {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// A PDF staged on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a launch argument: a plain path, a `file://` URL, or a
    /// percent-encoded path (e.g. spaces as %20).
    pub fn from_arg(arg: &str) -> Result<Self, PdfError> {
        // First try as a direct file path
        if Path::new(arg).is_file() {
            return Ok(Self::new(arg));
        }

        if arg.starts_with("file://") {
            if let Some(path) = url::Url::parse(arg)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .filter(|path| path.is_file())
            {
                debug!("Resolved file URL {} to {}", arg, path.display());
                return Ok(Self::new(path));
            }
        }

        if let Ok(decoded) = urlencoding::decode(arg) {
            if decoded != arg && Path::new(decoded.as_ref()).is_file() {
                debug!("Resolved URL-encoded path {} to {}", arg, decoded);
                return Ok(Self::new(decoded.into_owned()));
            }
        }

        Err(PdfError::unreadable(format!("no such file: {}", arg)))
    }
}

impl SourceProvider for FileSource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read the whole source, mapping failures onto the open-error taxonomy.
pub fn read_source<S>(source: &S) -> Result<Vec<u8>, PdfError>
where
    S: SourceProvider + ?Sized,
{
    let bytes = source.read_bytes().map_err(PdfError::unreadable)?;
    if bytes.is_empty() {
        return Err(PdfError::empty());
    }
    debug!("Read {} bytes from {}", bytes.len(), source.describe());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::OpenFailure;
    use std::io::Write;

    #[test]
    fn reads_plain_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let source = FileSource::from_arg(file.path().to_str().unwrap()).unwrap();
        assert_eq!(read_source(&source).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn resolves_file_url_and_percent_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my doc.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let url = url::Url::from_file_path(&path).unwrap();
        assert_eq!(FileSource::from_arg(url.as_str()).unwrap().path(), path);

        let encoded = path.to_str().unwrap().replace(' ', "%20");
        assert_eq!(FileSource::from_arg(&encoded).unwrap().path(), path);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = FileSource::from_arg("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, PdfError::OpenError(OpenFailure::Unreadable(_))));

        let err = read_source(&FileSource::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::OpenError(OpenFailure::Unreadable(_))));
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = read_source(&Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, PdfError::OpenError(OpenFailure::Empty)));

        let file = tempfile::NamedTempFile::new().unwrap();
        let err = read_source(&FileSource::new(file.path())).unwrap_err();
        assert!(matches!(err, PdfError::OpenError(OpenFailure::Empty)));
    }
}
