//! OpenDocument package (ZIP container) handling.

use crate::common::{Error, Result};
use std::cell::RefCell;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Read access to the entries of an opened package.
///
/// This is the seam between ingestion and storage: [`OdtPackage`]
/// implements it over a real ZIP archive, and tests implement it over a
/// map. Entry names are package-relative paths as stored in the archive.
pub trait ArchiveReader {
    /// Returns the decompressed size of an entry, or `None` if no entry
    /// with that name exists.
    fn entry_size(&self, name: &str) -> Option<u64>;

    /// Reads the full decompressed bytes of an entry.
    fn entry_bytes(&self, name: &str) -> Result<Vec<u8>>;

    /// Returns `true` if an entry with that name exists.
    fn has_entry(&self, name: &str) -> bool {
        self.entry_size(name).is_some()
    }
}

/// An OpenDocument Text package: a ZIP archive with a `mimetype` entry.
///
/// The mimetype is read eagerly at open time; everything else is read on
/// demand. The archive lives behind a [`RefCell`] because the `zip` crate
/// needs `&mut` for entry access while this type's read methods take
/// `&self`.
pub struct OdtPackage<R> {
    archive: RefCell<zip::ZipArchive<R>>,
    mimetype: String,
}

impl OdtPackage<Cursor<Vec<u8>>> {
    /// Opens a package file, reading it fully into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> OdtPackage<R> {
    /// Opens a package from any seekable reader.
    ///
    /// Fails with [`Error::MalformedInput`] if the bytes are not a valid
    /// ZIP archive and [`Error::UnsupportedFormat`] if the archive has no
    /// `mimetype` entry.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mimetype = read_mimetype(&mut archive)?;
        Ok(Self {
            archive: RefCell::new(archive),
            mimetype,
        })
    }

    /// Returns the package MIME type, trimmed.
    #[inline]
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Reads the full contents of a package part.
    ///
    /// Fails with [`Error::UnsupportedFormat`] if the part is absent.
    pub fn file(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut entry = archive
            .by_name(path)
            .map_err(|_| Error::UnsupportedFormat(format!("missing package part: {path}")))?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Returns `true` if the package contains the given part.
    pub fn has_file(&self, path: &str) -> bool {
        self.archive.borrow_mut().by_name(path).is_ok()
    }

    /// Returns the decompressed size of a part without reading it.
    pub fn file_size(&self, path: &str) -> Option<u64> {
        self.archive
            .borrow_mut()
            .by_name(path)
            .ok()
            .map(|entry| entry.size())
    }

    /// Lists all entry names in the package.
    pub fn file_names(&self) -> Vec<String> {
        let mut archive = self.archive.borrow_mut();
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            if let Ok(entry) = archive.by_index(i) {
                names.push(entry.name().to_string());
            }
        }
        names
    }
}

impl<R: Read + Seek> ArchiveReader for OdtPackage<R> {
    fn entry_size(&self, name: &str) -> Option<u64> {
        self.file_size(name)
    }

    fn entry_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.file(name)
    }

    fn has_entry(&self, name: &str) -> bool {
        self.has_file(name)
    }
}

fn read_mimetype<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<String> {
    let mut entry = archive.by_name("mimetype").map_err(|_| {
        Error::UnsupportedFormat("no mimetype entry found in package".to_string())
    })?;
    let mut mimetype = String::new();
    entry.read_to_string(&mut mimetype)?;
    Ok(mimetype.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            let options = if *name == "mimetype" {
                SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Stored)
            } else {
                SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated)
            };
            writer.start_file(*name, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_mimetype_trimmed() {
        let bytes = build_archive(&[(
            "mimetype",
            b"application/vnd.oasis.opendocument.text\n".as_slice(),
        )]);
        let package = OdtPackage::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(package.mimetype(), "application/vnd.oasis.opendocument.text");
    }

    #[test]
    fn missing_mimetype_is_unsupported() {
        let bytes = build_archive(&[("content.xml", b"<x/>".as_slice())]);
        let err = OdtPackage::from_reader(Cursor::new(bytes)).err().unwrap();
        assert!(matches!(err, Error::UnsupportedFormat(_)), "{err}");
    }

    #[test]
    fn garbage_bytes_are_malformed_input() {
        let err = OdtPackage::from_reader(Cursor::new(b"not a zip".to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, Error::MalformedInput(_)), "{err}");
    }

    #[test]
    fn file_reads_decompressed_contents() {
        let bytes = build_archive(&[
            ("mimetype", b"application/vnd.oasis.opendocument.text".as_slice()),
            ("content.xml", b"<office:document-content/>".as_slice()),
        ]);
        let package = OdtPackage::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(
            package.file("content.xml").unwrap(),
            b"<office:document-content/>".to_vec()
        );
        assert!(package.has_file("content.xml"));
        assert!(!package.has_file("styles.xml"));
        assert!(matches!(
            package.file("styles.xml").unwrap_err(),
            Error::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn file_size_reports_decompressed_length() {
        // Highly compressible payload: the decompressed size must win.
        let payload = vec![0u8; 4096];
        let bytes = build_archive(&[
            ("mimetype", b"application/vnd.oasis.opendocument.text".as_slice()),
            ("Pictures/zeroes.bin", payload.as_slice()),
        ]);
        let package = OdtPackage::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(package.file_size("Pictures/zeroes.bin"), Some(4096));
        assert_eq!(package.file_size("Pictures/other.bin"), None);
    }

    #[test]
    fn archive_reader_trait_mirrors_inherent_methods() {
        let bytes = build_archive(&[
            ("mimetype", b"application/vnd.oasis.opendocument.text".as_slice()),
            ("content.xml", b"<x/>".as_slice()),
        ]);
        let package = OdtPackage::from_reader(Cursor::new(bytes)).unwrap();
        let reader: &dyn ArchiveReader = &package;
        assert!(reader.has_entry("content.xml"));
        assert_eq!(reader.entry_size("content.xml"), Some(4));
        assert_eq!(reader.entry_bytes("content.xml").unwrap(), b"<x/>".to_vec());
    }

    #[test]
    fn open_reads_package_from_disk() {
        let bytes = build_archive(&[(
            "mimetype",
            b"application/vnd.oasis.opendocument.text".as_slice(),
        )]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.odt");
        std::fs::write(&path, &bytes).unwrap();
        let package = OdtPackage::open(&path).unwrap();
        assert_eq!(package.mimetype(), "application/vnd.oasis.opendocument.text");
        assert!(OdtPackage::open(dir.path().join("absent.odt")).is_err());
    }

    #[test]
    fn file_names_lists_all_entries() {
        let bytes = build_archive(&[
            ("mimetype", b"application/vnd.oasis.opendocument.text".as_slice()),
            ("content.xml", b"<x/>".as_slice()),
            ("Pictures/img.png", b"png".as_slice()),
        ]);
        let package = OdtPackage::from_reader(Cursor::new(bytes)).unwrap();
        let names = package.file_names();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"Pictures/img.png".to_string()));
    }
}
