//! Read contract files (`.abi`, `.wasm`) from disk, either directly or from
//! inside a zip archive.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::{InvalidValue, JsonError};


#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    #[snafu(display("cannot read file: {}", path.display()))]
    Io { path: PathBuf, source: std::io::Error },

    #[snafu(display("cannot open zip archive: {}", path.display()))]
    Zip { path: PathBuf, source: ZipError },

    #[snafu(display(r#"zip archive {} does not contain file "{entry}""#, path.display()))]
    MissingEntry { path: PathBuf, entry: String },

    #[snafu(display("file does not contain valid JSON"))]
    Json { source: JsonError },

    #[snafu(display("file does not contain a valid ABI"))]
    InvalidAbi { source: InvalidValue },
}


/// Read the full content of the file at `path`.
///
/// `ext` is the extension that the file is expected to have. A file with
/// another extension is still read, but a warning is emitted.
///
/// If `path` is a zip archive, the content of its `<stem>.<ext>` entry is
/// returned instead, eg: `contract.wasm` inside `contract.zip`.
pub fn load_bytes(path: impl AsRef<Path>, ext: &str) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let actual_ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    if actual_ext.eq_ignore_ascii_case("zip") {
        return load_from_zip(path, ext);
    }
    if !actual_ext.eq_ignore_ascii_case(ext) {
        warn!("loading file {} which does not have a .{} extension", path.display(), ext);
    }

    let data = fs::read(path).context(IoSnafu { path })?;
    debug!("loaded {} bytes from {}", data.len(), path.display());
    Ok(data)
}

fn load_from_zip(path: &Path, ext: &str) -> Result<Vec<u8>, LoadError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let entry = format!("{stem}.{ext}");

    let file = File::open(path).context(IoSnafu { path })?;
    let mut archive = ZipArchive::new(file).context(ZipSnafu { path })?;
    let mut zipped = match archive.by_name(&entry) {
        Ok(zipped) => zipped,
        Err(ZipError::FileNotFound) => return MissingEntrySnafu { path, entry }.fail(),
        Err(e) => return Err(e).context(ZipSnafu { path }),
    };

    let mut data = vec![];
    zipped.read_to_end(&mut data).context(IoSnafu { path })?;
    debug!("loaded {} bytes from {} in {}", data.len(), entry, path.display());
    Ok(data)
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use color_eyre::eyre::Result;
    use tempfile::{tempdir, NamedTempFile};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;

    #[test]
    fn read_file() -> Result<()> {
        let mut f = NamedTempFile::with_suffix(".wasm")?;
        f.write_all(&[0x00, 0x61, 0x73, 0x6d])?;
        assert_eq!(load_bytes(f.path(), "wasm")?, vec![0x00, 0x61, 0x73, 0x6d]);
        // wrong extension is only a warning
        assert_eq!(load_bytes(f.path(), "abi")?.len(), 4);
        Ok(())
    }

    #[test]
    fn missing_file() -> Result<()> {
        let dir = tempdir()?;
        let err = load_bytes(dir.path().join("nothere.abi"), "abi").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nothere.abi"));
        Ok(())
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
        let mut writer = ZipWriter::new(File::create(path)?);
        for (name, data) in entries {
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            writer.start_file(*name, options)?;
            writer.write_all(data)?;
        }
        writer.finish()?;
        Ok(())
    }

    #[test]
    fn zip_archives() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("contract.zip");
        write_zip(&path, &[("contract.wasm", &[0x00, 0x61, 0x73, 0x6d][..]),
                           ("contract.abi", &br#"{"version": "eosio::abi/1.1"}"#[..])])?;

        assert_eq!(load_bytes(&path, "wasm")?, vec![0x00, 0x61, 0x73, 0x6d]);
        assert_eq!(load_bytes(&path, "abi")?, br#"{"version": "eosio::abi/1.1"}"#.to_vec());

        let err = load_bytes(&path, "txt").unwrap_err();
        assert!(matches!(&err, LoadError::MissingEntry { entry, .. } if entry == "contract.txt"), "{err}");
        Ok(())
    }

    #[test]
    fn invalid_zip_archive() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("contract.zip");
        fs::write(&path, b"PK")?;
        assert!(matches!(load_bytes(&path, "wasm"), Err(LoadError::Zip { .. })));
        assert!(matches!(load_bytes(dir.path().join("other.zip"), "wasm"), Err(LoadError::Io { .. })));
        Ok(())
    }
}
