use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::Error;
use crate::method::Markers;
use crate::rewrite::{InstrumentResult, instrument_source};

/// Settings for a processing run.
#[derive(Debug, Clone)]
pub struct Options {
    pub markers: Markers,
    /// Extension (without the dot) of files picked up from directories.
    pub extension: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            extension: "cs".to_string(),
        }
    }
}

/// What happened to one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: InstrumentResult,
}

/// Instrument a single file, or every matching file below a directory.
///
/// Files are handled one at a time: read, scanned, rewritten and written back
/// before the next one is opened. Errors if `target` is neither a file nor a
/// directory, before anything is touched.
pub fn process(target: &Path, options: &Options) -> Result<Vec<FileReport>, Error> {
    let files = if target.is_file() {
        vec![target.to_path_buf()]
    } else if target.is_dir() {
        discover_files(target, &options.extension)?
    } else {
        return Err(Error::InvalidPath(target.to_path_buf()));
    };

    files
        .into_iter()
        .map(|file| process_file(&file, options))
        .collect()
}

/// How a file's bytes were turned into text, so they can be turned back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceEncoding {
    Utf8,
    /// Not valid UTF-8. Each byte was read as the char with the same value.
    Latin1,
}

impl SourceEncoding {
    fn decode(bytes: Vec<u8>) -> (String, Self) {
        match String::from_utf8(bytes) {
            Ok(text) => (text, SourceEncoding::Utf8),
            Err(err) => {
                let text = err.into_bytes().into_iter().map(char::from).collect();
                (text, SourceEncoding::Latin1)
            }
        }
    }

    fn encode(self, text: &str) -> Vec<u8> {
        match self {
            SourceEncoding::Utf8 => text.as_bytes().to_vec(),
            SourceEncoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                let mut utf8 = [0u8; 4];
                for c in text.chars() {
                    match u8::try_from(c) {
                        Ok(b) => out.push(b),
                        // Only inserted label text can reach this arm.
                        Err(_) => out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes()),
                    }
                }
                out
            }
        }
    }
}

/// Read `path`, instrument it in memory, and overwrite it with the result.
///
/// Bytes that are not valid UTF-8 are carried through unchanged.
pub fn process_file(path: &Path, options: &Options) -> Result<FileReport, Error> {
    eprintln!("processing: {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| Error::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let (source, encoding) = SourceEncoding::decode(bytes);
    if encoding == SourceEncoding::Latin1 {
        tracing::debug!(file = %path.display(), "not valid UTF-8, keeping raw bytes");
    }

    let result = instrument_source(&source, path, &options.markers);
    tracing::info!(
        file = %path.display(),
        methods = result.methods.len(),
        instrumented = result.instrumented_methods(),
        inserted = result.inserted_lines(),
        "rewrote file"
    );

    std::fs::write(path, encoding.encode(&result.source)).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileReport {
        path: path.to_path_buf(),
        result,
    })
}

/// Recursively find all files under `dir` with the given extension, sorted
/// by path. Hidden and ignored files are included.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk(e.to_string()))?;
        let path = entry.path();
        if entry.file_type().is_some_and(|ft| ft.is_file())
            && path.extension().is_some_and(|ext| ext == extension)
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
