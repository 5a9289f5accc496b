use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Opens a plain or gzipped file, or standard input for `stdin`.
///
/// ```
/// use std::io::BufRead;
/// let reader = orthocat::reader("tests/collect/genome.lst").unwrap();
/// assert_eq!(reader.lines().count(), 3);
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Whole file as a string, gzip aware.
pub fn read_to_string(input: &str) -> anyhow::Result<String> {
    let mut reader = reader(input)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// A cache entry is usable when the file exists and holds at least one byte.
pub fn is_cached<P: AsRef<Path>>(path: P) -> bool {
    match std::fs::metadata(path.as_ref()) {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

/// Fails when `path` is not a regular file. Used for inputs that must exist
/// before any processing starts.
pub fn require_file(path: &str, what: &str) -> Result<(), crate::libs::error::OrthoError> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(crate::libs::error::OrthoError::Input(format!(
            "{} is not specified or is not a regular file: {}",
            what, path
        )))
    }
}
