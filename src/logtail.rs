//! Bounded tail reads of an append-only text log.
//!
//! Each call re-opens the file and walks backwards from EOF, so the cost of a
//! read depends on the window size and never on how large the log has grown.

use std::{
    fmt,
    fs::File,
    io::{self, ErrorKind, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

pub const DEFAULT_LOG_PATH: &str = "/var/log/svxlink";
pub const DEFAULT_TAIL_LINES: usize = 20;
pub const MAX_TAIL_LINES: usize = 200;
/// Upper bound on bytes scanned per read; a window of very long lines is cut short.
pub const MAX_TAIL_BYTES: u64 = 256 * 1024;
const CHUNK_BYTES: u64 = 4096;

/// Why a tail read produced no lines.
#[derive(Debug)]
pub enum TailError {
    NotFound(PathBuf),
    Io(io::Error),
}

impl fmt::Display for TailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailError::NotFound(path) => write!(f, "log not found: {}", path.display()),
            TailError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TailError {}

impl From<io::Error> for TailError {
    fn from(value: io::Error) -> Self {
        TailError::Io(value)
    }
}

/// Return the last `max_lines` lines of `path`, oldest first.
pub fn read_tail(path: &Path, max_lines: usize) -> Result<Vec<String>, TailError> {
    let mut file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => TailError::NotFound(path.to_path_buf()),
        _ => TailError::Io(err),
    })?;
    if max_lines == 0 {
        return Ok(Vec::new());
    }

    let meta = file.metadata()?;
    if meta.is_dir() {
        return Err(TailError::Io(io::Error::other(format!(
            "{} is a directory",
            path.display()
        ))));
    }
    let (buf, at_line_start) = read_backwards(&mut file, meta.len(), max_lines)?;
    Ok(split_window(&buf, at_line_start, max_lines))
}

/// Read chunks from the end until the buffer holds more than `max_lines`
/// newlines, the start of the file, or the byte ceiling. The flag reports
/// whether the buffer begins on a line boundary.
fn read_backwards<R: Read + Seek>(
    reader: &mut R,
    len: u64,
    max_lines: usize,
) -> io::Result<(Vec<u8>, bool)> {
    let floor = len.saturating_sub(MAX_TAIL_BYTES);
    let mut pos = len;
    let mut buf: Vec<u8> = Vec::new();
    let mut newlines = 0usize;

    while pos > floor && newlines <= max_lines {
        let step = CHUNK_BYTES.min(pos - floor);
        pos -= step;
        reader.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; step as usize];
        reader.read_exact(&mut chunk)?;
        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    if pos == 0 {
        return Ok((buf, true));
    }
    let mut previous = [0u8; 1];
    reader.seek(SeekFrom::Start(pos - 1))?;
    reader.read_exact(&mut previous)?;
    Ok((buf, previous[0] == b'\n'))
}

fn split_window(buf: &[u8], at_line_start: bool, max_lines: usize) -> Vec<String> {
    let text = String::from_utf8_lossy(buf);
    let mut lines: Vec<&str> = text.lines().collect();
    if !at_line_start && !lines.is_empty() {
        lines.remove(0);
    }
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].iter().map(|line| line.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn log_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn returns_last_lines_in_order() {
        let body: String = (1..=50).map(|n| format!("line {n}\n")).collect();
        let file = log_file(body.as_bytes());
        let lines = read_tail(file.path(), 3).unwrap();
        assert_eq!(lines, vec!["line 48", "line 49", "line 50"]);
    }

    #[test]
    fn short_file_returns_everything() {
        let file = log_file(b"one\ntwo\n");
        let lines = read_tail(file.path(), 20).unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn keeps_final_line_without_newline() {
        let file = log_file(b"one\ntwo\nthree");
        let lines = read_tail(file.path(), 2).unwrap();
        assert_eq!(lines, vec!["two", "three"]);
    }

    #[test]
    fn strips_crlf_terminators() {
        let file = log_file(b"alpha\r\nbeta\r\n");
        let lines = read_tail(file.path(), 5).unwrap();
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn zero_lines_is_an_empty_window() {
        let file = log_file(b"one\ntwo\n");
        assert!(read_tail(file.path(), 0).unwrap().is_empty());
    }

    #[test]
    fn empty_file_is_an_empty_window() {
        let file = log_file(b"");
        assert!(read_tail(file.path(), 20).unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let file = log_file(b"ok\nbad \xff byte\n");
        let lines = read_tail(file.path(), 5).unwrap();
        assert_eq!(lines[0], "ok");
        assert!(lines[1].starts_with("bad "));
        assert!(lines[1].ends_with(" byte"));
    }

    #[test]
    fn lines_spanning_chunks_are_whole() {
        let long = "x".repeat(CHUNK_BYTES as usize + 100);
        let body = format!("first\n{long}\nlast\n");
        let file = log_file(body.as_bytes());
        let lines = read_tail(file.path(), 2).unwrap();
        assert_eq!(lines, vec![long.as_str(), "last"]);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tail(&dir.path().join("svxlink"), 20).unwrap_err();
        assert!(matches!(err, TailError::NotFound(_)));
        assert!(format!("{err}").contains("log not found"));
    }

    #[test]
    fn directory_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tail(dir.path(), 20).unwrap_err();
        assert!(matches!(err, TailError::Io(_)));
    }

    #[test]
    fn byte_ceiling_bounds_the_scan() {
        let mut body = Vec::new();
        body.extend_from_slice(b"ancient\n");
        body.extend(std::iter::repeat(b'y').take(MAX_TAIL_BYTES as usize + 10));
        body.extend_from_slice(b"\nrecent\n");
        let mut cursor = Cursor::new(body.clone());
        let (buf, at_line_start) = read_backwards(&mut cursor, body.len() as u64, 20).unwrap();
        assert!(!at_line_start);
        assert_eq!(buf.len() as u64, MAX_TAIL_BYTES);
        let lines = split_window(&buf, at_line_start, 20);
        assert_eq!(lines, vec!["recent"]);
    }

    #[test]
    fn whole_line_at_byte_ceiling_is_kept() {
        let mut body = b"old\n".to_vec();
        let first = format!("{}\n", "a".repeat(15_143));
        body.extend_from_slice(first.as_bytes());
        for n in 0..19 {
            let line = format!("b{n:02}{}\n", "b".repeat(12_996));
            body.extend_from_slice(line.as_bytes());
        }
        assert_eq!(body.len() as u64, MAX_TAIL_BYTES + 4);

        let file = log_file(&body);
        let lines = read_tail(file.path(), 20).unwrap();
        assert_eq!(lines.len(), 20);
        assert!(lines[0].starts_with('a'));
        assert_eq!(lines[0].len(), 15_143);
        assert!(lines[19].starts_with("b18"));
    }
}
