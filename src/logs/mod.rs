use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Primary report sink: every byte goes to the append-mode log file and,
/// unless silenced, to the console.
///
/// A failed file write never stops the console copy. The first file error is
/// kept and the file is skipped from then on; callers collect it with
/// [`TeaLog::take_error`] once the report is written.
pub struct TeaLog {
    console: Option<Box<dyn Write>>,
    file: File,
    path: PathBuf,
    file_error: Option<io::Error>,
}

impl TeaLog {
    pub fn open(path: &Path, console: Option<Box<dyn Write>>) -> Result<Self> {
        let file = open_append(path)?;
        Ok(Self {
            console,
            file,
            path: path.to_path_buf(),
            file_error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the first log file write error, if any, leaving none behind.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.file_error.take()
    }

    fn record_file_result(&mut self, res: io::Result<()>) {
        if let Err(err) = res {
            if self.file_error.is_none() {
                self.file_error = Some(err);
            }
        }
    }
}

impl Write for TeaLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.file_error.is_none() {
            let res = self.file.write_all(buf);
            self.record_file_result(res);
        }
        if let Some(console) = self.console.as_mut() {
            match console.write_all(buf) {
                Ok(()) => {}
                // A closed pipe only silences the console; the log file keeps going.
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => self.console = None,
                Err(err) => return Err(err),
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.file_error.is_none() {
            let res = self.file.flush();
            self.record_file_result(res);
        }
        if let Some(console) = self.console.as_mut() {
            match console.flush() {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => self.console = None,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

pub fn overflow_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

/// Appends one line per entry to an overflow file and closes it.
pub fn append_overflow<I, S>(path: &Path, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut file = open_append(path)?;
    let mut written = 0usize;
    for line in lines {
        writeln!(file, "{}", line.as_ref())
            .with_context(|| format!("failed to write overflow file: {}", path.display()))?;
        written += 1;
    }
    file.flush()
        .with_context(|| format!("failed to flush overflow file: {}", path.display()))?;
    Ok(written)
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory: {}", parent.display())
            })?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn make_temp_dir() -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("tealeaves-logs-test-{}-{seq}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create dir");
        dir
    }

    #[test]
    fn tealog_tees_console_and_file() {
        let dir = make_temp_dir();
        let path = dir.join("tealeaves.log");
        let console = SharedBuf::default();

        let mut log = TeaLog::open(&path, Some(Box::new(console.clone()))).expect("open");
        writeln!(log, "hello").expect("write");
        log.flush().expect("flush");

        assert_eq!(console.0.borrow().as_slice(), b"hello\n");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello\n");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn tealog_appends_across_runs() {
        let dir = make_temp_dir();
        let path = dir.join("nested/tealeaves.log");

        for line in ["first", "second"] {
            let mut log = TeaLog::open(&path, None).expect("open");
            writeln!(log, "{line}").expect("write");
        }

        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "first\nsecond\n"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn file_error_is_kept_and_console_still_written() {
        let console = SharedBuf::default();
        let mut log =
            TeaLog::open(Path::new("/dev/full"), Some(Box::new(console.clone()))).expect("open");

        writeln!(log, "first").expect("write");
        writeln!(log, "second").expect("write");
        log.flush().expect("flush");

        assert_eq!(console.0.borrow().as_slice(), b"first\nsecond\n");
        let err = log.take_error().expect("file error");
        assert_eq!(err.raw_os_error(), Some(28));
        assert!(log.take_error().is_none());
    }

    #[test]
    fn append_overflow_writes_one_line_per_entry() {
        let dir = make_temp_dir();
        let path = overflow_path(&dir, "tealeaves_unmapped_scans.log");

        let written = append_overflow(&path, ["a", "b", "c"]).expect("overflow");
        assert_eq!(written, 3);
        append_overflow(&path, ["d"]).expect("overflow");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "a\nb\nc\nd\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
