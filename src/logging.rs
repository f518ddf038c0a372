//! User-facing logging with dry-run awareness and summary collection.
//!
//! All messages are also written to a persistent log file at
//! `$XDG_CACHE_HOME/nvim-bootstrap/bootstrap.log` (default
//! `~/.cache/nvim-bootstrap/bootstrap.log`) with timestamps and ANSI codes
//! stripped, regardless of the verbose flag. Diagnostic tracing (`RUST_LOG`)
//! is handled separately by [`init_tracing`].

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

/// Outcome of a recorded step or tool, for the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Action was performed.
    Ok,
    /// Nothing to do; already in the desired state.
    AlreadyPresent,
    /// Not applicable on this platform or skipped by a flag.
    Skipped,
    /// Recorded but not executed (`--dry-run`).
    DryRun,
    /// Action was attempted and failed (recoverable).
    Failed,
}

/// A recorded summary entry.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Entry name (tool label or step name).
    pub name: String,
    /// Outcome.
    pub status: Status,
    /// Optional detail shown in parentheses.
    pub message: Option<String>,
}

/// Structured logger for terminal output, file log, and run summary.
pub struct Logger {
    verbose: bool,
    entries: std::cell::RefCell<Vec<Entry>>,
    log_file: Option<PathBuf>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("verbose", &self.verbose)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

/// Return the log file path under the user cache directory, creating the
/// directory if needed.
fn log_file_path() -> Option<PathBuf> {
    let cache_dir = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(dirs::cache_dir)?;
    let dir = cache_dir.join("nvim-bootstrap");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("bootstrap.log"))
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of SGR sequence)
            for inner in chars.by_ref() {
                if inner == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Logger {
    /// Create a logger, truncating the persistent log file for a fresh run.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self::with_log_file(verbose, log_file_path())
    }

    /// Create a logger writing its persistent log to an explicit path
    /// (or nowhere). Tests use this to avoid sharing the user cache file.
    #[must_use]
    pub fn with_log_file(verbose: bool, log_file: Option<PathBuf>) -> Self {
        if let Some(ref path) = log_file {
            let header = format!(
                "==========================================\n\
                 nvim-bootstrap {} {}\n\
                 ==========================================\n",
                env!("CARGO_PKG_VERSION"),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            );
            let _ = fs::write(path, header);
        }

        Self {
            verbose,
            entries: std::cell::RefCell::new(Vec::new()),
            log_file,
        }
    }

    /// Append a line to the persistent log file.
    fn write_to_file(&self, level: &str, msg: &str) {
        if let Some(ref path) = self.log_file
            && let Ok(mut f) = fs::OpenOptions::new().append(true).open(path)
        {
            let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let clean = strip_ansi(msg);
            let _ = writeln!(f, "{ts} {level} {clean}");
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        eprintln!("\x1b[31mERROR\x1b[0m {msg}");
        self.write_to_file("ERR", msg);
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        eprintln!("\x1b[33mWARN\x1b[0m  {msg}");
        self.write_to_file("WRN", msg);
    }

    /// Log a stage heading.
    pub fn stage(&self, msg: &str) {
        println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
        self.write_to_file("STG", msg);
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        println!("  {msg}");
        self.write_to_file("INF", msg);
    }

    /// Log a debug message (terminal output only when verbose; always filed).
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            println!("  \x1b[2m{msg}\x1b[0m");
        }
        self.write_to_file("DBG", msg);
    }

    /// Log a planned-but-not-executed action.
    pub fn dry_run(&self, msg: &str) {
        println!("  \x1b[33m[DRY RUN]\x1b[0m {msg}");
        self.write_to_file("DRY", msg);
    }

    /// Record an entry for the summary.
    pub fn record(&self, name: &str, status: Status, message: Option<&str>) {
        self.entries.borrow_mut().push(Entry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }

    /// Whether any recorded entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.status == Status::Failed)
    }

    /// Print the summary of all recorded entries.
    pub fn print_summary(&self) {
        let entries = self.entries.borrow();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut present = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for entry in entries.iter() {
            let (icon, color) = match entry.status {
                Status::Ok => {
                    ok += 1;
                    ("\u{2713}", "\x1b[32m")
                }
                Status::AlreadyPresent => {
                    present += 1;
                    ("\u{b7}", "\x1b[2m")
                }
                Status::Skipped => {
                    skipped += 1;
                    ("\u{25cb}", "\x1b[33m")
                }
                Status::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[33m")
                }
                Status::Failed => {
                    failed += 1;
                    ("\u{2717}", "\x1b[31m")
                }
            };

            let suffix = match &entry.message {
                Some(msg) => format!(" ({msg})"),
                None => String::new(),
            };

            let line = format!("{icon} {}{suffix}", entry.name);
            println!("  {color}{line}\x1b[0m");
            self.write_to_file("INF", &line);
        }

        println!();
        let total = ok + present + skipped + dry_run + failed;
        let totals = format!(
            "{total} steps: {ok} done, {present} already present, {skipped} skipped, {dry_run} dry-run, {failed} failed"
        );
        println!(
            "  {total} steps: \x1b[32m{ok} done\x1b[0m, {present} already present, \x1b[33m{skipped} skipped\x1b[0m, {dry_run} dry-run, \x1b[31m{failed} failed\x1b[0m"
        );
        self.write_to_file("INF", &totals);

        if let Some(path) = &self.log_file {
            println!("  \x1b[2mlog: {}\x1b[0m", path.display());
            self.write_to_file("INF", &format!("log: {}", path.display()));
        }
    }
}

/// Initialise the tracing subscriber for diagnostic output.
///
/// Honours `RUST_LOG`; silent by default. Separate from [`Logger`] so that
/// user-facing output stays clean while internals remain inspectable.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
