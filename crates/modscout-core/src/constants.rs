//! Shared constants for the modscout engine.

/// modscout version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum traversal depth when a config omits `scan.max_depth`.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Maximum visited objects when a config omits `scan.max_objects`.
pub const DEFAULT_MAX_OBJECTS: usize = 50_000;

/// Depth used by the built-in configuration (no `--config` given).
pub const BUILTIN_MAX_DEPTH: u32 = 4;

/// Object budget used by the built-in configuration.
pub const BUILTIN_MAX_OBJECTS: usize = 60_000;

/// Root scanned by the built-in configuration.
pub const BUILTIN_ROOT: &str = "random";

/// Report path used by the built-in configuration.
pub const DEFAULT_REPORT_PATH: &str = "modscan_report.json";

/// Findings limit used by the built-in configuration.
pub const DEFAULT_OUTPUT_LIMIT: usize = 2000;

/// Findings limit applied by the CLI when `--limit` is not passed.
pub const DEFAULT_CLI_LIMIT: usize = 5000;

/// File written by `--write-example`.
pub const EXAMPLE_CONFIG_FILE: &str = "modscan.example.json";

/// Number of findings echoed to the console after the summary.
pub const CONSOLE_PREVIEW_LIMIT: usize = 30;

/// Origin marker for modules compiled into the interpreter.
pub const BUILTIN_ORIGIN: &str = "built-in";

/// Module prefixes excluded by the built-in configuration.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["numpy", "pandas", "torch", "tensorflow"];

/// Name of the process/exec/filesystem-mutation category.
pub const CATEGORY_SYSTEM: &str = "system";

/// Name of the interpreter-builtin-module category.
pub const CATEGORY_BUILTIN: &str = "builtin";

/// Modules in the default `system` category.
pub const SYSTEM_MODULES: &[&str] = &[
    "os", "sys", "subprocess", "ctypes", "multiprocessing", "pathlib", "socket",
    "ssl", "http", "ftplib", "telnetlib", "select", "selectors", "shutil",
    "signal", "resource", "fcntl", "pty", "platform", "shlex", "winreg", "uuid",
    "tempfile", "atexit", "importlib",
];

/// Callable names in the default `system` category.
pub const SYSTEM_CALLABLES: &[&str] = &[
    "system", "popen", "Popen", "run", "call", "check_call", "check_output",
    "spawn", "spawnl", "spawnle", "spawnlp", "spawnlpe",
    "spawnv", "spawnve", "spawnvp", "spawnvpe",
    "execv", "execve", "execl", "execlp", "execlpe", "execvp", "execvpe",
    "fork", "forkpty",
    "open", "unlink", "remove", "rmdir", "rmtree", "mkfifo", "mknod",
    "chmod", "chown",
];
