//! Application constants
//!
//! Centralized location for endpoint paths and configuration defaults.

/// Default base URL of the student API
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// Environment variable overriding the configured base URL
pub const API_URL_ENV: &str = "STUDENT_ADMIN_API_URL";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How long a notification stays on screen
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 4;

/// Maximum notifications kept at once
pub const MAX_NOTIFICATIONS: usize = 5;

/// Directory under $HOME holding the config file
pub const CONFIG_DIR_NAME: &str = ".student-admin";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written in the working directory
pub const LOG_FILE_NAME: &str = "student-admin.log";

// Endpoint path segments, relative to the base URL
pub const LIST_PATH: [&str; 2] = ["api", "infoGralStudents"];
pub const CREATE_PATH: [&str; 2] = ["api", "createStudent"];
pub const UPDATE_PATH: [&str; 2] = ["api", "updateStudent"];
pub const DELETE_PATH: [&str; 2] = ["api", "deleteStudent"];

/// Application name
pub const APP_NAME: &str = "Student Admin";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
