//! Host application capability.
//!
//! The updater needs exactly two things from the application embedding it:
//! the version it is running and a way to shut it down once the installer
//! has been launched.

/// Application embedding the updater.
pub trait HostApp: Send + Sync {
    /// Version string of the running application. Validated by the updater.
    fn version(&self) -> String;

    /// Terminates the running application.
    fn quit(&self);
}

/// Host backed by the current process.
#[derive(Debug, Clone)]
pub struct ProcessHost {
    version: String,
    exit_code: i32,
}

impl ProcessHost {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            exit_code: 0,
        }
    }
}

impl HostApp for ProcessHost {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn quit(&self) {
        tracing::info!(exit_code = self.exit_code, "quitting to let the installer run");
        std::process::exit(self.exit_code);
    }
}
