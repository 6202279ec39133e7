//! Detached installer launch.
//!
//! The installer has to outlive the application that starts it, so it is
//! spawned outside the parent's process tree: in a new session on Unix, as a
//! detached process on Windows. The child handle is dropped right away and
//! never waited on.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Spawns a process that survives the termination of the current one.
pub trait Launcher: Send + Sync {
    /// Starts `program` with `args` and returns the child's PID.
    fn spawn_detached(&self, program: &Path, args: &[String]) -> io::Result<u32>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> io::Result<u32> {
        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // SAFETY: setsid is async-signal-safe and touches no parent state.
            unsafe {
                command.pre_exec(|| {
                    // Leave the parent's session so its exit does not take the installer down.
                    nix::unistd::setsid()?;
                    Ok(())
                });
            }
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x00000008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
            command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        let child = command.spawn()?;
        let pid = child.id();
        tracing::info!(pid, program = %program.display(), ?args, "installer launched");
        Ok(pid)
    }
}
