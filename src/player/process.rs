//! External player process control.
//!
//! Pause/resume rely on POSIX job-control signals; on platforms without
//! them the capability is reported as unsupported and playback is limited
//! to start/stop.

use std::{
    io,
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to launch player process: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to signal player process: {0}")]
    Signal(#[source] io::Error),

    #[error("pause/resume is not supported on this platform")]
    Unsupported,
}

/// Capability to launch the external media player on a track path.
pub trait PlayerBackend {
    fn spawn(&self, path: &str) -> Result<Box<dyn PlayerHandle>, PlayerError>;
}

/// Control over a single spawned player process.
pub trait PlayerHandle: std::fmt::Debug {
    fn suspend(&mut self) -> Result<(), PlayerError>;
    fn resume(&mut self) -> Result<(), PlayerError>;
    /// Requests graceful termination, waits a bounded time for exit and
    /// falls back to a forced kill.
    fn shutdown(&mut self) -> Result<(), PlayerError>;
}

/// Longest we wait for the player to exit gracefully before killing it.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// Backend driving mpv (or any argument-compatible player binary).
pub struct MpvBackend {
    binary: String,
}

impl MpvBackend {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl PlayerBackend for MpvBackend {
    fn spawn(&self, path: &str) -> Result<Box<dyn PlayerHandle>, PlayerError> {
        let child = Command::new(&self.binary)
            .arg(path)
            .arg("--no-video")
            .arg("--terminal=no")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(PlayerError::Spawn)?;

        Ok(Box::new(MpvHandle { child }))
    }
}

#[derive(Debug)]
struct MpvHandle {
    child: Child,
}

#[cfg(unix)]
fn send_signal(child: &Child, signal: nix::sys::signal::Signal) -> Result<(), PlayerError> {
    use nix::{sys::signal::kill, unistd::Pid};

    let pid = Pid::from_raw(child.id() as i32);
    kill(pid, signal).map_err(|e| PlayerError::Signal(io::Error::from_raw_os_error(e as i32)))
}

impl PlayerHandle for MpvHandle {
    #[cfg(unix)]
    fn suspend(&mut self) -> Result<(), PlayerError> {
        send_signal(&self.child, nix::sys::signal::Signal::SIGSTOP)
    }

    #[cfg(not(unix))]
    fn suspend(&mut self) -> Result<(), PlayerError> {
        Err(PlayerError::Unsupported)
    }

    #[cfg(unix)]
    fn resume(&mut self) -> Result<(), PlayerError> {
        send_signal(&self.child, nix::sys::signal::Signal::SIGCONT)
    }

    #[cfg(not(unix))]
    fn resume(&mut self) -> Result<(), PlayerError> {
        Err(PlayerError::Unsupported)
    }

    fn shutdown(&mut self) -> Result<(), PlayerError> {
        #[cfg(unix)]
        {
            use nix::sys::signal::Signal;

            // A suspended process ignores SIGTERM until continued. Signal
            // failures are not fatal here: the process may already be gone,
            // which the wait below confirms.
            let _ = send_signal(&self.child, Signal::SIGCONT);
            let _ = send_signal(&self.child, Signal::SIGTERM);
        }
        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        let deadline = Instant::now() + SHUTDOWN_TIMEOUT;
        loop {
            match self.child.try_wait().map_err(PlayerError::Signal)? {
                Some(_) => return Ok(()),
                None if Instant::now() >= deadline => break,
                None => thread::sleep(SHUTDOWN_POLL),
            }
        }

        log::warn!("player did not exit within {SHUTDOWN_TIMEOUT:?}, killing it");
        self.child.kill().map_err(PlayerError::Signal)?;
        self.child.wait().map_err(PlayerError::Signal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_with_missing_binary_reports_spawn_error() {
        let backend = MpvBackend::new("definitely-not-a-player-binary");

        let err = backend.spawn("/music/song.mp3").unwrap_err();

        assert!(matches!(err, PlayerError::Spawn(_)));
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_after_process_already_exited_is_ok() {
        // `true` ignores the extra arguments and exits immediately.
        let backend = MpvBackend::new("true");
        let mut handle = backend.spawn("/music/song.mp3").unwrap();

        thread::sleep(Duration::from_millis(100));

        handle.shutdown().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_terminates_a_running_process() {
        // `sleep` treats "30" as its duration and ignores nothing else, but
        // an argument error would also just exit; either way shutdown must
        // leave no process behind.
        let backend = MpvBackend::new("sleep");
        let mut handle = backend.spawn("30").unwrap();

        handle.shutdown().unwrap();
    }
}
