//! Child-process plumbing shared by the `ffmpeg` source and sink.

use std::io::Read;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::error::{KeeperError, KeeperResult};

/// A spawned media tool whose stderr is collected on a background thread.
///
/// Dropping a process that was never [`ToolProcess::wait`]ed kills and reaps it.
pub(crate) struct ToolProcess {
    program: String,
    child: Option<Child>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl ToolProcess {
    /// Spawn `cmd` with stderr piped. Stdin/stdout wiring is left to the caller.
    pub(crate) fn spawn(mut cmd: Command) -> KeeperResult<Self> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        let mut child = cmd.stderr(Stdio::piped()).spawn().map_err(|e| {
            KeeperError::media(format!(
                "failed to spawn {program} (is it installed and on PATH?): {e}"
            ))
        })?;

        let mut pipe = child.stderr.take().ok_or_else(|| {
            KeeperError::media(format!("failed to open {program} stderr (unexpected)"))
        })?;
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            pipe.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            program,
            child: Some(child),
            stderr: Some(stderr),
        })
    }

    pub(crate) fn take_stdin(&mut self) -> KeeperResult<ChildStdin> {
        self.child
            .as_mut()
            .and_then(|c| c.stdin.take())
            .ok_or_else(|| KeeperError::media(format!("{} stdin is not piped", self.program)))
    }

    pub(crate) fn take_stdout(&mut self) -> KeeperResult<ChildStdout> {
        self.child
            .as_mut()
            .and_then(|c| c.stdout.take())
            .ok_or_else(|| KeeperError::media(format!("{} stdout is not piped", self.program)))
    }

    /// Wait for exit; a non-zero status becomes an error carrying the tool's stderr.
    ///
    /// Callers must drop their stdin handle first. Waiting twice is a no-op.
    pub(crate) fn wait(&mut self, what: &str) -> KeeperResult<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait().map_err(|e| {
            KeeperError::media(format!("failed to wait for {}: {e}", self.program))
        })?;
        let stderr = match self.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| KeeperError::media("stderr drain thread panicked"))?
                .map_err(|e| KeeperError::media(format!("{} stderr read failed: {e}", self.program)))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(KeeperError::media(format!(
                "{what}: {} exited with status {status}: {}",
                self.program,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for ToolProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::debug!(program = %self.program, "killing unfinished child process");
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr.take() {
            let _ = handle.join();
        }
    }
}

/// Return `true` when `tool -version` runs successfully.
pub(crate) fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../tests/unit/process.rs"]
mod tests;
