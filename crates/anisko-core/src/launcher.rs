//! Detached invocation of the external player.

use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::error::AniskoError;
use crate::models::AudioMode;

/// One "play this episode" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub title: String,
    pub episode: String,
    pub mode: AudioMode,
}

impl PlayRequest {
    pub fn new(title: impl Into<String>, episode: impl Into<String>, mode: AudioMode) -> Self {
        Self {
            title: title.into(),
            episode: episode.into(),
            mode,
        }
    }
}

/// Starts playback somewhere outside this process.
///
/// Implementations must return as soon as the player is started. Only a
/// failure to start is an error; what the player does afterwards is not
/// observed.
pub trait Launcher: Send + Sync {
    fn launch(&self, request: &PlayRequest) -> Result<(), AniskoError>;
}

/// Launches `ani-cli` (or a compatible program) in its own process group.
#[derive(Debug, Clone)]
pub struct AniCliLauncher {
    program: String,
}

impl AniCliLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed for `request`: `[--dub] -S 1 -e <episode> <title>`.
    pub fn args(request: &PlayRequest) -> Vec<String> {
        let mut args = Vec::with_capacity(6);
        if request.mode == AudioMode::Dub {
            args.push("--dub".to_string());
        }
        args.extend([
            "-S".to_string(),
            "1".to_string(),
            "-e".to_string(),
            request.episode.clone(),
            request.title.clone(),
        ]);
        args
    }
}

impl Default for AniCliLauncher {
    fn default() -> Self {
        Self::new("ani-cli")
    }
}

impl Launcher for AniCliLauncher {
    fn launch(&self, request: &PlayRequest) -> Result<(), AniskoError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|source| AniskoError::Launch {
            program: self.program.clone(),
            source,
        })?;
        tracing::info!(
            pid = child.id(),
            title = %request.title,
            episode = %request.episode,
            mode = %request.mode,
            "Player started"
        );
        reap_in_background(child);
        Ok(())
    }
}

/// Wait for `child` on a detached thread so it does not linger as a zombie.
///
/// Returns `None` if the thread could not be started; the child then keeps
/// running unreaped.
fn reap_in_background(mut child: Child) -> Option<JoinHandle<std::io::Result<ExitStatus>>> {
    let pid = child.id();
    let spawned = std::thread::Builder::new()
        .name("anisko-reaper".into())
        .spawn(move || {
            let status = child.wait();
            tracing::debug!(pid, ?status, "Player exited");
            status
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(pid, "Failed to start reaper thread: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_args() {
        let req = PlayRequest::new("Naruto", "12", AudioMode::Sub);
        assert_eq!(AniCliLauncher::args(&req), ["-S", "1", "-e", "12", "Naruto"]);
    }

    #[test]
    fn test_dub_args_and_title_kept_whole() {
        let req = PlayRequest::new("Cowboy Bebop: Tengoku no Tobira", "1.5", AudioMode::Dub);
        assert_eq!(
            AniCliLauncher::args(&req),
            ["--dub", "-S", "1", "-e", "1.5", "Cowboy Bebop: Tengoku no Tobira"]
        );
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let launcher = AniCliLauncher::new("anisko-test-no-such-player");
        let req = PlayRequest::new("X", "1", AudioMode::Sub);
        match launcher.launch(&req) {
            Err(AniskoError::Launch { program, .. }) => {
                assert_eq!(program, "anisko-test-no-such-player");
            }
            other => panic!("expected launch error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_returns_without_waiting() {
        let launcher = AniCliLauncher::new("true");
        let req = PlayRequest::new("X", "1", AudioMode::Sub);
        assert!(launcher.launch(&req).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_player_is_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let handle = reap_in_background(child).expect("reaper thread starts");
        let status = handle.join().unwrap().unwrap();
        assert!(status.success());
    }
}
