//! Adapter subprocess lifecycle.
//!
//! Stdout passes through to the user; stderr is piped and drained by a
//! background task while the parent waits on exit. The drain must run
//! concurrently with the child: a filled OS pipe buffer blocks the child
//! indefinitely otherwise.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{OrchestratorError, OrchestratorResult};

/// Default adapter timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// How much trailing stderr is kept for error reporting.
pub const STDERR_TAIL_BYTES: usize = 8 * 1024;

/// A fully-resolved `java -jar` invocation of the extractor.
#[derive(Debug, Clone)]
pub struct AdapterInvocation {
    pub java_bin: PathBuf,
    pub adapter_jar: PathBuf,
    pub agent_jar: PathBuf,
    pub namespace: String,
    pub manifest_path: PathBuf,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl AdapterInvocation {
    pub fn new(
        adapter_jar: PathBuf,
        agent_jar: PathBuf,
        namespace: impl Into<String>,
        manifest_path: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            java_bin: PathBuf::from("java"),
            adapter_jar,
            agent_jar,
            namespace: namespace.into(),
            manifest_path,
            output_dir,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.java_bin);
        cmd.arg("-jar")
            .arg(&self.adapter_jar)
            .arg("record")
            .arg("--manifest")
            .arg(&self.manifest_path)
            .arg("--output")
            .arg(&self.output_dir)
            .arg("--agent")
            .arg(&self.agent_jar)
            .arg("--namespace")
            .arg(&self.namespace);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Bounded stderr accumulator: keeps only the trailing bytes.
fn push_tail(tail: &mut Vec<u8>, line: &str) {
    tail.extend_from_slice(line.as_bytes());
    tail.push(b'\n');
    if tail.len() > STDERR_TAIL_BYTES {
        let cut = tail.len() - STDERR_TAIL_BYTES;
        tail.drain(..cut);
    }
}

fn spawn_stderr_drain(
    stderr: tokio::process::ChildStderr,
) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut tail: Vec<u8> = Vec::new();
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if !line.trim().is_empty() {
                tracing::warn!(target: "ctxslice.adapter", "{line}");
            }
            push_tail(&mut tail, &line);
        }
        String::from_utf8_lossy(&tail).into_owned()
    })
}

/// Run the adapter to completion.
pub async fn run_adapter(inv: &AdapterInvocation) -> OrchestratorResult<()> {
    run_adapter_cancellable(inv, None).await
}

/// Run the adapter; an optional cancel signal kills the child early. On
/// timeout or cancellation the child is killed and reaped, and whatever
/// partial output it produced stays on disk for a later pipeline run to
/// consume or reject.
pub async fn run_adapter_cancellable(
    inv: &AdapterInvocation,
    cancel: Option<oneshot::Receiver<()>>,
) -> OrchestratorResult<()> {
    if !inv.adapter_jar.is_file() {
        return Err(OrchestratorError::AdapterNotFound(inv.adapter_jar.clone()));
    }

    let mut child = inv
        .to_command()
        .spawn()
        .map_err(OrchestratorError::SpawnFailed)?;

    let stderr = child.stderr.take();
    let drain = stderr.map(spawn_stderr_drain);

    let status = tokio::select! {
        status = child.wait() => Some(status?),
        _ = tokio::time::sleep(inv.timeout) => None,
        _ = async move {
            match cancel {
                Some(rx) => { let _ = rx.await; }
                // Never resolves; keeps the select arm inert.
                None => std::future::pending::<()>().await,
            }
        } => {
            tracing::warn!("adapter run cancelled; killing subprocess");
            None
        }
    };

    let status = match status {
        Some(status) => status,
        None => {
            child.start_kill().ok();
            child.wait().await?;
            let tail = match drain {
                Some(handle) => handle.await.unwrap_or_default(),
                None => String::new(),
            };
            return Err(OrchestratorError::AdapterFailed {
                exit_code: None,
                stderr_tail: tail,
            });
        }
    };

    let tail = match drain {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    };

    if !status.success() {
        return Err(OrchestratorError::AdapterFailed {
            exit_code: status.code(),
            stderr_tail: tail,
        });
    }

    tracing::debug!("adapter completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests point `java_bin` at a shell script so child behavior can be
    // scripted without a JVM; the script ignores the jar-shaped argv.
    fn sh_invocation(dir: &std::path::Path, timeout: Duration) -> AdapterInvocation {
        let jar = dir.join("adapter.jar");
        std::fs::write(&jar, "").unwrap();
        let mut inv = AdapterInvocation::new(
            jar,
            dir.join("agent.jar"),
            "com.shop",
            dir.join("manifest.json"),
            dir.to_path_buf(),
        );
        inv.timeout = timeout;
        inv
    }

    #[test]
    fn argv_has_no_shell_and_full_flag_set() {
        let inv = AdapterInvocation::new(
            PathBuf::from("/opt/adapter.jar"),
            PathBuf::from("/opt/agent.jar"),
            "com.shop",
            PathBuf::from("/tmp/manifest.json"),
            PathBuf::from("/tmp/out"),
        );
        let cmd = inv.to_command();
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "java");
        let args: Vec<String> = std_cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-jar",
                "/opt/adapter.jar",
                "record",
                "--manifest",
                "/tmp/manifest.json",
                "--output",
                "/tmp/out",
                "--agent",
                "/opt/agent.jar",
                "--namespace",
                "com.shop",
            ]
        );
    }

    #[test]
    fn push_tail_keeps_trailing_bytes_only() {
        let mut tail = Vec::new();
        let long = "x".repeat(STDERR_TAIL_BYTES);
        push_tail(&mut tail, &long);
        push_tail(&mut tail, "marker");
        assert!(tail.len() <= STDERR_TAIL_BYTES);
        assert!(String::from_utf8_lossy(&tail).ends_with("marker\n"));
    }

    #[tokio::test]
    async fn missing_adapter_jar_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let inv = AdapterInvocation::new(
            dir.path().join("missing.jar"),
            dir.path().join("agent.jar"),
            "ns",
            dir.path().join("manifest.json"),
            dir.path().to_path_buf(),
        );
        let err = run_adapter(&inv).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::AdapterNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_surfaces_code_and_stderr_tail() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = sh_invocation(dir.path(), Duration::from_secs(10));
        // /bin/sh -jar ... is nonsense; use a wrapper script instead.
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "#!/bin/sh\necho boom >&2\nexit 3\n").unwrap();
        make_executable(&script);
        inv.java_bin = script;
        let err = run_adapter(&inv).await.unwrap_err();
        match err {
            OrchestratorError::AdapterFailed {
                exit_code,
                stderr_tail,
            } => {
                assert_eq!(exit_code, Some(3));
                assert!(stderr_tail.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_stderr_does_not_deadlock() {
        // Emit well past any OS pipe buffer (64 KiB on Linux) to prove the
        // concurrent drain works.
        let dir = tempfile::tempdir().unwrap();
        let mut inv = sh_invocation(dir.path(), Duration::from_secs(30));
        let script = dir.path().join("noisy.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ni=0\nwhile [ $i -lt 8192 ]; do\n  echo \"line $i: 0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef\" >&2\n  i=$((i+1))\ndone\nexit 0\n",
        )
        .unwrap();
        make_executable(&script);
        inv.java_bin = script;
        run_adapter(&inv).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = sh_invocation(dir.path(), Duration::from_millis(200));
        let script = dir.path().join("hang.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 60\n").unwrap();
        make_executable(&script);
        inv.java_bin = script;

        let started = std::time::Instant::now();
        let err = run_adapter(&inv).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(matches!(
            err,
            OrchestratorError::AdapterFailed {
                exit_code: None,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = sh_invocation(dir.path(), Duration::from_secs(60));
        let script = dir.path().join("hang.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 60\n").unwrap();
        make_executable(&script);
        inv.java_bin = script;

        let (tx, rx) = oneshot::channel();
        let start = std::time::Instant::now();
        let run = run_adapter_cancellable(&inv, Some(rx));
        let cancel = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(());
        };
        let (result, ()) = tokio::join!(run, cancel);
        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    fn make_executable(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }
}
