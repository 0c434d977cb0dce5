use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct StubGuard {
    pub base_url: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for StubGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[derive(Default)]
pub struct StubOptions {
    /// Raw JSON written to a fixtures file.
    pub fixtures: Option<String>,
    pub job_delay_ms: u64,
}

#[allow(dead_code)]
pub fn spawn_stub() -> Result<StubGuard> {
    spawn_stub_with(StubOptions::default())
}

pub fn spawn_stub_with(opts: StubOptions) -> Result<StubGuard> {
    let dir = tempfile::tempdir().context("create stub tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nodedash-stub"));
    cmd.args([
        "--addr",
        "127.0.0.1:0",
        "--addr-file",
        addr_file.to_str().unwrap(),
        "--job-delay-ms",
        &opts.job_delay_ms.to_string(),
    ]);
    if let Some(fixtures) = &opts.fixtures {
        let path = dir.path().join("fixtures.json");
        std::fs::write(&path, fixtures).context("write fixtures")?;
        cmd.args(["--fixtures", path.to_str().unwrap()]);
    }

    let child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn nodedash-stub")?;

    // Kill the child if startup fails below.
    let mut guard = StubGuard {
        base_url: String::new(),
        _dir: dir,
        child,
    };
    guard.base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&guard.base_url)?;
    Ok(guard)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub fn unreachable_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind probe port")?;
    let addr = listener.local_addr().context("probe local addr")?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("stub did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
