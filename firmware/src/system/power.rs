use std::process::Command;

use crate::error::{Error, Result};

/// Control over the host's power.
pub trait PowerControl {
    /// Flush filesystems and halt the host. Does not come back on success
    /// other than to let the caller wind down while the host stops.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Shutdown` if any of the commands fails.
    fn shutdown_now(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemPower;

impl PowerControl for SystemPower {
    fn shutdown_now(&mut self) -> Result<()> {
        log::info!("Shutting down the host");
        run("sync", &[])?;
        run("/sbin/shutdown", &["-h", "now"])
    }
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|err| Error::Shutdown(format!("{program}: {err}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Shutdown(format!("{program} exited with {status}")))
    }
}
