use std::io;
use std::process::Command;

use anyhow::{anyhow, bail, Result};
use log::debug;

/// Reinstalls the latest release by running `command` (program then args).
pub fn self_update(command: &[String]) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("update command is empty"))?;

    debug!("running update command {command:?}");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                anyhow!("You cannot use -U without having {program} installed.")
            }
            _ => anyhow::Error::new(err).context(format!("run {program}")),
        })?;

    if !status.success() {
        bail!("{program} exited with {status} while upgrading AlienFeed");
    }
    Ok(())
}
