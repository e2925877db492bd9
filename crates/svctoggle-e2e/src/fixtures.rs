//! Fake hosts populated with scripted service managers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use svctoggle::Readiness;
use svctoggle_config::ServiceManager;

use crate::node_state::{NOT_READY, READY, write_state};

/// How a fake service manager reacts to each verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerBehaviour {
    /// `stop` marks the node not ready, `start` marks it ready, and `restart`
    /// marks it not ready then ready again after a short delay.
    Cooperative,
    /// Records the expected state but exits with status 1.
    FailsAfterApplying,
    /// Refuses every verb with status 5 and leaves the state untouched.
    UnitMissing,
    /// Exits zero without touching the state.
    Inert,
}

/// A directory acting as the remote host's `PATH` plus its node state file.
#[derive(Debug, Clone)]
pub struct FakeHost {
    bin_dir: PathBuf,
    state_path: PathBuf,
}

impl FakeHost {
    /// Lays out a host under `root` with the node initially in `initial`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while creating the layout.
    pub fn create(root: &Path, initial: Readiness) -> io::Result<Self> {
        let bin_dir = root.join("bin");
        fs::create_dir_all(&bin_dir)?;
        let state_path = root.join("node.state");
        write_state(&state_path, initial)?;
        Ok(Self {
            bin_dir,
            state_path,
        })
    }

    /// Directory used as the remote `PATH`.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        self.bin_dir.as_path()
    }

    /// File holding the node readiness.
    #[must_use]
    pub fn state_path(&self) -> &Path {
        self.state_path.as_path()
    }

    /// Installs a fake `manager` executable.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while writing the script.
    pub fn install(&self, manager: ServiceManager, behaviour: ManagerBehaviour) -> io::Result<()> {
        let script_path = self.bin_dir.join(manager.executable());
        fs::write(&script_path, self.script(manager, behaviour))?;
        make_executable(&script_path)
    }

    fn script(&self, manager: ServiceManager, behaviour: ManagerBehaviour) -> String {
        let state = self.state_path.display();
        let verb = match manager {
            ServiceManager::Systemctl => "$1",
            ServiceManager::Service => "$2",
        };
        let body = match behaviour {
            ManagerBehaviour::Cooperative => format!(
                "case \"{verb}\" in\n\
                 start) echo {READY} > '{state}' ;;\n\
                 stop) echo {NOT_READY} > '{state}' ;;\n\
                 restart)\n\
                 echo {NOT_READY} > '{state}'\n\
                 ( sleep 0.3; echo {READY} > '{state}' ) >/dev/null 2>&1 &\n\
                 ;;\n\
                 esac\n\
                 exit 0\n"
            ),
            ManagerBehaviour::FailsAfterApplying => format!(
                "case \"{verb}\" in\n\
                 start|restart) echo {READY} > '{state}' ;;\n\
                 stop) echo {NOT_READY} > '{state}' ;;\n\
                 esac\n\
                 echo 'partial failure reported by fake manager' >&2\n\
                 exit 1\n"
            ),
            ManagerBehaviour::UnitMissing => {
                String::from("echo 'Unit kubelet.service not found.' >&2\nexit 5\n")
            }
            ManagerBehaviour::Inert => String::from("exit 0\n"),
        };
        format!("#!/bin/sh\nPATH=/usr/bin:/bin\n{body}")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "fake service managers require a unix host",
    ))
}
