use std::process::Command;
use std::process::Stdio;

pub struct Util;

impl Util {
    /// Detached shell spawn; the child keeps running when the manager
    /// exits.
    pub fn spawn_shell<S: Into<String>>(cmd: S) {
        let cmd = cmd.into();

        Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
    }
}
