use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::config::Config;
use crate::error::{BuildFailure, Error, Result};

/// Something the supervisor can (re)start and stop.
///
/// `start` either yields a running child or fails; `stop` does not return
/// until the child is gone. The supervisor never holds more than one child.
pub trait Launcher {
    type Child;

    fn start(&self) -> Result<Self::Child>;
    fn stop(&self, child: Self::Child) -> Result<()>;
}

/// Builds the project and runs what the build produced.
#[derive(Clone, Debug)]
pub struct Controller {
    project_dir: PathBuf,
    build_program: String,
    build_args: Vec<String>,
    tags_flag: String,
    build_tags: Option<String>,
    binary: PathBuf,
    child_args: Vec<OsString>,
}

impl Controller {
    pub fn new(config: &Config) -> Result<Self> {
        let (program, args) = config
            .build_command
            .split_first()
            .ok_or_else(|| Error::Config("build_command must not be empty".into()))?;

        Ok(Self {
            project_dir: config.project_dir.clone(),
            build_program: program.clone(),
            build_args: args.to_vec(),
            tags_flag: config.tags_flag.clone(),
            build_tags: config.build_tags.clone().filter(|tags| !tags.is_empty()),
            binary: config.binary_path(),
            child_args: config.child_args.clone(),
        })
    }

    pub fn build_command(&self) -> Command {
        let mut command = Command::new(&self.build_program);
        command.args(&self.build_args);
        if let Some(tags) = &self.build_tags {
            command.arg(&self.tags_flag).arg(tags);
        }

        command
            .current_dir(&self.project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    pub fn run_command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(&self.child_args)
            .current_dir(&self.project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    /// Runs the build to completion. A build that exits unsuccessfully comes
    /// back as [`Error::Build`] carrying whatever it printed on stderr.
    pub fn build(&self) -> Result<()> {
        let mut command = self.build_command();
        debug!("Assembled build command {:?}", command);

        let output = command
            .output()
            .map_err(|err| Error::BuildInvocation(self.build_program.clone(), err))?;

        if !output.status.success() {
            debug!("Build failed with {}", output.status);
            return Err(Error::Build(BuildFailure {
                status: output.status,
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            }));
        }

        Ok(())
    }

    pub fn spawn(&self) -> Result<Process> {
        let mut command = self.run_command();
        debug!("Assembled command {:?}", command);

        let child = command
            .spawn()
            .map_err(|err| Error::Spawn(self.binary.clone(), err))?;
        debug!("Started process {}", child.id());

        Ok(Process { child })
    }
}

impl Launcher for Controller {
    type Child = Process;

    fn start(&self) -> Result<Process> {
        self.build()?;
        self.spawn()
    }

    fn stop(&self, child: Process) -> Result<()> {
        child.stop().map(|_| ())
    }
}

/// The running program.
#[derive(Debug)]
pub struct Process {
    child: Child,
}

impl Process {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Kills the process and reaps it.
    ///
    /// A process that already exited on its own has not been reaped yet, so
    /// the kill still lands and the wait collects its status.
    pub fn stop(mut self) -> Result<ExitStatus> {
        let pid = self.id();
        self.kill().map_err(|err| Error::Signal(pid, err))?;

        debug!("Waiting for process {} to exit...", pid);
        let status = self.child.wait().map_err(|err| Error::Reap(pid, err))?;
        debug!("Process {} exited with {}", pid, status);

        Ok(status)
    }

    #[cfg(unix)]
    fn kill(&mut self) -> io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        use std::convert::TryInto;

        let pid: i32 = self
            .id()
            .try_into()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

        debug!("Sending {:?} to process {}", Signal::SIGKILL, pid);
        kill(Pid::from_raw(pid), Signal::SIGKILL).map_err(from_nix_error)
    }

    #[cfg(not(unix))]
    fn kill(&mut self) -> io::Result<()> {
        debug!("Killing process {}", self.id());
        self.child.kill()
    }
}

#[cfg(unix)]
fn from_nix_error(err: nix::Error) -> io::Error {
    match err {
        nix::Error::Sys(errno) => io::Error::from_raw_os_error(errno as i32),
        nix::Error::InvalidPath => io::Error::new(io::ErrorKind::InvalidInput, err),
        _ => io::Error::new(io::ErrorKind::Other, err),
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, Launcher};
    use crate::config::ConfigBuilder;
    use crate::error::Error;
    use std::ffi::{OsStr, OsString};
    use std::path::Path;

    fn args(command: &std::process::Command) -> Vec<OsString> {
        command.get_args().map(|arg| arg.to_os_string()).collect()
    }

    #[test]
    fn build_appends_tags_when_configured() {
        let config = ConfigBuilder::default()
            .project_dir("/work/api")
            .build_tags("integration")
            .build()
            .unwrap();
        let command = Controller::new(&config).unwrap().build_command();

        assert_eq!(command.get_program(), OsStr::new("go"));
        assert_eq!(args(&command), vec!["build", "-tags", "integration"]);
        assert_eq!(command.get_current_dir(), Some(Path::new("/work/api")));
    }

    #[test]
    fn build_has_no_tags_by_default() {
        let config = ConfigBuilder::default()
            .project_dir("/work/api")
            .build()
            .unwrap();

        let command = Controller::new(&config).unwrap().build_command();
        assert_eq!(args(&command), vec!["build"]);
    }

    #[test]
    fn empty_tags_are_not_passed() {
        let config = ConfigBuilder::default()
            .project_dir("/work/api")
            .build_tags("")
            .build()
            .unwrap();

        let command = Controller::new(&config).unwrap().build_command();
        assert_eq!(args(&command), vec!["build"]);
    }

    #[test]
    fn child_gets_exactly_the_forwarded_args() {
        let config = ConfigBuilder::default()
            .project_dir("/work/api")
            .child_args(vec![OsString::from("foo"), OsString::from("bar")])
            .build()
            .unwrap();
        let command = Controller::new(&config).unwrap().run_command();

        assert_eq!(command.get_program(), OsStr::new("/work/api/api"));
        assert_eq!(args(&command), vec!["foo", "bar"]);
        assert_eq!(command.get_current_dir(), Some(Path::new("/work/api")));
    }

    #[cfg(unix)]
    #[test]
    fn failed_build_reports_diagnostics_and_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::default()
            .project_dir(dir.path())
            .build_command(vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo './main.go:3:2: undefined: foo' >&2; exit 2".to_string(),
            ])
            .binary(dir.path().join("never-built"))
            .build()
            .unwrap();

        match Controller::new(&config).unwrap().start() {
            Err(Error::Build(failure)) => {
                assert_eq!(failure.status.code(), Some(2));
                assert_eq!(failure.diagnostics, "./main.go:3:2: undefined: foo\n");
            }
            Err(other) => panic!("expected a build failure, got: {}", other),
            Ok(_) => panic!("a failed build must not spawn"),
        }
    }

    #[test]
    fn missing_build_tool_is_an_invocation_error() {
        let config = ConfigBuilder::default()
            .project_dir(std::env::temp_dir())
            .build_command(vec!["relaunch-no-such-build-tool".to_string()])
            .build()
            .unwrap();

        match Controller::new(&config).unwrap().build() {
            Err(Error::BuildInvocation(program, _)) => {
                assert_eq!(program, "relaunch-no-such-build-tool")
            }
            other => panic!("expected an invocation error, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::default()
            .project_dir(dir.path())
            .build_command(vec!["true".to_string()])
            .build()
            .unwrap();

        match Controller::new(&config).unwrap().start() {
            Err(Error::Spawn(path, _)) => assert_eq!(path, config.binary_path()),
            Err(other) => panic!("expected a spawn error, got: {}", other),
            Ok(_) => panic!("nothing was built, nothing should run"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn stop_kills_and_reaps() {
        use std::os::unix::process::ExitStatusExt;

        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::default()
            .project_dir(dir.path())
            .build_command(vec!["true".to_string()])
            .binary("sleep")
            .child_args(vec![OsString::from("30")])
            .build()
            .unwrap();

        let process = Controller::new(&config).unwrap().start().unwrap();
        let status = process.stop().unwrap();

        assert_eq!(status.signal(), Some(9));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn stopping_a_process_that_already_exited_still_reaps_it() {
        use std::thread::sleep;
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::default()
            .project_dir(dir.path())
            .build_command(vec!["true".to_string()])
            .binary("true")
            .build()
            .unwrap();

        let process = Controller::new(&config).unwrap().start().unwrap();
        sleep(Duration::from_millis(200));

        assert!(process.stop().is_ok());
    }
}
