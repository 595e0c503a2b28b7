// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! PBS CLI integration: query inventory via qstat, pbsnodes, pbs_rstat and qmgr.

use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output};

use thiserror::Error;

use super::parser::{parse_status_output, ParseError};
use super::types::{Category, Record};

/// Environment variable the PBS clients read the target server from
const PBS_SERVER_ENV: &str = "PBS_SERVER";

/// The PBS server could not be reached
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot run {program} to reach {server}: {source}")]
    Spawn {
        server: String,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot connect to {server}: {stderr}")]
    Refused { server: String, stderr: String },
}

/// One category's query failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to execute {program} for {category}: {source}")]
    Spawn {
        category: Category,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed for {category}: {stderr}")]
    Exit {
        category: Category,
        program: String,
        stderr: String,
    },
    #[error("unexpected {category} status output: {source}")]
    Parse {
        category: Category,
        #[source]
        source: ParseError,
    },
}

/// Source of inventory records for one category at a time
pub trait Fetcher {
    fn fetch(&self, category: Category) -> Result<Vec<Record>, FetchError>;
}

/// Command line used to list one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl StatusCommand {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Servers => Self::new("qstat", &["-B", "-f"]),
            Category::Queues => Self::new("qstat", &["-Q", "-f"]),
            Category::Nodes => Self::new("pbsnodes", &["-a"]),
            // t: expand job arrays into subjobs, x: include finished jobs
            Category::Jobs => Self::new("qstat", &["-f", "-t", "-x"]),
            Category::Reservations => Self::new("pbs_rstat", &["-f"]),
            Category::Resources => Self::new("qmgr", &["-c", "list resource"]),
            Category::Schedulers => Self::new("qmgr", &["-c", "list sched"]),
        }
    }

    const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

/// An established session with one PBS server.
///
/// The PBS clients are stateless, so the session only pins the server address
/// and installation prefix every query is run against.
#[derive(Debug)]
pub struct Session {
    server: String,
    pbs_exec: Option<PathBuf>,
}

impl Session {
    /// Connect to `server`, verifying it answers a server status query
    pub fn connect(server: &str, pbs_exec: Option<PathBuf>) -> Result<Self, ConnectionError> {
        let session = Self {
            server: server.to_string(),
            pbs_exec,
        };

        let program = session.program_path("qstat");
        let output = session
            .command(&program)
            .args(["-B", server])
            .output()
            .map_err(|source| ConnectionError::Spawn {
                server: server.to_string(),
                program: program.to_string_lossy().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConnectionError::Refused {
                server: server.to_string(),
                stderr: stderr_of(&output),
            });
        }

        tracing::debug!(server, "server answered status query");
        Ok(session)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// End the session
    pub fn disconnect(self) {
        tracing::debug!(server = %self.server, "disconnected");
    }

    /// Resolve a PBS client name against the installation prefix, if any
    fn program_path(&self, program: &str) -> PathBuf {
        match &self.pbs_exec {
            Some(prefix) => prefix.join("bin").join(program),
            None => PathBuf::from(program),
        }
    }

    fn command(&self, program: impl AsRef<OsStr>) -> Command {
        let mut cmd = Command::new(program);
        cmd.env(PBS_SERVER_ENV, &self.server);
        cmd
    }
}

impl Fetcher for Session {
    fn fetch(&self, category: Category) -> Result<Vec<Record>, FetchError> {
        let status = StatusCommand::for_category(category);
        let program = self.program_path(status.program);

        let output = self
            .command(&program)
            .args(status.args)
            .output()
            .map_err(|source| FetchError::Spawn {
                category,
                program: status.program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::Exit {
                category,
                program: status.program.to_string(),
                stderr: stderr_of(&output),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_status_output(&stdout, category)
            .map_err(|source| FetchError::Parse { category, source })
    }
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.trim() {
        "" => format!("exited with {}", output.status),
        msg => msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_command_jobs_includes_arrays_and_finished() {
        let cmd = StatusCommand::for_category(Category::Jobs);
        assert_eq!(cmd.program, "qstat");
        assert!(cmd.args.contains(&"-t"));
        assert!(cmd.args.contains(&"-x"));
    }

    #[test]
    fn test_status_command_per_category() {
        assert_eq!(StatusCommand::for_category(Category::Nodes).program, "pbsnodes");
        assert_eq!(StatusCommand::for_category(Category::Reservations).program, "pbs_rstat");
        assert_eq!(
            StatusCommand::for_category(Category::Schedulers).args,
            &["-c", "list sched"]
        );
    }

    #[test]
    fn test_program_path_with_prefix() {
        let session = Session {
            server: "pbs-m1".to_string(),
            pbs_exec: Some(PathBuf::from("/opt/pbs")),
        };
        assert_eq!(session.program_path("qstat"), PathBuf::from("/opt/pbs/bin/qstat"));
    }

    #[test]
    fn test_program_path_without_prefix() {
        let session = Session {
            server: "pbs-m1".to_string(),
            pbs_exec: None,
        };
        assert_eq!(session.program_path("pbsnodes"), PathBuf::from("pbsnodes"));
    }

    #[test]
    fn test_connect_missing_client_is_connection_error() {
        let missing = tempfile::TempDir::new().unwrap();
        let err = Session::connect("pbs-m1", Some(missing.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConnectionError::Spawn { .. }));
        assert!(err.to_string().contains("pbs-m1"));
    }

    #[test]
    fn test_fetch_missing_client_is_fetch_error() {
        let missing = tempfile::TempDir::new().unwrap();
        let session = Session {
            server: "pbs-m1".to_string(),
            pbs_exec: Some(missing.path().to_path_buf()),
        };
        let err = session.fetch(Category::Queues).unwrap_err();
        assert!(matches!(err, FetchError::Spawn { category: Category::Queues, .. }));
    }
}
