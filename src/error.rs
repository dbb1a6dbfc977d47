// Copyright (c) 2026 rezky_nightky

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The host cannot provide a drawing context or a usable viewport.
    /// Only raised during startup; nothing retries it.
    #[error("environment unavailable: {what}")]
    EnvironmentUnavailable {
        what: &'static str,
        #[source]
        source: Option<io::Error>,
    },

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn unavailable(what: &'static str) -> Self {
        Error::EnvironmentUnavailable { what, source: None }
    }

    pub fn unavailable_io(what: &'static str, source: io::Error) -> Self {
        Error::EnvironmentUnavailable {
            what,
            source: Some(source),
        }
    }

    pub fn is_environment_unavailable(&self) -> bool {
        matches!(self, Error::EnvironmentUnavailable { .. })
    }
}
