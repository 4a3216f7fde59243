use colored::*;
use std::{fmt, io};

mod diagnostic;

pub use diagnostic::{Diagnostic, DiagnosticKind, Report, Severity};

pub type StilettoResult<T = ()> = Result<T, StilettoError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StilettoErrorKind {
    Parse,
    Manifest,
    IO,
    Unknown,
}

impl fmt::Display for StilettoErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StilettoErrorKind::Parse => "parse error",
                StilettoErrorKind::Manifest => "manifest error",
                StilettoErrorKind::IO => "i/o error",
                StilettoErrorKind::Unknown => "unknown error",
            }
        )
    }
}

/// A failure to build the inputs of resolution. Problems with the resolved
/// graph itself are reported as [`Diagnostic`]s instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StilettoError {
    pub msg: String,
    pub src: Option<String>,
    pub kind: StilettoErrorKind,
}

impl StilettoError {
    pub fn new<S: Into<String>>(kind: StilettoErrorKind, msg: S) -> StilettoError {
        StilettoError {
            msg: msg.into(),
            src: None,
            kind,
        }
    }

    pub fn parse<S: Into<String>>(msg: S, src: &str) -> StilettoError {
        StilettoError {
            msg: msg.into(),
            src: Some(src.to_string()),
            kind: StilettoErrorKind::Parse,
        }
    }

    pub fn manifest<S: Into<String>>(msg: S) -> StilettoError {
        StilettoError::new(StilettoErrorKind::Manifest, msg)
    }

    pub fn with_src<S: Into<String>>(mut self, src: S) -> StilettoError {
        self.src = Some(src.into());
        self
    }

    pub fn emit(self) {
        let kind = format!("{}:", self.kind);
        let mut msg_lines = self.msg.lines().collect::<Vec<_>>();
        msg_lines.dedup();
        let indent = " ".repeat(kind.len() + 1);
        let msg = msg_lines
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if i == 0 {
                    s.to_string()
                } else {
                    format!("{}{}", indent, s)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        eprintln!("{} {}", kind.bold().red(), msg.bold());
        if let Some(src) = self.src {
            eprintln!(" {} {}", "-->".bold(), src);
        }
        eprintln!()
    }
}

impl fmt::Display for StilettoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)?;
        if let Some(src) = &self.src {
            write!(f, " (in `{}`)", src)?;
        }
        Ok(())
    }
}

impl std::error::Error for StilettoError {}

impl From<StilettoError> for Vec<StilettoError> {
    fn from(err: StilettoError) -> Vec<StilettoError> {
        vec![err]
    }
}

impl From<io::Error> for StilettoError {
    fn from(err: io::Error) -> StilettoError {
        StilettoError::new(StilettoErrorKind::IO, err.to_string())
    }
}

impl From<serde_json::Error> for StilettoError {
    fn from(err: serde_json::Error) -> StilettoError {
        let kind = if err.is_io() {
            StilettoErrorKind::IO
        } else {
            StilettoErrorKind::Manifest
        };
        StilettoError::new(kind, err.to_string())
    }
}
