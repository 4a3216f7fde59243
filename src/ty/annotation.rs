use std::fmt;

use super::Path;

/// An annotation reference: a type path plus its raw, already-normalized
/// argument text, e.g. `@Named("db")`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Annotation {
    pub path: Path,
    pub args: Option<String>,
}

impl Annotation {
    pub fn new<P: Into<Path>>(path: P) -> Annotation {
        Annotation {
            path: path.into(),
            args: None,
        }
    }

    pub fn with_args<P: Into<Path>, S: Into<String>>(path: P, args: S) -> Annotation {
        Annotation {
            path: path.into(),
            args: Some(args.into()),
        }
    }

    pub fn name(&self) -> &str {
        self.path.name().unwrap_or_default()
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.path)?;
        if let Some(args) = &self.args {
            write!(f, "({})", args)?;
        }
        Ok(())
    }
}
