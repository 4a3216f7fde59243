use std::fmt;

use itertools::Itertools;

/// A dotted name such as `java.util.Set` or `com.example.AppModule`.
#[derive(Clone, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Path {
    parts: Vec<String>,
}

impl Path {
    pub fn new() -> Path {
        Path { parts: vec![] }
    }

    /// The last segment of the path.
    pub fn name(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.parts.clone()
    }

    pub fn append<T: ToString>(&self, s: T) -> Path {
        let mut parts = self.parts.clone();
        parts.push(s.to_string());
        Path { parts }
    }

    pub fn parent(&self) -> Path {
        let mut parts = self.parts.clone();
        parts.pop();
        Path { parts }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.iter().join("."))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Path {
        let parts = s
            .split(|c| c == '.' || c == ':')
            .filter(|p| !p.is_empty())
            .map(|p| p.trim().to_string())
            .collect();
        Path { parts }
    }
}

impl From<String> for Path {
    fn from(s: String) -> Path {
        Path::from(s.as_str())
    }
}

impl From<Vec<String>> for Path {
    fn from(parts: Vec<String>) -> Path {
        Path { parts }
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        *self == Path::from(*other)
    }
}
