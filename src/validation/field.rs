//! Field paths and field errors.
//!
//! [`FieldPath`] names one concrete location inside an object
//! (`status.authorizations[0].challenges[1].token`) and is what errors report.
//! [`PathSpec`] is the declarative form used in rule tables: a list of
//! segments where [`Segment::Each`] stands for every element of a list
//! (`status.authorizations[*].url`).

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathElement {
    Child(String),
    Index(usize),
}

/// A concrete location inside an object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    elements: Vec<PathElement>,
}

impl FieldPath {
    /// Path rooted at field `name`
    pub fn new(name: &str) -> Self {
        Self::default().child(name)
    }

    /// Path to field `name` below this one
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.elements.push(PathElement::Child(name.to_string()));
        path
    }

    /// Path to element `index` of the list at this path
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.elements.push(PathElement::Index(index));
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Child(name) if i == 0 => write!(f, "{}", name)?,
                PathElement::Child(name) => write!(f, ".{}", name)?,
                PathElement::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// One segment of a [`PathSpec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Descend into the named field
    Field(String),
    /// Visit every element of the list at this point
    Each,
}

/// Declarative field path, possibly ranging over list elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSpec {
    segments: Vec<Segment>,
}

impl PathSpec {
    /// Spec rooted at field `name`
    pub fn new(name: &str) -> Self {
        Self {
            segments: vec![Segment::Field(name.to_string())],
        }
    }

    /// Descend into field `name`
    pub fn child(mut self, name: &str) -> Self {
        self.segments.push(Segment::Field(name.to_string()));
        self
    }

    /// Range over every element of the list reached so far
    pub fn each(mut self) -> Self {
        self.segments.push(Segment::Each);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Each => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

/// Classification of a field error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    /// The change is not allowed
    Forbidden,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Forbidden => write!(f, "Forbidden"),
        }
    }
}

/// A rejected mutation at one field path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    pub path: String,
    pub reason: String,
}

impl FieldError {
    pub fn forbidden(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::Forbidden,
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path, self.kind, self.reason)
    }
}

/// Ordered list of field errors
pub type FieldErrorList = Vec<FieldError>;

/// Render errors as a single message, e.g. `[status.url: Forbidden: ...]`.
pub fn aggregate(errors: &[FieldError]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    match messages.as_slice() {
        [single] => single.clone(),
        _ => format!("[{}]", messages.join(", ")),
    }
}
