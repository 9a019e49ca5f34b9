use crate::spec::SpecError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ReplicaError
///
/// Structured clone/update failure with a stable classification.
/// `path` is built while the walk unwinds, so it always reads from the
/// root entity down to the offending field.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{}", render(.origin, .class, .message, .path))]
pub struct ReplicaError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
    pub path: Option<String>,
}

impl ReplicaError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            path: None,
        }
    }

    /// A type could not produce a fresh instance to clone into.
    pub fn construction(type_path: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Construct,
            format!("could not create a copy of {type_path}: {reason}"),
        )
    }

    /// A custom clone hook reported a failure.
    pub fn custom_clone(hook: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::IllegalState,
            ErrorOrigin::CustomClone,
            format!("custom clone hook '{hook}' failed: {reason}"),
        )
    }

    /// A sequence kind has no strategy for rebuilding itself.
    pub fn unsupported_container(kind: &str) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Container,
            format!("sequence kind {kind} is not currently supported"),
        )
    }

    /// The registry could not provide an instance of a spec.
    pub fn spec_unavailable(spec: &str) -> Self {
        Self::new(
            ErrorClass::IllegalState,
            ErrorOrigin::Spec,
            format!("update specification {spec} is not available in this registry"),
        )
    }

    /// A spec refused to transform a value.
    pub fn spec_rejected(spec: &str, err: SpecError) -> Self {
        let class = match err {
            SpecError::InvalidArgument { .. } => ErrorClass::InvalidArgument,
            SpecError::NotReversible => ErrorClass::Unsupported,
        };

        Self::new(class, ErrorOrigin::Spec, format!("{spec}: {err}"))
    }

    /// A walk went deeper than the configured limit.
    pub fn depth_exceeded(type_path: &str, max_depth: usize) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Walk,
            format!("walk depth limit {max_depth} exceeded at {type_path}"),
        )
    }

    /// Prepend a field segment to the error path.
    #[must_use]
    pub fn with_field(self, field: impl AsRef<str>) -> Self {
        self.with_path_segment(field.as_ref())
    }

    /// Prepend an index segment to the error path.
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        self.with_path_segment(format!("[{index}]"))
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    #[must_use]
    pub const fn is_illegal_state(&self) -> bool {
        matches!(self.class, ErrorClass::IllegalState)
    }

    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidArgument)
    }

    #[must_use]
    fn with_path_segment(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        self.path = Some(match self.path.take() {
            Some(suffix) => join_segments(&segment, &suffix),
            None => segment,
        });

        self
    }
}

fn render(
    origin: &ErrorOrigin,
    class: &ErrorClass,
    message: &str,
    path: &Option<String>,
) -> String {
    match path {
        Some(path) => format!("{origin}:{class} at {path}: {message}"),
        None => format!("{origin}:{class}: {message}"),
    }
}

fn join_segments(prefix: &str, suffix: &str) -> String {
    if suffix.starts_with('[') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}.{suffix}")
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unsupported,
    IllegalState,
    InvalidArgument,
}

impl ErrorClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::IllegalState => "illegal_state",
            Self::InvalidArgument => "invalid_argument",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Construct,
    CustomClone,
    Container,
    Spec,
    Walk,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Construct => "construct",
            Self::CustomClone => "custom_clone",
            Self::Container => "container",
            Self::Spec => "spec",
            Self::Walk => "walk",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
