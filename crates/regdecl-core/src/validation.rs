//! Validation traits and types for registry configuration.
//!
//! Every check in this module runs before a descriptor is produced, so a
//! rejected configuration never reaches the provisioning engine.

use std::fmt;

/// Maximum length of a repository name accepted by the registry service.
pub const REPOSITORY_NAME_MAX_LENGTH: usize = 256;

/// Minimum length of a repository name accepted by the registry service.
pub const REPOSITORY_NAME_MIN_LENGTH: usize = 2;

/// Separators allowed between alphanumeric runs inside a path segment.
const NAME_SEPARATORS: &[char] = &['.', '_', '-'];

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The configuration field that failed validation.
    pub field: String,
    /// A human-readable description of the validation failure.
    pub message: String,
    /// The kind of validation that failed.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use regdecl_core::ValidationError;
    /// use regdecl_core::validation::ValidationErrorKind;
    ///
    /// let error = ValidationError::new(
    ///     "repository_name",
    ///     "must be lowercase",
    ///     ValidationErrorKind::Format,
    /// );
    /// assert_eq!(error.field, "repository_name");
    /// ```
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Creates a validation error for a required field that is missing.
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' is required but was not provided"),
            field,
            kind: ValidationErrorKind::Required,
        }
    }

    /// Creates a validation error for an invalid format.
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ValidationErrorKind::Format,
        }
    }

    /// Creates a validation error for a value out of range.
    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ValidationErrorKind::Range,
        }
    }

    /// Creates a validation error for a value that is empty or blank.
    pub fn empty(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' must not be empty"),
            field,
            kind: ValidationErrorKind::Empty,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field was not provided.
    Required,
    /// The value format is invalid.
    Format,
    /// The value is outside the allowed range.
    Range,
    /// The value is empty or whitespace-only.
    Empty,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Format => write!(f, "format"),
            Self::Range => write!(f, "range"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty validation errors collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validation error to the collection.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are no validation errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of validation errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns an iterator over the validation errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Returns true if any error refers to the given field.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Returns `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collection itself if it holds at least one error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Merges another `ValidationErrors` into this one.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = ValidationError>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "no validation errors")
        } else if self.errors.len() == 1 {
            write!(f, "{}", self.errors[0])
        } else {
            writeln!(f, "{} validation errors:", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "  - {error}")?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for types that can be validated.
///
/// # Examples
///
/// ```
/// use regdecl_core::validation::{Validate, ValidationError, ValidationErrors};
///
/// struct KeyAlias(String);
///
/// impl Validate for KeyAlias {
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         let mut errors = ValidationErrors::new();
///         if !self.0.starts_with("alias/") {
///             errors.add(ValidationError::format("kms_key", "must start with 'alias/'"));
///         }
///         errors.into_result()
///     }
/// }
///
/// assert!(KeyAlias("alias/registry".into()).is_valid());
/// assert!(!KeyAlias("registry".into()).is_valid());
/// ```
pub trait Validate {
    /// Validates this instance and returns every failure found.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` containing all validation failures found.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Returns true if this instance is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Checks a repository name.
///
/// Empty and whitespace-only names are always rejected. When `strict` is
/// set the registry naming grammar is also enforced locally: lowercase
/// alphanumeric runs joined by single `.`, `_` or `-`, with path segments
/// separated by `/`. Without `strict` the grammar is left to the
/// provisioning engine.
///
/// # Examples
///
/// ```
/// use regdecl_core::validation::check_repository_name;
///
/// assert!(check_repository_name("repository_name", "team/my-repo", true).is_empty());
/// assert!(!check_repository_name("repository_name", "My_Repo", true).is_empty());
/// assert!(check_repository_name("repository_name", "My_Repo", false).is_empty());
/// assert!(!check_repository_name("repository_name", "   ", false).is_empty());
/// ```
#[must_use]
pub fn check_repository_name(field: &str, name: &str, strict: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if name.is_empty() {
        errors.add(ValidationError::required(field));
        return errors;
    }
    if name.trim().is_empty() {
        errors.add(ValidationError::empty(field));
        return errors;
    }
    if name.len() > REPOSITORY_NAME_MAX_LENGTH {
        errors.add(ValidationError::range(
            field,
            format!(
                "exceeds maximum length ({} > {REPOSITORY_NAME_MAX_LENGTH})",
                name.len()
            ),
        ));
        return errors;
    }
    if !strict {
        return errors;
    }

    if name.len() < REPOSITORY_NAME_MIN_LENGTH {
        errors.add(ValidationError::range(
            field,
            format!("must be at least {REPOSITORY_NAME_MIN_LENGTH} characters"),
        ));
    }

    let invalid_chars: Vec<char> = name
        .chars()
        .filter(|c| {
            !(c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || *c == '/'
                || NAME_SEPARATORS.contains(c))
        })
        .collect();
    if !invalid_chars.is_empty() {
        errors.add(ValidationError::format(
            field,
            format!("contains invalid characters: {invalid_chars:?} (allowed: a-z, 0-9, '.', '_', '-', '/')"),
        ));
        return errors;
    }

    if let Some(segment) = name.split('/').find(|segment| !is_valid_segment(segment)) {
        let message = if segment.is_empty() {
            "contains an empty path segment".to_string()
        } else {
            format!(
                "segment '{segment}' must start and end with a letter or digit and not repeat separators"
            )
        };
        errors.add(ValidationError::format(field, message));
    }

    errors
}

fn is_valid_segment(segment: &str) -> bool {
    let starts_ok = segment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = segment
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let no_runs = !segment
        .as_bytes()
        .windows(2)
        .any(|w| NAME_SEPARATORS.contains(&char::from(w[0])) && NAME_SEPARATORS.contains(&char::from(w[1])));

    starts_ok && ends_ok && no_runs
}
