use serde::{Deserialize, Serialize};

/// Disclosure class of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidentiality {
    /// Directly identifying. Excluded from all numeric processing.
    #[default]
    Identifier,
    /// Re-identifying in combination with others. Clustered by MDAV.
    QuasiIdentifier,
    /// Sensitive value protected by swapping or synthesis.
    Confidential,
}

/// Regression role of an attribute. Hybrid synthesis leaves predictors untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Predictor,
    #[default]
    Response,
}

/// Declared numeric kind, decided when the dataset is loaded.
///
/// Centroids of `Integer` attributes are rounded (half to even).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Integer,
    #[default]
    Real,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    index: usize,
    name: String,
    role: Role,
    confidentiality: Confidentiality,
    kind: NumericKind,
}

impl Attribute {
    /// New identifier attribute with the response role and real kind.
    ///
    /// The index is reassigned when the attribute is placed in a dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            index: 0,
            name: name.into(),
            role: Role::default(),
            confidentiality: Confidentiality::default(),
            kind: NumericKind::default(),
        }
    }

    #[must_use]
    pub fn with_confidentiality(mut self, confidentiality: Confidentiality) -> Self {
        self.confidentiality = confidentiality;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NumericKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for a real-valued quasi-identifier.
    pub fn quasi_identifier(name: impl Into<String>) -> Self {
        Self::new(name).with_confidentiality(Confidentiality::QuasiIdentifier)
    }

    /// Shorthand for a real-valued confidential response attribute.
    pub fn confidential(name: impl Into<String>) -> Self {
        Self::new(name).with_confidentiality(Confidentiality::Confidential)
    }

    /// Position of this attribute in its dataset.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn confidentiality(&self) -> Confidentiality {
        self.confidentiality
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn is_quasi_identifier(&self) -> bool {
        self.confidentiality == Confidentiality::QuasiIdentifier
    }

    pub fn is_confidential(&self) -> bool {
        self.confidentiality == Confidentiality::Confidential
    }

    pub fn is_identifier(&self) -> bool {
        self.confidentiality == Confidentiality::Identifier
    }

    pub fn is_predictor(&self) -> bool {
        self.role == Role::Predictor
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn set_confidentiality(&mut self, confidentiality: Confidentiality) {
        self.confidentiality = confidentiality;
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.name, self.confidentiality)
    }
}
