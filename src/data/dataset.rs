use std::cell::OnceCell;

use super::{mean, population_variance, Attribute, Confidentiality, Record, Role};
use crate::error::{Result, SdcError};

/// An in-memory table of numeric records.
///
/// Per-attribute variances are computed on first use and dropped by every method
/// that changes a value, so distance computations never see a stale table.
#[derive(Debug, Clone)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    records: Vec<Record>,
    variances: OnceCell<Vec<f64>>,
}

impl Dataset {
    /// Create an empty dataset. Attribute indices are renumbered to their positions.
    pub fn new(mut attributes: Vec<Attribute>) -> Self {
        for (i, a) in attributes.iter_mut().enumerate() {
            a.set_index(i);
        }
        Self {
            attributes,
            records: Vec::new(),
            variances: OnceCell::new(),
        }
    }

    /// Build a dataset from rows of values. Rows receive original positions `0..n`.
    pub fn from_rows<I>(attributes: Vec<Attribute>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        let mut dataset = Self::new(attributes);
        for row in rows {
            dataset.push(row)?;
        }
        Ok(dataset)
    }

    /// Append a row. Its original position is the current length.
    pub fn push(&mut self, values: Vec<f64>) -> Result<()> {
        let position = self.records.len();
        self.push_record(Record::new(values, position))
    }

    /// Append a record, keeping its tags.
    pub fn push_record(&mut self, record: Record) -> Result<()> {
        if record.len() != self.attributes.len() {
            return Err(SdcError::ShapeMismatch {
                expected: self.attributes.len(),
                actual: record.len(),
            });
        }
        self.records.push(record);
        self.invalidate();
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    /// Case-insensitive lookup of an attribute by name.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }

    #[inline]
    pub fn record(&self, index: usize) -> &Record {
        &self.records[index]
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn value(&self, record: usize, attr: usize) -> f64 {
        self.records[record].value(attr)
    }

    /// Overwrite one value.
    pub fn set_value(&mut self, record: usize, attr: usize, value: f64) {
        self.records[record].set_value(attr, value);
        self.invalidate();
    }

    /// Tag a record with the group it belongs to.
    pub fn set_group_id(&mut self, record: usize, group: Option<usize>) {
        self.records[record].set_group_id(group);
    }

    /// All values of one attribute, in record order.
    pub fn column(&self, attr: usize) -> Vec<f64> {
        self.records.iter().map(|r| r.value(attr)).collect()
    }

    /// Population variance of every attribute over all records.
    pub fn variances(&self) -> &[f64] {
        self.variances.get_or_init(|| {
            (0..self.num_attributes())
                .map(|a| population_variance(&self.column(a)))
                .collect()
        })
    }

    /// Variance of a single attribute.
    pub fn variance(&self, attr: usize) -> f64 {
        self.variances()[attr]
    }

    /// Mean of every attribute over all records.
    pub fn means(&self) -> Vec<f64> {
        (0..self.num_attributes())
            .map(|a| mean(&self.column(a)))
            .collect()
    }

    /// Population covariance of two attributes.
    pub fn covariance(&self, a: usize, b: usize) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let (xs, ys) = (self.column(a), self.column(b));
        let (mx, my) = (mean(&xs), mean(&ys));
        let sum: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - mx) * (y - my))
            .sum();
        sum / xs.len() as f64
    }

    /// Indices of the quasi-identifier attributes.
    pub fn quasi_identifiers(&self) -> Vec<usize> {
        self.indices_where(|a| a.is_quasi_identifier())
    }

    /// Indices of the confidential attributes.
    pub fn confidential_attributes(&self) -> Vec<usize> {
        self.indices_where(|a| a.is_confidential())
    }

    /// Indices of every attribute that takes part in numeric processing.
    pub fn non_identifiers(&self) -> Vec<usize> {
        self.indices_where(|a| !a.is_identifier())
    }

    fn indices_where(&self, pred: impl Fn(&Attribute) -> bool) -> Vec<usize> {
        self.attributes
            .iter()
            .filter(|a| pred(a))
            .map(Attribute::index)
            .collect()
    }

    /// Project onto `attrs` (in that order), keeping every record's tags.
    pub fn restrict(&self, attrs: &[usize]) -> Result<Self> {
        if let Some(&bad) = attrs.iter().find(|&&a| a >= self.num_attributes()) {
            return Err(SdcError::UnknownAttribute(format!("#{bad}")));
        }
        let attributes = attrs.iter().map(|&a| self.attributes[a].clone()).collect();
        let mut derived = Self::new(attributes);
        derived.records = self.records.iter().map(|r| r.project(attrs)).collect();
        Ok(derived)
    }

    /// Projection onto the quasi-identifiers.
    pub fn quasi_identifier_dataset(&self) -> Result<Self> {
        let qi = self.quasi_identifiers();
        if qi.is_empty() {
            return Err(SdcError::NoAttributes("quasi-identifier"));
        }
        self.restrict(&qi)
    }

    /// Projection onto a single confidential attribute.
    pub fn confidential_dataset(&self, attr: usize) -> Result<Self> {
        self.restrict(&[attr])
    }

    /// Mark the named attributes as quasi-identifiers.
    pub fn set_quasi_identifiers<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.set_confidentiality(names, Confidentiality::QuasiIdentifier)
    }

    /// Mark the named attributes as confidential.
    pub fn set_confidential<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.set_confidentiality(names, Confidentiality::Confidential)
    }

    fn set_confidentiality<S: AsRef<str>>(
        &mut self,
        names: &[S],
        class: Confidentiality,
    ) -> Result<()> {
        for name in names {
            let idx = self
                .attribute_index(name.as_ref())
                .ok_or_else(|| SdcError::UnknownAttribute(name.as_ref().to_string()))?;
            self.attributes[idx].set_confidentiality(class);
        }
        Ok(())
    }

    /// Named attributes become predictors, every other attribute a response.
    pub fn set_predictors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let mut predictors = Vec::with_capacity(names.len());
        for name in names {
            predictors.push(
                self.attribute_index(name.as_ref())
                    .ok_or_else(|| SdcError::UnknownAttribute(name.as_ref().to_string()))?,
            );
        }
        for a in &mut self.attributes {
            let role = if predictors.contains(&a.index()) {
                Role::Predictor
            } else {
                Role::Response
            };
            a.set_role(role);
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.variances.take();
    }
}

/// Datasets compare equal when attributes and records match; the cache is ignored.
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes && self.records == other.records
    }
}
