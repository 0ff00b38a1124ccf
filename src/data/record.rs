/// One row of a dataset.
///
/// Records are value objects: cloning yields an independent copy. The
/// `original_position` tag survives projection onto an attribute subset, which is
/// how a partition built over a projected dataset is mapped back onto the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<f64>,
    original_position: usize,
    group_id: Option<usize>,
}

impl Record {
    /// Create a record with no group assigned.
    pub fn new(values: Vec<f64>, original_position: usize) -> Self {
        Self {
            values,
            original_position,
            group_id: None,
        }
    }

    /// Attribute values, one per attribute of the owning dataset.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of attribute `attr`.
    #[inline]
    pub fn value(&self, attr: usize) -> f64 {
        self.values[attr]
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of this record in the dataset it was first loaded into.
    #[inline]
    pub fn original_position(&self) -> usize {
        self.original_position
    }

    /// Group this record was assigned to, if any.
    #[inline]
    pub fn group_id(&self) -> Option<usize> {
        self.group_id
    }

    /// Keep only the values at `attrs`, in that order.
    pub(crate) fn project(&self, attrs: &[usize]) -> Self {
        Self {
            values: attrs.iter().map(|&a| self.values[a]).collect(),
            original_position: self.original_position,
            group_id: self.group_id,
        }
    }

    pub(crate) fn set_value(&mut self, attr: usize, value: f64) {
        self.values[attr] = value;
    }

    pub(crate) fn set_group_id(&mut self, group: Option<usize>) {
        self.group_id = group;
    }
}
