//! Parsed name entries

/// One person's name as read from the name source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub first_name: String,
    pub last_name: String,
}

impl NameRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// True when both name parts are empty
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }

    /// The two text lines a namecard starts with
    pub fn lines(&self) -> Vec<String> {
        vec![self.first_name.clone(), self.last_name.clone()]
    }
}

/// Ordered list of loaded names. Order defines quadrant assignment and pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameRecordStore {
    records: Vec<NameRecord>,
}

impl NameRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<NameRecord>) -> Self {
        Self { records }
    }

    /// Replace every record, keeping input order
    pub fn replace(&mut self, records: Vec<NameRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&NameRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameRecord> {
        self.records.iter()
    }
}

impl FromIterator<NameRecord> for NameRecordStore {
    fn from_iter<I: IntoIterator<Item = NameRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
