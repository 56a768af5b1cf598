use std::fmt;

/// A deck card row needs the word to guess plus five taboo words.
pub const REQUIRED_COLUMNS: usize = 6;

const UNDEFINED_LITERAL: &str = "undefined";

/// One decoded input line: column name -> value, in file order, plus the
/// 1-based data line it came from. Column names follow the header row; a
/// column past the end of the header row is named by its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    line: u64,
    columns: Vec<(String, String)>,
}

impl RowRecord {
    pub fn new(line: u64, columns: Vec<(String, String)>) -> Self {
        Self { line, columns }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[(String, String)] {
        &self.columns
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, value)| value.as_str())
    }

    /// The first column: the word players must get others to guess.
    pub fn primary_word(&self) -> &str {
        self.columns
            .first()
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    Valid,
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    WrongColumnCount(usize),
    EmptyValue(String),
    UndefinedValue(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongColumnCount(found) => {
                write!(f, "expected {} columns, found {}", REQUIRED_COLUMNS, found)
            }
            Self::EmptyValue(column) => write!(f, "column '{}' is empty", column),
            Self::UndefinedValue(column) => {
                write!(f, "column '{}' is the literal string 'undefined'", column)
            }
        }
    }
}

/// Row-shape check shared by every path that touches input rows: exactly six
/// columns, no value empty or the literal string "undefined". First
/// violation in column order wins.
pub fn classify_row(record: &RowRecord) -> RowClass {
    if record.len() != REQUIRED_COLUMNS {
        return RowClass::Invalid(InvalidReason::WrongColumnCount(record.len()));
    }
    for (name, value) in record.columns() {
        if value.is_empty() {
            return RowClass::Invalid(InvalidReason::EmptyValue(name.clone()));
        }
        if value == UNDEFINED_LITERAL {
            return RowClass::Invalid(InvalidReason::UndefinedValue(name.clone()));
        }
    }
    RowClass::Valid
}
