use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Column identity independent of the header wording in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum CanonicalField {
    FullName,
    Date,
    CheckIn,
    CheckOut,
    LateIndicator,
    EarlyOut,
    ScheduleIn,
    ScheduleOut,
}

/// Which built-in header table to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMode {
    Flexible,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: CanonicalField,
    pub candidates: &'static [&'static str],
    pub required: bool,
}

const fn spec(
    field: CanonicalField,
    candidates: &'static [&'static str],
    required: bool,
) -> ColumnSpec {
    ColumnSpec {
        field,
        candidates,
        required,
    }
}

// Accepted header names. Existing exports depend on these, keep them stable.
const FLEXIBLE: &[ColumnSpec] = &[
    spec(
        CanonicalField::FullName,
        &["Full Name", "Employee Name", "Name", "Nama"],
        true,
    ),
    spec(
        CanonicalField::Date,
        &["Date*", "Date", "Attendance Date", "Tanggal"],
        false,
    ),
    spec(
        CanonicalField::CheckIn,
        &["Check In", "Clock In", "In Time", "Jam Masuk"],
        true,
    ),
    spec(
        CanonicalField::CheckOut,
        &["Check Out", "Clock Out", "Out Time", "Jam Pulang"],
        false,
    ),
    spec(CanonicalField::LateIndicator, &["Late In"], false),
    spec(CanonicalField::EarlyOut, &["Early Out"], false),
    spec(
        CanonicalField::ScheduleIn,
        &["Schedule In", "Shift In", "Jam Masuk Jadwal"],
        false,
    ),
    spec(
        CanonicalField::ScheduleOut,
        &["Schedule Out", "Shift Out", "Jam Pulang Jadwal"],
        false,
    ),
];

const STRICT: &[ColumnSpec] = &[
    spec(CanonicalField::FullName, &["Full Name"], true),
    spec(CanonicalField::Date, &["Date"], true),
    spec(CanonicalField::CheckIn, &["Check In"], true),
    spec(CanonicalField::CheckOut, &["Check Out"], true),
    spec(CanonicalField::LateIndicator, &["Late In"], true),
    spec(CanonicalField::EarlyOut, &["Early Out"], true),
];

/// Ordered table of (field, candidate names, required?) used by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    specs: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn new(specs: Vec<ColumnSpec>) -> Self {
        Self { specs }
    }

    pub fn flexible() -> Self {
        Self::new(FLEXIBLE.to_vec())
    }

    pub fn strict() -> Self {
        Self::new(STRICT.to_vec())
    }

    pub fn for_mode(mode: ColumnMode) -> Self {
        match mode {
            ColumnMode::Flexible => Self::flexible(),
            ColumnMode::Strict => Self::strict(),
        }
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::flexible()
    }
}

/// Canonical field -> column index, built once per sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: Vec<(CanonicalField, usize)>,
}

impl ColumnMap {
    pub fn insert(&mut self, field: CanonicalField, index: usize) {
        match self.indices.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = index,
            None => self.indices.push((field, index)),
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.indices
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }
}
