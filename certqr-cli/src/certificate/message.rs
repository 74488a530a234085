//! Verification message assembly

use super::date::{NOT_AVAILABLE, format_date};
use super::text::{to_proper_case, to_upper_case};
use crate::sheet::{Cell, Field, Row};

/// Country calling code prepended to every mobile number, digits only
pub const COUNTRY_CODE: &str = "880";

const HEADING: &str = "Your Certificate is Verified!";
const LINE_END: &str = "\r\n";

/// Display-ready view of a row. Every field holds either a value or `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    pub student_name: String,
    pub branch_name: String,
    pub student_id: String,
    pub course_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub mobile_number: String,
    pub issue_date: String,
}

impl FormattedRow {
    /// Apply the per-field rules to a raw row.
    ///
    /// Branch is proper-cased and course upper-cased. Issue date is rendered only when
    /// the cell is date-typed. Everything else passes through, with falsy values
    /// becoming `"N/A"`.
    pub fn from_row(row: &Row) -> Self {
        Self {
            student_name: passthrough(row.get(Field::StudentName)),
            branch_name: or_not_available(row.get(Field::BranchName), |c| {
                to_proper_case(c).to_string()
            }),
            student_id: passthrough(row.get(Field::StudentId)),
            course_name: or_not_available(row.get(Field::CourseName), to_upper_case),
            father_name: passthrough(row.get(Field::FatherName)),
            mother_name: passthrough(row.get(Field::MotherName)),
            mobile_number: passthrough(row.get(Field::MobileNumber)),
            issue_date: match row.get(Field::IssueDate) {
                date @ Cell::Date(_) => format_date(date),
                _ => NOT_AVAILABLE.to_string(),
            },
        }
    }
}

fn passthrough(cell: &Cell) -> String {
    or_not_available(cell, |c| c.to_string())
}

fn or_not_available(cell: &Cell, format: impl FnOnce(&Cell) -> String) -> String {
    if cell.is_truthy() {
        format(cell)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Compose the CRLF-terminated verification message for one student
pub fn build_message(row: &FormattedRow) -> String {
    let lines: [(&str, String); 8] = [
        ("Branch Name: ", row.branch_name.clone()),
        ("Student Name: ", row.student_name.clone()),
        ("Student ID: ", row.student_id.clone()),
        ("Course: ", row.course_name.clone()),
        ("Father's Name: ", row.father_name.clone()),
        ("Mother's Name: ", row.mother_name.clone()),
        ("Mobile: +", format!("{}{}", COUNTRY_CODE, row.mobile_number)),
        ("Issue Date: ", row.issue_date.clone()),
    ];

    let mut message = String::from(HEADING);
    message.push_str(LINE_END);
    for (label, value) in lines {
        message.push_str(label);
        message.push_str(&value);
        message.push_str(LINE_END);
    }
    message
}
