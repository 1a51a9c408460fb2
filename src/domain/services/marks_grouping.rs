//! Marks grouping.
//!
//! Flat mark rows are folded into one record per student, each holding the
//! student's per-paper scores with the paper's full and pass marks.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{MarkEntry, Student};

/// One paper's score for a student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperMark {
    pub paper_id: i64,
    pub subject_name: String,
    pub full_marks: Decimal,
    pub pass_marks: Decimal,
    pub marks: Decimal,
}

/// A student's marks across the papers of one exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentMarks {
    pub student_id: i64,
    pub enrollment_id: String,
    pub name: String,
    pub roll_no: i32,
    pub class_id: i64,
    pub papers: Vec<PaperMark>,
}

/// Group `entries` by student.
///
/// Students are ordered by roll number, then id; papers by paper id. Every
/// student appears, even with no entries. Entries for students not in
/// `students` are dropped.
pub fn group_marks(students: &[Student], entries: Vec<MarkEntry>) -> Vec<StudentMarks> {
    let mut by_student: HashMap<i64, Vec<PaperMark>> = HashMap::with_capacity(students.len());
    for entry in entries {
        by_student.entry(entry.student_id).or_default().push(PaperMark {
            paper_id: entry.paper_id,
            subject_name: entry.subject_name,
            full_marks: entry.full_marks,
            pass_marks: entry.pass_marks,
            marks: entry.marks,
        });
    }

    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by_key(|s| (s.roll_no, s.id));

    ordered
        .into_iter()
        .map(|student| {
            let mut papers = by_student.remove(&student.id).unwrap_or_default();
            papers.sort_by_key(|p| p.paper_id);
            StudentMarks {
                student_id: student.id,
                enrollment_id: student.enrollment_id.clone(),
                name: student.full_name(),
                roll_no: student.roll_no,
                class_id: student.class_id,
                papers,
            }
        })
        .collect()
}
