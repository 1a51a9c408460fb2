//! Roll-number rules.
//!
//! New students are appended to their class. Numbers are never reused, so
//! deletions and promotions leave gaps or duplicates until the class is
//! renumbered explicitly.

use crate::domain::Student;

/// Roll number for a student joining a class of `existing` students.
pub fn next_roll_number(existing: i64) -> i32 {
    i32::try_from(existing.max(0)).unwrap_or(i32::MAX - 1) + 1
}

/// Assign 1..N to a class ordered by first, middle and last name, then id.
///
/// Returns `(student_id, roll_no)` pairs in the new order.
pub fn renumber(students: &[Student]) -> Vec<(i64, i32)> {
    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by(|a, b| {
        name_key(a)
            .cmp(&name_key(b))
            .then_with(|| a.id.cmp(&b.id))
    });

    ordered
        .into_iter()
        .zip(1..)
        .map(|(student, roll_no)| (student.id, roll_no))
        .collect()
}

fn name_key(student: &Student) -> (String, String, String) {
    (
        student.first_name.trim().to_lowercase(),
        student.middle_name.as_deref().unwrap_or("").trim().to_lowercase(),
        student.last_name.as_deref().unwrap_or("").trim().to_lowercase(),
    )
}
