//! In-memory repositories for service tests.
//!
//! One `InMemorySchool` implements every repository trait so a test can hand
//! the same store to each service parameter and inspect it afterwards.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal::Decimal;

use crate::domain::services::{plan_settlement, OutstandingBalance, ReceiptTotals};
use crate::domain::{
    Class, ClassRepository, Exam, ExamPaper, ExamRepository, FeeComponents, MarkEdit, MarkEntry,
    MarkRepository, MarkUpdateOutcome, Month, MonthRepository, NewReceipt, NewStudent, Receipt,
    ReceiptRepository, RecordedReceipt, Student, StudentRepository,
};
use crate::shared::error::AppError;

#[derive(Default)]
struct State {
    classes: Vec<Class>,
    students: Vec<Student>,
    exams: Vec<Exam>,
    papers: Vec<ExamPaper>,
    marks: BTreeMap<(i64, i64), Decimal>,
    receipts: Vec<Receipt>,
    months: Vec<Month>,
}

#[derive(Default)]
pub struct InMemorySchool {
    state: Mutex<State>,
}

pub fn d(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

impl InMemorySchool {
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.months = [
                "April", "May", "June", "July", "August", "September", "October", "November",
                "December", "January", "February", "March",
            ]
            .iter()
            .zip(1..)
            .map(|(name, id)| Month {
                id,
                name: (*name).to_string(),
                ordinal: id,
            })
            .collect();
        }
        store
    }

    pub fn add_class(&self, school_id: i64, name: &str, monthly_fee: Decimal) -> Class {
        let mut state = self.state.lock().unwrap();
        let class = Class {
            id: state.classes.len() as i64 + 1,
            school_id,
            name: name.to_string(),
            monthly_fee,
        };
        state.classes.push(class.clone());
        class
    }

    /// Student with a generated name, appended to the class.
    pub fn add_student(&self, school_id: i64, class_id: i64) -> Student {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        self.add_named_student(school_id, class_id, &first, &last)
    }

    pub fn add_named_student(
        &self,
        school_id: i64,
        class_id: i64,
        first: &str,
        last: &str,
    ) -> Student {
        let mut state = self.state.lock().unwrap();
        let id = state.students.len() as i64 + 1;
        let roll_no = state
            .students
            .iter()
            .filter(|s| s.school_id == school_id && s.class_id == class_id)
            .count() as i32
            + 1;
        let student = Student {
            id,
            school_id,
            enrollment_id: format!("ENR-{id:04}"),
            first_name: first.to_string(),
            middle_name: None,
            last_name: Some(last.to_string()),
            class_id,
            roll_no,
            created_at: Utc::now(),
        };
        state.students.push(student.clone());
        student
    }

    pub fn add_exam(&self, school_id: i64, name: &str) -> Exam {
        let mut state = self.state.lock().unwrap();
        let exam = Exam {
            id: state.exams.len() as i64 + 1,
            school_id,
            name: name.to_string(),
        };
        state.exams.push(exam.clone());
        exam
    }

    pub fn add_paper(
        &self,
        exam_id: i64,
        class_id: i64,
        subject: &str,
        full: i64,
        pass: i64,
    ) -> ExamPaper {
        let mut state = self.state.lock().unwrap();
        let id = state.papers.len() as i64 + 1;
        let paper = ExamPaper {
            id,
            exam_id,
            class_subject_id: id,
            class_id,
            subject_name: subject.to_string(),
            full_marks: d(full),
            pass_marks: d(pass),
        };
        state.papers.push(paper.clone());
        paper
    }

    pub fn mark_count(&self) -> usize {
        self.state.lock().unwrap().marks.len()
    }

    pub fn mark(&self, student_id: i64, paper_id: i64) -> Option<Decimal> {
        self.state.lock().unwrap().marks.get(&(student_id, paper_id)).copied()
    }

    pub fn receipt(&self, id: i64) -> Option<Receipt> {
        self.state.lock().unwrap().receipts.iter().find(|r| r.id == id).cloned()
    }

    pub fn student(&self, id: i64) -> Option<Student> {
        self.state.lock().unwrap().students.iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl StudentRepository for InMemorySchool {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Student>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .students
            .iter()
            .find(|s| s.school_id == school_id && s.id == id)
            .cloned())
    }

    async fn find_by_enrollment_id(
        &self,
        school_id: i64,
        enrollment_id: &str,
    ) -> Result<Option<Student>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .students
            .iter()
            .find(|s| s.school_id == school_id && s.enrollment_id == enrollment_id)
            .cloned())
    }

    async fn find_by_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<Student>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .students
            .iter()
            .filter(|s| s.school_id == school_id && ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list(&self, school_id: i64, class_id: Option<i64>) -> Result<Vec<Student>, AppError> {
        let state = self.state.lock().unwrap();
        let mut students: Vec<Student> = state
            .students
            .iter()
            .filter(|s| s.school_id == school_id && class_id.map_or(true, |c| s.class_id == c))
            .cloned()
            .collect();
        students.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn count_by_class(&self, school_id: i64, class_id: i64) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .students
            .iter()
            .filter(|s| s.school_id == school_id && s.class_id == class_id)
            .count() as i64)
    }

    async fn create(&self, student: &NewStudent) -> Result<Student, AppError> {
        let mut state = self.state.lock().unwrap();
        if state
            .students
            .iter()
            .any(|s| s.school_id == student.school_id && s.enrollment_id == student.enrollment_id)
        {
            return Err(AppError::invalid_field(
                "enrollment_id",
                "A student with this enrollment id already exists",
            ));
        }
        let created = Student {
            id: state.students.len() as i64 + 1,
            school_id: student.school_id,
            enrollment_id: student.enrollment_id.clone(),
            first_name: student.first_name.clone(),
            middle_name: student.middle_name.clone(),
            last_name: student.last_name.clone(),
            class_id: student.class_id,
            roll_no: student.roll_no,
            created_at: Utc::now(),
        };
        state.students.push(created.clone());
        Ok(created)
    }

    async fn move_to_class(
        &self,
        school_id: i64,
        ids: &[i64],
        class_id: i64,
    ) -> Result<u64, AppError> {
        let mut state = self.state.lock().unwrap();
        let mut moved = 0;
        for student in state
            .students
            .iter_mut()
            .filter(|s| s.school_id == school_id && ids.contains(&s.id))
        {
            student.class_id = class_id;
            moved += 1;
        }
        Ok(moved)
    }

    async fn set_roll_numbers(
        &self,
        school_id: i64,
        assignments: &[(i64, i32)],
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        for (id, roll_no) in assignments {
            if let Some(student) = state
                .students
                .iter_mut()
                .find(|s| s.school_id == school_id && s.id == *id)
            {
                student.roll_no = *roll_no;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClassRepository for InMemorySchool {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Class>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .classes
            .iter()
            .find(|c| c.school_id == school_id && c.id == id)
            .cloned())
    }
}

#[async_trait]
impl ExamRepository for InMemorySchool {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Exam>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .exams
            .iter()
            .find(|e| e.school_id == school_id && e.id == id)
            .cloned())
    }

    async fn papers_for_class(
        &self,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<ExamPaper>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .papers
            .iter()
            .filter(|p| p.exam_id == exam_id && p.class_id == class_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MarkRepository for InMemorySchool {
    async fn ensure_marks(&self, student_ids: &[i64], paper_ids: &[i64]) -> Result<u64, AppError> {
        let mut state = self.state.lock().unwrap();
        let mut created = 0;
        for student_id in student_ids {
            for paper_id in paper_ids {
                if !state.marks.contains_key(&(*student_id, *paper_id)) {
                    state.marks.insert((*student_id, *paper_id), Decimal::ZERO);
                    created += 1;
                }
            }
        }
        Ok(created)
    }

    async fn find_entries(
        &self,
        student_ids: &[i64],
        paper_ids: &[i64],
    ) -> Result<Vec<MarkEntry>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .marks
            .iter()
            .filter(|((s, p), _)| student_ids.contains(s) && paper_ids.contains(p))
            .filter_map(|((student_id, paper_id), marks)| {
                state.papers.iter().find(|p| p.id == *paper_id).map(|paper| MarkEntry {
                    student_id: *student_id,
                    paper_id: *paper_id,
                    subject_name: paper.subject_name.clone(),
                    full_marks: paper.full_marks,
                    pass_marks: paper.pass_marks,
                    marks: *marks,
                })
            })
            .collect())
    }

    async fn update_marks(
        &self,
        student_id: i64,
        edits: &[MarkEdit],
    ) -> Result<MarkUpdateOutcome, AppError> {
        let mut state = self.state.lock().unwrap();
        if let Some(missing) = edits
            .iter()
            .find(|e| !state.marks.contains_key(&(student_id, e.paper_id)))
        {
            return Ok(MarkUpdateOutcome::Missing {
                paper_id: missing.paper_id,
            });
        }
        for edit in edits {
            state.marks.insert((student_id, edit.paper_id), edit.marks);
        }
        Ok(MarkUpdateOutcome::Applied(edits.len() as u64))
    }
}

#[async_trait]
impl ReceiptRepository for InMemorySchool {
    async fn next_receipt_no(&self, school_id: i64) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .receipts
            .iter()
            .filter(|r| r.school_id == school_id)
            .map(|r| r.receipt_no)
            .max()
            .unwrap_or(0)
            + 1)
    }

    async fn record_with_settlement(
        &self,
        receipt: &NewReceipt,
    ) -> Result<RecordedReceipt, AppError> {
        let mut state = self.state.lock().unwrap();
        if state
            .receipts
            .iter()
            .any(|r| r.school_id == receipt.school_id && r.receipt_no == receipt.receipt_no)
        {
            return Err(AppError::Conflict(format!(
                "Receipt number {} is already taken",
                receipt.receipt_no
            )));
        }

        let outstanding: Vec<OutstandingBalance> = state
            .receipts
            .iter()
            .filter(|r| {
                r.school_id == receipt.school_id
                    && r.student_id == receipt.student_id
                    && r.remaining_fees > Decimal::ZERO
            })
            .map(|r| OutstandingBalance {
                receipt_id: r.id,
                remaining: r.remaining_fees,
            })
            .collect();

        let plan = plan_settlement(&outstanding, receipt.deposit_fees);
        for settlement in &plan.settlements {
            if let Some(prior) = state.receipts.iter_mut().find(|r| r.id == settlement.receipt_id) {
                prior.remaining_fees = Decimal::ZERO;
            }
        }

        let totals =
            ReceiptTotals::compute(&receipt.fees, receipt.concession, plan.remaining_deposit);
        let stored = Receipt {
            id: state.receipts.len() as i64 + 1,
            school_id: receipt.school_id,
            student_id: receipt.student_id,
            receipt_no: receipt.receipt_no,
            receipt_date: receipt.receipt_date,
            fees: receipt.fees,
            total_fees: totals.total_fees,
            concession: receipt.concession,
            net_fees: totals.net_fees,
            deposit_fees: totals.deposit_fees,
            remaining_fees: totals.remaining_fees,
            remarks: receipt.remarks.clone(),
            month_ids: receipt.month_ids.clone(),
            created_at: Utc::now(),
        };
        state.receipts.push(stored.clone());

        Ok(RecordedReceipt {
            receipt: stored,
            settlements: plan.settlements,
        })
    }

    async fn list_for_student(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<Receipt>, AppError> {
        let state = self.state.lock().unwrap();
        let mut receipts: Vec<Receipt> = state
            .receipts
            .iter()
            .filter(|r| r.school_id == school_id && r.student_id == student_id)
            .cloned()
            .collect();
        receipts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(receipts)
    }

    async fn outstanding_balance(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Decimal, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .receipts
            .iter()
            .filter(|r| r.school_id == school_id && r.student_id == student_id)
            .map(|r| r.remaining_fees)
            .sum())
    }

    async fn covered_month_ids(
        &self,
        school_id: i64,
        student_id: i64,
    ) -> Result<Vec<i32>, AppError> {
        let state = self.state.lock().unwrap();
        let mut months: Vec<i32> = state
            .receipts
            .iter()
            .filter(|r| r.school_id == school_id && r.student_id == student_id)
            .flat_map(|r| r.month_ids.iter().copied())
            .collect();
        months.sort_unstable();
        months.dedup();
        Ok(months)
    }
}

#[async_trait]
impl MonthRepository for InMemorySchool {
    async fn list(&self) -> Result<Vec<Month>, AppError> {
        Ok(self.state.lock().unwrap().months.clone())
    }

    async fn find_unknown(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.months.iter().any(|m| m.id == *id))
            .collect())
    }
}

/// Fee heads with only the monthly fee set.
pub fn monthly(amount: i64) -> FeeComponents {
    FeeComponents {
        monthly_fees: d(amount),
        ..FeeComponents::default()
    }
}

pub fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}
