//! In-memory repository used by service tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use rust_decimal::Decimal;
use tutorbill_shared::YearMonth;
use uuid::Uuid;

use crate::attendance::{AttendanceRepository, ClassRegistry, ClassRegistryFilter};
use crate::enrollment::{
    Enrollment, EnrollmentWindowPolicy, Plan, Professor, ProfessorBonus, ProfessorType,
};
use crate::reconciliation::BalanceRepository;
use crate::reports::{MonthlyTracker, ReportRepository};
use crate::repository::RepositoryError;

#[derive(Default)]
pub struct InMemoryStore {
    professors: Mutex<Vec<Professor>>,
    professor_types: Mutex<HashMap<Uuid, ProfessorType>>,
    plans: Mutex<HashMap<Uuid, Plan>>,
    enrollments: Mutex<Vec<Enrollment>>,
    classes: Mutex<Vec<ClassRegistry>>,
    bonuses: Mutex<Vec<ProfessorBonus>>,
    trackers: Mutex<HashMap<YearMonth, MonthlyTracker>>,
    failing_writes: Mutex<HashSet<Uuid>>,
    unavailable: Mutex<bool>,
}

impl InMemoryStore {
    pub fn add_professor(&self, professor: Professor) {
        self.professors.lock().unwrap().push(professor);
    }

    pub fn add_professor_type(&self, professor_type: ProfessorType) {
        self.professor_types
            .lock()
            .unwrap()
            .insert(professor_type.id, professor_type);
    }

    pub fn add_plan(&self, plan: Plan) {
        self.plans.lock().unwrap().insert(plan.id, plan);
    }

    pub fn add_enrollment(&self, enrollment: Enrollment) {
        self.enrollments.lock().unwrap().push(enrollment);
    }

    pub fn add_classes(&self, classes: impl IntoIterator<Item = ClassRegistry>) {
        self.classes.lock().unwrap().extend(classes);
    }

    pub fn add_bonus(&self, bonus: ProfessorBonus) {
        self.bonuses.lock().unwrap().push(bonus);
    }

    /// Makes balance writes for `enrollment_id` fail with a storage error.
    pub fn fail_writes_for(&self, enrollment_id: Uuid) {
        self.failing_writes.lock().unwrap().insert(enrollment_id);
    }

    /// Makes every read fail with a storage error.
    pub fn set_unavailable(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn balance_of(&self, enrollment_id: Uuid) -> Option<Decimal> {
        self.enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == enrollment_id)
            .map(|e| e.balance)
    }

    pub fn tracker(&self, month: &YearMonth) -> Option<MonthlyTracker> {
        self.trackers.lock().unwrap().get(month).cloned()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if *self.unavailable.lock().unwrap() {
            Err(RepositoryError::storage("store unavailable"))
        } else {
            Ok(())
        }
    }
}

impl AttendanceRepository for InMemoryStore {
    fn find_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> impl Future<Output = Result<Vec<ClassRegistry>, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            let mut found: Vec<ClassRegistry> = self
                .classes
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.enrollment_id == enrollment_id && filter.matches(c))
                .cloned()
                .collect();
            found.sort_by_key(|c| c.class_date);
            found
        });
        async move { result }
    }

    fn count_class_registry(
        &self,
        enrollment_id: Uuid,
        filter: &ClassRegistryFilter,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            self.classes
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.enrollment_id == enrollment_id && filter.matches(c))
                .count() as u64
        });
        async move { result }
    }
}

impl ReportRepository for InMemoryStore {
    fn find_professor(
        &self,
        professor_id: Uuid,
    ) -> impl Future<Output = Result<Option<Professor>, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            self.professors
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == professor_id)
                .cloned()
        });
        async move { result }
    }

    fn list_professors(
        &self,
    ) -> impl Future<Output = Result<Vec<Professor>, RepositoryError>> + Send {
        let result = self
            .check_available()
            .map(|()| self.professors.lock().unwrap().clone());
        async move { result }
    }

    fn find_active_enrollments(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
        policy: EnrollmentWindowPolicy,
    ) -> impl Future<Output = Result<Vec<Enrollment>, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            self.enrollments
                .lock()
                .unwrap()
                .iter()
                .filter(|e| {
                    e.professor_id == professor_id
                        && e.is_active()
                        && policy.includes(e.start_date, e.end_date, month)
                })
                .cloned()
                .collect()
        });
        async move { result }
    }

    fn find_plan(
        &self,
        plan_id: Uuid,
    ) -> impl Future<Output = Result<Option<Plan>, RepositoryError>> + Send {
        let result = self
            .check_available()
            .map(|()| self.plans.lock().unwrap().get(&plan_id).cloned());
        async move { result }
    }

    fn find_professor_type(
        &self,
        type_id: Uuid,
    ) -> impl Future<Output = Result<Option<ProfessorType>, RepositoryError>> + Send {
        let result = self
            .check_available()
            .map(|()| self.professor_types.lock().unwrap().get(&type_id).cloned());
        async move { result }
    }

    fn find_active_bonuses(
        &self,
        professor_id: Uuid,
        month: &YearMonth,
    ) -> impl Future<Output = Result<Vec<ProfessorBonus>, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            self.bonuses
                .lock()
                .unwrap()
                .iter()
                .filter(|b| {
                    b.professor_id == professor_id
                        && b.month == *month
                        && b.status == crate::enrollment::BonusStatus::Active
                })
                .cloned()
                .collect()
        });
        async move { result }
    }

    fn save_monthly_tracker(
        &self,
        tracker: &MonthlyTracker,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self.check_available().and_then(|()| {
            let mut trackers = self.trackers.lock().unwrap();
            if trackers.contains_key(&tracker.month) {
                return Err(RepositoryError::conflict(format!(
                    "tracker for {} exists",
                    tracker.month
                )));
            }
            trackers.insert(tracker.month, tracker.clone());
            Ok(())
        });
        async move { result }
    }
}

impl BalanceRepository for InMemoryStore {
    fn find_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> impl Future<Output = Result<Option<Enrollment>, RepositoryError>> + Send {
        let result = self.check_available().map(|()| {
            self.enrollments
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == enrollment_id)
                .cloned()
        });
        async move { result }
    }

    fn update_enrollment_balance(
        &self,
        enrollment_id: Uuid,
        new_balance: Decimal,
    ) -> impl Future<Output = Result<Option<Enrollment>, RepositoryError>> + Send {
        let result = self.check_available().and_then(|()| {
            if self.failing_writes.lock().unwrap().contains(&enrollment_id) {
                return Err(RepositoryError::storage("write rejected"));
            }
            let mut enrollments = self.enrollments.lock().unwrap();
            Ok(enrollments
                .iter_mut()
                .find(|e| e.id == enrollment_id)
                .map(|e| {
                    e.balance = new_balance;
                    e.clone()
                }))
        });
        async move { result }
    }
}
