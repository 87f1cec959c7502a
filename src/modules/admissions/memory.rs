//! In-process admission store.
//!
//! Counters are guarded by one `tokio::sync::Mutex` per partition, so
//! allocations in the same partition serialize while different partitions
//! never wait on each other. State is not durable: use it for tests and local
//! development, not for deployments that must survive restarts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use registrar_models::{Course, CourseCode, CourseId, NewStudent, Partition, Student, StudentId};

use crate::modules::admissions::store::{
    CounterStore, CourseCatalog, EMAIL_CONSTRAINT, ENROLLMENT_NUMBER_CONSTRAINT,
    IDEMPOTENCY_KEY_CONSTRAINT, StoreError, StudentRecordStore,
};

type CounterCell = Arc<tokio::sync::Mutex<i64>>;

#[derive(Debug, Default)]
pub struct InMemoryAdmissionStore {
    courses: RwLock<HashMap<CourseId, Course>>,
    counters: Mutex<HashMap<Partition, CounterCell>>,
    students: Mutex<Vec<Student>>,
    fail_lookups: AtomicBool,
    fail_allocations: AtomicBool,
    fail_inserts: AtomicBool,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

impl InMemoryAdmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `latency` before every operation and inside the counter's
    /// critical section, to widen race windows in concurrency tests.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn create_course(
        &self,
        code: CourseCode,
        name: &str,
        duration_years: i32,
    ) -> Result<Course, StoreError> {
        let course = Course {
            id: CourseId::new(),
            code,
            name: name.to_string(),
            duration_years,
            is_active: true,
            created_at: Utc::now(),
        };
        self.insert_course(course.clone())?;
        Ok(course)
    }

    /// Inserts or replaces a course.
    pub fn insert_course(&self, course: Course) -> Result<(), StoreError> {
        let mut courses = self
            .courses
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))?;
        courses.insert(course.id, course);
        Ok(())
    }

    /// Makes subsequent course, email, and idempotency-key reads fail until
    /// reset.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent counter increments fail until reset.
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocations.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent student inserts fail until reset.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Current counter value for `partition`, `None` if never allocated.
    pub async fn counter_value(&self, partition: &Partition) -> Option<i64> {
        let cell = lock(&self.counters).ok()?.get(partition).cloned()?;
        let value = *cell.lock().await;
        Some(value)
    }

    pub fn students(&self) -> Vec<Student> {
        lock(&self.students)
            .map(|students| students.clone())
            .unwrap_or_default()
    }

    /// Flips the soft-delete flag. Returns `false` if no such student exists.
    pub fn set_student_active(&self, id: StudentId, is_active: bool) -> bool {
        let Ok(mut students) = lock(&self.students) else {
            return false;
        };
        match students.iter_mut().find(|s| s.id == id) {
            Some(student) => {
                student.is_active = is_active;
                student.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    async fn maybe_delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_lookup(&self) -> Result<(), StoreError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "student records are unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseCatalog for InMemoryAdmissionStore {
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        self.maybe_delay().await;
        self.check_lookup()?;
        let courses = self
            .courses
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))?;
        Ok(courses.get(&id).cloned())
    }
}

#[async_trait]
impl CounterStore for InMemoryAdmissionStore {
    async fn increment_or_create(&self, partition: &Partition) -> Result<i64, StoreError> {
        self.maybe_delay().await;
        if self.fail_allocations.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "counter store rejected increment for {partition}"
            )));
        }

        let cell = lock(&self.counters)?.entry(*partition).or_default().clone();

        let mut value = cell.lock().await;
        self.maybe_delay().await;
        *value += 1;
        Ok(*value)
    }
}

#[async_trait]
impl StudentRecordStore for InMemoryAdmissionStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.maybe_delay().await;
        self.check_lookup()?;
        let students = lock(&self.students)?;
        Ok(students.iter().any(|s| s.email.as_deref() == Some(email)))
    }

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Student>, StoreError> {
        self.maybe_delay().await;
        self.check_lookup()?;
        let students = lock(&self.students)?;
        Ok(students
            .iter()
            .find(|s| s.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        self.maybe_delay().await;
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "student store rejected insert of {}",
                student.enrollment_number
            )));
        }

        let mut students = lock(&self.students)?;
        for existing in students.iter() {
            if existing.enrollment_number == student.enrollment_number {
                return Err(StoreError::unique(ENROLLMENT_NUMBER_CONSTRAINT));
            }
            if student.email.is_some() && existing.email == student.email {
                return Err(StoreError::unique(EMAIL_CONSTRAINT));
            }
            if student.idempotency_key.is_some()
                && existing.idempotency_key == student.idempotency_key
            {
                return Err(StoreError::unique(IDEMPOTENCY_KEY_CONSTRAINT));
            }
        }

        let now = Utc::now();
        let record = Student {
            id: StudentId::new(),
            enrollment_number: student.enrollment_number,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            course_id: student.course_id,
            admission_year: student.admission_year,
            passout_year: student.passout_year,
            is_active: true,
            idempotency_key: student.idempotency_key,
            created_by: student.created_by,
            created_at: now,
            updated_at: now,
        };
        students.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_models::UserId;

    fn new_student(number: &str, email: Option<&str>, key: Option<&str>) -> NewStudent {
        NewStudent {
            enrollment_number: number.to_string(),
            first_name: "Test".to_string(),
            last_name: "Student".to_string(),
            email: email.map(str::to_string),
            course_id: CourseId::new(),
            admission_year: 2024,
            passout_year: 2027,
            idempotency_key: key.map(str::to_string),
            created_by: UserId::new(),
        }
    }

    #[tokio::test]
    async fn test_counter_starts_at_one_per_partition() {
        let store = InMemoryAdmissionStore::new();
        let bca = Partition::new(CourseCode::Bca, 2024);
        let mca = Partition::new(CourseCode::Mca, 2024);

        assert_eq!(store.counter_value(&bca).await, None);
        assert_eq!(store.increment_or_create(&bca).await.unwrap(), 1);
        assert_eq!(store.increment_or_create(&bca).await.unwrap(), 2);
        assert_eq!(store.increment_or_create(&mca).await.unwrap(), 1);
        assert_eq!(store.counter_value(&bca).await, Some(2));
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_constraints() {
        let store = InMemoryAdmissionStore::new();
        store
            .insert_student(new_student("2024BCA001", Some("a@x.com"), Some("k1")))
            .await
            .unwrap();

        let err = store
            .insert_student(new_student("2024BCA001", None, None))
            .await
            .unwrap_err();
        assert!(err.violates(ENROLLMENT_NUMBER_CONSTRAINT));

        let err = store
            .insert_student(new_student("2024BCA002", Some("a@x.com"), None))
            .await
            .unwrap_err();
        assert!(err.violates(EMAIL_CONSTRAINT));

        let err = store
            .insert_student(new_student("2024BCA003", None, Some("k1")))
            .await
            .unwrap_err();
        assert!(err.violates(IDEMPOTENCY_KEY_CONSTRAINT));

        // Missing emails never collide with each other.
        store
            .insert_student(new_student("2024BCA004", None, None))
            .await
            .unwrap();
        store
            .insert_student(new_student("2024BCA005", None, None))
            .await
            .unwrap();
        assert_eq!(store.students().len(), 3);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_email_taken() {
        let store = InMemoryAdmissionStore::new();
        let student = store
            .insert_student(new_student("2024BCA001", Some("a@x.com"), None))
            .await
            .unwrap();

        assert!(store.set_student_active(student.id, false));
        assert!(store.email_exists("a@x.com").await.unwrap());
        assert!(!store.students()[0].is_active);
    }

    #[test]
    fn test_insert_course_reports_poisoned_lock() {
        let store = Arc::new(InMemoryAdmissionStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.courses.write().unwrap();
            panic!("poison the course table");
        })
        .join();

        assert!(matches!(
            store.create_course(CourseCode::Bca, "Bachelor of Computer Applications", 3),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_injection() {
        let store = InMemoryAdmissionStore::new();
        let course = store
            .create_course(CourseCode::Mca, "Master of Computer Applications", 2)
            .unwrap();

        store.fail_lookups(true);
        assert!(store.find_course(course.id).await.is_err());
        assert!(store.email_exists("a@x.com").await.is_err());
        assert!(store.find_by_idempotency_key("k1").await.is_err());

        store.fail_lookups(false);
        assert_eq!(store.find_course(course.id).await.unwrap(), Some(course));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryAdmissionStore::new();
        let partition = Partition::new(CourseCode::Bba, 2025);

        store.fail_allocations(true);
        assert!(matches!(
            store.increment_or_create(&partition).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.counter_value(&partition).await, None);

        store.fail_allocations(false);
        assert_eq!(store.increment_or_create(&partition).await.unwrap(), 1);

        store.fail_inserts(true);
        assert!(
            store
                .insert_student(new_student("2025BBA001", None, None))
                .await
                .is_err()
        );
    }
}
