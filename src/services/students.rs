//! Student roster service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::student::{NewStudent, Student},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Student>> {
        self.repository.students.list(q).await
    }

    pub async fn create(&self, student: NewStudent) -> AppResult<Student> {
        let student = student.normalized();
        student.validate().map_err(AppError::from)?;
        self.repository.students.create(&student).await
    }
}
