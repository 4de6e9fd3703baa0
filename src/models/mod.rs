pub mod core;
pub mod insights;

// Re-export core models for easy access
pub use self::core::{
    split_full_name, AuthSession, Course, CourseSummary, CourseWithDepartment, Department,
    DepartmentSummary, Faculty, FacultyCourse, FacultyCourseCount, FacultyCourseDetail,
    FacultyDepartment, NewCourse, NewFaculty, NewPaperMetadata, NewQuestion, NewUnit, NewUser,
    PaperMetadata, PapersPerCourse, Question, QuestionDetail, QuestionMedia, QuestionSelection,
    QuestionUpdate, Unit, User, UserProfileUpdate,
};
pub use insights::{AdminDashboard, QuestionStats};
