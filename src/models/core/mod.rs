//! Table-backed models. Each type maps to one table and exposes async
//! associated functions taking a pool or executor.

pub mod auth_session;
pub mod course;
pub mod department;
pub mod faculty;
pub mod faculty_course;
pub mod paper_metadata;
pub mod question;
pub mod question_media;
pub mod question_selection;
pub mod unit;
pub mod user;

pub use auth_session::AuthSession;
pub use course::{Course, CourseSummary, CourseWithDepartment, NewCourse};
pub use department::{Department, DepartmentSummary};
pub use faculty::{Faculty, FacultyDepartment, NewFaculty};
pub use faculty_course::{FacultyCourse, FacultyCourseCount, FacultyCourseDetail};
pub use paper_metadata::{NewPaperMetadata, PaperMetadata, PapersPerCourse};
pub use question::{NewQuestion, Question, QuestionDetail, QuestionUpdate};
pub use question_media::QuestionMedia;
pub use question_selection::QuestionSelection;
pub use unit::{NewUnit, Unit};
pub use user::{split_full_name, NewUser, User, UserProfileUpdate};
