mod course;
mod message;
mod status;
mod survey;

pub use course::{Course, CourseDraft, CourseError, CourseIdentifier, IDENTIFIER_PREFIX};
pub use message::{FORM_SUBMIT, MessageError, MessagePayload, SubmissionMessage};
pub use status::{LESSON_STATUS, LessonStatus, UnknownLessonStatus};
pub use survey::{DEFAULT_SURVEY_DOMAIN, SurveyDomain, SurveyUrl, SurveyUrlError};
