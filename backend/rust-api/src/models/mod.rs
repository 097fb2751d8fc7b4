pub mod attempt;
pub mod intake;
pub mod quiz;

pub use attempt::{Attempt, SubmitQuizRequest, SubmitQuizResponse, SubmittedAnswer};
pub use intake::{IntakeAnswer, IntakeRecord, SessionAnswersResponse};
pub use quiz::{GenerateQuizResponse, GetQuizResponse, Quiz, QuizItem, QuizPayload};
