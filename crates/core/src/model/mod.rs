mod feedback;
mod key;
mod riddle;
mod session;

pub use feedback::FlashWindow;
pub use key::{RequestKey, TotalLevels};
pub use riddle::{CHOICE_COUNT, Riddle, RiddleError, RiddlePayload};
pub use session::{
    AnswerOutcome, CORRECT_REWARD, Session, WRONG_PENALTY, score_after_correct,
    score_after_wrong,
};
