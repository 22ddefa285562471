pub mod microbiology;
pub mod pcr;
pub mod serology;
