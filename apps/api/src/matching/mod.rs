// Keyword intelligence shared by the job-description parser and the ATS scorer.

pub mod handlers;
pub mod jd_parser;
pub mod keywords;
pub mod synonyms;
