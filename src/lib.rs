mod errors;
mod file;
mod lm;
mod report;
mod table;

pub use crate::{errors::*, file::*, lm::*, report::*, table::*};
