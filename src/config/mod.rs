pub mod run;
pub mod style;
