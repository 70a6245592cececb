pub mod detect;
pub mod platforms;
pub mod serve;
