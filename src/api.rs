pub mod smtp;
pub mod ted;
