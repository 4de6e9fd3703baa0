//! Model Tests Module

pub mod course;
pub mod faculty;
pub mod question;
pub mod unit;
pub mod user;
