pub mod enrollment;
pub mod expert;
pub mod resume;
