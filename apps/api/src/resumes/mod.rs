// Resume submissions: students upload PDFs, admins work through the review queue.

pub mod handlers;
pub mod repository;
pub mod review;
pub mod storage;
