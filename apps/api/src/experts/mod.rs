// Expert mentor profiles: public browsing plus admin-side management.

pub mod handlers;
pub mod repository;
pub mod validation;
