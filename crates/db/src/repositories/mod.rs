//! Repositories: stateless structs with async query functions over `&PgPool`.

pub mod site_setting_repo;

pub use site_setting_repo::SiteSettingRepo;
