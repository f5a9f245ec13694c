//! Row structs for the settings tables.

pub mod site_setting;
