//! Client-side building blocks: domain models, the local reorder and
//! calendar logic, forms, attachment crypto, configuration and output.

pub mod attachment;
pub mod calendar;
pub mod config;
pub mod data_storage;
pub mod form;
pub mod hierarchy;
pub mod logging;
pub mod messages;
pub mod reorder;
pub mod secret;
pub mod section;
pub mod task;
pub mod view;
