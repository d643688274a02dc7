pub mod entity;
pub mod native;
pub mod web;
