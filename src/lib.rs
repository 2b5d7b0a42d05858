pub mod config;
pub mod forms;
pub mod models;
pub mod pages;
pub mod remote;
pub mod store;
pub mod view;
pub mod web;
