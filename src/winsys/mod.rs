#![allow(dead_code)]

pub type Result<T> = anyhow::Result<T>;

pub mod connection;
pub mod event;
pub mod geometry;
pub mod hints;
pub mod input;
pub mod screen;
pub mod window;
pub mod xdata;
