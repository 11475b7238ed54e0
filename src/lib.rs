//! County-level COVID-19 density traces drawn on a Braille terminal map.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod map;
pub mod scraper;
pub mod states;
pub mod trace;
pub mod ui;
pub mod viz;
