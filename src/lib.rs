extern crate diesel;

pub mod audit;
pub mod config;
pub mod db;
pub mod logger;
pub mod models;
pub mod scrapingbee;
pub mod services;
pub mod streeteasy;
pub mod web;
