pub mod cli;
pub mod config;
pub mod data_manager;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod movies;
pub mod omdb;
pub mod users;
