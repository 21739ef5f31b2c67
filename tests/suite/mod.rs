mod config;
mod export;
mod scenarios;
