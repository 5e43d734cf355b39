mod bootstrap;
mod config;
mod input;
mod loop_runner;
mod render;

pub(crate) use loop_runner::run;
