// minterp-cli/src/commands/mod.rs

pub mod interpolate;
