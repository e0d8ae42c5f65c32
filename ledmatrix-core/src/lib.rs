#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod color;
pub mod effect;
pub mod flash;
pub mod matrix;
pub mod protocol;
pub mod settings;
