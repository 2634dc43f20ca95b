mod common;
mod cycles;
mod properties;
