//! Conquest AI - heuristic decision engine for territorial conquest games

pub mod ai;
pub mod board;
pub mod core;
