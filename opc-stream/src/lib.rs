//! # opc-stream: LED frame streamer
//!
//! Reads a layout of 3D LED positions, renders a color for every LED
//! each frame, and streams the frames to an Open Pixel Control server
//! at a fixed rate. Frames are dropped, not queued, while the server is
//! unreachable; the stream resumes once it comes back.

pub mod config;
pub mod service;
