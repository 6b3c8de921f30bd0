//! Wand Core - Controller, sample, and data-frame types
//!
//! This crate provides the foundational types for the wand system:
//! - Controller identity (the logical slot index)
//! - Button set and button-bitmask assembly
//! - Sensor samples (orientation, position, buttons, trigger)
//! - Globally sequenced data frames and the publisher contract

pub mod controller;
pub mod frame;

pub use controller::{Button, ButtonState, ControllerId, ControllerSample, Quat, Vec3};
pub use frame::{DataFrame, FramePublisher};
