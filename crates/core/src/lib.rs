//! Core library for the Saber Sound bridge.
//!
//! A lightsaber controller reports colour changes and activation events as
//! text lines over serial. This crate turns those lines into sound playback:
//! [`serial`] yields lines, [`protocol`] classifies them, [`mapping`] holds
//! the immutable sound tables, [`dispatch`] ties them together and
//! [`audio`] plays the resolved file.

pub mod audio;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mapping;
pub mod protocol;
pub mod serial;

pub use audio::{DryRunPlayer, Player, RodioPlayer};
pub use color::ColorName;
pub use config::{AppConfig, SerialConfig};
pub use dispatch::{Dispatch, Dispatcher, SoundSource};
pub use error::{BridgeError, Result};
pub use mapping::{SoundTable, SoundTables, Variant};
pub use protocol::{Category, Command};
pub use serial::{available_ports, LineReader, LineSource, SerialSource};
