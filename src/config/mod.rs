pub mod settings;

pub use settings::{NotifierSettings, Settings};
