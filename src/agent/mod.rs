//! Classification-and-routing engine.
//!
//! A message flows through [`classifier::classify`] to a [`TaskCategory`],
//! which selects a [`profiles::ModelProfile`] and persona prompt. The
//! [`synthesizer::ResponseSynthesizer`] assembles context, calls the
//! provider once and returns a [`ResponseEnvelope`].

pub mod classifier;
pub mod context;
pub mod persona;
pub mod profiles;
pub mod style;
pub mod synthesizer;

use serde::Serialize;

use crate::clock::DayPeriod;

pub use classifier::TaskCategory;
pub use style::ResponseStyle;

use profiles::ERROR_PROFILE;
use synthesizer::TECHNICAL_DIFFICULTY_REPLY;

/// Normalised reply for one request, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    /// Reply text.
    pub content: String,
    /// Backend model id, or `"error"` when the provider call failed.
    pub model_id: String,
    /// RGB panel color.
    pub color: u32,
    /// Style tag of the prompting message.
    pub response_style: ResponseStyle,
    /// Dhaka day period when the reply was built.
    pub time_of_day: DayPeriod,
}

impl ResponseEnvelope {
    /// The uniform envelope for a failed provider call.
    pub fn technical_difficulty(time_of_day: DayPeriod) -> Self {
        Self {
            content: TECHNICAL_DIFFICULTY_REPLY.to_owned(),
            model_id: ERROR_PROFILE.model_id.to_owned(),
            color: ERROR_PROFILE.display_color,
            response_style: ResponseStyle::Answered,
            time_of_day,
        }
    }

    /// Whether this envelope reports a provider failure.
    pub fn is_error(&self) -> bool {
        self.model_id == ERROR_PROFILE.model_id
    }
}
