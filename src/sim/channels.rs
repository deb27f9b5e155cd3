//! Equation channels: the player's live spell coefficients
//!
//! Channels change through discrete key steps or through a typed
//! assignment list such as `a=2.5, omega=1.2; phi=-0.4`. Both paths end in
//! the same clamping so the ranges below always hold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize_angle;

pub const A_RANGE: (f32, f32) = (-10.0, 10.0);
pub const B_RANGE: (f32, f32) = (-10.0, 10.0);
pub const C_RANGE: (f32, f32) = (-25.0, 25.0);
pub const OMEGA_RANGE: (f32, f32) = (0.2, 10.0);

/// Tunable coefficients feeding the power formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquationChannels {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub omega: f32,
    /// Phase, kept in [-π, π)
    pub phi: f32,
}

impl Default for EquationChannels {
    fn default() -> Self {
        Self {
            a: 2.0,
            b: 1.0,
            c: 0.0,
            omega: 1.0,
            phi: 0.0,
        }
    }
}

/// A single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    A,
    B,
    C,
    Omega,
    Phi,
}

impl Channel {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "a" => Some(Channel::A),
            "b" => Some(Channel::B),
            "c" => Some(Channel::C),
            "w" | "omega" | "ω" => Some(Channel::Omega),
            "p" | "phi" | "φ" => Some(Channel::Phi),
            _ => None,
        }
    }
}

/// Discrete adjustment bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelStep {
    AUp,
    ADown,
    BUp,
    BDown,
    CUp,
    CDown,
    OmegaUp,
    OmegaDown,
    PhiUp,
}

impl EquationChannels {
    /// Apply one key step, then clamp
    pub fn step(&mut self, step: ChannelStep) {
        match step {
            ChannelStep::AUp => self.a += 0.5,
            ChannelStep::ADown => self.a -= 0.5,
            ChannelStep::BUp => self.b += 0.5,
            ChannelStep::BDown => self.b -= 0.5,
            ChannelStep::CUp => self.c += 1.0,
            ChannelStep::CDown => self.c -= 1.0,
            ChannelStep::OmegaUp => self.omega += 0.2,
            ChannelStep::OmegaDown => self.omega -= 0.2,
            ChannelStep::PhiUp => self.phi += 0.4,
        }
        self.clamp();
    }

    /// Set one channel to a value, then clamp
    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::A => self.a = value,
            Channel::B => self.b = value,
            Channel::C => self.c = value,
            Channel::Omega => self.omega = value,
            Channel::Phi => self.phi = value,
        }
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.a = self.a.clamp(A_RANGE.0, A_RANGE.1);
        self.b = self.b.clamp(B_RANGE.0, B_RANGE.1);
        self.c = self.c.clamp(C_RANGE.0, C_RANGE.1);
        self.omega = self.omega.clamp(OMEGA_RANGE.0, OMEGA_RANGE.1);
        self.phi = normalize_angle(self.phi);
    }

    /// Apply a typed assignment list.
    ///
    /// All-or-nothing: if any assignment is malformed no channel changes.
    /// Returns the number of assignments applied.
    pub fn apply_text(&mut self, text: &str) -> Result<usize, ChannelParseError> {
        let assignments = parse_assignments(text)?;
        for &(channel, value) in &assignments {
            self.set(channel, value);
        }
        Ok(assignments.len())
    }
}

/// Why a typed assignment list was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelParseError {
    Empty,
    MissingEquals(String),
    UnknownChannel(String),
    BadNumber { channel: String, value: String },
    NotFinite(String),
}

impl fmt::Display for ChannelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelParseError::Empty => write!(f, "nothing to apply"),
            ChannelParseError::MissingEquals(part) => {
                write!(f, "expected name=value, got '{}'", part)
            }
            ChannelParseError::UnknownChannel(name) => write!(f, "unknown channel '{}'", name),
            ChannelParseError::BadNumber { channel, value } => {
                write!(f, "'{}' is not a number for {}", value, channel)
            }
            ChannelParseError::NotFinite(channel) => {
                write!(f, "{} must be a finite number", channel)
            }
        }
    }
}

impl std::error::Error for ChannelParseError {}

/// Parse `name=value` pairs separated by commas, semicolons or newlines
pub fn parse_assignments(text: &str) -> Result<Vec<(Channel, f32)>, ChannelParseError> {
    let mut out = Vec::new();
    for part in text
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let Some((name, value)) = part.split_once('=') else {
            return Err(ChannelParseError::MissingEquals(part.to_string()));
        };
        let channel = Channel::parse(name)
            .ok_or_else(|| ChannelParseError::UnknownChannel(name.trim().to_string()))?;
        let parsed: f32 = value
            .trim()
            .parse()
            .map_err(|_| ChannelParseError::BadNumber {
                channel: name.trim().to_string(),
                value: value.trim().to_string(),
            })?;
        if !parsed.is_finite() {
            return Err(ChannelParseError::NotFinite(name.trim().to_string()));
        }
        out.push((channel, parsed));
    }
    if out.is_empty() {
        return Err(ChannelParseError::Empty);
    }
    Ok(out)
}
