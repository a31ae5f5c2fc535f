//! A single channel record.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ============================================================================
// SIGNAL SOURCE
// ============================================================================

bitflags! {
    /// Where a list's channels come from: transmission medium plus the kind
    /// of service it carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SignalSource: u32 {
        const ANALOG = 0x0001;
        const DIGITAL = 0x0002;
        const ANTENNA = 0x0010;
        const CABLE = 0x0020;
        const SAT = 0x0040;
        const IP = 0x0080;
        const TV = 0x0100;
        const RADIO = 0x0200;
        const DATA = 0x0400;

        const DVB_T = Self::DIGITAL.bits() | Self::ANTENNA.bits();
        const DVB_C = Self::DIGITAL.bits() | Self::CABLE.bits();
        const DVB_S = Self::DIGITAL.bits() | Self::SAT.bits();
    }
}

impl Default for SignalSource {
    fn default() -> Self {
        Self::empty()
    }
}

/// Kind of service a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServiceType {
    #[default]
    Tv,
    Radio,
    Data,
}

impl ServiceType {
    /// Single-letter code used by text exports.
    pub fn code(self) -> char {
        match self {
            Self::Tv => 'T',
            Self::Radio => 'R',
            Self::Data => 'D',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "T" | "t" => Some(Self::Tv),
            "R" | "r" => Some(Self::Radio),
            "D" | "d" => Some(Self::Data),
            _ => None,
        }
    }

    /// Position in the TV → radio → data grouping some devices require.
    pub fn group_rank(self) -> u8 {
        match self {
            Self::Tv => 0,
            Self::Radio => 1,
            Self::Data => 2,
        }
    }
}

// ============================================================================
// CHANNEL
// ============================================================================

/// One channel as read from a device file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Identifier unique within a list, usually derived from transport
    /// stream / service ids.
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    /// Program number as found in the source file, before any resequencing.
    #[serde(default)]
    pub preset_program_nr: Option<i32>,
    /// Program number assigned while editing.
    #[serde(default)]
    pub new_program_nr: Option<i32>,
    #[serde(default)]
    pub service_type: ServiceType,
    #[serde(default)]
    pub service_id: i32,
    #[serde(default)]
    pub frequency_mhz: f64,
    /// Bit `i` set means member of favorite list `i + 1`.
    #[serde(default)]
    pub favorites: u64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub lock: bool,
    #[serde(default)]
    pub encrypted: bool,
}

impl ChannelInfo {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_preset_program_nr(mut self, nr: i32) -> Self {
        self.preset_program_nr = Some(nr);
        self.new_program_nr = Some(nr);
        self
    }

    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = service_type;
        self
    }

    /// The program number the channel would be written back with.
    pub fn effective_program_nr(&self) -> Option<i32> {
        self.new_program_nr.or(self.preset_program_nr)
    }
}
