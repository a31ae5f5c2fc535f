//! Capability model: which editing operations a format can represent.
//!
//! A plugin builds its [`SupportedFeatures`] in its constructor and hands it
//! to [`SerializerBase::new`](super::SerializerBase::new); from then on the
//! host only reads it to enable or disable editor functions.

use bitflags::bitflags;
use serde::Serialize;

/// Favorite list count used when favorites get switched on by mode alone.
pub const DEFAULT_MAX_FAVORITE_LISTS: u8 = 4;

/// Upper bound for favorite lists; the mask is a `u64`.
pub const MAX_FAVORITE_LISTS_LIMIT: u8 = 64;

bitflags! {
    /// What may be done to channel names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ChannelNameEditMode: u8 {
        const EDIT = 0x01;
        const ADD = 0x02;
        const DELETE = 0x04;
        const ALL = Self::EDIT.bits() | Self::ADD.bits() | Self::DELETE.bits();
    }
}

impl ChannelNameEditMode {
    pub const NONE: Self = Self::empty();
}

/// How a deleted channel is represented in the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DeletionMode {
    /// Channels cannot be deleted.
    #[default]
    NotSupported,
    /// The record is removed from the file.
    PhysicallyRemoved,
    /// The record stays, flagged as deleted, and loses its program number.
    FlaggedWithoutPresetNumber,
    /// The record stays, flagged as deleted, and keeps its program number.
    FlaggedWithPresetNumber,
}

/// How favorites are stored by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FavoritesMode {
    None,
    /// One membership flag per favorite list.
    #[default]
    Flags,
    /// Ordered favorite lists, kept separately per signal source.
    OrderedPerSource,
    /// Ordered favorite lists mixing channels of all sources.
    MixedSource,
}

/// Favorites support as one value, so mode and list count cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FavoritesPolicy {
    None,
    Limited { mode: FavoritesMode, max_lists: u8 },
}

impl FavoritesPolicy {
    /// Builds a policy, collapsing a zero count or a `None` mode to
    /// [`FavoritesPolicy::None`].
    pub fn limited(mode: FavoritesMode, max_lists: u8) -> Self {
        let max_lists = max_lists.min(MAX_FAVORITE_LISTS_LIMIT);
        if mode == FavoritesMode::None || max_lists == 0 {
            Self::None
        } else {
            Self::Limited { mode, max_lists }
        }
    }

    pub fn mode(&self) -> FavoritesMode {
        match self {
            Self::None => FavoritesMode::None,
            Self::Limited { mode, .. } => *mode,
        }
    }

    pub fn max_lists(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Limited { max_lists, .. } => *max_lists,
        }
    }

    /// Low `max_lists` bits set; bit 0 is the first favorite list.
    pub fn mask(&self) -> u64 {
        match self.max_lists() {
            0 => 0,
            n if n >= 64 => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }
}

impl Default for FavoritesPolicy {
    fn default() -> Self {
        Self::limited(FavoritesMode::Flags, DEFAULT_MAX_FAVORITE_LISTS)
    }
}

/// Editing capabilities of one format plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedFeatures {
    pub channel_name_edit: ChannelNameEditMode,
    pub can_clean_up_channel_data: bool,
    pub has_device_settings_ui: bool,
    pub can_save_as_new_file: bool,
    pub can_skip_channels: bool,
    pub can_lock_channels: bool,
    pub can_hide_channels: bool,
    pub can_have_gaps_in_program_numbers: bool,
    pub can_edit_encrypted_flag: bool,
    pub can_edit_audio_track_id: bool,
    pub allows_short_name_editing: bool,
    pub deletion_mode: DeletionMode,
    pub enforces_tv_before_radio_before_data_ordering: bool,
    pub allow_gaps_in_favorite_numbers: bool,
    pub can_rename_favorite_lists: bool,
    favorites: FavoritesPolicy,
}

impl Default for SupportedFeatures {
    fn default() -> Self {
        Self {
            channel_name_edit: ChannelNameEditMode::NONE,
            can_clean_up_channel_data: false,
            has_device_settings_ui: false,
            can_save_as_new_file: false,
            can_skip_channels: true,
            can_lock_channels: true,
            can_hide_channels: true,
            can_have_gaps_in_program_numbers: true,
            can_edit_encrypted_flag: false,
            can_edit_audio_track_id: false,
            allows_short_name_editing: false,
            deletion_mode: DeletionMode::default(),
            enforces_tv_before_radio_before_data_ordering: false,
            allow_gaps_in_favorite_numbers: false,
            can_rename_favorite_lists: false,
            favorites: FavoritesPolicy::default(),
        }
    }
}

impl SupportedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Favorites ────────────────────────────────────────────────────

    pub fn favorites(&self) -> FavoritesPolicy {
        self.favorites
    }

    pub fn favorites_mode(&self) -> FavoritesMode {
        self.favorites.mode()
    }

    pub fn max_favorite_lists(&self) -> u8 {
        self.favorites.max_lists()
    }

    pub fn supported_favorites_mask(&self) -> u64 {
        self.favorites.mask()
    }

    /// Sets the number of favorite lists.
    ///
    /// Setting the current value again leaves everything untouched. Zero turns
    /// favorites off; a positive count keeps the current mode, or uses
    /// [`FavoritesMode::Flags`] when favorites were off.
    pub fn set_max_favorite_lists(&mut self, max_lists: u8) {
        let max_lists = max_lists.min(MAX_FAVORITE_LISTS_LIMIT);
        if max_lists == self.favorites.max_lists() {
            return;
        }
        let mode = match self.favorites.mode() {
            FavoritesMode::None => FavoritesMode::Flags,
            mode => mode,
        };
        self.favorites = FavoritesPolicy::limited(mode, max_lists);
    }

    /// Sets how favorites are stored.
    ///
    /// [`FavoritesMode::None`] forces the list count to zero. Any other mode
    /// keeps the current count, or [`DEFAULT_MAX_FAVORITE_LISTS`] when
    /// favorites were off.
    pub fn set_favorites_mode(&mut self, mode: FavoritesMode) {
        let max_lists = match self.favorites {
            FavoritesPolicy::None => DEFAULT_MAX_FAVORITE_LISTS,
            FavoritesPolicy::Limited { max_lists, .. } => max_lists,
        };
        self.favorites = FavoritesPolicy::limited(mode, max_lists);
    }

    /// Replaces the policy, normalized through [`FavoritesPolicy::limited`]
    /// so a hand-built `Limited` with a `None` mode or zero count reads as off.
    pub fn set_favorites(&mut self, policy: FavoritesPolicy) {
        self.favorites = FavoritesPolicy::limited(policy.mode(), policy.max_lists());
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_favorites(mut self, mode: FavoritesMode, max_lists: u8) -> Self {
        self.favorites = FavoritesPolicy::limited(mode, max_lists);
        self
    }

    pub fn with_deletion_mode(mut self, mode: DeletionMode) -> Self {
        self.deletion_mode = mode;
        self
    }

    pub fn with_channel_name_edit(mut self, mode: ChannelNameEditMode) -> Self {
        self.channel_name_edit = mode;
        self
    }

    pub fn with_save_as(mut self, enabled: bool) -> Self {
        self.can_save_as_new_file = enabled;
        self
    }

    pub fn with_clean_up(mut self, enabled: bool) -> Self {
        self.can_clean_up_channel_data = enabled;
        self
    }

    pub fn with_tv_radio_data_ordering(mut self, enforced: bool) -> Self {
        self.enforces_tv_before_radio_before_data_ordering = enforced;
        self
    }
}
