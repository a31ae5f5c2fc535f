//! The slice of the channel domain model the serializer layer works with.
//!
//! ```text
//! DataRoot
//! └── lists: Vec<ChannelList>      (file order)
//!     └── channels: Vec<ChannelInfo>
//! ```
//!
//! Sorting, favorites editing and the rest of the editor's domain logic live
//! with the host application.

mod channel;
mod list;

pub use channel::{ChannelInfo, ServiceType, SignalSource};
pub use list::{ChannelList, FlagCounts};

/// Everything a serializer loaded from one device file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataRoot {
    lists: Vec<ChannelList>,
}

impl DataRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel_list(&mut self, list: ChannelList) {
        self.lists.push(list);
    }

    pub fn channel_lists(&self) -> &[ChannelList] {
        &self.lists
    }

    pub fn channel_lists_mut(&mut self) -> &mut [ChannelList] {
        &mut self.lists
    }

    pub fn list_by_short_caption(&self, short_caption: &str) -> Option<&ChannelList> {
        self.lists.iter().find(|l| l.short_caption == short_caption)
    }

    pub fn list_by_short_caption_mut(&mut self, short_caption: &str) -> Option<&mut ChannelList> {
        self.lists.iter_mut().find(|l| l.short_caption == short_caption)
    }

    pub fn total_channel_count(&self) -> usize {
        self.lists.iter().map(ChannelList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Drops all lists, e.g. before a reload.
    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
