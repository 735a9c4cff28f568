//! Handle to the channel an agent is logged in with.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Channel {
    id: u64,
    name: String,
}

/// Shared reference to a call channel owned by the bridging layer.
///
/// Clones refer to the same channel. Equality is identity: two handles are
/// equal only if they point at the same channel, even when names collide.
#[derive(Clone)]
pub struct ChannelHandle(Arc<Channel>);

impl ChannelHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(Channel {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Full channel name, e.g. `SIP/1001-00000001`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Channel name without the unique suffix after the last `-`.
    pub fn base_name(&self) -> &str {
        match self.0.name.rfind('-') {
            Some(pos) => &self.0.name[..pos],
            None => &self.0.name,
        }
    }
}

impl PartialEq for ChannelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ChannelHandle {}

impl fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .finish()
    }
}
