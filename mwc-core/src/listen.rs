//! Listening channel flags
//!
//! Each channel is an independent flag. The packed integer form only exists
//! at the query/serialization boundary.

use std::fmt;
use std::ops::BitOr;

/// Listening channels
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenState {
    /// MWC MQS relay box
    pub mwc_box: bool,
    /// Keybase companion app
    pub keybase: bool,
}

impl ListenState {
    /// No channel
    pub const OFFLINE: ListenState = ListenState {
        mwc_box: false,
        keybase: false,
    };

    /// MWC MQS relay box only
    pub const MWC_BOX: ListenState = ListenState {
        mwc_box: true,
        keybase: false,
    };

    /// Keybase only
    pub const KEYBASE: ListenState = ListenState {
        mwc_box: false,
        keybase: true,
    };

    /// Bit of the MWC MQS channel
    pub const MWC_BOX_BIT: u32 = 1;

    /// Bit of the keybase channel
    pub const KEYBASE_BIT: u32 = 2;

    const KNOWN_BITS: u32 = Self::MWC_BOX_BIT | Self::KEYBASE_BIT;

    /// Decode the packed form.
    ///
    /// # Panics
    ///
    /// Panics if `bits` carries a bit that maps to no channel.
    pub fn from_bits(bits: u32) -> Self {
        if bits & !Self::KNOWN_BITS != 0 {
            panic!("unknown listen state value: {:#x}", bits);
        }
        Self {
            mwc_box: bits & Self::MWC_BOX_BIT != 0,
            keybase: bits & Self::KEYBASE_BIT != 0,
        }
    }

    /// Packed form
    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.mwc_box {
            bits |= Self::MWC_BOX_BIT;
        }
        if self.keybase {
            bits |= Self::KEYBASE_BIT;
        }
        bits
    }

    /// No channel selected
    pub fn is_empty(&self) -> bool {
        !self.mwc_box && !self.keybase
    }

    /// Channels set in `self` but not in `other`
    pub fn without(&self, other: ListenState) -> Self {
        Self {
            mwc_box: self.mwc_box && !other.mwc_box,
            keybase: self.keybase && !other.keybase,
        }
    }

    /// Selected channels, in start order
    pub fn channels(&self) -> Vec<ListenChannel> {
        let mut out = Vec::with_capacity(2);
        if self.mwc_box {
            out.push(ListenChannel::MwcBox);
        }
        if self.keybase {
            out.push(ListenChannel::Keybase);
        }
        out
    }
}

impl BitOr for ListenState {
    type Output = ListenState;

    fn bitor(self, rhs: ListenState) -> ListenState {
        ListenState {
            mwc_box: self.mwc_box || rhs.mwc_box,
            keybase: self.keybase || rhs.keybase,
        }
    }
}

impl From<ListenChannel> for ListenState {
    fn from(channel: ListenChannel) -> Self {
        match channel {
            ListenChannel::MwcBox => ListenState::MWC_BOX,
            ListenChannel::Keybase => ListenState::KEYBASE,
        }
    }
}

/// A single listening channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenChannel {
    /// MWC MQS relay box
    MwcBox,
    /// Keybase companion app
    Keybase,
}

impl fmt::Display for ListenChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenChannel::MwcBox => write!(f, "MWC MQS"),
            ListenChannel::Keybase => write!(f, "Keybase"),
        }
    }
}
