//! Per-login overrides of configured agent parameters.

use crate::config::AgentConfig;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Which parameters were overridden at login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideFlags(u32);

impl OverrideFlags {
    pub const NONE: OverrideFlags = OverrideFlags(0);
    pub const ACK_CALL: OverrideFlags = OverrideFlags(1 << 0);
    pub const END_CALL: OverrideFlags = OverrideFlags(1 << 1);
    pub const DTMF_ACCEPT: OverrideFlags = OverrideFlags(1 << 2);
    pub const DTMF_END: OverrideFlags = OverrideFlags(1 << 3);
    pub const AUTO_LOGOFF: OverrideFlags = OverrideFlags(1 << 4);
    pub const WRAPUP_TIME: OverrideFlags = OverrideFlags(1 << 5);
    pub const MAX_LOGIN_TRIES: OverrideFlags = OverrideFlags(1 << 6);

    pub fn contains(&self, other: OverrideFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl BitOr for OverrideFlags {
    type Output = OverrideFlags;

    fn bitor(self, rhs: OverrideFlags) -> OverrideFlags {
        OverrideFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OverrideFlags {
    fn bitor_assign(&mut self, rhs: OverrideFlags) {
        self.0 |= rhs.0;
    }
}

/// Values supplied by the login path, each guarded by its flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOverrides {
    pub flags: OverrideFlags,
    pub dtmf_accept: String,
    pub dtmf_end: String,
    pub max_login_tries: u32,
    pub auto_logoff: u32,
    pub wrapup_time: u32,
    pub ack_call: bool,
    pub end_call: bool,
}

impl LoginOverrides {
    pub fn with_dtmf_accept(mut self, value: impl Into<String>) -> Self {
        self.dtmf_accept = value.into();
        self.flags |= OverrideFlags::DTMF_ACCEPT;
        self
    }

    pub fn with_dtmf_end(mut self, value: impl Into<String>) -> Self {
        self.dtmf_end = value.into();
        self.flags |= OverrideFlags::DTMF_END;
        self
    }

    pub fn with_max_login_tries(mut self, value: u32) -> Self {
        self.max_login_tries = value;
        self.flags |= OverrideFlags::MAX_LOGIN_TRIES;
        self
    }

    pub fn with_auto_logoff(mut self, value: u32) -> Self {
        self.auto_logoff = value;
        self.flags |= OverrideFlags::AUTO_LOGOFF;
        self
    }

    pub fn with_wrapup_time(mut self, value: u32) -> Self {
        self.wrapup_time = value;
        self.flags |= OverrideFlags::WRAPUP_TIME;
        self
    }

    pub fn with_ack_call(mut self, value: bool) -> Self {
        self.ack_call = value;
        self.flags |= OverrideFlags::ACK_CALL;
        self
    }

    pub fn with_end_call(mut self, value: bool) -> Self {
        self.end_call = value;
        self.flags |= OverrideFlags::END_CALL;
        self
    }
}

/// Parameters in effect for a logged in agent: overrides win over config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveParams {
    pub dtmf_accept: String,
    pub dtmf_end: String,
    pub max_login_tries: u32,
    pub auto_logoff: u32,
    pub wrapup_time: u32,
    pub ack_call: bool,
    pub end_call: bool,
}

impl EffectiveParams {
    pub fn resolve(cfg: &AgentConfig, overrides: &LoginOverrides) -> Self {
        let flags = overrides.flags;
        Self {
            dtmf_accept: choose(flags, OverrideFlags::DTMF_ACCEPT, &overrides.dtmf_accept, &cfg.dtmf_accept)
                .clone(),
            dtmf_end: choose(flags, OverrideFlags::DTMF_END, &overrides.dtmf_end, &cfg.dtmf_end).clone(),
            max_login_tries: choose(
                flags,
                OverrideFlags::MAX_LOGIN_TRIES,
                overrides.max_login_tries,
                cfg.max_login_tries,
            ),
            auto_logoff: choose(flags, OverrideFlags::AUTO_LOGOFF, overrides.auto_logoff, cfg.auto_logoff),
            wrapup_time: choose(flags, OverrideFlags::WRAPUP_TIME, overrides.wrapup_time, cfg.wrapup_time),
            ack_call: choose(flags, OverrideFlags::ACK_CALL, overrides.ack_call, cfg.ack_call),
            end_call: choose(flags, OverrideFlags::END_CALL, overrides.end_call, cfg.end_call),
        }
    }
}

fn choose<T>(flags: OverrideFlags, flag: OverrideFlags, value: T, fallback: T) -> T {
    if flags.contains(flag) {
        value
    } else {
        fallback
    }
}
