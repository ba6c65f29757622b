//! Test doubles and common utilities for contract tests
//!
//! These doubles record the calls the core makes against its seams without
//! implementing real functionality. Clones share their recorded state, so a
//! test can keep a handle to a double it boxed into the reconciler.

use async_trait::async_trait;
use ipm_core::error::{Error, Result};
use ipm_core::traits::{AddressSetClient, IpProbe, Notifier, TemplateMember};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Probe returning a fixed address
#[derive(Clone)]
pub struct StaticProbe {
    ip: Ipv4Addr,
    call_count: Arc<AtomicUsize>,
}

impl StaticProbe {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpProbe for StaticProbe {
    async fn discover(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// Probe with every provider failed
#[derive(Clone, Default)]
pub struct ExhaustedProbe;

#[async_trait]
impl IpProbe for ExhaustedProbe {
    async fn discover(&self) -> Result<Ipv4Addr> {
        Err(Error::DiscoveryExhausted)
    }
}

/// One recorded swap call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCall {
    pub template_id: String,
    pub original: Vec<TemplateMember>,
    pub replacement: Vec<TemplateMember>,
}

/// Address set double with scripted members and recorded swap calls
#[derive(Clone)]
pub struct ScriptedAddressSet {
    members: Vec<TemplateMember>,
    swap_calls: Arc<Mutex<Vec<SwapCall>>>,
    describe_call_count: Arc<AtomicUsize>,
    fail_describe: bool,
    fail_swap: bool,
}

impl ScriptedAddressSet {
    pub fn new(members: Vec<TemplateMember>) -> Self {
        Self {
            members,
            swap_calls: Arc::new(Mutex::new(Vec::new())),
            describe_call_count: Arc::new(AtomicUsize::new(0)),
            fail_describe: false,
            fail_swap: false,
        }
    }

    /// Every describe call raises
    pub fn failing_describe() -> Self {
        let mut set = Self::new(Vec::new());
        set.fail_describe = true;
        set
    }

    /// Every swap call raises
    pub fn failing_swap(members: Vec<TemplateMember>) -> Self {
        let mut set = Self::new(members);
        set.fail_swap = true;
        set
    }

    pub fn swap_calls(&self) -> Vec<SwapCall> {
        self.swap_calls.lock().unwrap().clone()
    }

    pub fn describe_call_count(&self) -> usize {
        self.describe_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressSetClient for ScriptedAddressSet {
    async fn describe_members(&self, _template_id: &str) -> Result<Vec<TemplateMember>> {
        self.describe_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_describe {
            return Err(Error::http("describe: connection reset"));
        }
        Ok(self.members.clone())
    }

    async fn swap_members(
        &self,
        template_id: &str,
        original: &[TemplateMember],
        replacement: &[TemplateMember],
    ) -> Result<()> {
        if self.fail_swap {
            return Err(Error::http("swap: 500 internal error"));
        }
        self.swap_calls.lock().unwrap().push(SwapCall {
            template_id: template_id.to_string(),
            original: original.to_vec(),
            replacement: replacement.to_vec(),
        });
        Ok(())
    }
}

/// Notifier recording delivered messages
#[derive(Clone)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every delivery attempt raises, after recording the message
    pub fn failing() -> Self {
        let mut notifier = Self::new();
        notifier.fail = true;
        notifier
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(Error::notification("webhook returned 502"));
        }
        Ok(())
    }
}
