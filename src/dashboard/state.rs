//! Dashboard state: the two transaction lists, the SAR panel and the pause flag.
//!
//! Everything here is synchronous and owned by a single task. Network work
//! happens elsewhere and reports back through `DashboardEvent`s.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::models::{Transaction, TransactionId};

/// Tag attached to a SAR request so late completions can be recognised
pub type RequestTag = u64;

/// State of the SAR panel
#[derive(Debug, Clone, PartialEq)]
pub enum SarPhase {
    Idle,
    Loading,
    Ready,
}

/// The selected anomaly and its draft
#[derive(Debug, Clone)]
pub struct SarPanel {
    pub selected: Option<Transaction>,
    pub draft: String,
    pub phase: SarPhase,
}

impl SarPanel {
    pub fn is_loading(&self) -> bool {
        self.phase == SarPhase::Loading
    }
}

/// Why a SAR request was not started
#[derive(Debug, Clone, PartialEq)]
pub enum SarRejection {
    /// A request for this very record is already in flight
    AlreadyLoading(TransactionId),
}

#[derive(Debug)]
pub struct DashboardState {
    live: VecDeque<Transaction>,
    anomalies: Vec<Transaction>,
    live_capacity: usize,
    sar: SarPanel,
    paused: bool,
    latest_tag: RequestTag,
    last_update: Option<DateTime<Utc>>,
    notice: Option<String>,
}

impl DashboardState {
    pub fn new(live_capacity: usize) -> Self {
        Self {
            live: VecDeque::with_capacity(live_capacity + 1),
            anomalies: Vec::new(),
            live_capacity,
            sar: SarPanel {
                selected: None,
                draft: String::new(),
                phase: SarPhase::Idle,
            },
            paused: false,
            latest_tag: 0,
            last_update: None,
            notice: None,
        }
    }

    /// Record a transaction from the stream. Newest first; the live list
    /// drops its oldest entry past capacity, the anomaly list keeps everything.
    pub fn apply_transaction(&mut self, transaction: Transaction, received_at: DateTime<Utc>) {
        if transaction.is_anomaly {
            self.anomalies.insert(0, transaction.clone());
        }

        self.live.push_front(transaction);
        self.live.truncate(self.live_capacity);
        self.last_update = Some(received_at);
    }

    pub fn live(&self) -> impl ExactSizeIterator<Item = &Transaction> {
        self.live.iter()
    }

    pub fn anomalies(&self) -> &[Transaction] {
        &self.anomalies
    }

    pub fn sar(&self) -> &SarPanel {
        &self.sar
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// One-line message shown under the panels until the next command
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Find an anomaly by 1-based list position or by id
    pub fn find_anomaly(&self, key: &str) -> Option<&Transaction> {
        if let Ok(position) = key.parse::<usize>() {
            if position >= 1 && position <= self.anomalies.len() {
                return Some(&self.anomalies[position - 1]);
            }
        }
        self.anomalies.iter().find(|tx| tx.id.to_string() == key)
    }

    /// Whether the generate action for this record is currently disabled
    pub fn is_generating(&self, id: &TransactionId) -> bool {
        self.sar.is_loading()
            && self
                .sar
                .selected
                .as_ref()
                .map_or(false, |selected| &selected.id == id)
    }

    /// Select an anomaly and start a SAR request for it.
    ///
    /// Clears the previous draft and returns the tag the completion must carry.
    pub fn begin_sar(&mut self, anomaly: Transaction) -> Result<RequestTag, SarRejection> {
        if self.is_generating(&anomaly.id) {
            return Err(SarRejection::AlreadyLoading(anomaly.id));
        }

        self.latest_tag += 1;
        self.sar.selected = Some(anomaly);
        self.sar.draft.clear();
        self.sar.phase = SarPhase::Loading;
        Ok(self.latest_tag)
    }

    /// Apply the outcome of a SAR request. Returns false if the request was
    /// superseded by a newer one or the panel was dismissed.
    pub fn complete_sar(&mut self, tag: RequestTag, draft: String) -> bool {
        if tag != self.latest_tag || self.sar.selected.is_none() {
            return false;
        }

        self.sar.draft = draft;
        self.sar.phase = SarPhase::Ready;
        true
    }

    /// Close the SAR panel. Any request still in flight is ignored when it lands.
    pub fn dismiss_sar(&mut self) {
        self.sar.selected = None;
        self.sar.draft.clear();
        self.sar.phase = SarPhase::Idle;
    }
}
