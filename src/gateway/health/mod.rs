//! Bus health monitor: edge-triggered status reporting and cumulative
//! error statistics.
//!
//! The monitor polls the controller's protocol-status and error-counter
//! registers. A status frame goes upstream only when something changed
//! since the previous report (or on the very first successful poll), so a
//! quiet bus costs no host bandwidth. Statistics accumulate on every poll
//! regardless.
use crate::gateway::bus::{CanStats, ErrorCounters, ProtocolStatus, LEC_NO_CHANGE, LEC_NO_ERROR};
use crate::gateway::command::CMD_PROTOCOL_STATUS;
use crate::gateway::traits::{
    can_controller::CanController,
    execution::{assert_thread_context, ExecutionContext},
    host_link::HostLink,
    timestamp::TimestampSource,
};
use crate::gateway::wire::Framer;

//==================================================================================HealthMonitor

/// Retained snapshots and statistics across monitor polls.
///
/// Zero-initialized at startup and alive for the whole process; the
/// previous-status snapshot only advances when a report was emitted, so a
/// change suppressed by a read failure is still caught next time.
pub struct HealthMonitor {
    prev_status: ProtocolStatus,
    prev_counters: ErrorCounters,
    initialized: bool,
    stats: CanStats,
}

impl HealthMonitor {
    /// Monitor with no baseline: the first successful poll always reports.
    pub const fn new() -> Self {
        Self {
            prev_status: ProtocolStatus {
                last_error_code: 0,
                data_last_error_code: 0,
                activity: 0,
                error_passive: false,
                warning: false,
                bus_off: false,
                rx_esi: false,
                rx_brs: false,
                rx_fdf: false,
                protocol_exception: false,
                tdc_value: 0,
            },
            prev_counters: ErrorCounters {
                tx_err_count: 0,
                rx_err_count: 0,
                rx_error_passive: false,
            },
            initialized: false,
            stats: CanStats {
                rx_err_count: 0,
                tx_err_count: 0,
                rx_err_max: 0,
                tx_err_max: 0,
                passive_err_count: 0,
            },
        }
    }

    /// Poll the controller and report upstream when its state changed.
    ///
    /// Thread context only. No-op while the controller is off-bus; either
    /// register read failing abandons this poll without side effects.
    pub fn poll<C, L, T, X>(&mut self, can: &mut C, framer: &mut Framer, link: &mut L, timer: &T, exec: &X)
    where
        C: CanController,
        L: HostLink,
        T: TimestampSource,
        X: ExecutionContext,
    {
        assert_thread_context(exec);

        if !can.is_active() {
            return;
        }
        let Ok(status) = can.protocol_status() else {
            return;
        };
        let Ok(counters) = can.error_counters() else {
            return;
        };

        let changed = if self.initialized {
            self.status_changed(&status)
        } else {
            self.initialized = true;
            true
        };

        self.accumulate(&counters);

        if changed {
            let payload = [
                CMD_PROTOCOL_STATUS,
                status.last_error_code,
                status.data_last_error_code,
                status.activity,
                status.flags_byte(),
                status.tdc_value,
            ];
            framer.send(&payload, link, timer);
            self.prev_status = status;
        }
    }

    /// Compare against the previous snapshot.
    ///
    /// Error codes only count as a change when the new value is a real
    /// error: `none` and `no-change` readings are the registers' idle
    /// states, not events.
    fn status_changed(&self, status: &ProtocolStatus) -> bool {
        let prev = &self.prev_status;

        if status.last_error_code != prev.last_error_code
            && status.last_error_code != LEC_NO_ERROR
            && status.last_error_code != LEC_NO_CHANGE
        {
            return true;
        }
        if status.data_last_error_code != prev.data_last_error_code
            && status.data_last_error_code != LEC_NO_ERROR
            && status.data_last_error_code != LEC_NO_CHANGE
        {
            return true;
        }

        status.error_passive != prev.error_passive
            || status.warning != prev.warning
            || status.bus_off != prev.bus_off
            || status.rx_esi != prev.rx_esi
            || status.protocol_exception != prev.protocol_exception
    }

    /// Fold the counter snapshot into the running statistics.
    fn accumulate(&mut self, counters: &ErrorCounters) {
        self.stats.rx_err_count = counters.rx_err_count;
        self.stats.tx_err_count = counters.tx_err_count;
        self.stats.rx_err_max = self.stats.rx_err_max.max(counters.rx_err_count);
        self.stats.tx_err_max = self.stats.tx_err_max.max(counters.tx_err_count);

        if counters.rx_error_passive && !self.prev_counters.rx_error_passive {
            self.stats.passive_err_count += 1;
            #[cfg(feature = "defmt")]
            defmt::warn!("CAN entered RX error-passive");
        }
        self.prev_counters = *counters;
    }

    /// Cumulative statistics for the diagnostics collaborator.
    pub fn stats(&self) -> CanStats {
        self.stats
    }

    /// Clear the cumulative statistics.
    pub fn reset_stats(&mut self) {
        self.stats = CanStats::default();
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}
