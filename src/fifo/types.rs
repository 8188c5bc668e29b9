use bitfield::bitfield;

use super::constants::*;

// Register layouts of the TIS FIFO bank, see TCG PC Client TIS 1.3 chapter 11.

bitfield! {
    pub struct TpmRegAccess(u32);
    impl Debug;
    pub tpm_establishment, _: 0;
    pub request_use, _: 1;
    pub pending_request, _: 2;
    pub seize, _: 3;
    pub been_seized, _: 4;
    pub active_locality, _: 5;
    pub tpm_reg_valid_sts, _: 7;
}

bitfield! {
    pub struct TpmRegStatus(u32);
    impl Debug;
    u32;
    pub response_retry, _: 1;
    pub self_test_done, _: 2;
    pub expect, _: 3;
    pub data_avail, _: 4;
    pub tpm_go, _: 5;
    pub command_ready, _: 6;
    pub sts_valid, _: 7;
    pub burst_count, _: 31, 8;
}

bitfield! {
    pub struct TpmRegIntfCapability(u32);
    impl Debug;
    u32;
    pub data_avail_int_support, _: 0;
    pub sts_valid_int_support, _: 1;
    pub locality_change_int_support, _: 2;
    pub interrupt_level_high, _: 3;
    pub interrupt_level_low, _: 4;
    pub interrupt_edge_rising, _: 5;
    pub interrupt_edge_falling, _: 6;
    pub command_ready_int_support, _: 7;
    pub burst_count_static, _: 8;
    pub data_transfer_size_support, _: 10, 9;
    pub interface_version, _: 30, 28;
}

bitfield! {
    pub struct TpmRegIntEnable(u32);
    impl Debug;
    u32;
    pub data_avail_int_enable, _: 0;
    pub sts_valid_int_enable, _: 1;
    pub locality_change_int_enable, _: 2;
    pub type_polarity, _: 4, 3;
    pub command_ready_enable, _: 7;
    pub global_int_enable, _: 31;
}

bitfield! {
    pub struct TpmRegDidVid(u32);
    impl Debug;
    u32;
    pub vendor_id, _: 15, 0;
    pub device_id, _: 31, 16;
}

impl TpmRegStatus {
    /// Bytes the FIFO will accept or supply before STS must be re-read.
    pub fn burst(&self) -> usize {
        (self.burst_count() & STS_BURST_COUNT_MASK) as usize
    }
}
