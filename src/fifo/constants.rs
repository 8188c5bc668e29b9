/*
 * Command Header Fields:
 *       0   1   2   3   4   5   6   7   8   9   10  ...
 *       -------------------------------------------------------------
 *       | TAG  |     SIZE      | COMMAND CODE  |    other ...
 *       -------------------------------------------------------------
 *
 * Response Header Fields:
 *       0   1   2   3   4   5   6   7   8   9   10  ...
 *       -------------------------------------------------------------
 *       | TAG  |     SIZE      |  RETURN CODE  |    other ...
 *       -------------------------------------------------------------
 */
pub const CMD_HEAD_SIZE: usize = 10;
pub const RSP_HEAD_SIZE: usize = 10;
pub const CMD_SIZE_OFFSET: usize = 2;
pub const CMD_CC_OFFSET: usize = 6;
pub const RSP_SIZE_OFFSET: usize = 2;
pub const RSP_RST_OFFSET: usize = 6;

/* Const Definition */
pub const TPM_LOCALITY_BASE: u64 = 0xfed40000;
pub const TPM_LOCALITY_0: u64 = TPM_LOCALITY_BASE;
pub const TPM_LOCALITY_1: u64 = TPM_LOCALITY_BASE | 0x1000;
pub const TPM_LOCALITY_2: u64 = TPM_LOCALITY_BASE | 0x2000;
pub const TPM_LOCALITY_3: u64 = TPM_LOCALITY_BASE | 0x3000;
pub const TPM_LOCALITY_4: u64 = TPM_LOCALITY_BASE | 0x4000;

//-----------------------------------------------------------------------------
// FIFO I/F related definitions, see TCG PC Client Specific TPM Interface Specification (TIS) 1.3
//-----------------------------------------------------------------------------
pub const TPM_ACCESS: u32 = 0x0000;
pub const TPM_INT_ENABLE: u32 = 0x0008;
pub const TPM_INTF_CAPABILITY: u32 = 0x0014;
pub const TPM_STS: u32 = 0x0018;
pub const TPM_DATA_FIFO: u32 = 0x0024;
pub const TPM_DID_VID: u32 = 0x0F00;
pub const TPM_RID: u32 = 0x0F04;

/* ACCESS sentinels */
pub const ACCESS_REQUEST_USE: u32 = 0x02;
pub const ACCESS_BEEN_SEIZED: u32 = 0x10;
pub const ACCESS_ACTIVE_LOCALITY: u32 = 0x20;

/* STS sentinels */
pub const STS_DATA_AVAIL: u32 = 0x10;
pub const STS_GO: u32 = 0x20;
pub const STS_COMMAND_READY: u32 = 0x40;

pub const STS_BURST_COUNT_SHIFT: u32 = 8;
pub const STS_BURST_COUNT_MASK: u32 = 0xFF_FFFF;
