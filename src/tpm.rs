//! Caller-facing TPM handle: the detected binding plus its transport, with
//! every hardware sequence serialized behind one lock.

use alloc::vec::Vec;

use log::info;
use spin::Mutex;

use crate::config::TpmConfig;
use crate::detect::{InterfaceKind, TpmVersion, detect};
use crate::error::{Result, TpmError};
use crate::fifo::types::{TpmRegAccess, TpmRegDidVid, TpmRegIntEnable, TpmRegIntfCapability, TpmRegStatus};
use crate::locality::Locality;
use crate::port::{AcpiTables, RegisterPort, Width};
use crate::response::Response;
use crate::transport::{Driver, Register, Transport};

/// What was detected at startup. Fixed for the lifetime of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceBinding {
    pub version: TpmVersion,
    pub interface: InterfaceKind,
    pub base: u64,
    pub registers: &'static [Register],
}

pub struct Tpm<P: RegisterPort> {
    binding: DeviceBinding,
    driver: Driver,
    port: Mutex<P>,
}

impl<P: RegisterPort> Tpm<P> {
    /// Detect the TPM behind `port` and bind its transport.
    pub fn new<A: AcpiTables + ?Sized>(config: TpmConfig, acpi: &A, port: P) -> Result<Self> {
        let (version, interface) = detect(acpi, &port)?;
        Self::with_binding(version, interface, config, port)
    }

    /// Bind a known (version, interface) pair without probing.
    pub fn with_binding(version: TpmVersion, interface: InterfaceKind, config: TpmConfig, port: P) -> Result<Self> {
        let driver = Driver::select(version, interface, &config)?;
        let binding = DeviceBinding { version, interface, base: config.base, registers: driver.registers() };
        Ok(Self { binding, driver, port: Mutex::new(port) })
    }

    pub fn binding(&self) -> &DeviceBinding {
        &self.binding
    }

    /// Encode `name` with `argv` and run it at `locality` ("0" to "4").
    pub fn command(&self, name: &str, locality: &str, argv: &[&str]) -> Result<Response> {
        let locality: Locality = locality.parse()?;
        let port = self.port.lock();
        self.driver.command(&*port, name, locality, argv)
    }

    /// Write a pre-encoded command. The locality is not relinquished afterwards.
    pub fn send(&self, locality: Locality, bytes: &[u8], size: u32) -> Result<()> {
        let port = self.port.lock();
        self.driver.send(&*port, locality, bytes, size)
    }

    /// Collect the response of a previously sent command.
    pub fn read(&self, locality: Locality) -> Result<Response> {
        let port = self.port.lock();
        self.driver.read(&*port, locality)
    }

    pub fn list_registers(&self) -> Vec<&'static str> {
        self.binding.registers.iter().map(|reg| reg.name()).collect()
    }

    /// Read one register of the bank at `locality` and log its decode.
    pub fn dump_register(&self, name: &str, locality: &str) -> Result<u32> {
        let locality: Locality = locality.parse()?;
        let reg = self
            .binding
            .registers
            .iter()
            .copied()
            .find(|reg| reg.name() == name)
            .ok_or(TpmError::InvalidArgument("register"))?;
        let port = self.port.lock();
        Ok(self.dump(&*port, reg, locality))
    }

    /// Read and log every register of the bank, in bank order.
    pub fn dump_all(&self, locality: &str) -> Result<()> {
        let locality: Locality = locality.parse()?;
        let port = self.port.lock();
        for reg in self.binding.registers {
            self.dump(&*port, *reg, locality);
        }
        Ok(())
    }

    pub fn identify(&self) {
        let binding = &self.binding;
        info!("TPM {} over {} interface, registers at 0x{:x}", binding.version, binding.interface, binding.base);
        for reg in binding.registers {
            info!("  {} (+0x{:03x})", reg, reg.offset());
        }
    }

    fn dump(&self, port: &P, reg: Register, locality: Locality) -> u32 {
        let address = locality.register(self.binding.base, reg.offset());
        let value = port.read(address, Width::Dword);
        match reg {
            Register::Access => info!("{} [0x{:x}] = 0x{:08x} {:?}", reg, address, value, TpmRegAccess(value)),
            Register::Sts => info!("{} [0x{:x}] = 0x{:08x} {:?}", reg, address, value, TpmRegStatus(value)),
            Register::IntfCapability => {
                info!("{} [0x{:x}] = 0x{:08x} {:?}", reg, address, value, TpmRegIntfCapability(value))
            }
            Register::IntEnable => {
                info!("{} [0x{:x}] = 0x{:08x} {:?}", reg, address, value, TpmRegIntEnable(value))
            }
            Register::DidVid => {
                let id = TpmRegDidVid(value);
                info!(
                    "{} [0x{:x}] = 0x{:08x} vendor 0x{:04x} device 0x{:04x}",
                    reg,
                    address,
                    value,
                    id.vendor_id(),
                    id.device_id()
                )
            }
            Register::Rid | Register::DataFifo => info!("{} [0x{:x}] = 0x{:08x}", reg, address, value),
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tpm12::TPM_TAG_RSP_COMMAND;
    use crate::codec::tpm20::TPM_ST_NO_SESSIONS;
    use crate::crb::TPM_INTERFACE_ID;
    use crate::fifo::constants::*;
    use crate::port::MmioPort;
    use crate::testing::{SimAcpi, SimTpm};
    use hex_literal::hex;

    fn config() -> TpmConfig {
        TpmConfig { timeout: crate::config::TpmTimeout::uniform(1), ..TpmConfig::default() }
    }

    #[test]
    fn handle_is_shareable() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<Tpm<MmioPort>>();
    }

    #[test]
    fn tcpa_binds_tpm12_fifo() {
        let acpi = SimAcpi { tcpa: true, tpm2: false };
        let tpm = Tpm::new(config(), &acpi, SimTpm::new()).unwrap();
        assert_eq!(tpm.binding().version, TpmVersion::Tpm12);
        assert_eq!(tpm.binding().interface, InterfaceKind::FifoLegacy);
        assert_eq!(tpm.binding().base, TPM_LOCALITY_BASE);
        assert_eq!(
            tpm.list_registers(),
            ["TPM_ACCESS", "TPM_STS", "TPM_DID_VID", "TPM_RID", "TPM_INTF_CAPABILITY", "TPM_INT_ENABLE"]
        );
    }

    #[test]
    fn startup_errors_are_fatal() {
        let acpi = SimAcpi { tcpa: false, tpm2: false };
        let err = Tpm::new(config(), &acpi, SimTpm::new()).err().unwrap();
        assert_eq!(err, TpmError::NoDeviceFound);
        assert!(err.is_fatal());

        let err = Tpm::with_binding(TpmVersion::Tpm12, InterfaceKind::Crb, config(), SimTpm::new()).err().unwrap();
        assert!(matches!(err, TpmError::UnsupportedConfiguration { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn tpm20_legacy_fifo_startup() {
        let acpi = SimAcpi { tcpa: false, tpm2: true };
        let sim = SimTpm::new().with_register(TPM_INTERFACE_ID, 0xF).responding(TPM_ST_NO_SESSIONS, 0, &[]);
        let tpm = Tpm::new(config(), &acpi, sim).unwrap();
        assert_eq!(tpm.binding().interface, InterfaceKind::FifoLegacy);

        let response = tpm.command("startup", "2", &["0", "0"]).unwrap();
        assert_eq!(response.header.return_code, 0);
        assert!(response.payload.is_empty());

        let sim = tpm.port.lock();
        assert_eq!(sim.fifo_written(), hex!("8001 0000000c 00000144 0000"));
        assert!(sim.writes_to(TPM_STS).iter().all(|(address, _, _)| *address == TPM_LOCALITY_2 | 0x18));
        assert_eq!(sim.releases(), 1);
    }

    #[test]
    fn bad_locality_aborts_before_hardware() {
        let tpm = Tpm::with_binding(TpmVersion::Tpm12, InterfaceKind::FifoLegacy, config(), SimTpm::new()).unwrap();
        for locality in ["5", "x", ""] {
            assert_eq!(tpm.command("startup", locality, &["1"]), Err(TpmError::InvalidArgument("locality")));
        }
        assert_eq!(tpm.dump_all("7"), Err(TpmError::InvalidArgument("locality")));
        assert!(tpm.port.lock().writes_to(TPM_ACCESS).is_empty());
    }

    #[test]
    fn command_errors_leave_the_handle_usable() {
        let sim = SimTpm::new().responding(TPM_TAG_RSP_COMMAND, 0, &[]);
        let tpm = Tpm::with_binding(TpmVersion::Tpm12, InterfaceKind::FifoLegacy, config(), sim).unwrap();
        let err = tpm.command("startup", "0", &["9"]).unwrap_err();
        assert!(!err.is_fatal());
        assert!(tpm.command("startup", "0", &["1"]).is_ok());
    }

    #[test]
    fn raw_send_then_read() {
        let sim = SimTpm::new().responding(TPM_TAG_RSP_COMMAND, 0, &[0xAB; 4]);
        let tpm = Tpm::with_binding(TpmVersion::Tpm12, InterfaceKind::FifoLegacy, config(), sim).unwrap();
        let bytes = hex!("00c1 0000000a 00000053");
        tpm.send(Locality::One, &bytes, 10).unwrap();
        let response = tpm.read(Locality::One).unwrap();
        assert_eq!(response.payload, [0xAB; 4]);
        let sim = tpm.port.lock();
        assert_eq!(sim.fifo_written(), bytes);
        assert_eq!(sim.writes_to(TPM_ACCESS), [(TPM_LOCALITY_1, Width::Byte, ACCESS_REQUEST_USE)]);
    }

    #[test]
    fn crb_and_tpm20_fifo_are_bound_but_unimplemented() {
        for interface in [InterfaceKind::Crb, InterfaceKind::Fifo] {
            let tpm = Tpm::with_binding(TpmVersion::Tpm20, interface, config(), SimTpm::new()).unwrap();
            assert!(tpm.list_registers().is_empty());
            assert!(matches!(tpm.command("startup", "0", &["0", "0"]), Err(TpmError::NotImplemented(_))));
            assert!(tpm.dump_all("0").is_ok());
            assert_eq!(tpm.dump_register("TPM_ACCESS", "0"), Err(TpmError::InvalidArgument("register")));
            tpm.identify();
        }
    }

    #[test]
    fn dump_register_reads_the_locality_bank() {
        let sim = SimTpm::new().with_register(TPM_DID_VID, 0x001B_15D1);
        let tpm = Tpm::with_binding(TpmVersion::Tpm12, InterfaceKind::FifoLegacy, config(), sim).unwrap();
        assert_eq!(tpm.dump_register("TPM_DID_VID", "4"), Ok(0x001B_15D1));
        assert_eq!(tpm.dump_register("TPM_ACCESS", "0"), Ok(0xA1));
        assert_eq!(tpm.dump_register("TPM_DATA_FIFO", "0"), Err(TpmError::InvalidArgument("register")));
        assert_eq!(tpm.dump_register("TPM_BOGUS", "0"), Err(TpmError::InvalidArgument("register")));
        assert_eq!(tpm.port.lock().fifo_reads(), 0);
    }

    #[test]
    fn dump_all_reads_every_register_without_writing() {
        let tpm = Tpm::with_binding(TpmVersion::Tpm20, InterfaceKind::FifoLegacy, config(), SimTpm::new()).unwrap();
        tpm.dump_all("1").unwrap();
        tpm.identify();
        let sim = tpm.port.lock();
        assert_eq!(sim.fifo_reads(), 0);
        assert!(sim.writes_to(TPM_ACCESS).is_empty());
        assert!(sim.writes_to(TPM_STS).is_empty());
    }
}
