use core::ptr;

/// Access width of a single register read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Width {
    Byte = 1,
    Dword = 4,
}

/// Raw physical register access. Every call is a live hardware access.
pub trait RegisterPort {
    fn read(&self, address: u64, width: Width) -> u32;
    fn write(&self, address: u64, width: Width, value: u32);
}

impl<P: RegisterPort + ?Sized> RegisterPort for &P {
    fn read(&self, address: u64, width: Width) -> u32 {
        (**self).read(address, width)
    }

    fn write(&self, address: u64, width: Width, value: u32) {
        (**self).write(address, width, value)
    }
}

/// Firmware table presence, used only to tell 1.2 from 2.0 parts.
pub trait AcpiTables {
    fn is_table_present(&self, signature: &[u8; 4]) -> bool;
}

/// Volatile access to identity-mapped physical memory.
pub struct MmioPort {
    _private: (),
}

impl MmioPort {
    /// # Safety
    ///
    /// Every address later passed to `read`/`write` must be mapped, uncached
    /// and identity-mapped for the lifetime of the port.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterPort for MmioPort {
    fn read(&self, address: u64, width: Width) -> u32 {
        unsafe {
            match width {
                Width::Byte => ptr::read_volatile(address as usize as *const u8) as u32,
                Width::Dword => ptr::read_volatile(address as usize as *const u32),
            }
        }
    }

    fn write(&self, address: u64, width: Width, value: u32) {
        unsafe {
            match width {
                Width::Byte => ptr::write_volatile(address as usize as *mut u8, value as u8),
                Width::Dword => ptr::write_volatile(address as usize as *mut u32, value),
            }
        }
    }
}
