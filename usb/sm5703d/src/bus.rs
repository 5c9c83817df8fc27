use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::Path;

use log::trace;

use crate::error::{Error, Result};
use crate::regs::Register;

/// Byte-wide access to the chip's register file.
pub trait RegisterBus: Send {
    fn read(&mut self, addr: u8) -> io::Result<u8>;
    fn write(&mut self, addr: u8, value: u8) -> io::Result<()>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for Box<T> {
    fn read(&mut self, addr: u8) -> io::Result<u8> {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u8, value: u8) -> io::Result<()> {
        (**self).write(addr, value)
    }
}

/// Typed register access on top of any [`RegisterBus`].
pub trait RegisterAccess {
    fn read_reg(&mut self, reg: Register) -> Result<u8>;
    fn write_reg(&mut self, reg: Register, value: u8) -> Result<()>;

    /// Read-modify-write, returns the written value.
    fn update_reg(&mut self, reg: Register, set: u8, clear: u8) -> Result<u8> {
        let value = (self.read_reg(reg)? | set) & !clear;
        self.write_reg(reg, value)?;
        Ok(value)
    }
}

impl<B: RegisterBus + ?Sized> RegisterAccess for B {
    fn read_reg(&mut self, reg: Register) -> Result<u8> {
        let value = self
            .read(reg.addr())
            .map_err(|source| Error::Io { reg, source })?;
        trace!("sm5703: read {:?} = {:#04x}", reg, value);
        Ok(value)
    }

    fn write_reg(&mut self, reg: Register, value: u8) -> Result<()> {
        trace!("sm5703: write {:?} = {:#04x}", reg, value);
        self.write(reg.addr(), value)
            .map_err(|source| Error::Io { reg, source })
    }
}

/// Register file exposed as a seekable file, one byte per register address.
pub struct FileBus {
    file: File,
}

impl FileBus {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }
}

impl RegisterBus for FileBus {
    fn read(&mut self, addr: u8) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        if self.file.read_at(&mut buf, addr.into())? != 1 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "short register read",
            ));
        }
        Ok(buf[0])
    }

    fn write(&mut self, addr: u8, value: u8) -> io::Result<()> {
        if self.file.write_at(&[value], addr.into())? != 1 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "short register write",
            ));
        }
        Ok(())
    }
}
